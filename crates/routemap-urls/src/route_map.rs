//! Route tables keyed by dotted endpoint names.
//!
//! The server exports its URL map as one nested JSON object. Namespaces are
//! plain objects; leaves are route templates (a string or a `flask_rules`
//! object):
//!
//! ```json
//! {
//!   "Base": "/indico",
//!   "Timetable": {
//!     "contributions": {
//!       "add": {"type": "flask_rules", "endpoint": "timetable.add_contribution", "rules": []}
//!     }
//!   }
//! }
//! ```
//!
//! [`RouteMap`] flattens it to keys such as `Timetable.contributions.add`.

use std::collections::HashMap;
use std::path::Path;

use routemap_core::{RouteMapError, RouteMapResult};

use crate::error::RouteBuildError;
use crate::template::RouteTemplate;

/// A route-table entry that failed to parse.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteProblem {
    /// The dotted key of the entry.
    pub key: String,
    /// Why it was rejected.
    pub error: RouteBuildError,
}

/// Route templates by dotted key, in document order.
#[derive(Debug, Clone, Default)]
pub struct RouteMap {
    entries: Vec<(String, RouteTemplate)>,
    index: HashMap<String, usize>,
}

impl RouteMap {
    /// Creates an empty route map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a template.
    pub fn insert(&mut self, key: impl Into<String>, template: RouteTemplate) {
        let key = key.into();
        if let Some(&pos) = self.index.get(&key) {
            self.entries[pos].1 = template;
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, template));
        }
    }

    /// Returns the template stored under `key`.
    pub fn get(&self, key: &str) -> Option<&RouteTemplate> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the keys in document order.
    pub fn endpoints(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Returns `(key, template)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RouteTemplate)> {
        self.entries.iter().map(|(k, t)| (k.as_str(), t))
    }

    /// Returns the number of templates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map holds no templates.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flattens a nested route table, collecting invalid entries instead of
    /// failing on the first one.
    ///
    /// # Errors
    ///
    /// Returns an error only if `value` is not a JSON object.
    pub fn from_value_lenient(value: &serde_json::Value) -> RouteMapResult<(Self, Vec<RouteProblem>)> {
        let serde_json::Value::Object(root) = value else {
            return Err(RouteMapError::SerializationError(
                "Route table must be a JSON object".to_string(),
            ));
        };
        let mut map = Self::new();
        let mut problems = Vec::new();
        collect(root, "", &mut map, &mut problems);
        Ok((map, problems))
    }

    /// Flattens a nested route table.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not an object or any entry is invalid.
    pub fn from_value(value: &serde_json::Value) -> RouteMapResult<Self> {
        let (map, problems) = Self::from_value_lenient(value)?;
        match problems.into_iter().next() {
            Some(problem) => Err(RouteMapError::SerializationError(format!(
                "Invalid route '{}': {}",
                problem.key, problem.error
            ))),
            None => Ok(map),
        }
    }

    /// Parses a route table from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid JSON or invalid entries.
    pub fn from_json_str(json: &str) -> RouteMapResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Reads a route table from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> RouteMapResult<Self> {
        let value = read_json_file(path.as_ref())?;
        Self::from_value(&value)
    }

    /// Reads a route table from a JSON file, collecting invalid entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON object.
    pub fn from_json_file_lenient(path: impl AsRef<Path>) -> RouteMapResult<(Self, Vec<RouteProblem>)> {
        let value = read_json_file(path.as_ref())?;
        Self::from_value_lenient(&value)
    }
}

fn read_json_file(path: &Path) -> RouteMapResult<serde_json::Value> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        RouteMapError::NotFound(format!("Cannot read route table '{}': {e}", path.display()))
    })?;
    Ok(serde_json::from_str(&content)?)
}

fn collect(
    object: &serde_json::Map<String, serde_json::Value>,
    prefix: &str,
    map: &mut RouteMap,
    problems: &mut Vec<RouteProblem>,
) {
    for (name, value) in object {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };

        let is_namespace = value.is_object() && value.get("type").is_none();
        if is_namespace {
            if let serde_json::Value::Object(children) = value {
                collect(children, &key, map, problems);
            }
            continue;
        }

        match RouteTemplate::from_value(value) {
            Ok(template) => map.insert(key, template),
            Err(error) => problems.push(RouteProblem { key, error }),
        }
    }
}
