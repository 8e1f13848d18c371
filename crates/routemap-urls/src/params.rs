//! Ordered call-time arguments.
//!
//! [`Params`] keeps insertion order, because the order callers supply
//! arguments is the order leftover arguments appear in the query string.
//! [`CallArguments`] bundles params with the optional fragment and
//! explicit query parameters of a single `build_url` call.

use crate::value::ParamValue;

/// An insertion-ordered mapping from argument name to [`ParamValue`].
///
/// Re-inserting an existing key replaces its value in place and keeps its
/// original position.
///
/// # Examples
///
/// ```
/// use routemap_urls::params::Params;
///
/// let params = Params::new().with("q", "a b").with("page", 2);
/// let keys: Vec<&str> = params.keys().collect();
/// assert_eq!(keys, ["q", "page"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    /// Creates an empty `Params`.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds an argument and returns `self`, for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets the value for a key, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Option<ParamValue> {
        let key = key.into();
        let value = value.into();
        if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(existing, value));
        }
        self.entries.push((key, value));
        None
    }

    /// Appends a value under `key`, turning an existing scalar into a list.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, ParamValue::List(items))) => items.push(value),
            Some((_, existing)) => {
                let first = std::mem::replace(existing, ParamValue::Null);
                *existing = ParamValue::List(vec![first, value]);
            }
            None => self.entries.push((key, value)),
        }
    }

    /// Returns the value for a key.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns `true` if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Removes a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Returns the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Returns `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of arguments.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a copy without the entries whose value is the empty string.
    ///
    /// An empty string means "not provided": such an argument neither
    /// satisfies a rule nor shows up in the query string.
    #[must_use]
    pub fn cleaned(&self) -> Self {
        self.entries
            .iter()
            .filter(|(_, v)| !v.is_empty_string())
            .cloned()
            .collect()
    }

    /// Converts these params to a JSON object for diagnostics.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Params {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a str, &'a ParamValue);
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Everything a caller supplies to one URL build.
///
/// `query` parameters never take part in rule matching; they are appended
/// to the query string after the arguments the rule left unprocessed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArguments {
    /// Arguments matched against rules and substituted into the path.
    pub params: Params,
    /// Fragment appended as `#fragment`.
    pub fragment: Option<String>,
    /// Explicit query parameters.
    pub query: Params,
}

impl CallArguments {
    /// Creates call arguments from params alone.
    pub fn new(params: Params) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Sets the fragment.
    #[must_use]
    pub fn fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    /// Adds an explicit query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.query.insert(key, value);
        self
    }
}

impl From<Params> for CallArguments {
    fn from(params: Params) -> Self {
        Self::new(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut params = Params::new().with("a", 1).with("b", 2);
        let old = params.insert("a", 3);
        assert_eq!(old, Some(ParamValue::Int(1)));
        let keys: Vec<&str> = params.keys().collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(params.get("a"), Some(&ParamValue::Int(3)));
    }

    #[test]
    fn test_append_builds_list() {
        let mut params = Params::new();
        params.append("tag", "x");
        params.append("tag", "y");
        params.append("tag", "z");
        assert_eq!(params.get("tag"), Some(&ParamValue::from(vec!["x", "y", "z"])));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut params = Params::new().with("a", 1).with("b", 2);
        assert_eq!(params.remove("a"), Some(ParamValue::Int(1)));
        assert!(!params.contains_key("a"));
        assert_eq!(params.remove("missing"), None);
    }

    #[test]
    fn test_cleaned_drops_empty_strings_only() {
        let params = Params::new()
            .with("q", "")
            .with("n", ParamValue::Null)
            .with("u", ParamValue::Undefined)
            .with("zero", 0);
        let cleaned = params.cleaned();
        let keys: Vec<&str> = cleaned.keys().collect();
        assert_eq!(keys, ["n", "u", "zero"]);
    }

    #[test]
    fn test_from_json_map_keeps_order() {
        let json = json!({"year": 2024, "month": "03", "day": [1, 2]});
        let serde_json::Value::Object(map) = json else {
            panic!("expected object");
        };
        let params = Params::from(map);
        let keys: Vec<&str> = params.keys().collect();
        assert_eq!(keys, ["year", "month", "day"]);
    }

    #[test]
    fn test_to_json() {
        let params = Params::new().with("id", 7).with("u", ParamValue::Undefined);
        assert_eq!(params.to_json(), json!({"id": 7, "u": null}));
    }

    #[test]
    fn test_call_arguments_builder() {
        let args = CallArguments::new(Params::new().with("id", 1))
            .fragment("top")
            .query("tab", "files");
        assert_eq!(args.fragment.as_deref(), Some("top"));
        assert_eq!(args.query.get("tab"), Some(&ParamValue::from("files")));
    }
}
