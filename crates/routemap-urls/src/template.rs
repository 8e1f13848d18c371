//! Route templates and the rules they are made of.
//!
//! The server exports every endpoint either as a pre-resolved URL string or
//! as a set of interchangeable rules:
//!
//! ```json
//! {
//!   "type": "flask_rules",
//!   "endpoint": "event.display",
//!   "rules": [{
//!     "args": ["confId"],
//!     "defaults": {},
//!     "converters": {},
//!     "trace": [
//!       {"is_dynamic": false, "data": "|/event/"},
//!       {"is_dynamic": true, "data": "confId"},
//!       {"is_dynamic": false, "data": "/"}
//!     ]
//!   }]
//! }
//! ```
//!
//! [`RouteTemplate::from_value`] parses and validates that shape.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{RouteBuildError, RouteBuildResult};
use crate::params::Params;
use crate::value::ParamValue;

/// The discriminator of a rule-set template on the wire.
pub const RULES_TYPE: &str = "flask_rules";

/// One piece of a rule's pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceElement {
    /// Literal text.
    Static(String),
    /// A placeholder substituted with the argument `name`.
    Dynamic {
        /// The argument bound to this placeholder.
        name: String,
        /// A converter identifier overriding the rule's `converters` entry.
        converter: Option<String>,
    },
}

/// One concrete URL pattern variant of an endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rule {
    /// Argument names the rule requires, in order.
    pub args: Vec<String>,
    /// Default values; an argument listed here may be omitted by the caller.
    pub defaults: Params,
    /// The pattern, split into static text and placeholders.
    pub trace: Vec<TraceElement>,
    /// Converter identifier per argument name.
    pub converters: HashMap<String, String>,
}

impl Rule {
    /// Creates an empty rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an argument (no-op if already declared).
    #[must_use]
    pub fn with_arg(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.args.contains(&name) {
            self.args.push(name);
        }
        self
    }

    /// Declares a default value for an argument, declaring the argument too.
    #[must_use]
    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        let name = name.into();
        self = self.with_arg(name.clone());
        self.defaults.insert(name, value);
        self
    }

    /// Appends static text to the trace.
    #[must_use]
    pub fn with_static(mut self, text: impl Into<String>) -> Self {
        self.trace.push(TraceElement::Static(text.into()));
        self
    }

    /// Appends a placeholder to the trace, declaring its argument.
    #[must_use]
    pub fn with_dynamic(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self = self.with_arg(name.clone());
        self.trace.push(TraceElement::Dynamic {
            name,
            converter: None,
        });
        self
    }

    /// Sets the converter identifier used for an argument.
    #[must_use]
    pub fn with_converter(mut self, name: impl Into<String>, converter: impl Into<String>) -> Self {
        self.converters.insert(name.into(), converter.into());
        self
    }

    /// Returns the arguments that have no default value.
    pub fn required_args(&self) -> impl Iterator<Item = &str> {
        self.args
            .iter()
            .map(String::as_str)
            .filter(|name| !self.defaults.contains_key(name))
    }

    /// Returns the converter identifier for a placeholder: the element's own,
    /// then the rule's entry for the argument.
    pub fn converter_for<'a>(&'a self, name: &str, element_converter: Option<&'a str>) -> Option<&'a str> {
        element_converter.or_else(|| self.converters.get(name).map(String::as_str))
    }

    /// Checks the rule's internal consistency.
    ///
    /// # Errors
    ///
    /// Returns a [`Shape`](crate::error::RouteBuildErrorKind::Shape) error when
    /// an argument is declared twice, a default names an undeclared
    /// argument, or a placeholder names an undeclared argument.
    pub fn validate(&self) -> RouteBuildResult<()> {
        for (i, name) in self.args.iter().enumerate() {
            if self.args[..i].contains(name) {
                return Err(RouteBuildError::shape(format!(
                    "Argument '{name}' is declared more than once"
                )));
            }
        }
        if let Some(name) = self.defaults.keys().find(|k| !self.args.iter().any(|a| a == *k)) {
            return Err(RouteBuildError::shape(format!(
                "Default given for undeclared argument '{name}'"
            )));
        }
        for element in &self.trace {
            if let TraceElement::Dynamic { name, .. } = element {
                if !self.args.contains(name) {
                    return Err(RouteBuildError::shape(format!(
                        "Placeholder references undeclared argument '{name}'"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// All rules of one endpoint, in the order they are tried.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    /// The endpoint name (e.g. `"event.display"`).
    pub endpoint: String,
    /// Candidate rules; the first suitable one wins.
    pub rules: Vec<Rule>,
}

impl RuleSet {
    /// Creates a validated rule set.
    ///
    /// # Errors
    ///
    /// Returns a shape error if any rule is inconsistent.
    pub fn new(endpoint: impl Into<String>, rules: Vec<Rule>) -> RouteBuildResult<Self> {
        let endpoint = endpoint.into();
        for (i, rule) in rules.iter().enumerate() {
            rule.validate().map_err(|e| {
                RouteBuildError::shape(format!("Rule #{i} of '{endpoint}': {}", e.message))
                    .with_endpoint(endpoint.clone())
            })?;
        }
        Ok(Self { endpoint, rules })
    }
}

/// A route descriptor: a literal URL or a rule set.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteTemplate {
    /// A pre-resolved URL, used as-is.
    Literal(String),
    /// Rules to pick from and fill in.
    Rules(RuleSet),
}

impl RouteTemplate {
    /// Returns the endpoint name of a rule set.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Literal(_) => None,
            Self::Rules(set) => Some(&set.endpoint),
        }
    }

    /// Returns `true` if `value` looks like a rule-set template (an object
    /// whose `type` is [`RULES_TYPE`]).
    pub fn is_rules_value(value: &serde_json::Value) -> bool {
        value.get("type").and_then(serde_json::Value::as_str) == Some(RULES_TYPE)
    }

    /// Parses and validates a template from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns a shape error if the value is neither a string nor a
    /// well-formed rule set.
    pub fn from_value(value: &serde_json::Value) -> RouteBuildResult<Self> {
        match value {
            serde_json::Value::String(url) => Ok(Self::Literal(url.clone())),
            serde_json::Value::Object(_) if Self::is_rules_value(value) => {
                let raw = RawRuleSet::deserialize(value).map_err(|e| {
                    let err = RouteBuildError::shape(format!("Malformed rule set: {e}"));
                    match value.get("endpoint").and_then(serde_json::Value::as_str) {
                        Some(endpoint) => err.with_endpoint(endpoint),
                        None => err,
                    }
                })?;
                raw.into_rule_set().map(Self::Rules)
            }
            serde_json::Value::Object(_) => Err(RouteBuildError::shape(format!(
                "Unsupported route template type {}",
                value.get("type").map_or_else(|| "(missing)".to_string(), ToString::to_string)
            ))),
            other => Err(RouteBuildError::shape(format!(
                "Route template must be a string or an object, got {other}"
            ))),
        }
    }

    /// Parses a template from JSON text.
    ///
    /// # Errors
    ///
    /// Returns a shape error for invalid JSON or an invalid template.
    pub fn from_json_str(json: &str) -> RouteBuildResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| RouteBuildError::shape(format!("Invalid route template JSON: {e}")))?;
        Self::from_value(&value)
    }
}

impl From<&str> for RouteTemplate {
    fn from(url: &str) -> Self {
        Self::Literal(url.to_string())
    }
}

impl From<String> for RouteTemplate {
    fn from(url: String) -> Self {
        Self::Literal(url)
    }
}

impl From<RuleSet> for RouteTemplate {
    fn from(set: RuleSet) -> Self {
        Self::Rules(set)
    }
}

// ── Wire format ─────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawRuleSet {
    endpoint: String,
    rules: Vec<RawRule>,
}

#[derive(Deserialize)]
struct RawRule {
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    defaults: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    converters: HashMap<String, String>,
    trace: Vec<RawTraceElement>,
}

#[derive(Deserialize)]
struct RawTraceElement {
    is_dynamic: bool,
    data: String,
    #[serde(default)]
    converter: Option<String>,
}

impl RawRuleSet {
    fn into_rule_set(self) -> RouteBuildResult<RuleSet> {
        let rules = self
            .rules
            .into_iter()
            .map(|raw| Rule {
                args: raw.args,
                defaults: Params::from(raw.defaults),
                converters: raw.converters,
                trace: raw
                    .trace
                    .into_iter()
                    .map(|element| {
                        if element.is_dynamic {
                            TraceElement::Dynamic {
                                name: element.data,
                                converter: element.converter,
                            }
                        } else {
                            TraceElement::Static(element.data)
                        }
                    })
                    .collect(),
            })
            .collect();
        RuleSet::new(self.endpoint, rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouteBuildErrorKind;
    use serde_json::json;

    fn event_display() -> serde_json::Value {
        json!({
            "type": "flask_rules",
            "endpoint": "event.display",
            "rules": [{
                "args": ["confId"],
                "defaults": {},
                "converters": {},
                "trace": [
                    {"is_dynamic": false, "data": "|/event/"},
                    {"is_dynamic": true, "data": "confId"},
                    {"is_dynamic": false, "data": "/"}
                ]
            }]
        })
    }

    #[test]
    fn test_from_value_string_is_literal() {
        let template = RouteTemplate::from_value(&json!("/static/help.html")).unwrap();
        assert_eq!(template, RouteTemplate::Literal("/static/help.html".into()));
        assert_eq!(template.endpoint(), None);
    }

    #[test]
    fn test_from_value_rule_set() {
        let template = RouteTemplate::from_value(&event_display()).unwrap();
        let RouteTemplate::Rules(set) = template else {
            panic!("expected rule set");
        };
        assert_eq!(set.endpoint, "event.display");
        assert_eq!(set.rules.len(), 1);
        assert_eq!(
            set.rules[0].trace[1],
            TraceElement::Dynamic {
                name: "confId".into(),
                converter: None
            }
        );
    }

    #[test]
    fn test_from_value_defaults_keep_order_and_types() {
        let value = json!({
            "type": "flask_rules",
            "endpoint": "e",
            "rules": [{
                "args": ["a", "b"],
                "defaults": {"b": 1, "a": "x"},
                "trace": [{"is_dynamic": false, "data": "/"}]
            }]
        });
        let RouteTemplate::Rules(set) = RouteTemplate::from_value(&value).unwrap() else {
            panic!("expected rule set");
        };
        let keys: Vec<&str> = set.rules[0].defaults.keys().collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(set.rules[0].defaults.get("b"), Some(&ParamValue::Int(1)));
    }

    #[test]
    fn test_from_value_unknown_type() {
        let err = RouteTemplate::from_value(&json!({"type": "regex_rules", "rules": []})).unwrap_err();
        assert_eq!(err.kind, RouteBuildErrorKind::Shape);
        assert!(err.message.contains("regex_rules"));
    }

    #[test]
    fn test_from_value_not_string_or_object() {
        let err = RouteTemplate::from_value(&json!(42)).unwrap_err();
        assert_eq!(err.kind, RouteBuildErrorKind::Shape);
    }

    #[test]
    fn test_from_value_malformed_rule_entry() {
        let value = json!({
            "type": "flask_rules",
            "endpoint": "broken",
            "rules": [{"args": ["id"], "trace": [{"data": "/x"}]}]
        });
        let err = RouteTemplate::from_value(&value).unwrap_err();
        assert_eq!(err.kind, RouteBuildErrorKind::Shape);
        assert_eq!(err.endpoint.as_deref(), Some("broken"));
    }

    #[test]
    fn test_from_value_placeholder_not_in_args() {
        let value = json!({
            "type": "flask_rules",
            "endpoint": "broken",
            "rules": [{
                "args": [],
                "trace": [{"is_dynamic": true, "data": "id"}]
            }]
        });
        let err = RouteTemplate::from_value(&value).unwrap_err();
        assert!(err.message.contains("undeclared argument 'id'"));
        assert_eq!(err.endpoint.as_deref(), Some("broken"));
    }

    #[test]
    fn test_validate_default_not_in_args() {
        let mut rule = Rule::new().with_dynamic("id");
        rule.defaults.insert("format", "html");
        assert!(rule.validate().is_err());
    }

    #[test]
    fn test_validate_duplicate_args() {
        let rule = Rule {
            args: vec!["id".into(), "id".into()],
            ..Rule::default()
        };
        assert!(rule.validate().is_err());
    }

    #[test]
    fn test_builder_declares_args() {
        let rule = Rule::new()
            .with_static("/items/")
            .with_dynamic("id")
            .with_default("format", "html");
        assert_eq!(rule.args, ["id", "format"]);
        let required: Vec<&str> = rule.required_args().collect();
        assert_eq!(required, ["id"]);
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn test_converter_for_prefers_element() {
        let rule = Rule::new().with_dynamic("ids").with_converter("ids", "ListConverter");
        assert_eq!(rule.converter_for("ids", None), Some("ListConverter"));
        assert_eq!(rule.converter_for("ids", Some("PathConverter")), Some("PathConverter"));
        assert_eq!(rule.converter_for("other", None), None);
    }

    #[test]
    fn test_from_json_str() {
        assert!(RouteTemplate::from_json_str("\"/a\"").is_ok());
        assert!(RouteTemplate::from_json_str("{").is_err());
    }
}
