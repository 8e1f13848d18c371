//! Converters that serialize argument values into path segments.
//!
//! Every dynamic placeholder of a rule names a converter identifier, taken
//! from the rule's `converters` map (e.g. `"ListConverter"`). A
//! [`ConverterRegistry`] maps those identifiers to [`UrlConverter`]
//! implementations; identifiers it does not know fall back to
//! [`DefaultConverter`].
//!
//! # Built-in converters
//!
//! | Kind      | Type                 | Output                                   |
//! |-----------|----------------------|------------------------------------------|
//! | `default` | [`DefaultConverter`] | percent-encoded string form              |
//! | `path`    | [`PathConverter`]    | like `default`, keeping `/`              |
//! | `integer` | [`IntegerConverter`] | decimal integer, or no value             |
//! | `list`    | [`ListConverter`]    | encoded items joined with `-`            |

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use percent_encoding::utf8_percent_encode;
use routemap_core::{RouteMapError, RouteMapResult, Settings};

use crate::query::{encode_component, PATH_COMPONENT};
use crate::value::ParamValue;

/// Serializes an argument value into URL path text.
///
/// Returning `None` means the value cannot be represented; the URL build
/// then fails instead of producing a wrong path.
pub trait UrlConverter: Send + Sync + fmt::Debug {
    /// Converts a value to its path representation.
    fn to_url(&self, value: &ParamValue) -> Option<String>;
}

/// Percent-encodes the string form of any value.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConverter;

impl UrlConverter for DefaultConverter {
    fn to_url(&self, value: &ParamValue) -> Option<String> {
        Some(encode_component(&value.to_string()))
    }
}

/// Percent-encodes the string form of a value but keeps slashes, so one
/// argument can span several path segments.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathConverter;

impl UrlConverter for PathConverter {
    fn to_url(&self, value: &ParamValue) -> Option<String> {
        Some(utf8_percent_encode(&value.to_string(), PATH_COMPONENT).to_string())
    }
}

/// Accepts integers, integral floats, and digit strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerConverter;

impl UrlConverter for IntegerConverter {
    fn to_url(&self, value: &ParamValue) -> Option<String> {
        value.as_integer().map(|i| i.to_string())
    }
}

/// Joins list items with `-` (e.g. `["a", "b"]` becomes `a-b`).
///
/// Each item is encoded like [`DefaultConverter`] does; a scalar is encoded
/// as a one-item list. Objects have no representation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListConverter;

impl UrlConverter for ListConverter {
    fn to_url(&self, value: &ParamValue) -> Option<String> {
        match value {
            ParamValue::Object(_) => None,
            ParamValue::List(items) => {
                let mut parts = Vec::with_capacity(items.len());
                for item in items {
                    if item.is_object() {
                        return None;
                    }
                    parts.push(encode_component(&item.to_string()));
                }
                Some(parts.join("-"))
            }
            scalar => DefaultConverter.to_url(scalar),
        }
    }
}

/// Adapts a closure into a [`UrlConverter`].
pub struct FnConverter<F> {
    name: String,
    func: F,
}

impl<F> FnConverter<F>
where
    F: Fn(&ParamValue) -> Option<String> + Send + Sync,
{
    /// Wraps `func`; `name` only shows up in debug output.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> fmt::Debug for FnConverter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnConverter")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<F> UrlConverter for FnConverter<F>
where
    F: Fn(&ParamValue) -> Option<String> + Send + Sync,
{
    fn to_url(&self, value: &ParamValue) -> Option<String> {
        (self.func)(value)
    }
}

/// Creates a built-in converter for the given kind.
///
/// # Supported kinds
///
/// - `"default"` / `"string"` -> [`DefaultConverter`]
/// - `"path"` -> [`PathConverter`]
/// - `"integer"` / `"int"` -> [`IntegerConverter`]
/// - `"list"` -> [`ListConverter`]
///
/// # Errors
///
/// Returns [`RouteMapError::ImproperlyConfigured`] if the kind is not recognized.
pub fn get_converter(kind: &str) -> RouteMapResult<Arc<dyn UrlConverter>> {
    match kind {
        "default" | "string" => Ok(Arc::new(DefaultConverter)),
        "path" => Ok(Arc::new(PathConverter)),
        "integer" | "int" => Ok(Arc::new(IntegerConverter)),
        "list" => Ok(Arc::new(ListConverter)),
        _ => Err(RouteMapError::ImproperlyConfigured(format!(
            "Unknown converter kind: {kind}"
        ))),
    }
}

/// An immutable table from converter identifier to converter.
///
/// Build one with [`ConverterRegistry::builder`], wrap it in an `Arc`, and
/// share it between resolvers; nothing mutates it afterwards.
///
/// # Examples
///
/// ```
/// use routemap_urls::converters::{ConverterRegistry, ListConverter};
/// use routemap_urls::value::ParamValue;
///
/// let registry = ConverterRegistry::builder()
///     .register("ListConverter", ListConverter)
///     .build();
///
/// let tags = ParamValue::from(vec!["a", "b"]);
/// assert_eq!(registry.convert(Some("ListConverter"), &tags).as_deref(), Some("a-b"));
/// // Unknown identifiers use the default converter.
/// assert_eq!(registry.convert(Some("Nope"), &tags).as_deref(), Some("a%2Cb"));
/// ```
#[derive(Debug, Clone)]
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<dyn UrlConverter>>,
    fallback: Arc<dyn UrlConverter>,
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ConverterRegistry {
    /// Starts building a registry.
    pub fn builder() -> ConverterRegistryBuilder {
        ConverterRegistryBuilder::default()
    }

    /// A registry with the identifiers the server exports out of the box:
    /// `ListConverter`, `PathConverter`, `IntegerConverter`, and
    /// `UnicodeConverter`.
    pub fn with_builtins() -> Self {
        Self::builder()
            .register("UnicodeConverter", DefaultConverter)
            .register("PathConverter", PathConverter)
            .register("IntegerConverter", IntegerConverter)
            .register("ListConverter", ListConverter)
            .build()
    }

    /// Builds a registry from the `converters` table of the settings, which
    /// maps identifiers to built-in kinds.
    ///
    /// # Errors
    ///
    /// Returns an error if a kind is not recognized.
    pub fn from_settings(settings: &Settings) -> RouteMapResult<Self> {
        let mut builder = Self::builder();
        for (identifier, kind) in &settings.converters {
            builder = builder.register_arc(identifier.clone(), get_converter(kind)?);
        }
        Ok(builder.build())
    }

    /// Returns the converter registered under `identifier`.
    pub fn get(&self, identifier: &str) -> Option<&Arc<dyn UrlConverter>> {
        self.converters.get(identifier)
    }

    /// Returns `true` if `identifier` has a registered converter.
    pub fn contains(&self, identifier: &str) -> bool {
        self.converters.contains_key(identifier)
    }

    /// Converts `value` with the converter for `identifier`, or with the
    /// fallback when the identifier is absent or unknown.
    pub fn convert(&self, identifier: Option<&str>, value: &ParamValue) -> Option<String> {
        identifier
            .and_then(|id| self.converters.get(id))
            .unwrap_or(&self.fallback)
            .to_url(value)
    }

    /// Returns the registered identifiers, sorted.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.converters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Builder for [`ConverterRegistry`].
#[derive(Debug, Default)]
pub struct ConverterRegistryBuilder {
    converters: HashMap<String, Arc<dyn UrlConverter>>,
    fallback: Option<Arc<dyn UrlConverter>>,
}

impl ConverterRegistryBuilder {
    /// Registers a converter; a later registration under the same
    /// identifier replaces the earlier one.
    #[must_use]
    pub fn register(self, identifier: impl Into<String>, converter: impl UrlConverter + 'static) -> Self {
        self.register_arc(identifier, Arc::new(converter))
    }

    /// Registers an already shared converter.
    #[must_use]
    pub fn register_arc(mut self, identifier: impl Into<String>, converter: Arc<dyn UrlConverter>) -> Self {
        self.converters.insert(identifier.into(), converter);
        self
    }

    /// Registers a closure as a converter.
    #[must_use]
    pub fn register_fn<F>(self, identifier: impl Into<String>, func: F) -> Self
    where
        F: Fn(&ParamValue) -> Option<String> + Send + Sync + 'static,
    {
        let identifier = identifier.into();
        let converter = FnConverter::new(identifier.clone(), func);
        self.register(identifier, converter)
    }

    /// Replaces the converter used for unknown identifiers.
    #[must_use]
    pub fn fallback(mut self, converter: impl UrlConverter + 'static) -> Self {
        self.fallback = Some(Arc::new(converter));
        self
    }

    /// Finishes the registry.
    pub fn build(self) -> ConverterRegistry {
        ConverterRegistry {
            converters: self.converters,
            fallback: self
                .fallback
                .unwrap_or_else(|| Arc::new(DefaultConverter)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_converter_encodes() {
        let conv = DefaultConverter;
        assert_eq!(conv.to_url(&ParamValue::from("a b/c")).unwrap(), "a%20b%2Fc");
        assert_eq!(conv.to_url(&ParamValue::Int(42)).unwrap(), "42");
        assert_eq!(conv.to_url(&ParamValue::Null).unwrap(), "null");
        assert_eq!(conv.to_url(&ParamValue::Undefined).unwrap(), "undefined");
    }

    #[test]
    fn test_path_converter_keeps_slashes() {
        let conv = PathConverter;
        assert_eq!(
            conv.to_url(&ParamValue::from("docs/a b.pdf")).unwrap(),
            "docs/a%20b.pdf"
        );
    }

    #[test]
    fn test_integer_converter() {
        let conv = IntegerConverter;
        assert_eq!(conv.to_url(&ParamValue::Int(7)).unwrap(), "7");
        assert_eq!(conv.to_url(&ParamValue::from("12")).unwrap(), "12");
        assert_eq!(conv.to_url(&ParamValue::Float(3.0)).unwrap(), "3");
        assert!(conv.to_url(&ParamValue::from("abc")).is_none());
        assert!(conv.to_url(&ParamValue::Null).is_none());
    }

    #[test]
    fn test_list_converter() {
        let conv = ListConverter;
        assert_eq!(conv.to_url(&ParamValue::from(vec!["a", "b"])).unwrap(), "a-b");
        assert_eq!(conv.to_url(&ParamValue::from(vec![1, 2, 3])).unwrap(), "1-2-3");
        assert_eq!(conv.to_url(&ParamValue::from("solo")).unwrap(), "solo");
        assert_eq!(conv.to_url(&ParamValue::from(vec!["x y"])).unwrap(), "x%20y");
        assert!(conv.to_url(&ParamValue::from(json!({"a": 1}))).is_none());
        assert!(conv.to_url(&ParamValue::from(json!([1, {"a": 1}]))).is_none());
    }

    #[test]
    fn test_fn_converter() {
        let conv = FnConverter::new("upper", |v: &ParamValue| Some(v.to_string().to_uppercase()));
        assert_eq!(conv.to_url(&ParamValue::from("abc")).unwrap(), "ABC");
        assert!(format!("{conv:?}").contains("upper"));
    }

    #[test]
    fn test_get_converter_known_kinds() {
        for kind in ["default", "string", "path", "integer", "int", "list"] {
            assert!(get_converter(kind).is_ok(), "{kind}");
        }
    }

    #[test]
    fn test_get_converter_unknown_kind() {
        let result = get_converter("uuid");
        assert!(matches!(result, Err(RouteMapError::ImproperlyConfigured(_))));
    }

    #[test]
    fn test_registry_fallback() {
        let registry = ConverterRegistry::default();
        assert_eq!(
            registry.convert(None, &ParamValue::from("a b")).as_deref(),
            Some("a%20b")
        );
        assert_eq!(
            registry.convert(Some("ListConverter"), &ParamValue::from(vec!["a", "b"])).as_deref(),
            Some("a%2Cb")
        );
    }

    #[test]
    fn test_registry_custom_fallback() {
        let registry = ConverterRegistry::builder().fallback(IntegerConverter).build();
        assert!(registry.convert(None, &ParamValue::from("x")).is_none());
    }

    #[test]
    fn test_registry_register_fn_replaces() {
        let registry = ConverterRegistry::builder()
            .register("ListConverter", ListConverter)
            .register_fn("ListConverter", |v: &ParamValue| match v {
                ParamValue::List(items) => Some(
                    items.iter().map(ToString::to_string).collect::<Vec<_>>().join("+"),
                ),
                _ => None,
            })
            .build();
        assert_eq!(
            registry.convert(Some("ListConverter"), &ParamValue::from(vec!["a", "b"])).as_deref(),
            Some("a+b")
        );
    }

    #[test]
    fn test_with_builtins() {
        let registry = ConverterRegistry::with_builtins();
        assert_eq!(
            registry.identifiers(),
            ["IntegerConverter", "ListConverter", "PathConverter", "UnicodeConverter"]
        );
    }

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::default();
        settings.converters.insert("RoomConverter".into(), "integer".into());
        let registry = ConverterRegistry::from_settings(&settings).unwrap();
        assert!(registry.contains("ListConverter"));
        assert!(registry.contains("RoomConverter"));
        assert!(registry
            .convert(Some("RoomConverter"), &ParamValue::from("x"))
            .is_none());
    }

    #[test]
    fn test_from_settings_unknown_kind() {
        let mut settings = Settings::default();
        settings.converters.insert("X".into(), "bogus".into());
        assert!(ConverterRegistry::from_settings(&settings).is_err());
    }
}
