//! Loading [`Settings`] from TOML or JSON and from the environment.
//!
//! A configuration file only needs the keys it changes. The file is
//! deep-merged over [`Settings::default`], so a `[converters]` table adds
//! identifiers without dropping the default `ListConverter` entry. The
//! `*_with_env` loaders then apply environment overrides:
//!
//! | Variable | Setting |
//! |---|---|
//! | `ROUTEMAP_DEBUG` | `debug` (`true`/`1`/`yes`, case-insensitive) |
//! | `ROUTEMAP_BASE_URL` | `base_url` |
//! | `ROUTEMAP_LOG_LEVEL` | `log_level` |
//! | `ROUTEMAP_ROUTE_TABLE` | `route_table` (empty clears it) |
//!
//! ```rust,no_run
//! use routemap_core::settings_loader;
//!
//! let settings = settings_loader::from_file_with_env("config/routemap.toml").unwrap();
//! println!("base url: {}", settings.base_url);
//! ```

use std::path::{Path, PathBuf};

use crate::error::{RouteMapError, RouteMapResult};
use crate::settings::Settings;

/// Environment variable overriding `debug`.
pub const ENV_DEBUG: &str = "ROUTEMAP_DEBUG";
/// Environment variable overriding `base_url`.
pub const ENV_BASE_URL: &str = "ROUTEMAP_BASE_URL";
/// Environment variable overriding `log_level`.
pub const ENV_LOG_LEVEL: &str = "ROUTEMAP_LOG_LEVEL";
/// Environment variable overriding `route_table`.
pub const ENV_ROUTE_TABLE: &str = "ROUTEMAP_ROUTE_TABLE";

/// The syntax of a settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// `.json` files are JSON; everything else is read as TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
        }
    }

    fn parse(self, text: &str) -> RouteMapResult<serde_json::Value> {
        let parsed = match self {
            Self::Toml => toml::from_str::<serde_json::Value>(text).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str::<serde_json::Value>(text).map_err(|e| e.to_string()),
        };
        parsed.map_err(|e| {
            RouteMapError::ConfigurationError(format!("Failed to parse {}: {e}", self.name()))
        })
    }
}

/// Parses settings text in the given format over the defaults.
///
/// # Errors
///
/// Returns a configuration error if the text does not parse or a key has
/// the wrong type.
pub fn from_str(format: ConfigFormat, text: &str) -> RouteMapResult<Settings> {
    let mut merged = serde_json::to_value(Settings::default())?;
    deep_merge(&mut merged, format.parse(text)?);
    serde_json::from_value(merged).map_err(|e| {
        RouteMapError::ConfigurationError(format!("Invalid {} settings: {e}", format.name()))
    })
}

/// Reads a settings file, picking the format from its extension.
///
/// # Errors
///
/// Returns a configuration error if the file cannot be read or parsed.
pub fn from_file(path: impl AsRef<Path>) -> RouteMapResult<Settings> {
    let path = path.as_ref();
    read_as(path, ConfigFormat::from_path(path))
}

/// Like [`from_file`], then applies environment overrides.
///
/// # Errors
///
/// See [`from_file`].
pub fn from_file_with_env(path: impl AsRef<Path>) -> RouteMapResult<Settings> {
    Ok(with_env(from_file(path)?))
}

/// Parses TOML settings.
///
/// # Errors
///
/// See [`from_str`].
pub fn from_toml_str(text: &str) -> RouteMapResult<Settings> {
    from_str(ConfigFormat::Toml, text)
}

/// Reads a TOML settings file regardless of its extension.
///
/// # Errors
///
/// See [`from_file`].
pub fn from_toml_file(path: impl AsRef<Path>) -> RouteMapResult<Settings> {
    read_as(path.as_ref(), ConfigFormat::Toml)
}

/// # Errors
///
/// See [`from_file`].
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> RouteMapResult<Settings> {
    Ok(with_env(from_toml_file(path)?))
}

/// Parses JSON settings.
///
/// # Errors
///
/// See [`from_str`].
pub fn from_json_str(text: &str) -> RouteMapResult<Settings> {
    from_str(ConfigFormat::Json, text)
}

/// Reads a JSON settings file regardless of its extension.
///
/// # Errors
///
/// See [`from_file`].
pub fn from_json_file(path: impl AsRef<Path>) -> RouteMapResult<Settings> {
    read_as(path.as_ref(), ConfigFormat::Json)
}

/// # Errors
///
/// See [`from_file`].
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> RouteMapResult<Settings> {
    Ok(with_env(from_json_file(path)?))
}

/// The defaults with environment overrides applied.
pub fn from_env() -> Settings {
    with_env(Settings::default())
}

/// Applies the process environment to `settings`.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides(settings, |key| std::env::var(key).ok());
}

/// Applies overrides from an arbitrary variable lookup, such as a map in
/// tests. Variables the lookup does not know leave their setting alone.
pub fn apply_overrides<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(ENV_DEBUG) {
        settings.debug = ["true", "1", "yes"]
            .iter()
            .any(|truthy| raw.eq_ignore_ascii_case(truthy));
    }
    if let Some(base_url) = lookup(ENV_BASE_URL) {
        settings.base_url = base_url;
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        settings.log_level = level;
    }
    if let Some(table) = lookup(ENV_ROUTE_TABLE) {
        settings.route_table = (!table.is_empty()).then(|| PathBuf::from(table));
    }
}

fn with_env(mut settings: Settings) -> Settings {
    apply_env_overrides(&mut settings);
    settings
}

fn read_as(path: &Path, format: ConfigFormat) -> RouteMapResult<Settings> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        RouteMapError::ConfigurationError(format!(
            "Cannot read {} settings '{}': {e}",
            format.name(),
            path.display()
        ))
    })?;
    from_str(format, &text)
}

/// Merges `overlay` into `target`. Objects merge key by key; any other
/// overlay value replaces the target.
fn deep_merge(target: &mut serde_json::Value, overlay: serde_json::Value) {
    match (target, overlay) {
        (serde_json::Value::Object(target), serde_json::Value::Object(overlay)) => {
            for (key, value) in overlay {
                match target.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, overlay) => *target = overlay,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_toml_overrides_only_given_keys() {
        let settings = from_toml_str(
            r#"
                base_url = "https://events.example.org"
                debug = false
            "#,
        )
        .unwrap();
        assert_eq!(settings.base_url, "https://events.example.org");
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_toml_converters_extend_defaults() {
        let settings = from_toml_str("[converters]\nRoomConverter = \"integer\"\n").unwrap();
        assert_eq!(settings.converters["RoomConverter"], "integer");
        assert_eq!(settings.converters["ListConverter"], "list");
    }

    #[test]
    fn test_toml_route_table_path() {
        let settings = from_toml_str(r#"route_table = "static/urls.json""#).unwrap();
        assert_eq!(settings.route_table, Some(PathBuf::from("static/urls.json")));
    }

    #[test]
    fn test_empty_text_gives_defaults() {
        let settings = from_toml_str("").unwrap();
        assert!(settings.debug);
        assert!(settings.base_url.is_empty());
        assert!(from_json_str("{}").is_ok());
    }

    #[test]
    fn test_parse_errors_are_configuration_errors() {
        for result in [from_toml_str("[[broken"), from_json_str("{not json")] {
            assert!(matches!(result, Err(RouteMapError::ConfigurationError(_))));
        }
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let err = from_toml_str("debug = \"sometimes\"").unwrap_err();
        assert!(err.to_string().contains("Invalid TOML settings"), "{err}");
    }

    #[test]
    fn test_json_extra_settings() {
        let settings = from_json_str(r#"{"base_url": "/indico", "extra": {"theme": "dark"}}"#).unwrap();
        assert_eq!(settings.base_url, "/indico");
        assert_eq!(settings.extra["theme"], json!("dark"));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("a/routemap.JSON")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("routemap.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("routemap")), ConfigFormat::Toml);
    }

    #[test]
    fn test_from_file_picks_format() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("settings.json");
        std::fs::write(&json_path, r#"{"base_url": "/json"}"#).unwrap();
        let toml_path = dir.path().join("settings.toml");
        std::fs::write(&toml_path, "base_url = \"/toml\"\n").unwrap();

        assert_eq!(from_file(&json_path).unwrap().base_url, "/json");
        assert_eq!(from_file(&toml_path).unwrap().base_url, "/toml");
        assert_eq!(from_json_file(&json_path).unwrap().base_url, "/json");
        assert_eq!(from_toml_file(&toml_path).unwrap().base_url, "/toml");
    }

    #[test]
    fn test_missing_file() {
        let err = from_file("/nonexistent/routemap.toml").unwrap_err();
        assert!(err.to_string().contains("Cannot read TOML settings"), "{err}");
    }

    #[test]
    fn test_overrides_apply_in_place() {
        let mut settings = Settings::default();
        apply_overrides(
            &mut settings,
            env(&[(ENV_BASE_URL, "https://example.org"), (ENV_LOG_LEVEL, "trace")]),
        );
        assert_eq!(settings.base_url, "https://example.org");
        assert_eq!(settings.log_level, "trace");
    }

    #[test]
    fn test_debug_override_values() {
        for (raw, expected) in [("true", true), ("1", true), ("YES", true), ("false", false), ("0", false)] {
            let mut settings = Settings {
                debug: !expected,
                ..Settings::default()
            };
            apply_overrides(&mut settings, env(&[(ENV_DEBUG, raw)]));
            assert_eq!(settings.debug, expected, "{ENV_DEBUG}={raw}");
        }
    }

    #[test]
    fn test_route_table_override_and_clear() {
        let mut settings = Settings::default();
        apply_overrides(&mut settings, env(&[(ENV_ROUTE_TABLE, "/srv/urls.json")]));
        assert_eq!(settings.route_table, Some(PathBuf::from("/srv/urls.json")));

        apply_overrides(&mut settings, env(&[(ENV_ROUTE_TABLE, "")]));
        assert!(settings.route_table.is_none());
    }

    #[test]
    fn test_unset_variables_keep_file_values() {
        let mut settings = from_toml_str("base_url = \"/keep\"").unwrap();
        apply_overrides(&mut settings, env(&[]));
        assert_eq!(settings.base_url, "/keep");
    }

    #[test]
    fn test_deep_merge() {
        let mut base = json!({"a": {"b": 1, "c": 2}, "d": 3});
        deep_merge(&mut base, json!({"a": {"b": 10}, "d": null, "e": [1]}));
        assert_eq!(base, json!({"a": {"b": 10, "c": 2}, "d": null, "e": [1]}));
    }
}
