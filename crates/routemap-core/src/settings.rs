//! Settings for URL resolution.
//!
//! [`Settings`] is plain data: load it with
//! [`settings_loader`](crate::settings_loader) and hand it to whatever
//! needs it. Nothing reads settings from a global.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The complete set of routemap settings.
///
/// # Examples
///
/// ```
/// use routemap_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.base_url, "");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Debug mode: human-readable logs instead of JSON lines.
    pub debug: bool,
    /// Prefix prepended to every path built from a rule set
    /// (e.g. `"https://events.example.org/indico"`).
    pub base_url: String,

    /// Path to the exported route table (a nested JSON object).
    pub route_table: Option<PathBuf>,
    /// Converter identifiers mapped to built-in converter kinds
    /// (`default`, `path`, `integer`, `list`).
    pub converters: HashMap<String, String>,

    /// An `EnvFilter` directive such as `"info"` or `"routemap_urls=debug"`.
    pub log_level: String,

    /// Application-specific keys, kept as raw JSON.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        let mut converters = HashMap::new();
        converters.insert("ListConverter".to_string(), "list".to_string());

        Self {
            debug: true,
            base_url: String::new(),
            route_table: None,
            converters,
            log_level: "info".to_string(),
            extra: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert!(s.debug);
        assert!(s.base_url.is_empty());
        assert!(s.route_table.is_none());
        assert_eq!(s.log_level, "info");
        assert!(s.extra.is_empty());
    }

    #[test]
    fn test_default_converters() {
        let s = Settings::default();
        assert_eq!(s.converters.get("ListConverter").map(String::as_str), Some("list"));
    }

    #[test]
    fn test_settings_serde_round_trip_keeps_base_url() {
        let s = Settings {
            base_url: "https://example.org".to_string(),
            ..Settings::default()
        };
        let json = serde_json::to_string(&s).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.base_url, "https://example.org");
    }
}
