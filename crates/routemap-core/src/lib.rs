//! # routemap-core
//!
//! Core types, settings, and error types shared by the routemap crates.
//! This crate has no knowledge of URL rules; it provides the foundation the
//! resolver and the command-line tool are configured from.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Resolver settings
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{RouteMapError, RouteMapResult};
pub use settings::Settings;
