//! # routemap-urls
//!
//! Client-side reconstruction of a Werkzeug-style URL map.
//!
//! The server exports each endpoint as a route template: either a literal
//! URL, or a list of rules made of static text and placeholders. This crate
//! picks the first rule that fits the caller's arguments, fills in its
//! placeholders through named converters, and appends the leftover
//! arguments as a query string.
//!
//! - [`value`]: dynamically typed argument values and loose equality
//! - [`params`]: ordered call-time arguments
//! - [`template`]: route templates, rules, and their JSON wire format
//! - [`converters`]: value-to-path converters and their registry
//! - [`query`]: query-string and fragment assembly
//! - [`resolver`]: rule selection and URL building
//! - [`route_map`]: route tables keyed by dotted endpoint names
//! - [`error`]: URL building errors
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use routemap_urls::{ConverterRegistry, Params, RouteResolver, RouteTemplate};
//!
//! let resolver = RouteResolver::new(Arc::new(ConverterRegistry::with_builtins()));
//! let template = RouteTemplate::from("/search");
//! let params = Params::new().with("q", "a b").with("tags", vec!["x", "y"]);
//!
//! let url = resolver.build_url(&template, &params, None).unwrap();
//! assert_eq!(url, "/search?q=a%20b&tags=x&tags=y");
//! ```

pub mod converters;
pub mod error;
pub mod params;
pub mod query;
pub mod resolver;
pub mod route_map;
pub mod template;
pub mod value;

pub use converters::{ConverterRegistry, UrlConverter};
pub use error::{RouteBuildError, RouteBuildErrorKind, RouteBuildResult};
pub use params::{CallArguments, Params};
pub use resolver::{BuiltPath, RouteResolver};
pub use route_map::{RouteMap, RouteProblem};
pub use template::{RouteTemplate, Rule, RuleSet, TraceElement};
pub use value::ParamValue;
