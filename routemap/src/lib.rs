//! # routemap
//!
//! Builds URLs on the client side from a route table exported by a
//! Werkzeug-based server.
//!
//! This is the meta-crate that re-exports the sub-crates. Depend on
//! `routemap` to get everything, or on the individual crates for
//! finer-grained control.
//!
//! ```
//! use std::sync::Arc;
//!
//! use routemap::prelude::*;
//!
//! let routes = RouteMap::from_json_str(r#"{
//!     "Events": {
//!         "display": {
//!             "type": "flask_rules",
//!             "endpoint": "event.display",
//!             "rules": [{
//!                 "args": ["confId"],
//!                 "trace": [
//!                     {"is_dynamic": false, "data": "|/event/"},
//!                     {"is_dynamic": true, "data": "confId"},
//!                     {"is_dynamic": false, "data": "/"}
//!                 ]
//!             }]
//!         }
//!     }
//! }"#).unwrap();
//!
//! let resolver = RouteResolver::new(Arc::new(ConverterRegistry::with_builtins()))
//!     .with_base_url("/indico");
//! let call = CallArguments::new(Params::new().with("confId", 12)).fragment("timetable");
//! let url = resolver.build_url_for(&routes, "Events.display", &call).unwrap();
//! assert_eq!(url, "/indico/event/12/#timetable");
//! ```

/// Settings, logging, and error types.
pub use routemap_core as core;

/// Route templates, converters, and URL building.
pub use routemap_urls as urls;

/// The `routemap` command-line tool.
#[cfg(feature = "cli")]
pub use routemap_cli as cli;

/// The types most programs need.
pub mod prelude {
    pub use routemap_core::{RouteMapError, RouteMapResult, Settings};
    pub use routemap_urls::{
        CallArguments, ConverterRegistry, ParamValue, Params, RouteBuildError,
        RouteBuildErrorKind, RouteMap, RouteResolver, RouteTemplate, Rule, RuleSet,
        UrlConverter,
    };
}
