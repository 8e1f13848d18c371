//! Building URLs from route templates.
//!
//! [`RouteResolver`] turns a [`RouteTemplate`] and call-time arguments into
//! a URL string:
//!
//! 1. Empty-string arguments are dropped (they mean "not provided").
//! 2. A literal template is used as-is; every argument goes to the query.
//! 3. For a rule set, the first suitable rule is built; arguments its trace
//!    did not consume go to the query.
//! 4. The fragment, if any, is appended last.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use routemap_urls::converters::ConverterRegistry;
//! use routemap_urls::params::Params;
//! use routemap_urls::resolver::RouteResolver;
//! use routemap_urls::template::{Rule, RouteTemplate, RuleSet};
//!
//! let resolver = RouteResolver::new(Arc::new(ConverterRegistry::default()));
//! let rules = RuleSet::new(
//!     "items.show",
//!     vec![Rule::new().with_static("/items/").with_dynamic("id")],
//! )
//! .unwrap();
//!
//! let params = Params::new().with("id", 42).with("verbose", true);
//! let url = resolver
//!     .build_url(&RouteTemplate::Rules(rules), &params, None)
//!     .unwrap();
//! assert_eq!(url, "/items/42?verbose=true");
//! ```

use std::sync::Arc;

use routemap_core::logging::endpoint_span;
use routemap_core::{RouteMapResult, Settings};
use tracing::{debug, warn};

use crate::converters::ConverterRegistry;
use crate::error::{RouteBuildError, RouteBuildResult};
use crate::params::{CallArguments, Params};
use crate::query::{append_fragment, append_query, encode_query};
use crate::route_map::RouteMap;
use crate::template::{RouteTemplate, Rule, RuleSet, TraceElement};
use crate::value::loosely_equal;

/// The result of building one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPath {
    /// The path, with any subdomain prefix removed.
    pub path: String,
    /// Argument names the trace did not consume, in argument order.
    pub unprocessed: Vec<String>,
}

/// Builds URLs from route templates.
///
/// Holds the converter registry and the base URL prepended to rule-set
/// paths. Cheap to clone; the registry is shared.
#[derive(Debug, Clone)]
pub struct RouteResolver {
    converters: Arc<ConverterRegistry>,
    base_url: String,
}

impl RouteResolver {
    /// Creates a resolver with an empty base URL.
    pub fn new(converters: Arc<ConverterRegistry>) -> Self {
        Self {
            converters,
            base_url: String::new(),
        }
    }

    /// Sets the base URL prepended to paths built from rule sets.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Creates a resolver from settings: converters from
    /// `settings.converters`, base URL from `settings.base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured converter kind is unknown.
    pub fn from_settings(settings: &Settings) -> RouteMapResult<Self> {
        let converters = ConverterRegistry::from_settings(settings)?;
        Ok(Self::new(Arc::new(converters)).with_base_url(settings.base_url.clone()))
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the converter registry.
    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    /// Builds a URL from a template, parameters, and an optional fragment.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteBuildError`] when no rule accepts the parameters or
    /// a dynamic value cannot be converted.
    pub fn build_url(
        &self,
        template: &RouteTemplate,
        params: &Params,
        fragment: Option<&str>,
    ) -> RouteBuildResult<String> {
        let call = CallArguments {
            params: params.clone(),
            fragment: fragment.map(str::to_string),
            query: Params::new(),
        };
        self.build_url_with(template, &call)
    }

    /// Builds a URL from a template and full call arguments.
    ///
    /// # Errors
    ///
    /// See [`build_url`](Self::build_url).
    pub fn build_url_with(
        &self,
        template: &RouteTemplate,
        call: &CallArguments,
    ) -> RouteBuildResult<String> {
        let params = call.params.cleaned();
        let explicit_query = call.query.cleaned();

        let mut url = match template {
            RouteTemplate::Literal(literal) => {
                let mut url = literal.clone();
                append_query(
                    &mut url,
                    &encode_query(params.iter().chain(explicit_query.iter())),
                );
                url
            }
            RouteTemplate::Rules(set) => {
                let span = endpoint_span(&set.endpoint);
                let _guard = span.enter();

                let built = self.build_rule_set(set, &params).map_err(|err| {
                    let err = err.with_endpoint(&set.endpoint).with_params(&call.params);
                    warn!(kind = %err.kind, "{}", err.message);
                    err
                })?;

                let mut url = self.join_base(&built.path);
                let leftover = built
                    .unprocessed
                    .iter()
                    .filter_map(|name| params.get(name).map(|value| (name.as_str(), value)));
                append_query(
                    &mut url,
                    &encode_query(leftover.chain(explicit_query.iter())),
                );
                url
            }
        };

        append_fragment(&mut url, call.fragment.as_deref());
        Ok(url)
    }

    /// Parses a JSON template and JSON parameters, then builds the URL.
    ///
    /// `params` must be an object or `null`.
    ///
    /// # Errors
    ///
    /// Returns a shape error for a malformed template or non-object
    /// parameters, otherwise see [`build_url`](Self::build_url).
    pub fn build_url_json(
        &self,
        template: &serde_json::Value,
        params: &serde_json::Value,
        fragment: Option<&str>,
    ) -> RouteBuildResult<String> {
        let template = RouteTemplate::from_value(template)?;
        let params = match params {
            serde_json::Value::Object(map) => Params::from(map.clone()),
            serde_json::Value::Null => Params::new(),
            other => {
                let err = RouteBuildError::shape(format!(
                    "Parameters must be an object, got {other}"
                ));
                return Err(match template.endpoint() {
                    Some(endpoint) => err.with_endpoint(endpoint),
                    None => err,
                });
            }
        };
        self.build_url(&template, &params, fragment)
    }

    /// Looks up `endpoint` in a route map and builds its URL.
    ///
    /// # Errors
    ///
    /// Returns a shape error if the endpoint is not in the map, otherwise
    /// see [`build_url`](Self::build_url).
    pub fn build_url_for(
        &self,
        routes: &RouteMap,
        endpoint: &str,
        call: &CallArguments,
    ) -> RouteBuildResult<String> {
        let template = routes.get(endpoint).ok_or_else(|| {
            RouteBuildError::shape(format!("Unknown endpoint '{endpoint}'"))
                .with_endpoint(endpoint)
                .with_params(&call.params)
        })?;
        self.build_url_with(template, call)
    }

    /// Decides whether `rule` can build a URL for `args`.
    ///
    /// A rule is rejected only when
    ///
    /// - an argument without a default is missing, or
    /// - the caller supplies every argument of the rule and one of them
    ///   differs (per [`loosely_equal`]) from the rule's default for it.
    ///
    /// Every other rule is accepted, including one whose defaulted arguments
    /// are only partly supplied.
    pub fn is_suitable(rule: &Rule, args: &Params) -> bool {
        if rule.required_args().any(|name| !args.contains_key(name)) {
            return false;
        }

        let covers_all = rule.args.iter().all(|name| args.contains_key(name));
        if covers_all {
            if rule.defaults.is_empty() {
                return true;
            }
            return rule.defaults.iter().all(|(name, default)| {
                args.get(name)
                    .map_or(true, |passed| loosely_equal(passed, default))
            });
        }

        // Partial coverage of the defaulted arguments is accepted as-is.
        true
    }

    /// Builds the path of a single rule.
    ///
    /// A placeholder takes the caller's value, or the rule's default when
    /// the caller did not pass one.
    ///
    /// # Errors
    ///
    /// Returns a conversion error if a placeholder has no value or its
    /// converter rejects the value.
    pub fn build(&self, rule: &Rule, args: &Params) -> RouteBuildResult<BuiltPath> {
        let mut assembled = String::new();
        let mut consumed: Vec<&str> = Vec::new();

        for element in &rule.trace {
            match element {
                TraceElement::Static(text) => assembled.push_str(text),
                TraceElement::Dynamic { name, converter } => {
                    let value = args
                        .get(name)
                        .or_else(|| rule.defaults.get(name))
                        .ok_or_else(|| {
                            RouteBuildError::conversion(format!("No value given for '{name}'"))
                        })?;
                    let converter_id = rule.converter_for(name, converter.as_deref());
                    let text = self.converters.convert(converter_id, value).ok_or_else(|| {
                        RouteBuildError::conversion(format!(
                            "{} cannot convert '{value}' for '{name}'",
                            converter_id.unwrap_or("default converter")
                        ))
                    })?;
                    assembled.push_str(&text);
                    consumed.push(name.as_str());
                }
            }
        }

        // Anything up to the last '|' is subdomain information.
        let path = assembled
            .rfind('|')
            .map_or(assembled.as_str(), |pipe| &assembled[pipe + 1..])
            .to_string();

        let unprocessed = args
            .keys()
            .filter(|name| !consumed.contains(name))
            .map(str::to_string)
            .collect();

        Ok(BuiltPath { path, unprocessed })
    }

    /// Builds the first suitable rule of `set`.
    ///
    /// First match wins: rules are tried in the order the server exported
    /// them and the scan stops at the first suitable one. A conversion
    /// failure in that rule is final; later rules are not tried.
    fn build_rule_set(&self, set: &RuleSet, params: &Params) -> RouteBuildResult<BuiltPath> {
        for (index, rule) in set.rules.iter().enumerate() {
            if Self::is_suitable(rule, params) {
                debug!(rule = index, "selected rule");
                return self.build(rule, params);
            }
            debug!(rule = index, "rule not suitable");
        }
        Err(RouteBuildError::no_suitable_rule(&set.endpoint))
    }

    fn join_base(&self, path: &str) -> String {
        if self.base_url.ends_with('/') && path.starts_with('/') {
            format!("{}{}", self.base_url, &path[1..])
        } else {
            format!("{}{path}", self.base_url)
        }
    }
}
