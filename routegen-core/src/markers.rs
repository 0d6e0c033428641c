//! Marker vocabulary and the verb table.

use std::fmt;

/// HTTP verbs a route can answer to.
///
/// Ordering follows declaration order, which keeps verb sets and the
/// generated method filters stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteVerbKind {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Trace,
    Connect,
}

impl RouteVerbKind {
    pub const ALL: [RouteVerbKind; 9] = [
        RouteVerbKind::Get,
        RouteVerbKind::Post,
        RouteVerbKind::Put,
        RouteVerbKind::Delete,
        RouteVerbKind::Patch,
        RouteVerbKind::Head,
        RouteVerbKind::Options,
        RouteVerbKind::Trace,
        RouteVerbKind::Connect,
    ];

    /// Canonical upper-case verb name.
    pub fn as_str(self) -> &'static str {
        match self {
            RouteVerbKind::Get => "GET",
            RouteVerbKind::Post => "POST",
            RouteVerbKind::Put => "PUT",
            RouteVerbKind::Delete => "DELETE",
            RouteVerbKind::Patch => "PATCH",
            RouteVerbKind::Head => "HEAD",
            RouteVerbKind::Options => "OPTIONS",
            RouteVerbKind::Trace => "TRACE",
            RouteVerbKind::Connect => "CONNECT",
        }
    }

    /// Case-insensitive parse of a verb string.
    pub fn parse(verb: &str) -> Option<Self> {
        let verb = verb.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(verb))
    }

    /// Name of the dedicated routing function, for verbs that have one.
    pub fn routing_fn(self) -> Option<&'static str> {
        match self {
            RouteVerbKind::Get => Some("get"),
            RouteVerbKind::Post => Some("post"),
            RouteVerbKind::Put => Some("put"),
            RouteVerbKind::Delete => Some("delete"),
            RouteVerbKind::Patch => Some("patch"),
            _ => None,
        }
    }
}

impl fmt::Display for RouteVerbKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single-verb markers, keyed by their name inside the marker namespace.
const SINGLE_VERB_MARKERS: &[(&str, RouteVerbKind)] = &[
    ("HttpGet", RouteVerbKind::Get),
    ("HttpPost", RouteVerbKind::Post),
    ("HttpPut", RouteVerbKind::Put),
    ("HttpDelete", RouteVerbKind::Delete),
    ("HttpPatch", RouteVerbKind::Patch),
    ("HttpHead", RouteVerbKind::Head),
    ("HttpOptions", RouteVerbKind::Options),
];

/// Every host-specific name the generator recognises or emits.
///
/// Marker matching is always by exact fully-qualified name, so a user type
/// that happens to be called `RouteGroup` in another module is not a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conventions {
    pub namespace: String,
    pub group_marker: String,
    pub route_marker: String,
    pub verb_marker_base: String,
    pub context_type: String,
    pub from_body_marker: String,
    pub ignore_marker: String,
    /// Completion wrappers; `Wrapper<T>` means "eventually `T`".
    pub async_wrappers: Vec<String>,
    /// Result wrappers carrying a single payload, e.g. `Created<T>`.
    pub value_wrappers: Vec<String>,
    /// Multi-variant result wrappers, e.g. `Results<A, B>`.
    pub one_of_wrappers: Vec<String>,
    /// Results that carry no payload.
    pub empty_results: Vec<String>,
    /// Types supplied by the serving layer, never serialized.
    pub framework_types: Vec<String>,
    pub no_content: String,
    pub service_collection: String,
    pub schema_registry: String,
    pub router: String,
    pub routing_module: String,
}

impl Conventions {
    pub fn with_namespace(namespace: &str) -> Self {
        let ns = namespace.trim_end_matches("::");
        let q = |name: &str| format!("{ns}::{name}");
        Self {
            namespace: ns.to_string(),
            group_marker: q("RouteGroup"),
            route_marker: q("Route"),
            verb_marker_base: q("HttpMethod"),
            context_type: q("RequestContext"),
            from_body_marker: q("FromBody"),
            ignore_marker: q("Ignore"),
            async_wrappers: vec![
                "core::future::Future".into(),
                "std::future::Future".into(),
                q("Task"),
            ],
            value_wrappers: vec![
                q("Ok"),
                q("Created"),
                q("Accepted"),
                "axum::Json".into(),
            ],
            one_of_wrappers: vec![q("Results")],
            empty_results: vec![
                q("NoContent"),
                q("BadRequest"),
                q("NotFound"),
                q("Unauthorized"),
                q("Forbidden"),
                q("Conflict"),
            ],
            framework_types: vec![
                q("RequestContext"),
                "axum::http::HeaderMap".into(),
                "axum::http::Method".into(),
                "axum::http::Uri".into(),
                "axum::extract::Request".into(),
                "tokio_util::sync::CancellationToken".into(),
            ],
            no_content: q("NoContent"),
            service_collection: q("ServiceCollection"),
            schema_registry: q("SchemaRegistry"),
            router: "axum::Router".into(),
            routing_module: "axum::routing".into(),
        }
    }

    /// Table lookup of a single-verb marker by fully-qualified name.
    pub fn verb_for_marker(&self, name: &str) -> Option<RouteVerbKind> {
        let local = name
            .strip_prefix(self.namespace.as_str())?
            .strip_prefix("::")?;
        SINGLE_VERB_MARKERS
            .iter()
            .find(|(marker, _)| *marker == local)
            .map(|(_, kind)| *kind)
    }

    pub fn is_async_wrapper(&self, path: &str) -> bool {
        self.async_wrappers.iter().any(|w| w == path)
    }

    pub fn is_value_wrapper(&self, path: &str) -> bool {
        self.value_wrappers.iter().any(|w| w == path)
    }

    pub fn is_one_of_wrapper(&self, path: &str) -> bool {
        self.one_of_wrappers.iter().any(|w| w == path)
    }

    pub fn is_empty_result(&self, path: &str) -> bool {
        self.empty_results.iter().any(|w| w == path)
    }

    pub fn is_framework_type(&self, path: &str) -> bool {
        path == self.context_type || self.framework_types.iter().any(|t| t == path)
    }
}

impl Default for Conventions {
    fn default() -> Self {
        Self::with_namespace("routegen")
    }
}
