//! Declaration scanning: group-marked types and verb-marked methods.

use std::collections::{BTreeSet, HashSet};

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::markers::{Conventions, RouteVerbKind};
use crate::model::{AttrValue, AttributeUsage, DeclarationProvider, MethodDecl, TypeDecl, TypeRef};
use crate::route::{normalize_prefix, ParameterSpec, ReturnShape, RouteEntry, RouteGroup};

/// Result of one scan.
#[derive(Debug, Default)]
pub struct ScanOutput {
    /// Groups in discovery order.
    pub groups: Vec<RouteGroup>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Find every route group and its routes.
pub fn scan(provider: &dyn DeclarationProvider, conv: &Conventions) -> ScanOutput {
    let mut out = ScanOutput::default();

    // Partial declarations of one type collapse onto a single group.
    let mut seen = HashSet::new();
    let group_paths: Vec<&str> = provider
        .declarations()
        .iter()
        .filter(|decl| decl.has_attribute(&conv.group_marker))
        .filter(|decl| seen.insert(decl.path.as_str()))
        .map(|decl| decl.path.as_str())
        .collect();

    for path in group_paths {
        let Some(decl) = provider.resolve(path) else {
            continue;
        };
        let group = scan_group(decl, provider, conv, &mut out.diagnostics);
        tracing::debug!(
            group = %group.ty,
            prefix = %group.prefix,
            routes = group.entries.len(),
            "Discovered route group"
        );
        out.groups.push(group);
    }

    out
}

fn scan_group(
    decl: &TypeDecl,
    provider: &dyn DeclarationProvider,
    conv: &Conventions,
    diagnostics: &mut Vec<Diagnostic>,
) -> RouteGroup {
    let prefix = extract_group_prefix(&decl.attributes, conv, &decl.path, diagnostics);

    let mut entries = Vec::new();
    for method in decl.methods.iter().filter(|m| m.public) {
        let location = format!("{}::{}", decl.path, method.name);
        let markers = extract_route_markers(&method.attributes, provider, conv, &location, diagnostics);
        if markers.is_empty() {
            continue;
        }

        if let Some(unresolved) = unresolved_signature_type(method) {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnresolvedType,
                &location,
                format!("handler signature mentions an unresolved type in `{unresolved}`; route skipped"),
            ));
            continue;
        }

        let params = extract_params(method, conv, &location, diagnostics);
        let returns = ReturnShape::from_signature(method.returns.as_ref(), method.is_async, conv);
        let attributes = strip_marker_attrs(&method.attributes, provider, conv);

        // One entry per marker instance.
        for (template, verbs) in markers {
            entries.push(RouteEntry {
                group: decl.path.clone(),
                handler: method.name.clone(),
                template,
                verbs,
                params: params.clone(),
                returns: returns.clone(),
                attributes: attributes.clone(),
                is_static: method.is_static,
                is_async: method.is_async,
            });
        }
    }

    RouteGroup {
        ty: decl.path.clone(),
        prefix,
        entries,
    }
}

/// First positional argument of the group marker, trimmed of `/`.
///
/// A non-string argument is reported as malformed and the group is rooted.
pub fn extract_group_prefix(
    attrs: &[AttributeUsage],
    conv: &Conventions,
    location: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> String {
    let Some(marker) = attrs.iter().find(|a| a.name == conv.group_marker) else {
        return String::new();
    };
    match marker.args.first() {
        None => String::new(),
        Some(AttrValue::Str(prefix)) => normalize_prefix(prefix),
        Some(_) => {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::MalformedRouteMarker,
                location,
                format!("`{}` expects a string route prefix; group mounted at the root", marker.name),
            ));
            String::new()
        }
    }
}

/// How one attribute relates to routing.
enum MarkerMatch {
    Single(RouteVerbKind),
    Multi,
    /// Derives from the single-verb base but has no table entry.
    UnknownSingle,
    None,
}

fn classify(attr: &AttributeUsage, provider: &dyn DeclarationProvider, conv: &Conventions) -> MarkerMatch {
    if let Some(kind) = conv.verb_for_marker(&attr.name) {
        MarkerMatch::Single(kind)
    } else if attr.name == conv.route_marker {
        MarkerMatch::Multi
    } else if derives_from(provider, &attr.name, &conv.verb_marker_base) {
        MarkerMatch::UnknownSingle
    } else {
        MarkerMatch::None
    }
}

/// Walk the base chain of `path` looking for `base`.
fn derives_from(provider: &dyn DeclarationProvider, path: &str, base: &str) -> bool {
    let mut visited = HashSet::new();
    let mut current = provider.resolve(path);
    while let Some(decl) = current {
        if !visited.insert(decl.path.as_str()) {
            return false;
        }
        let Some(parent) = decl.base.as_ref().and_then(TypeRef::path) else {
            return false;
        };
        if parent == base {
            return true;
        }
        current = provider.resolve(parent);
    }
    false
}

/// Every usable route marker on a method, as (template, verbs) pairs.
///
/// Malformed marker instances are dropped with a diagnostic; the other
/// markers of the same method are still used.
pub fn extract_route_markers(
    attrs: &[AttributeUsage],
    provider: &dyn DeclarationProvider,
    conv: &Conventions,
    location: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<(String, BTreeSet<RouteVerbKind>)> {
    let mut markers = Vec::new();
    for attr in attrs {
        match classify(attr, provider, conv) {
            MarkerMatch::Single(kind) => match attr.args.first() {
                None => markers.push((String::new(), BTreeSet::from([kind]))),
                Some(AttrValue::Str(template)) => {
                    markers.push((template.clone(), BTreeSet::from([kind])))
                }
                Some(_) => diagnostics.push(Diagnostic::new(
                    DiagnosticKind::MalformedRouteMarker,
                    location,
                    format!("`{}` expects a string route template", attr.name),
                )),
            },
            MarkerMatch::Multi => {
                if let Some(marker) = parse_multi_verb(attr, location, diagnostics) {
                    markers.push(marker);
                }
            }
            MarkerMatch::UnknownSingle => diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnknownVerbMarker,
                location,
                format!("`{}` is not a known verb marker; route skipped", attr.name),
            )),
            MarkerMatch::None => {}
        }
    }
    markers
}

fn parse_multi_verb(
    attr: &AttributeUsage,
    location: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<(String, BTreeSet<RouteVerbKind>)> {
    let malformed = |diagnostics: &mut Vec<Diagnostic>, detail: &str| {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::MalformedRouteMarker,
            location,
            format!("`{}` {detail}; route skipped", attr.name),
        ));
    };

    let (template, verbs) = match attr.args.as_slice() {
        [AttrValue::Str(template), AttrValue::List(verbs), ..] => (template, verbs),
        [_, _, ..] => {
            malformed(diagnostics, "expects a template string and a list of verbs");
            return None;
        }
        _ => {
            malformed(diagnostics, "requires a template and a list of verbs");
            return None;
        }
    };

    let mut set = BTreeSet::new();
    for verb in verbs {
        match verb.as_str().and_then(RouteVerbKind::parse) {
            Some(kind) => {
                set.insert(kind);
            }
            None => {
                let shown = verb.as_str().map(str::to_string).unwrap_or_else(|| format!("{verb:?}"));
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::UnknownVerb,
                    location,
                    format!("`{shown}` is not an HTTP method and was ignored"),
                ));
            }
        }
    }

    if set.is_empty() {
        malformed(diagnostics, "has no usable verbs");
        return None;
    }
    Some((template.clone(), set))
}

/// Drop route markers, keep everything else in order.
pub fn strip_marker_attrs(
    attrs: &[AttributeUsage],
    provider: &dyn DeclarationProvider,
    conv: &Conventions,
) -> Vec<AttributeUsage> {
    attrs
        .iter()
        .filter(|a| matches!(classify(a, provider, conv), MarkerMatch::None))
        .cloned()
        .collect()
}

fn extract_params(
    method: &MethodDecl,
    conv: &Conventions,
    location: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<ParameterSpec> {
    let mut has_context = false;
    method
        .params
        .iter()
        .map(|p| {
            let mut is_context = p.ty.path() == Some(conv.context_type.as_str());
            if is_context && has_context {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::DuplicateContextParameter,
                    location,
                    format!("parameter `{}` is a second request context and is passed as a plain argument", p.name),
                ));
                is_context = false;
            }
            has_context |= is_context;
            ParameterSpec {
                name: p.name.clone(),
                ty: p.ty.clone(),
                attributes: p.attributes.clone(),
                is_context,
            }
        })
        .collect()
}

fn unresolved_signature_type(method: &MethodDecl) -> Option<String> {
    method
        .params
        .iter()
        .map(|p| &p.ty)
        .chain(method.returns.as_ref())
        .find(|ty| ty.contains_error())
        .map(ToString::to_string)
}
