//! Intermediate route model produced by the scanner.

use std::collections::BTreeSet;

use crate::markers::{Conventions, RouteVerbKind};
use crate::model::{AttributeUsage, TypeRef};

/// A group-marked type and the routes declared on it.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteGroup {
    /// Fully-qualified path of the declaring type.
    pub ty: String,
    /// Route prefix, trimmed of leading and trailing `/`.
    pub prefix: String,
    pub entries: Vec<RouteEntry>,
}

impl RouteGroup {
    pub fn short_name(&self) -> &str {
        crate::model::short_name(&self.ty)
    }
}

/// One (path, verbs, handler) triple, derived from one marker instance.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEntry {
    /// Path of the owning group type.
    pub group: String,
    /// Name of the handler method on the group type.
    pub handler: String,
    pub template: String,
    pub verbs: BTreeSet<RouteVerbKind>,
    pub params: Vec<ParameterSpec>,
    pub returns: ReturnShape,
    /// Non-marker attributes of the handler, copied as-is.
    pub attributes: Vec<AttributeUsage>,
    pub is_static: bool,
    pub is_async: bool,
}

impl RouteEntry {
    pub fn context_param(&self) -> Option<&ParameterSpec> {
        self.params.iter().find(|p| p.is_context)
    }

    /// The single verb when exactly one is set.
    pub fn single_verb(&self) -> Option<RouteVerbKind> {
        if self.verbs.len() == 1 {
            self.verbs.iter().next().copied()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub ty: TypeRef,
    pub attributes: Vec<AttributeUsage>,
    /// Whether this is the designated request-context parameter.
    pub is_context: bool,
}

impl ParameterSpec {
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }
}

/// What a handler hands back.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnShape {
    /// Synchronous, nothing returned.
    Void,
    /// Asynchronous, completes without a value.
    FireAndForget,
    Payload {
        /// Declared result type once completion wrappers are peeled off.
        declared: TypeRef,
        /// The type a serializer has to know about, if any.
        payload: Option<TypeRef>,
        is_async: bool,
    },
}

impl ReturnShape {
    pub fn from_signature(returns: Option<&TypeRef>, is_async: bool, conv: &Conventions) -> Self {
        let mut is_async = is_async;
        let mut current = returns;
        while let Some(TypeRef::Named { path, args }) = current {
            if !conv.is_async_wrapper(path) {
                break;
            }
            is_async = true;
            current = args.first();
        }

        match current {
            None => {
                if is_async {
                    ReturnShape::FireAndForget
                } else {
                    ReturnShape::Void
                }
            }
            Some(ty) if ty.is_unit() => {
                if is_async {
                    ReturnShape::FireAndForget
                } else {
                    ReturnShape::Void
                }
            }
            Some(ty) => ReturnShape::Payload {
                declared: ty.clone(),
                payload: unwrap_payload(ty, conv),
                is_async,
            },
        }
    }

    pub fn payload(&self) -> Option<&TypeRef> {
        match self {
            ReturnShape::Payload { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }
}

/// Peel result wrappers until a concrete payload or an empty marker.
///
/// For a one-of wrapper the first variant yielding a payload wins; the
/// others are not looked at.
pub fn unwrap_payload(ty: &TypeRef, conv: &Conventions) -> Option<TypeRef> {
    match ty {
        TypeRef::Named { path, args }
            if conv.is_async_wrapper(path) || conv.is_value_wrapper(path) =>
        {
            match args.as_slice() {
                [inner] => unwrap_payload(inner, conv),
                _ => None,
            }
        }
        TypeRef::Named { path, args } if conv.is_one_of_wrapper(path) => {
            args.iter().find_map(|arg| unwrap_payload(arg, conv))
        }
        TypeRef::Named { path, .. } if conv.is_empty_result(path) => None,
        ty if ty.is_unit() => None,
        other => Some(other.clone()),
    }
}

/// Join a group prefix and a route template with exactly one `/`.
///
/// Pure concatenation: no segment validation and no conflict detection.
pub fn combine_path(prefix: &str, template: &str) -> String {
    let template = template.trim_start_matches('/');
    match (prefix.is_empty(), template.is_empty()) {
        (true, _) => template.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix}/{template}"),
    }
}

/// Trim separators off a group prefix.
pub fn normalize_prefix(prefix: &str) -> String {
    prefix.trim_matches('/').to_string()
}
