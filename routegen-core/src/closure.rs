//! Reachable-type closure: which shapes a serializer must know about.

use std::collections::{BTreeMap, HashSet};

use crate::markers::Conventions;
use crate::model::{DeclarationProvider, TypeDecl, TypeKind, TypeRef};
use crate::route::RouteEntry;

/// Identity-keyed set of reachable types.
///
/// Identity is the canonical rendering of the reference, so `Page<User>` and
/// `Page<Role>` are distinct members. Iteration is sorted by identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeClosureSet {
    types: BTreeMap<String, TypeRef>,
}

impl TypeClosureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, ty: &TypeRef) -> bool {
        self.types.contains_key(&ty.to_string())
    }

    /// Returns `false` when the type was already present.
    pub fn insert(&mut self, ty: &TypeRef) -> bool {
        let key = ty.to_string();
        if self.types.contains_key(&key) {
            return false;
        }
        self.types.insert(key, ty.clone());
        true
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeRef> {
        self.types.values()
    }

    /// Identities in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

/// Expands types into a [`TypeClosureSet`].
pub struct ClosureWalker<'a> {
    provider: &'a dyn DeclarationProvider,
    conv: &'a Conventions,
    include_inherited: bool,
}

impl<'a> ClosureWalker<'a> {
    pub fn new(provider: &'a dyn DeclarationProvider, conv: &'a Conventions) -> Self {
        Self {
            provider,
            conv,
            include_inherited: false,
        }
    }

    /// Also walk fields declared on base types.
    pub fn include_inherited(mut self, yes: bool) -> Self {
        self.include_inherited = yes;
        self
    }

    /// Expand the inputs and the payload of one route.
    pub fn expand_route(&self, entry: &RouteEntry, set: &mut TypeClosureSet) {
        for param in entry.params.iter().filter(|p| !p.is_context) {
            let from_body = param.has_attribute(&self.conv.from_body_marker);
            if from_body || !self.is_plain_input(&param.ty) {
                self.expand(&param.ty, set);
            }
        }
        if let Some(payload) = entry.returns.payload() {
            self.expand(payload, set);
        }
    }

    fn is_plain_input(&self, ty: &TypeRef) -> bool {
        ty.is_primitive() || ty.path().is_some_and(|p| self.conv.is_framework_type(p))
    }

    /// Add `ty` and everything reachable from it.
    pub fn expand(&self, ty: &TypeRef, set: &mut TypeClosureSet) {
        match ty {
            TypeRef::Error | TypeRef::Param(_) => {}
            TypeRef::Array(elem) => self.expand(elem, set),
            TypeRef::Optional(inner) => self.expand(inner, set),
            TypeRef::Named { path, args } => {
                if ty.is_primitive() || self.conv.is_framework_type(path) {
                    return;
                }
                let Some(decl) = self.provider.resolve(path) else {
                    // Undeclared containers such as `HashMap<K, V>` are never
                    // members themselves; their arguments still are walked.
                    for arg in args {
                        self.expand(arg, set);
                    }
                    return;
                };
                if !is_shape(decl) {
                    return;
                }
                // Membership check before recursing: the only cycle guard.
                if !set.insert(ty) {
                    return;
                }
                for arg in args {
                    self.expand(arg, set);
                }
                self.expand_fields(decl, set);
            }
        }
    }

    fn expand_fields(&self, decl: &TypeDecl, set: &mut TypeClosureSet) {
        let mut visited = HashSet::new();
        let mut current = Some(decl);
        while let Some(decl) = current {
            if !visited.insert(decl.path.as_str()) {
                break;
            }
            for field in decl.fields.iter().filter(|f| {
                f.public && f.readable && !f.attributes.iter().any(|a| a.name == self.conv.ignore_marker)
            }) {
                self.expand(&field.ty, set);
            }
            if !self.include_inherited {
                break;
            }
            current = decl
                .base
                .as_ref()
                .and_then(TypeRef::path)
                .and_then(|base| self.provider.resolve(base));
        }
    }
}

/// Interfaces, primitives and abstract types are never serialized directly.
fn is_shape(decl: &TypeDecl) -> bool {
    match decl.kind {
        TypeKind::Interface | TypeKind::Primitive => false,
        _ => !decl.is_abstract,
    }
}
