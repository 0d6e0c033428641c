//! Text emission of the generated artifacts.
//!
//! - `registration`: one scoped registration per group
//! - `dispatch`: router wiring plus one wrapper function per route
//! - `serialization`: one schema registration per reachable type
//!
//! Output is a pure function of the input model: no random identifiers, no
//! hash-map iteration order, sorted `use` lists.

pub mod dispatch;
pub mod imports;
pub mod registration;
pub mod serialization;

use crate::closure::{ClosureWalker, TypeClosureSet};
use crate::markers::Conventions;
use crate::route::RouteGroup;

pub use imports::Imports;

const HEADER: &str = "// @generated by routegen. Do not edit by hand.\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Registration,
    Dispatch,
    Serialization,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::Registration,
        ArtifactKind::Dispatch,
        ArtifactKind::Serialization,
    ];

    /// Conventional file name used when persisting.
    pub fn file_name(self) -> &'static str {
        match self {
            ArtifactKind::Registration => "route_groups.rs",
            ArtifactKind::Dispatch => "route_table.rs",
            ArtifactKind::Serialization => "serializable_types.rs",
        }
    }
}

/// One generated unit of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub content: String,
}

impl Artifact {
    pub fn file_name(&self) -> &'static str {
        self.kind.file_name()
    }
}

#[derive(Debug, Default)]
pub struct EmitOutput {
    pub registration: Option<Artifact>,
    pub dispatch: Option<Artifact>,
    pub serialization: Option<Artifact>,
    /// Every type reachable from any route.
    pub closure: TypeClosureSet,
}

impl EmitOutput {
    pub fn into_artifacts(self) -> Vec<Artifact> {
        [self.registration, self.dispatch, self.serialization]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Emit every artifact for the scanned groups.
pub fn emit(groups: &[RouteGroup], walker: &ClosureWalker<'_>, conv: &Conventions) -> EmitOutput {
    let mut closure = TypeClosureSet::new();
    for entry in groups.iter().flat_map(|g| g.entries.iter()) {
        walker.expand_route(entry, &mut closure);
    }

    EmitOutput {
        registration: registration::emit_registration(groups, conv),
        dispatch: dispatch::emit_dispatch(groups, conv),
        serialization: serialization::emit_serialization(&closure, conv),
        closure,
    }
}

/// Header, sorted `use` block, then body.
pub(crate) fn assemble(kind: ArtifactKind, imports: &Imports, body: &str) -> Artifact {
    let mut content = String::from(HEADER);
    content.push('\n');
    if !imports.is_empty() {
        content.push_str(&imports.render());
        content.push('\n');
    }
    content.push_str(body);
    Artifact { kind, content }
}
