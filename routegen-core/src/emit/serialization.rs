use super::{assemble, Artifact, ArtifactKind, Imports};
use crate::closure::TypeClosureSet;
use crate::markers::Conventions;

pub const REGISTER_TYPES_FN: &str = "register_serializable_types";

/// One schema registration per reachable type, sorted by identity.
pub fn emit_serialization(set: &TypeClosureSet, conv: &Conventions) -> Option<Artifact> {
    if set.is_empty() {
        return None;
    }

    let mut imports = Imports::new();
    let registry = imports.name_of(&conv.schema_registry);

    let mut body = String::new();
    body.push_str("/// Registers every type reachable from a route's inputs or outputs.\n");
    body.push_str(&format!(
        "pub fn {REGISTER_TYPES_FN}(registry: &mut {registry}) {{\n"
    ));
    for ty in set.iter() {
        let rendered = imports.render_type(ty);
        body.push_str(&format!("    registry.register::<{rendered}>();\n"));
    }
    body.push_str("}\n");

    Some(assemble(ArtifactKind::Serialization, &imports, &body))
}
