use super::{assemble, Artifact, ArtifactKind, Imports};
use crate::markers::Conventions;
use crate::route::RouteGroup;

/// Entry point of the registration artifact.
pub const REGISTER_FN: &str = "register_route_groups";

/// One scoped registration per group, `None` without groups.
///
/// Groups without routes are still registered.
pub fn emit_registration(groups: &[RouteGroup], conv: &Conventions) -> Option<Artifact> {
    if groups.is_empty() {
        return None;
    }

    let mut imports = Imports::new();
    let services = imports.name_of(&conv.service_collection);

    let mut body = String::new();
    body.push_str("/// Registers every route group for scoped retrieval.\n");
    body.push_str(&format!("pub fn {REGISTER_FN}(services: &mut {services}) {{\n"));
    for group in groups {
        let ty = imports.name_of(&group.ty);
        body.push_str(&format!("    services.add_scoped::<{ty}>();\n"));
    }
    body.push_str("}\n");

    Some(assemble(ArtifactKind::Registration, &imports, &body))
}
