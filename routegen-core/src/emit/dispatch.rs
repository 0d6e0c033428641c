//! Router wiring and per-route wrapper functions.

use super::imports::render_attribute;
use super::{assemble, Artifact, ArtifactKind, Imports};
use crate::markers::Conventions;
use crate::route::{combine_path, ReturnShape, RouteEntry, RouteGroup};

/// Entry point of the dispatch artifact.
pub const MAP_ROUTES_FN: &str = "map_routes";

/// Binding of the synthesized request-context parameter.
pub const CONTEXT_BINDING: &str = "__ctx";
/// Binding of the group instance resolved from the request scope.
pub const GROUP_BINDING: &str = "__group";

/// Router wiring plus one wrapper per route, `None` without routes.
pub fn emit_dispatch(groups: &[RouteGroup], conv: &Conventions) -> Option<Artifact> {
    if groups.iter().all(|g| g.entries.is_empty()) {
        return None;
    }

    let mut imports = Imports::new();
    let router = imports.name_of(&conv.router);

    let mut registrations = Vec::new();
    let mut handlers = Vec::new();
    let routes = groups
        .iter()
        .flat_map(|group| group.entries.iter().map(move |entry| (group, entry)));
    for (ordinal, (group, entry)) in routes.enumerate() {
        let handler_name = handler_fn_name(group, entry, ordinal);
        registrations.push(render_registration(group, entry, &handler_name, conv, &mut imports));
        handlers.push(render_handler(group, entry, &handler_name, conv, &mut imports));
    }

    let mut body = String::new();
    body.push_str("/// Wires every generated route into the router.\n");
    body.push_str(&format!(
        "pub fn {MAP_ROUTES_FN}<S>(router: {router}<S>) -> {router}<S>\n"
    ));
    body.push_str("where\n    S: Clone + Send + Sync + 'static,\n{\n    router\n");
    for registration in &registrations {
        body.push_str("        ");
        body.push_str(registration);
        body.push('\n');
    }
    body.push_str("}\n");
    for handler in &handlers {
        body.push('\n');
        body.push_str(handler);
    }

    Some(assemble(ArtifactKind::Dispatch, &imports, &body))
}

/// Deterministic wrapper name: group, handler, and position in the route table.
///
/// The ordinal runs across all groups, so two groups sharing a short name
/// never produce the same wrapper.
pub fn handler_fn_name(group: &RouteGroup, entry: &RouteEntry, ordinal: usize) -> String {
    format!(
        "{}_{}_{}",
        to_snake_case(group.short_name()),
        to_snake_case(&entry.handler),
        ordinal
    )
}

/// Path literal as registered on the router, always with one leading `/`.
pub fn route_path(group: &RouteGroup, entry: &RouteEntry) -> String {
    format!("/{}", combine_path(&group.prefix, &entry.template))
}

/// `.route(...)` call for one entry.
///
/// Exactly one verb with a dedicated routing function uses it; everything
/// else goes through a method filter listing each verb.
pub fn render_registration(
    group: &RouteGroup,
    entry: &RouteEntry,
    handler_name: &str,
    conv: &Conventions,
    imports: &mut Imports,
) -> String {
    let path = route_path(group, entry);
    match entry.single_verb().and_then(|v| v.routing_fn()) {
        Some(routing_fn) => {
            let routing_fn = imports.name_of(&format!("{}::{routing_fn}", conv.routing_module));
            format!(".route({path:?}, {routing_fn}({handler_name}))")
        }
        None => {
            let on = imports.name_of(&format!("{}::on", conv.routing_module));
            let filter = imports.name_of(&format!("{}::MethodFilter", conv.routing_module));
            let mut verbs = entry.verbs.iter().map(|v| format!("{filter}::{v}"));
            let first = verbs.next().unwrap_or_default();
            let filter_expr = verbs.fold(first, |acc, v| format!("{acc}.or({v})"));
            format!(".route({path:?}, {on}({filter_expr}, {handler_name}))")
        }
    }
}

/// The wrapper function calling into the original handler.
pub fn render_handler(
    group: &RouteGroup,
    entry: &RouteEntry,
    handler_name: &str,
    conv: &Conventions,
    imports: &mut Imports,
) -> String {
    let group_ty = imports.name_of(&group.ty);

    let mut out = String::new();
    for attr in &entry.attributes {
        out.push_str(&render_attribute(attr));
        out.push('\n');
    }

    let mut params = Vec::new();
    let synthesize_context = !entry.is_static && entry.context_param().is_none();
    if synthesize_context {
        let context_ty = imports.name_of(&conv.context_type);
        params.push(format!("{CONTEXT_BINDING}: {context_ty}"));
    }
    for param in &entry.params {
        let mut rendered = String::new();
        for attr in &param.attributes {
            rendered.push_str(&render_attribute(attr));
            rendered.push(' ');
        }
        rendered.push_str(&format!("{}: {}", param.name, imports.render_type(&param.ty)));
        params.push(rendered);
    }

    let return_ty = match &entry.returns {
        ReturnShape::Void => Some(imports.name_of(&conv.no_content)),
        ReturnShape::FireAndForget => None,
        ReturnShape::Payload { declared, .. } => Some(imports.render_type(declared)),
    };

    out.push_str(&format!("async fn {handler_name}("));
    if !params.is_empty() {
        out.push('\n');
        for param in &params {
            out.push_str(&format!("    {param},\n"));
        }
    }
    out.push(')');
    if let Some(return_ty) = &return_ty {
        out.push_str(&format!(" -> {return_ty}"));
    }
    out.push_str(" {\n");

    let args: Vec<&str> = entry.params.iter().map(|p| p.name.as_str()).collect();
    let call = if entry.is_static {
        format!("{group_ty}::{}({})", entry.handler, args.join(", "))
    } else {
        let context = entry
            .context_param()
            .map(|p| p.name.as_str())
            .unwrap_or(CONTEXT_BINDING);
        out.push_str(&format!(
            "    let {GROUP_BINDING} = {context}.resolve::<{group_ty}>();\n"
        ));
        format!("{GROUP_BINDING}.{}({})", entry.handler, args.join(", "))
    };

    match &entry.returns {
        ReturnShape::Void => {
            out.push_str(&format!("    {call};\n"));
            out.push_str(&format!("    {}\n", return_ty.unwrap_or_default()));
        }
        ReturnShape::FireAndForget => out.push_str(&format!("    {call}.await;\n")),
        ReturnShape::Payload { is_async: true, .. } => {
            out.push_str(&format!("    {call}.await\n"))
        }
        ReturnShape::Payload { is_async: false, .. } => out.push_str(&format!("    {call}\n")),
    }
    out.push_str("}\n");
    out
}

/// `UserController` -> `user_controller`; already snake-cased names pass through.
pub fn to_snake_case(name: &str) -> String {
    let mut result = String::new();
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}
