use routegen_core::emit::dispatch::{handler_fn_name, to_snake_case};
use routegen_core::emit::imports::render_attribute;
use routegen_core::emit::{emit, Imports};
use routegen_core::model::{AttrValue, AttributeUsage, TypeRef};
use routegen_core::scan::scan;
use routegen_core::{ArtifactKind, ClosureWalker, Conventions, Program};

fn program(yaml: &str) -> Program {
    Program::from_yaml_str(yaml).unwrap()
}

/// Emitted artifacts of `yaml`, by kind.
fn emit_all(yaml: &str) -> Vec<(ArtifactKind, String)> {
    let program = program(yaml);
    let conv = Conventions::default();
    let groups = scan(&program, &conv).groups;
    let walker = ClosureWalker::new(&program, &conv);
    emit(&groups, &walker, &conv)
        .into_artifacts()
        .into_iter()
        .map(|a| (a.kind, a.content))
        .collect()
}

fn artifact(yaml: &str, kind: ArtifactKind) -> String {
    emit_all(yaml)
        .into_iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, content)| content)
        .unwrap_or_else(|| panic!("no {kind:?} artifact"))
}

const HELLO: &str = r#"
types:
  - path: app::greetings::GreetingGroup
    attributes:
      - name: routegen::RouteGroup
        args: ["/api/"]
    methods:
      - name: hello
        async: true
        params:
          - name: name
            type: "Option<String>"
        returns: "String"
        attributes:
          - name: routegen::HttpGet
            args: ["hello"]
"#;

// ── Full artifacts ──────────────────────────────────────────────────────

#[test]
fn hello_dispatch_artifact() {
    let expected = "\
// @generated by routegen. Do not edit by hand.

use app::greetings::GreetingGroup;
use axum::Router;
use axum::routing::get;
use routegen::RequestContext;

/// Wires every generated route into the router.
pub fn map_routes<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .route(\"/api/hello\", get(greeting_group_hello_0))
}

async fn greeting_group_hello_0(
    __ctx: RequestContext,
    name: Option<String>,
) -> String {
    let __group = __ctx.resolve::<GreetingGroup>();
    __group.hello(name).await
}
";
    assert_eq!(artifact(HELLO, ArtifactKind::Dispatch), expected);
}

#[test]
fn hello_registration_artifact() {
    let expected = "\
// @generated by routegen. Do not edit by hand.

use app::greetings::GreetingGroup;
use routegen::ServiceCollection;

/// Registers every route group for scoped retrieval.
pub fn register_route_groups(services: &mut ServiceCollection) {
    services.add_scoped::<GreetingGroup>();
}
";
    assert_eq!(artifact(HELLO, ArtifactKind::Registration), expected);
}

#[test]
fn primitive_only_routes_have_no_serialization_artifact() {
    let kinds: Vec<ArtifactKind> = emit_all(HELLO).into_iter().map(|(k, _)| k).collect();
    assert_eq!(kinds, vec![ArtifactKind::Registration, ArtifactKind::Dispatch]);
}

#[test]
fn nothing_is_emitted_without_groups() {
    assert!(emit_all("types: []").is_empty());
}

#[test]
fn group_without_routes_only_gets_registration() {
    let kinds: Vec<ArtifactKind> = emit_all(
        r#"
types:
  - path: app::Idle
    attributes:
      - name: routegen::RouteGroup
"#,
    )
    .into_iter()
    .map(|(k, _)| k)
    .collect();
    assert_eq!(kinds, vec![ArtifactKind::Registration]);
}

#[test]
fn serialization_artifact_lists_closure_sorted() {
    let content = artifact(
        r#"
types:
  - path: app::Dto
    fields:
      - name: owner
        type: "app::Owner"
  - path: app::Owner
  - path: app::Things
    attributes:
      - name: routegen::RouteGroup
    methods:
      - name: create
        returns: "routegen::Created<app::Dto>"
        attributes:
          - name: routegen::HttpPost
"#,
        ArtifactKind::Serialization,
    );
    let expected = "\
// @generated by routegen. Do not edit by hand.

use app::Dto;
use app::Owner;
use routegen::SchemaRegistry;

/// Registers every type reachable from a route's inputs or outputs.
pub fn register_serializable_types(registry: &mut SchemaRegistry) {
    registry.register::<Dto>();
    registry.register::<Owner>();
}
";
    assert_eq!(content, expected);
}

// ── Route registration shape ────────────────────────────────────────────

const VERBS: &str = r#"
types:
  - path: app::Items
    attributes:
      - name: routegen::RouteGroup
        args: ["items"]
    methods:
      - name: list
        returns: "Vec<i64>"
        attributes:
          - name: routegen::HttpGet
      - name: heartbeat
        attributes:
          - name: routegen::HttpHead
            args: ["heartbeat"]
      - name: upsert
        attributes:
          - name: routegen::Route
            args: ["{id}", ["PUT", "POST"]]
"#;

#[test]
fn single_verb_uses_dedicated_routing_function() {
    let content = artifact(VERBS, ArtifactKind::Dispatch);
    assert!(content.contains(".route(\"/items\", get(items_list_0))"));
    assert!(content.contains("use axum::routing::get;"));
}

#[test]
fn other_verbs_go_through_method_filter() {
    let content = artifact(VERBS, ArtifactKind::Dispatch);
    assert!(content.contains(".route(\"/items/heartbeat\", on(MethodFilter::HEAD, items_heartbeat_1))"));
    assert!(content.contains(
        ".route(\"/items/{id}\", on(MethodFilter::POST.or(MethodFilter::PUT), items_upsert_2))"
    ));
    assert!(content.contains("use axum::routing::MethodFilter;"));
    assert!(content.contains("use axum::routing::on;"));
}

#[test]
fn sync_void_handler_returns_no_content() {
    let content = artifact(VERBS, ArtifactKind::Dispatch);
    let expected = "\
async fn items_heartbeat_1(
    __ctx: RequestContext,
) -> NoContent {
    let __group = __ctx.resolve::<Items>();
    __group.heartbeat();
    NoContent
}
";
    assert!(content.contains(expected), "{content}");
    assert!(content.contains("use routegen::NoContent;"));
}

#[test]
fn sync_payload_handler_is_not_awaited() {
    let content = artifact(VERBS, ArtifactKind::Dispatch);
    assert!(content.contains(") -> Vec<i64> {\n"));
    assert!(content.contains("    __group.list()\n"));
}

// ── Handler bodies ──────────────────────────────────────────────────────

#[test]
fn declared_context_parameter_is_reused() {
    let content = artifact(
        r#"
types:
  - path: app::Users
    attributes:
      - name: routegen::RouteGroup
    methods:
      - name: show
        async: true
        params:
          - name: id
            type: "i64"
          - name: ctx
            type: "routegen::RequestContext"
        returns: "app::User"
        attributes:
          - name: routegen::HttpGet
            args: ["{id}"]
  - path: app::User
"#,
        ArtifactKind::Dispatch,
    );
    let expected = "\
async fn users_show_0(
    id: i64,
    ctx: RequestContext,
) -> User {
    let __group = ctx.resolve::<Users>();
    __group.show(id, ctx).await
}
";
    assert!(content.contains(expected), "{content}");
    assert!(!content.contains("__ctx"));
}

#[test]
fn static_handler_is_called_on_the_type() {
    let content = artifact(
        r#"
types:
  - path: app::Health
    attributes:
      - name: routegen::RouteGroup
    methods:
      - name: check
        static: true
        returns: "bool"
        attributes:
          - name: routegen::HttpGet
            args: ["health"]
"#,
        ArtifactKind::Dispatch,
    );
    let expected = "\
async fn health_check_0() -> bool {
    Health::check()
}
";
    assert!(content.contains(expected), "{content}");
    assert!(!content.contains("resolve::<"));
}

#[test]
fn fire_and_forget_handler_awaits_without_value() {
    let content = artifact(
        r#"
types:
  - path: app::Jobs
    attributes:
      - name: routegen::RouteGroup
    methods:
      - name: kick
        async: true
        attributes:
          - name: routegen::HttpPost
            args: ["kick"]
"#,
        ArtifactKind::Dispatch,
    );
    let expected = "\
async fn jobs_kick_0(
    __ctx: RequestContext,
) {
    let __group = __ctx.resolve::<Jobs>();
    __group.kick().await;
}
";
    assert!(content.contains(expected), "{content}");
}

#[test]
fn handler_and_parameter_attributes_pass_through() {
    let content = artifact(
        r#"
types:
  - path: app::Users
    attributes:
      - name: routegen::RouteGroup
    methods:
      - name: create
        params:
          - name: body
            type: "app::NewUser"
            attributes:
              - name: routegen::FromBody
        attributes:
          - name: app::Authorize
            args: ["admin"]
          - name: routegen::HttpPost
        returns: "routegen::Created<app::User>"
  - path: app::NewUser
  - path: app::User
"#,
        ArtifactKind::Dispatch,
    );
    assert!(content.contains("#[app::Authorize(\"admin\")]\nasync fn users_create_0("));
    assert!(content.contains("    #[routegen::FromBody] body: NewUser,\n"));
    assert!(content.contains(") -> Created<User> {\n"));
    assert!(!content.contains("HttpPost"));
}

// ── Names and imports ───────────────────────────────────────────────────

#[test]
fn colliding_short_names_fall_back_to_full_paths() {
    let content = artifact(
        r#"
types:
  - path: app::admin::Users
    attributes:
      - name: routegen::RouteGroup
        args: ["admin"]
    methods:
      - name: list
        attributes:
          - name: routegen::HttpGet
  - path: app::public::Users
    attributes:
      - name: routegen::RouteGroup
        args: ["public"]
    methods:
      - name: list
        attributes:
          - name: routegen::HttpGet
"#,
        ArtifactKind::Dispatch,
    );
    assert!(content.contains("use app::admin::Users;"));
    assert!(!content.contains("use app::public::Users;"));
    assert!(content.contains("__ctx.resolve::<app::public::Users>()"));
    assert!(content.contains(".route(\"/admin\", get(users_list_0))"));
    assert!(content.contains(".route(\"/public\", get(users_list_1))"));
    assert!(content.contains("async fn users_list_0("));
    assert!(content.contains("async fn users_list_1("));
}

#[test]
fn handler_names_are_stable() {
    let program = program(VERBS);
    let conv = Conventions::default();
    let groups = scan(&program, &conv).groups;
    let group = &groups[0];
    assert_eq!(handler_fn_name(group, &group.entries[0], 0), "items_list_0");
    assert_eq!(handler_fn_name(group, &group.entries[2], 2), "items_upsert_2");
}

#[test]
fn snake_case_conversion() {
    assert_eq!(to_snake_case("UserController"), "user_controller");
    assert_eq!(to_snake_case("getUserById"), "get_user_by_id");
    assert_eq!(to_snake_case("already_snake"), "already_snake");
    assert_eq!(to_snake_case("Api"), "api");
}

#[test]
fn imports_keep_prelude_names_qualified() {
    let mut imports = Imports::new();
    assert_eq!(imports.name_of("std::string::String"), "std::string::String");
    assert_eq!(imports.name_of("i64"), "i64");
    assert!(imports.is_empty());

    assert_eq!(imports.render_type(&TypeRef::parse("app::Page<[app::User]>").unwrap()), "Page<Vec<User>>");
    assert_eq!(imports.render(), "use app::Page;\nuse app::User;\n");
}

#[test]
fn attributes_render_as_declared() {
    let attr = AttributeUsage::new("app::Cache")
        .with_arg(AttrValue::Int(30))
        .with_arg(AttrValue::List(vec![AttrValue::Str("a".into())]))
        .with_named("shared", AttrValue::Bool(true))
        .with_named("ratio", AttrValue::Float(1.0));
    assert_eq!(
        render_attribute(&attr),
        "#[app::Cache(30, [\"a\"], shared = true, ratio = 1.0)]"
    );
    assert_eq!(render_attribute(&AttributeUsage::new("app::Marker")), "#[app::Marker]");
}

// ── Determinism ─────────────────────────────────────────────────────────

#[test]
fn same_input_gives_identical_output() {
    let first = emit_all(VERBS);
    for _ in 0..5 {
        assert_eq!(emit_all(VERBS), first);
    }
}
