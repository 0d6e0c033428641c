use routegen_core::model::TypeRef;
use routegen_core::route::unwrap_payload;
use routegen_core::{combine_path, Conventions, ReturnShape, RouteVerbKind};

fn ty(s: &str) -> TypeRef {
    TypeRef::parse(s).unwrap()
}

// ── combine_path ────────────────────────────────────────────────────────

#[test]
fn combine_path_joins_with_one_separator() {
    assert_eq!(combine_path("api", "hello"), "api/hello");
    assert_eq!(combine_path("api", "/hello"), "api/hello");
    assert_eq!(combine_path("api/v1", "users/{id}"), "api/v1/users/{id}");
}

#[test]
fn combine_path_with_empty_sides() {
    assert_eq!(combine_path("", "hello"), "hello");
    assert_eq!(combine_path("", "/hello"), "hello");
    assert_eq!(combine_path("api", ""), "api");
    assert_eq!(combine_path("", ""), "");
}

#[test]
fn combine_path_does_not_validate_segments() {
    assert_eq!(combine_path("api", "a//b/"), "api/a//b/");
}

// ── Verbs ───────────────────────────────────────────────────────────────

#[test]
fn verbs_parse_case_insensitively() {
    assert_eq!(RouteVerbKind::parse("get"), Some(RouteVerbKind::Get));
    assert_eq!(RouteVerbKind::parse(" Delete "), Some(RouteVerbKind::Delete));
    assert_eq!(RouteVerbKind::parse("CONNECT"), Some(RouteVerbKind::Connect));
    assert_eq!(RouteVerbKind::parse("FETCH"), None);
}

#[test]
fn only_common_verbs_have_routing_functions() {
    assert_eq!(RouteVerbKind::Get.routing_fn(), Some("get"));
    assert_eq!(RouteVerbKind::Patch.routing_fn(), Some("patch"));
    assert_eq!(RouteVerbKind::Head.routing_fn(), None);
    assert_eq!(RouteVerbKind::Trace.routing_fn(), None);
}

// ── Return shapes ───────────────────────────────────────────────────────

#[test]
fn missing_or_unit_return_is_void() {
    let conv = Conventions::default();
    assert_eq!(ReturnShape::from_signature(None, false, &conv), ReturnShape::Void);
    assert_eq!(
        ReturnShape::from_signature(Some(&ty("()")), false, &conv),
        ReturnShape::Void
    );
}

#[test]
fn bare_completion_is_fire_and_forget() {
    let conv = Conventions::default();
    assert_eq!(
        ReturnShape::from_signature(None, true, &conv),
        ReturnShape::FireAndForget
    );
    assert_eq!(
        ReturnShape::from_signature(Some(&ty("std::future::Future<()>")), false, &conv),
        ReturnShape::FireAndForget
    );
}

#[test]
fn async_wrappers_are_peeled() {
    let conv = Conventions::default();
    let shape = ReturnShape::from_signature(Some(&ty("routegen::Task<app::User>")), false, &conv);
    assert_eq!(
        shape,
        ReturnShape::Payload {
            declared: ty("app::User"),
            payload: Some(ty("app::User")),
            is_async: true,
        }
    );
}

#[test]
fn value_wrapper_payload_is_inner_type() {
    let conv = Conventions::default();
    assert_eq!(
        unwrap_payload(&ty("routegen::Created<app::Dto>"), &conv),
        Some(ty("app::Dto"))
    );
    assert_eq!(
        unwrap_payload(&ty("axum::Json<Vec<app::Dto>>"), &conv),
        Some(ty("Vec<app::Dto>"))
    );
}

#[test]
fn one_of_wrapper_takes_first_payload_variant() {
    let conv = Conventions::default();
    let declared = ty("routegen::Results<routegen::NotFound, routegen::Ok<app::A>, routegen::Created<app::B>>");
    assert_eq!(unwrap_payload(&declared, &conv), Some(ty("app::A")));

    let shape = ReturnShape::from_signature(Some(&declared), true, &conv);
    assert_eq!(shape.payload(), Some(&ty("app::A")));
}

#[test]
fn empty_results_carry_no_payload() {
    let conv = Conventions::default();
    assert_eq!(unwrap_payload(&ty("routegen::NoContent"), &conv), None);
    assert_eq!(
        unwrap_payload(&ty("routegen::Results<routegen::NotFound, routegen::BadRequest>"), &conv),
        None
    );

    let shape = ReturnShape::from_signature(Some(&ty("routegen::NoContent")), false, &conv);
    assert!(matches!(shape, ReturnShape::Payload { payload: None, .. }));
}

#[test]
fn wrapper_with_wrong_arity_has_no_payload() {
    let conv = Conventions::default();
    assert_eq!(unwrap_payload(&ty("routegen::Ok"), &conv), None);
}
