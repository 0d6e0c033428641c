use std::path::PathBuf;

use routegen_core::emit::{Artifact, ArtifactKind};
use routegen_core::persist::write_artifact;
use routegen_core::{generate, DiagnosticKind, GeneratorOptions, Program};

const SHOP: &str = r#"
types:
  - path: shop::Catalog
    attributes:
      - name: routegen::RouteGroup
        args: ["catalog"]
    methods:
      - name: product
        async: true
        params:
          - name: id
            type: "i64"
        returns: "routegen::Results<routegen::Ok<shop::Product>, routegen::NotFound>"
        attributes:
          - name: routegen::HttpGet
            args: ["products/{id}"]
      - name: legacy
        attributes:
          - name: routegen::Route
            args: ["old", ["GET", "FETCH"]]
  - path: shop::Product
    fields:
      - name: price
        type: "shop::Money"
  - path: shop::Money
"#;

fn shop() -> Program {
    Program::from_yaml_str(SHOP).unwrap()
}

// ── In-memory generation ────────────────────────────────────────────────

#[test]
fn generates_all_artifacts_in_memory() {
    let generation = generate(&shop(), &GeneratorOptions::default());

    assert_eq!(generation.groups.len(), 1);
    assert_eq!(generation.route_count(), 2);
    let kinds: Vec<ArtifactKind> = generation.artifacts.iter().map(|a| a.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ArtifactKind::Registration,
            ArtifactKind::Dispatch,
            ArtifactKind::Serialization
        ]
    );
    let names: Vec<&str> = generation.closure.names().collect();
    assert_eq!(names, vec!["shop::Money", "shop::Product"]);
    assert!(generation.written.is_empty());
}

#[test]
fn declaration_problems_become_warnings() {
    let generation = generate(&shop(), &GeneratorOptions::default());
    assert_eq!(generation.diagnostics.len(), 1);
    let diagnostic = &generation.diagnostics[0];
    assert_eq!(diagnostic.kind, DiagnosticKind::UnknownVerb);
    assert_eq!(
        diagnostic.to_string(),
        "warning[RG002]: `FETCH` is not an HTTP method and was ignored (shop::Catalog::legacy)"
    );
}

#[test]
fn artifact_lookup_by_kind() {
    let generation = generate(&shop(), &GeneratorOptions::default());
    let dispatch = generation.artifact(ArtifactKind::Dispatch).unwrap();
    assert!(dispatch.content.contains(".route(\"/catalog/products/{id}\", get(catalog_product_0))"));
    assert!(dispatch.content.contains(".route(\"/catalog/old\", get(catalog_legacy_1))"));
}

// ── Persistence ─────────────────────────────────────────────────────────

#[test]
fn writes_artifacts_to_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("generated");
    let options = GeneratorOptions {
        output_dir: Some(out.clone()),
        ..Default::default()
    };

    let generation = generate(&shop(), &options);
    assert_eq!(
        generation.written,
        vec![
            out.join("route_groups.rs"),
            out.join("route_table.rs"),
            out.join("serializable_types.rs"),
        ]
    );
    for artifact in &generation.artifacts {
        let on_disk = std::fs::read_to_string(out.join(artifact.file_name())).unwrap();
        assert_eq!(on_disk, artifact.content);
    }
}

#[test]
fn rewrite_replaces_previous_content() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("route_table.rs");
    std::fs::write(&target, "stale").unwrap();

    let artifact = Artifact {
        kind: ArtifactKind::Dispatch,
        content: "fresh\n".into(),
    };
    assert_eq!(write_artifact(dir.path(), &artifact).unwrap(), target);
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "fresh\n");

    let leftovers: Vec<PathBuf> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p != &target)
        .collect();
    assert!(leftovers.is_empty(), "temporary files left: {leftovers:?}");
}

#[test]
fn write_failure_is_reported_and_artifacts_still_returned() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where the output directory should be.
    let blocked = dir.path().join("blocked");
    std::fs::write(&blocked, "not a directory").unwrap();

    let options = GeneratorOptions {
        output_dir: Some(blocked.clone()),
        ..Default::default()
    };
    let generation = generate(&shop(), &options);

    assert_eq!(generation.artifacts.len(), 3);
    assert!(generation.written.is_empty());
    let persist_failures: Vec<_> = generation
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::PersistFailed)
        .collect();
    assert_eq!(persist_failures.len(), 3);
    assert_eq!(
        persist_failures[0].location,
        blocked.join("route_groups.rs").display().to_string()
    );
}

const SHOP_PRIMITIVES_ONLY: &str = r#"
types:
  - path: shop::Catalog
    attributes:
      - name: routegen::RouteGroup
        args: ["catalog"]
    methods:
      - name: count
        returns: "i64"
        attributes:
          - name: routegen::HttpGet
            args: ["count"]
"#;

#[test]
fn artifacts_no_longer_produced_are_removed() {
    let dir = tempfile::tempdir().unwrap();
    let options = GeneratorOptions {
        output_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    };

    generate(&shop(), &options);
    let stale = dir.path().join("serializable_types.rs");
    assert!(stale.exists());

    let program = Program::from_yaml_str(SHOP_PRIMITIVES_ONLY).unwrap();
    let generation = generate(&program, &options);

    assert!(generation.artifact(ArtifactKind::Serialization).is_none());
    assert!(!stale.exists());
    assert_eq!(generation.removed, vec![stale]);
    assert!(dir.path().join("route_groups.rs").exists());
    assert!(dir.path().join("route_table.rs").exists());
    assert!(generation.diagnostics.is_empty());
}

#[test]
fn nothing_to_remove_on_first_pass() {
    let dir = tempfile::tempdir().unwrap();
    let options = GeneratorOptions {
        output_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    };

    let program = Program::from_yaml_str(SHOP_PRIMITIVES_ONLY).unwrap();
    let generation = generate(&program, &options);
    assert!(generation.removed.is_empty());
    assert!(generation.diagnostics.is_empty());
}

#[test]
fn removal_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    // A directory cannot be removed as a file.
    std::fs::create_dir(dir.path().join("serializable_types.rs")).unwrap();
    let options = GeneratorOptions {
        output_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    };

    let program = Program::from_yaml_str(SHOP_PRIMITIVES_ONLY).unwrap();
    let generation = generate(&program, &options);

    assert_eq!(generation.written.len(), 2);
    assert_eq!(generation.diagnostics.len(), 1);
    let diagnostic = &generation.diagnostics[0];
    assert_eq!(diagnostic.kind, DiagnosticKind::PersistFailed);
    assert_eq!(
        diagnostic.location,
        dir.path().join("serializable_types.rs").display().to_string()
    );
    assert!(diagnostic.message.contains("remove stale"));
}
