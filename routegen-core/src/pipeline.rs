use std::path::{Path, PathBuf};

use crate::closure::{ClosureWalker, TypeClosureSet};
use crate::config::GeneratorOptions;
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::emit::{self, Artifact, ArtifactKind};
use crate::model::DeclarationProvider;
use crate::persist;
use crate::route::RouteGroup;
use crate::scan;

/// Everything one generation pass produced.
#[derive(Debug, Default)]
pub struct Generation {
    pub groups: Vec<RouteGroup>,
    /// Registration, dispatch, then serialization; absent ones are skipped.
    pub artifacts: Vec<Artifact>,
    pub closure: TypeClosureSet,
    pub diagnostics: Vec<Diagnostic>,
    /// Files written to the output directory.
    pub written: Vec<PathBuf>,
    /// Files of artifacts no longer produced, removed from the output directory.
    pub removed: Vec<PathBuf>,
}

impl Generation {
    pub fn artifact(&self, kind: ArtifactKind) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.kind == kind)
    }

    pub fn route_count(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }
}

/// Scan, emit, and (when configured) persist.
///
/// Never fails: malformed declarations and write errors become warnings and
/// every artifact is returned in memory regardless.
pub fn generate(provider: &dyn DeclarationProvider, options: &GeneratorOptions) -> Generation {
    let conv = &options.conventions;

    let scanned = scan::scan(provider, conv);
    let mut diagnostics = scanned.diagnostics;

    let walker = ClosureWalker::new(provider, conv).include_inherited(options.include_inherited);
    let emitted = emit::emit(&scanned.groups, &walker, conv);
    let closure = emitted.closure.clone();
    let artifacts = emitted.into_artifacts();

    for artifact in &artifacts {
        tracing::debug!(
            artifact = artifact.file_name(),
            bytes = artifact.content.len(),
            "Emitted artifact"
        );
    }

    let mut written = Vec::new();
    let mut removed = Vec::new();
    if let Some(dir) = &options.output_dir {
        for artifact in &artifacts {
            match persist::write_artifact(dir, artifact) {
                Ok(path) => written.push(path),
                Err(e) => diagnostics.push(persist_failed(dir, artifact.kind, "write", e)),
            }
        }

        // The directory mirrors this pass: absent artifacts leave no file behind.
        let stale = ArtifactKind::ALL
            .into_iter()
            .filter(|kind| !artifacts.iter().any(|a| a.kind == *kind));
        for kind in stale {
            match persist::remove_stale(dir, kind) {
                Ok(Some(path)) => {
                    tracing::debug!(path = %path.display(), "Removed stale artifact");
                    removed.push(path);
                }
                Ok(None) => {}
                Err(e) => diagnostics.push(persist_failed(dir, kind, "remove stale", e)),
            }
        }
    }

    for diagnostic in &diagnostics {
        tracing::warn!(
            code = diagnostic.kind.code(),
            location = %diagnostic.location,
            "{}",
            diagnostic.message
        );
    }

    Generation {
        groups: scanned.groups,
        artifacts,
        closure,
        diagnostics,
        written,
        removed,
    }
}

fn persist_failed(dir: &Path, kind: ArtifactKind, action: &str, e: std::io::Error) -> Diagnostic {
    let path = dir.join(kind.file_name());
    Diagnostic::new(
        DiagnosticKind::PersistFailed,
        path.display().to_string(),
        format!("could not {action} artifact: {e}"),
    )
}
