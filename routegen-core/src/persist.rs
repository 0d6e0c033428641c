//! All-or-nothing writes of artifacts to the output directory.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::emit::{Artifact, ArtifactKind};

/// Write `artifact` into `dir` under its conventional file name.
///
/// Content goes to a temporary file in the same directory first and is then
/// renamed over the target, so a failure never leaves a half-written file.
pub fn write_artifact(dir: &Path, artifact: &Artifact) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let target = dir.join(artifact.file_name());

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(artifact.content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(&target).map_err(|e| e.error)?;

    Ok(target)
}

/// Delete the file a previous pass wrote for `kind`.
///
/// Returns the removed path, `None` when there was nothing to remove.
pub fn remove_stale(dir: &Path, kind: ArtifactKind) -> std::io::Result<Option<PathBuf>> {
    let target = dir.join(kind.file_name());
    match std::fs::remove_file(&target) {
        Ok(()) => Ok(Some(target)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
