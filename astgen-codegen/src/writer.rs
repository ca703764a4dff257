//! Artifact writing
//!
//! Output locations are explicit parameters; the generator assumes nothing
//! about the working directory. Every write is a full overwrite.

use std::fs;
use std::path::{Path, PathBuf};

use crate::GeneratedArtifacts;

/// Where each artifact is written.
#[derive(Debug, Clone)]
pub struct OutputTargets {
    pub ast: PathBuf,
    pub visitor: PathBuf,
    pub visitor_mut: PathBuf,
}

/// Write all artifacts to their targets, creating parent directories as
/// needed.
pub fn write_artifacts(
    artifacts: &GeneratedArtifacts,
    targets: &OutputTargets,
) -> std::io::Result<()> {
    write_one(&targets.ast, &artifacts.ast)?;
    write_one(&targets.visitor, &artifacts.visitor)?;
    write_one(&targets.visitor_mut, &artifacts.visitor_mut)?;
    Ok(())
}

fn write_one(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote generated artifact");
    Ok(())
}
