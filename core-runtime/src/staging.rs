//! Scoped filesystem resources
//!
//! Two guards back the engine's fail-closed output discipline:
//!
//! - [`StagedOutput`]: a temporary file next to the caller's output path.
//!   Strategies write into it; [`commit`](StagedOutput::commit) renames it
//!   over the output path. Dropping it uncommitted deletes it, so a failed
//!   operation never leaves a partial output behind.
//! - [`ScopedWorkspace`]: a per-call temporary directory for intermediate
//!   carriers (e.g. PCM WAV produced by a transcoder). It is removed with
//!   everything inside when dropped, on every exit path.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};
use tracing::debug;

const STAGING_PREFIX: &str = ".stego-staged-";
const WORKSPACE_PREFIX: &str = "stego-work-";

/// Output file that only appears at its final path once committed.
#[derive(Debug)]
pub struct StagedOutput {
    file: NamedTempFile,
    target: PathBuf,
}

impl StagedOutput {
    /// Create a staging file in the same directory as `target`.
    ///
    /// The staging file keeps `target`'s extension because some
    /// collaborators (encoders, image writers) pick the output format from
    /// it. Staging in the target directory keeps the final rename on one
    /// filesystem.
    pub fn new(target: &Path) -> Result<Self> {
        let parent = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let suffix = target
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let file = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(&suffix)
            .tempfile_in(parent)?;

        debug!(staged = %file.path().display(), "Created staged output");

        Ok(Self {
            file,
            target: target.to_path_buf(),
        })
    }

    /// Path strategies should write to.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Final output path.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Give the staged file the permission bits of `source`.
    ///
    /// Temporary files are created owner-only; outputs should look like the
    /// carrier they were derived from.
    pub fn inherit_permissions(&self, source: &Path) -> Result<()> {
        let permissions = fs::metadata(source)?.permissions();
        fs::set_permissions(self.path(), permissions)?;
        Ok(())
    }

    /// Atomically move the staged file to the target path.
    pub fn commit(self) -> Result<PathBuf> {
        let Self { file, target } = self;
        file.persist(&target)
            .map_err(|e| Error::Io(e.error))?;
        debug!(output = %target.display(), "Committed staged output");
        Ok(target)
    }
}

/// Temporary directory owned by a single operation.
#[derive(Debug)]
pub struct ScopedWorkspace {
    dir: TempDir,
}

impl ScopedWorkspace {
    /// Create a fresh workspace under `root`.
    pub fn new_in(root: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(root)?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of a file named `name` inside the workspace.
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staged_output_commit() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.wav");

        let staged = StagedOutput::new(&target).unwrap();
        assert!(staged.path().to_string_lossy().ends_with(".wav"));
        assert_eq!(staged.path().parent(), Some(dir.path()));

        fs::write(staged.path(), b"data").unwrap();
        let committed = staged.commit().unwrap();

        assert_eq!(committed, target);
        assert_eq!(fs::read(&target).unwrap(), b"data");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_staged_output_dropped_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.zip");

        {
            let staged = StagedOutput::new(&target).unwrap();
            fs::write(staged.path(), b"partial").unwrap();
        }

        assert!(!target.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_staged_output_inherits_permissions() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("carrier.bin");
        fs::write(&source, b"carrier").unwrap();

        let staged = StagedOutput::new(&dir.path().join("out.bin")).unwrap();
        staged.inherit_permissions(&source).unwrap();

        assert_eq!(
            fs::metadata(staged.path()).unwrap().permissions(),
            fs::metadata(&source).unwrap().permissions()
        );
    }

    #[test]
    fn test_scoped_workspace_removed_on_drop() {
        let root = tempfile::tempdir().unwrap();
        let workspace_path;

        {
            let workspace = ScopedWorkspace::new_in(root.path()).unwrap();
            workspace_path = workspace.path().to_path_buf();
            fs::write(workspace.file("carrier.wav"), b"RIFF").unwrap();
            assert!(workspace_path.exists());
        }

        assert!(!workspace_path.exists());
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }
}
