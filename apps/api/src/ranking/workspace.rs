//! Workspace staging for one ranking request.
//!
//! Every request gets its own randomly-suffixed directory under the platform
//! temp area: the requirement text lands in `requirement.txt`, requested
//! resumes are copied into `resumes/`. The `TempDir` inside `Workspace` is
//! the teardown guard: dropping the workspace removes the whole tree, so
//! every exit path (error, panic, cancellation) cleans up.

use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;
use tracing::warn;

const REQUIREMENT_FILE: &str = "requirement.txt";
const RESUME_SUBDIR: &str = "resumes";

/// An isolated temporary directory tree owned by a single ranking request.
pub struct Workspace {
    root: TempDir,
    requirement_file: PathBuf,
    resume_dir: PathBuf,
}

impl Workspace {
    /// Builds a workspace for one request: fresh unique root, requirement
    /// written verbatim, requested resumes copied in from `storage_dir`.
    ///
    /// A resume whose source file is missing is skipped with a warning; the
    /// request proceeds with fewer resumes. Directory-creation, write and
    /// copy failures are fatal.
    pub async fn stage(
        requirement: &str,
        resume_names: &[String],
        storage_dir: &Path,
    ) -> Result<Self> {
        let root = tempfile::Builder::new()
            .prefix("resume-rank-")
            .tempdir()
            .context("failed to create workspace directory")?;

        let requirement_file = root.path().join(REQUIREMENT_FILE);
        tokio::fs::write(&requirement_file, requirement)
            .await
            .context("failed to write requirement file")?;

        let resume_dir = root.path().join(RESUME_SUBDIR);
        tokio::fs::create_dir(&resume_dir)
            .await
            .context("failed to create resume subdirectory")?;

        let workspace = Workspace {
            root,
            requirement_file,
            resume_dir,
        };
        for name in resume_names {
            workspace.copy_resume(name, storage_dir).await?;
        }

        Ok(workspace)
    }

    /// Copies one named resume from storage into the workspace.
    /// Missing sources are skipped, not fatal. Names that are not bare
    /// filenames (path separators, `..`) never resolve into storage and are
    /// skipped the same way.
    async fn copy_resume(&self, name: &str, storage_dir: &Path) -> Result<()> {
        if Path::new(name).file_name() != Some(OsStr::new(name)) {
            warn!("Skipping resume with non-bare filename: {name:?}");
            return Ok(());
        }

        let source = storage_dir.join(name);
        match tokio::fs::metadata(&source).await {
            Ok(meta) if meta.is_file() => {
                tokio::fs::copy(&source, self.resume_dir.join(name))
                    .await
                    .with_context(|| format!("failed to copy resume '{name}' into workspace"))?;
            }
            Ok(_) => {
                warn!("Skipping resume that is not a regular file: {name}");
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Skipping missing resume: {name}");
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to stat resume '{name}'"));
            }
        }

        Ok(())
    }

    pub fn requirement_file(&self) -> &Path {
        &self.requirement_file
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Lists the resumes that were actually copied, sorted by filename.
    /// Only these paths are handed to the scorer, so skipped resumes are
    /// naturally excluded.
    pub async fn copied_resumes(&self) -> Result<Vec<PathBuf>> {
        let mut entries = tokio::fs::read_dir(&self.resume_dir)
            .await
            .context("failed to list workspace resume directory")?;

        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .context("failed to read workspace resume directory entry")?
        {
            paths.push(entry.path());
        }
        paths.sort();

        Ok(paths)
    }

    /// Tears the workspace down now instead of waiting for drop, so removal
    /// errors can be observed. They are logged, never surfaced: by this
    /// point the response is already decided.
    pub fn close(self) {
        if let Err(e) = self.root.close() {
            warn!("Failed to remove workspace directory: {e}");
        }
    }
}
