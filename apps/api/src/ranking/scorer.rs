//! Scorer — pluggable, trait-based capability wrapping the external scoring
//! process.
//!
//! Default: `PythonScorer`, which shells out to the matching script with the
//! requirement file as the first argument and the staged resume files after
//! it. `AppState` holds an `Arc<dyn Scorer>`, so the concrete executable and
//! its invocation are swappable without touching the handler.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::errors::AppError;

/// Captured result of one scorer run, consumed exactly once after exit.
#[derive(Debug)]
pub struct ProcessOutcome {
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// The scorer trait. Implement this to swap the external scoring process
/// without touching the endpoint or orchestration code.
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn invoke(
        &self,
        requirement: &Path,
        resumes: &[PathBuf],
    ) -> Result<ProcessOutcome, AppError>;
}

/// Runs the Python matching script as a subprocess.
pub struct PythonScorer {
    python: PathBuf,
    script: PathBuf,
    timeout: Duration,
}

impl PythonScorer {
    pub fn new(python: PathBuf, script: PathBuf, timeout: Duration) -> Self {
        Self {
            python,
            script,
            timeout,
        }
    }
}

#[async_trait]
impl Scorer for PythonScorer {
    /// Spawns `python script requirement resume...` and drains both output
    /// pipes to completion. `kill_on_drop` ties the child's lifetime to this
    /// future: a timeout or a disconnected client terminates the process.
    async fn invoke(
        &self,
        requirement: &Path,
        resumes: &[PathBuf],
    ) -> Result<ProcessOutcome, AppError> {
        debug!(
            "Running scorer: {} {} ({} resumes)",
            self.python.display(),
            self.script.display(),
            resumes.len()
        );

        let mut command = Command::new(&self.python);
        command
            .arg(&self.script)
            .arg(requirement)
            .args(resumes)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| AppError::Scorer {
                details: format!(
                    "Scorer timed out after {} seconds.",
                    self.timeout.as_secs()
                ),
            })?
            .with_context(|| format!("failed to launch scorer '{}'", self.python.display()))?;

        Ok(ProcessOutcome {
            // None means the child was killed by a signal
            exit_code: output.status.code().unwrap_or(-1),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    /// Writes an executable shell script and returns a scorer that runs it
    /// through /bin/sh, standing in for the Python interpreter.
    fn sh_scorer(dir: &TempDir, body: &str, timeout: Duration) -> PythonScorer {
        let script = dir.path().join("scorer.sh");
        std::fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        PythonScorer::new(PathBuf::from("/bin/sh"), script, timeout)
    }

    #[tokio::test]
    async fn test_zero_exit_captures_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let scorer = sh_scorer(
            &dir,
            r#"printf '{"alice.pdf": 0.9}'"#,
            Duration::from_secs(5),
        );

        let outcome = scorer
            .invoke(Path::new("/dev/null"), &[])
            .await
            .unwrap();

        assert!(outcome.success());
        assert_eq!(outcome.stdout, br#"{"alice.pdf": 0.9}"#);
        assert!(outcome.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_nonzero_exit_captures_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let scorer = sh_scorer(
            &dir,
            "printf 'model load error' >&2\nexit 1",
            Duration::from_secs(5),
        );

        let outcome = scorer
            .invoke(Path::new("/dev/null"), &[])
            .await
            .unwrap();

        assert_eq!(outcome.exit_code, 1);
        assert_eq!(outcome.stderr, b"model load error");
    }

    #[tokio::test]
    async fn test_arguments_are_requirement_then_resumes() {
        let dir = tempfile::tempdir().unwrap();
        // Echo back argv as JSON-ish lines: $1 is the requirement file.
        let scorer = sh_scorer(&dir, r#"printf '%s\n' "$@""#, Duration::from_secs(5));

        let resumes = vec![PathBuf::from("/tmp/a.pdf"), PathBuf::from("/tmp/b.pdf")];
        let outcome = scorer
            .invoke(Path::new("/tmp/requirement.txt"), &resumes)
            .await
            .unwrap();

        let lines: Vec<&str> = std::str::from_utf8(&outcome.stdout)
            .unwrap()
            .lines()
            .collect();
        assert_eq!(lines, ["/tmp/requirement.txt", "/tmp/a.pdf", "/tmp/b.pdf"]);
    }

    #[tokio::test]
    async fn test_timeout_is_a_scoring_failure() {
        let dir = tempfile::tempdir().unwrap();
        let scorer = sh_scorer(&dir, "sleep 30", Duration::from_millis(100));

        let err = scorer
            .invoke(Path::new("/dev/null"), &[])
            .await
            .unwrap_err();

        match err {
            AppError::Scorer { details } => assert!(details.contains("timed out")),
            other => panic!("expected Scorer error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unlaunchable_scorer_is_internal_error() {
        let scorer = PythonScorer::new(
            PathBuf::from("/nonexistent/python"),
            PathBuf::from("/nonexistent/script.py"),
            Duration::from_secs(5),
        );

        let err = scorer
            .invoke(Path::new("/dev/null"), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal(_)));
    }
}
