//! Resume ranking: stages request inputs into an isolated workspace, runs
//! the external scorer against them, decodes its JSON output, and tears the
//! workspace down whatever happens.

pub mod handlers;
pub mod scorer;
pub mod workspace;

use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;
use self::workspace::Workspace;

/// A validated ranking request: non-empty requirement text plus a non-empty
/// list of resume filenames.
#[derive(Debug)]
pub struct RankRequest {
    pub requirement: String,
    pub resume_names: Vec<String>,
}

/// Runs one ranking request end to end.
///
/// The workspace is torn down on every exit path: explicitly (with logging)
/// on the paths below, by its drop guard if this future is cancelled or
/// panics. Concurrent requests never share state — each call stages its own
/// uniquely-named workspace.
pub async fn rank_resumes(state: &AppState, request: RankRequest) -> Result<Value, AppError> {
    let workspace = Workspace::stage(
        &request.requirement,
        &request.resume_names,
        &state.config.resume_storage_dir,
    )
    .await?;

    let result = score_and_decode(state, &workspace).await;
    workspace.close();
    result
}

async fn score_and_decode(state: &AppState, workspace: &Workspace) -> Result<Value, AppError> {
    // Only successfully copied resumes are passed on; skipped ones were
    // already warned about during staging.
    let resumes = workspace.copied_resumes().await?;
    info!(resumes = resumes.len(), "Invoking scorer");

    let outcome = state
        .scorer
        .invoke(workspace.requirement_file(), &resumes)
        .await?;

    if !outcome.success() {
        return Err(AppError::scorer_failure(&outcome.stderr));
    }

    // Pass the decoded value through verbatim. The scorer's output keys
    // results by filename, so callers never rely on positional order.
    serde_json::from_slice(&outcome.stdout).map_err(|_| AppError::Decode)
}
