//! Axum route handler for the matching endpoint.

use axum::{extract::State, Json};
use serde_json::Value;

use crate::errors::AppError;
use crate::ranking::{rank_resumes, RankRequest};
use crate::state::AppState;

/// POST /match-resumes
///
/// Body: `{ "requirement": string, "resumes": [string, ...] }`.
/// Returns the scorer's decoded JSON verbatim on success.
///
/// The body is validated by hand (rather than deserialized into a typed
/// struct) so that a malformed shape always yields the fixed 400 body the
/// frontend matches on, never the extractor's default rejection.
pub async fn handle_match_resumes(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let request = parse_request(&body)?;
    let result = rank_resumes(&state, request).await?;
    Ok(Json(result))
}

/// Shape validation: `requirement` must be a non-blank string, `resumes` a
/// non-empty array of strings. Runs before any filesystem or subprocess
/// activity.
fn parse_request(body: &Value) -> Result<RankRequest, AppError> {
    let requirement = body
        .get("requirement")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or(AppError::Validation)?;

    let resumes = body
        .get("resumes")
        .and_then(Value::as_array)
        .filter(|a| !a.is_empty())
        .ok_or(AppError::Validation)?;

    let resume_names = resumes
        .iter()
        .map(|v| v.as_str().map(str::to_owned).ok_or(AppError::Validation))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RankRequest {
        requirement: requirement.to_string(),
        resume_names,
    })
}
