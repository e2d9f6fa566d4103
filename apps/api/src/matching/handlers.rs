//! Axum route handlers for the Job-Match API.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Local;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::job_match::EnrichedJobMatch;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GenerateMatchesResponse {
    pub message: String,
    pub matches_count: usize,
}

/// POST /matches/generate/:user_id
///
/// Rescores the user against every posting open today and replaces their stored matches.
pub async fn handle_generate_matches(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<GenerateMatchesResponse>, AppError> {
    let today = Local::now().date_naive();
    let summary = state.generator.generate(user_id, today).await?;

    let message = if summary.matches_count > 0 {
        "Job matches generated successfully!"
    } else {
        "No suitable job matches found"
    };

    Ok(Json(GenerateMatchesResponse {
        message: message.to_string(),
        matches_count: summary.matches_count,
    }))
}

/// GET /matches/user/:user_id
pub async fn handle_get_user_matches(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<EnrichedJobMatch>>, AppError> {
    let matches = state.generator.user_matches(user_id).await?;
    Ok(Json(matches))
}
