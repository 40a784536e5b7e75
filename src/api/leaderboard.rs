//! Leaderboard Log API
//!
//! - GET /api/leaderboards/:code - cross-session finalized results

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::services::GameError;
use crate::types::FinalResult;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:code", get(get_final_results))
}

/// The append-only log of finalized results for a game code. Outlives the
/// live session state.
async fn get_final_results(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Vec<FinalResult>>, GameError> {
    Ok(Json(state.engine.final_results(&code)?))
}
