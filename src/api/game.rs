//! Game API
//!
//! Endpoints for the round-based arbitrage game:
//!
//! - GET  /api/games - list predefined game codes
//! - GET  /api/games/:code - session overview (round, prices, regime, ranking)
//! - POST /api/games/:code/join - register a player
//! - GET  /api/games/:code/players/:name - player state / game-over summary
//! - GET  /api/games/:code/pairs/:asset_1/:asset_2/stats - pair statistics
//! - POST /api/games/:code/players/:name/decisions - submit one decision
//! - GET  /api/games/:code/leaderboard - current session ranking

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::config::{Config, PREDEFINED_GAME_CODES};
use crate::services::GameError;
use crate::types::{
    Decision, FinalResult, LeaderboardRow, MarketRegime, PairStats, TradeAction,
};
use crate::AppState;

/// Create the game router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_games))
        .route("/:code", get(get_session))
        .route("/:code/join", post(join_game))
        .route("/:code/leaderboard", get(get_leaderboard))
        .route("/:code/players/:name", get(get_player))
        .route("/:code/players/:name/decisions", post(submit_decision))
        .route("/:code/pairs/:asset_1/:asset_2/stats", get(get_pair_stats))
}

// =============================================================================
// Response Types
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Convert GameError to HTTP response.
impl IntoResponse for GameError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = match &self {
            GameError::UnknownGameCode(_) => (StatusCode::NOT_FOUND, "GAME_NOT_FOUND"),
            GameError::PlayerNotFound(_) => (StatusCode::NOT_FOUND, "PLAYER_NOT_FOUND"),
            GameError::InvalidPlayerName => (StatusCode::BAD_REQUEST, "INVALID_PLAYER_NAME"),
            GameError::InvalidPair(_) => (StatusCode::BAD_REQUEST, "INVALID_PAIR"),
            GameError::InvalidRiskLevel(_) => (StatusCode::BAD_REQUEST, "INVALID_RISK_LEVEL"),
            GameError::GameOver => (StatusCode::CONFLICT, "GAME_OVER"),
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct GameCodeEntry {
    pub code: &'static str,
    pub description: &'static str,
    pub created_at: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub code: String,
    pub description: Option<&'static str>,
    pub current_round: u32,
    pub num_rounds: u32,
    pub completed: bool,
    /// Regime of the round in progress, absent once the game is over
    pub market_condition: Option<MarketRegime>,
    pub assets: Vec<String>,
    pub asset_prices: Vec<f64>,
    pub asset_price_history: std::collections::HashMap<String, Vec<f64>>,
    pub players: Vec<String>,
    pub leaderboard: Vec<LeaderboardRow>,
}

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct JoinResponse {
    pub joined: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct PlayerResponse {
    pub name: String,
    pub capital: f64,
    pub score: i64,
    pub penalties: i64,
    pub net_score: i64,
    pub decisions: Vec<Decision>,
    pub capital_history: Vec<f64>,
    pub completed: bool,
    /// Present (and recorded in the global log) once the game is over
    pub final_result: Option<FinalResult>,
}

#[derive(Debug, Serialize)]
pub struct PairStatsResponse {
    pub asset_pair: (String, String),
    pub stats: PairStats,
    pub series_1: Vec<f64>,
    pub series_2: Vec<f64>,
}

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub asset_pair: (String, String),
    pub action: TradeAction,
    pub risk_level: u8,
    /// The z-score shown for the pair when the player decided
    pub z_score: f64,
}

#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    pub success: bool,
    pub reward: f64,
    pub penalty: f64,
    pub capital: f64,
    pub score: i64,
    pub penalties: i64,
    pub current_round: u32,
    pub completed: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// List the predefined game codes.
async fn list_games() -> Json<Vec<GameCodeEntry>> {
    let games = PREDEFINED_GAME_CODES
        .iter()
        .map(|gc| GameCodeEntry {
            code: gc.code,
            description: gc.description,
            created_at: gc.created_at,
        })
        .collect();
    Json(games)
}

/// Session overview for rendering the round.
async fn get_session(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<SessionResponse>, GameError> {
    let session = state.engine.session(&code)?;

    let mut players: Vec<String> = session.players.keys().cloned().collect();
    players.sort();

    Ok(Json(SessionResponse {
        description: Config::find_game_code(&code).map(|gc| gc.description),
        current_round: session.current_round,
        num_rounds: session.num_rounds,
        completed: session.is_complete(),
        market_condition: session.current_regime(),
        assets: session.assets,
        asset_prices: session.asset_prices,
        asset_price_history: session.asset_price_history,
        players,
        leaderboard: session.leaderboard,
        code,
    }))
}

/// Register a player in a session (idempotent).
async fn join_game(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(req): Json<JoinRequest>,
) -> Result<Json<JoinResponse>, GameError> {
    let joined = state.engine.join(&code, &req.name)?;
    let message = if joined {
        format!("Joined game '{}' as '{}'", code, req.name.trim())
    } else {
        format!("Already in game '{}'", code)
    };
    Ok(Json(JoinResponse { joined, message }))
}

/// A player's own state. Viewing a completed game finalizes the player
/// into the global leaderboard log (at most once).
async fn get_player(
    State(state): State<AppState>,
    Path((code, name)): Path<(String, String)>,
) -> Result<Json<PlayerResponse>, GameError> {
    let view = state.engine.player_view(&code, &name)?;

    Ok(Json(PlayerResponse {
        name,
        capital: view.player.capital,
        score: view.player.score,
        penalties: view.player.penalties,
        net_score: view.player.net_score(),
        decisions: view.player.decisions,
        capital_history: view.player.capital_history,
        completed: view.completed,
        final_result: view.final_result,
    }))
}

/// Statistics for an asset pair at the current prices. Non-deterministic:
/// every call draws fresh correlated noise.
async fn get_pair_stats(
    State(state): State<AppState>,
    Path((code, asset_1, asset_2)): Path<(String, String, String)>,
) -> Result<Json<PairStatsResponse>, GameError> {
    let (stats, series_1, series_2) = state.engine.pair_stats(&code, &asset_1, &asset_2)?;

    Ok(Json(PairStatsResponse {
        asset_pair: (asset_1, asset_2),
        stats,
        series_1,
        series_2,
    }))
}

/// Submit one decision for the current round.
async fn submit_decision(
    State(state): State<AppState>,
    Path((code, name)): Path<(String, String)>,
    Json(req): Json<DecisionRequest>,
) -> Result<Json<DecisionResponse>, GameError> {
    let recorded = state.engine.submit_decision(
        &code,
        &name,
        &req.asset_pair.0,
        &req.asset_pair.1,
        req.action,
        req.risk_level,
        req.z_score,
    )?;

    Ok(Json(DecisionResponse {
        success: recorded.outcome.success,
        reward: recorded.outcome.reward,
        penalty: recorded.outcome.penalty,
        capital: recorded.capital,
        score: recorded.score,
        penalties: recorded.penalties,
        current_round: recorded.current_round,
        completed: recorded.completed,
    }))
}

/// Current session ranking, recomputed from player state.
async fn get_leaderboard(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Vec<LeaderboardRow>>, GameError> {
    Ok(Json(state.engine.leaderboard(&code)?))
}
