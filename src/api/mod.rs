pub mod game;
pub mod health;
pub mod leaderboard;

use crate::AppState;
use axum::Router;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/games", game::router())
        .nest("/api/leaderboards", leaderboard::router())
}
