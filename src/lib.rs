//! Showdown - turn-based statistical arbitrage trading game server
//!
//! Players join a shared game code, read simulated pair statistics each
//! round and go long, short or hold against the spread z-score. The engine
//! keeps score, advances a regime-driven market and persists everything to
//! two JSON documents between interactions.

pub mod api;
pub mod config;
pub mod services;
pub mod types;

use crate::config::Config;
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub engine: Arc<GameEngine>,
}

// Re-export commonly used types
pub use services::{evaluate, GameEngine, GameError, JsonStore, Outcome};
pub use types::*;
