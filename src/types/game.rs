//! Game Types
//!
//! Types for the arbitrage game engine: sessions, players, decisions and
//! leaderboards. All of these serialize directly into the JSON stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Starting capital for every player.
pub const STARTING_CAPITAL: f64 = 200_000.0;

/// Number of rounds in a session.
pub const NUM_ROUNDS: u32 = 15;

// =============================================================================
// Enums
// =============================================================================

/// Player action for a single round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeAction {
    /// Bet that the spread widens (asset 1 outperforms)
    Long,
    /// Bet that the spread narrows (asset 1 underperforms)
    Short,
    /// Sit the round out
    Hold,
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeAction::Long => write!(f, "long"),
            TradeAction::Short => write!(f, "short"),
            TradeAction::Hold => write!(f, "hold"),
        }
    }
}

/// Market regime for a round. Drives the simulator's perturbation range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketRegime {
    Stable,
    Volatile,
    Bull,
    Bear,
}

impl MarketRegime {
    /// Human-readable label shown to players.
    pub fn label(&self) -> &'static str {
        match self {
            MarketRegime::Stable => "Stable Market",
            MarketRegime::Volatile => "Volatile Market",
            MarketRegime::Bull => "Bull Market",
            MarketRegime::Bear => "Bear Market",
        }
    }
}

impl std::fmt::Display for MarketRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// =============================================================================
// Records
// =============================================================================

/// One evaluated decision. Immutable once appended to a player's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    /// Round the decision was made in (1-based)
    pub round: u32,
    /// The two asset names the player traded the spread of
    pub asset_pair: (String, String),
    pub action: TradeAction,
    /// Risk level 1-10, scales reward and penalty
    pub risk_level: u8,
    /// Payout on success (0 otherwise)
    pub reward: f64,
    /// Loss on failure (0 otherwise)
    pub penalty: f64,
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    /// The z-score the action was judged against
    pub z_score: f64,
}

/// Per-session player state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub capital: f64,
    pub score: i64,
    /// Cumulative penalty magnitude, not a count
    pub penalties: i64,
    pub decisions: Vec<Decision>,
    /// Capital after each round, starting with the initial stake.
    /// Always exactly one entry longer than `decisions`.
    pub capital_history: Vec<f64>,
}

impl Player {
    pub fn new() -> Self {
        Self {
            capital: STARTING_CAPITAL,
            score: 0,
            penalties: 0,
            decisions: Vec::new(),
            capital_history: vec![STARTING_CAPITAL],
        }
    }

    /// Net score used for ranking: score minus cumulative penalties.
    pub fn net_score(&self) -> i64 {
        self.score - self.penalties
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// Ranked leaderboard row, derived from player state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub player: String,
    /// Net score (score - penalties)
    pub score: i64,
    pub capital: f64,
    pub penalties: i64,
    pub decisions_made: usize,
}

/// Finalized result appended to the cross-session leaderboard log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalResult {
    pub player: String,
    pub final_score: i64,
    pub final_capital: f64,
    pub date: DateTime<Utc>,
}

// =============================================================================
// Session
// =============================================================================

/// A shared game session, keyed by game code in the session store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub players: HashMap<String, Player>,
    /// 1-based; the session is complete once this exceeds `num_rounds`
    pub current_round: u32,
    pub num_rounds: u32,
    pub assets: Vec<String>,
    /// Current price per asset, same order as `assets`
    pub asset_prices: Vec<f64>,
    /// One price per played round per asset, append-only
    pub asset_price_history: HashMap<String, Vec<f64>>,
    /// Regime per round, frozen at session creation
    pub market_conditions: Vec<MarketRegime>,
    /// Snapshot of the ranking, recomputed on every decision
    pub leaderboard: Vec<LeaderboardRow>,
}

impl Session {
    /// Create a fresh session with the given assets and regime schedule.
    pub fn new(assets: Vec<String>, prices: Vec<f64>, conditions: Vec<MarketRegime>) -> Self {
        debug_assert_eq!(assets.len(), prices.len());
        let asset_price_history = assets
            .iter()
            .cloned()
            .zip(prices.iter().map(|p| vec![*p]))
            .collect();

        Self {
            players: HashMap::new(),
            current_round: 1,
            num_rounds: conditions.len() as u32,
            assets,
            asset_prices: prices,
            asset_price_history,
            market_conditions: conditions,
            leaderboard: Vec::new(),
        }
    }

    /// Whether all rounds have been played.
    pub fn is_complete(&self) -> bool {
        self.current_round > self.num_rounds
    }

    /// Regime scheduled for the current round, `None` once complete.
    pub fn current_regime(&self) -> Option<MarketRegime> {
        if self.is_complete() {
            return None;
        }
        self.market_conditions
            .get(self.current_round as usize - 1)
            .copied()
    }

    /// Resolve an asset name to its index in the price vector.
    pub fn asset_index(&self, name: &str) -> Option<usize> {
        self.assets.iter().position(|a| a == name)
    }
}
