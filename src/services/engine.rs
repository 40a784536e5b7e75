//! Game Engine
//!
//! Owns all live sessions and the cross-session result log. Handles the
//! full round cycle: join, pair statistics, decision evaluation,
//! capital/score bookkeeping, market advancement and leaderboard ranking.
//!
//! Sessions live in a DashMap and every mutation happens under that entry's
//! lock before the whole document is snapshotted to disk, so two players
//! acting at once on the same session cannot overwrite each other's state.

use crate::config::{INITIAL_ASSETS, PREDEFINED_GAME_CODES};
use crate::services::market::{self, round2};
use crate::services::stats;
use crate::services::store::{JsonStore, StoreFile};
use crate::types::{
    Decision, FinalResult, LeaderboardRow, PairStats, Player, Session, TradeAction, NUM_ROUNDS,
};
use chrono::Utc;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Reward per risk point on a successful trade.
const REWARD_PER_RISK: f64 = 1500.0;

/// Penalty per risk point on a failed trade.
const PENALTY_PER_RISK: f64 = 700.0;

/// Score points per 150 dollars of reward.
const SCORE_DIVISOR: f64 = 150.0;

/// Z-score magnitude a trade must clear to succeed.
const Z_THRESHOLD: f64 = 1.0;

/// Game engine errors.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Unknown game code: {0}")]
    UnknownGameCode(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Player name must not be empty")]
    InvalidPlayerName,

    #[error("Invalid asset pair: {0}")]
    InvalidPair(String),

    #[error("Risk level must be 1-10, got {0}")]
    InvalidRiskLevel(u8),

    #[error("All rounds have been played")]
    GameOver,
}

pub type GameResult<T> = std::result::Result<T, GameError>;

/// Pure outcome of one evaluated decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub reward: f64,
    pub penalty: f64,
    pub success: bool,
}

/// Everything a decision submission changed, for the round response.
#[derive(Debug, Clone)]
pub struct DecisionRecorded {
    pub outcome: Outcome,
    pub capital: f64,
    pub score: i64,
    pub penalties: i64,
    pub current_round: u32,
    pub completed: bool,
}

/// A player's view of their own state, with the final summary once the
/// session is complete.
#[derive(Debug, Clone)]
pub struct PlayerView {
    pub player: Player,
    pub completed: bool,
    pub final_result: Option<FinalResult>,
}

/// Judge an action against the observed z-score.
///
/// Deterministic in its inputs: Long pays when the spread is stretched
/// high (z > 1), Short when stretched low (z < -1), Hold never moves
/// capital. Exactly one of reward/penalty is nonzero for a non-Hold action.
pub fn evaluate(action: TradeAction, risk_level: u8, z_score: f64) -> Outcome {
    if action == TradeAction::Hold {
        return Outcome {
            reward: 0.0,
            penalty: 0.0,
            success: false,
        };
    }

    let matched = match action {
        TradeAction::Long => z_score > Z_THRESHOLD,
        TradeAction::Short => z_score < -Z_THRESHOLD,
        TradeAction::Hold => unreachable!(),
    };

    if matched {
        Outcome {
            reward: risk_level as f64 * REWARD_PER_RISK,
            penalty: 0.0,
            success: true,
        }
    } else {
        Outcome {
            reward: 0.0,
            penalty: risk_level as f64 * PENALTY_PER_RISK,
            success: false,
        }
    }
}

/// Rank a session's players by net score, ties broken by capital.
pub fn build_leaderboard(players: &HashMap<String, Player>) -> Vec<LeaderboardRow> {
    let mut rows: Vec<LeaderboardRow> = players
        .iter()
        .map(|(name, player)| LeaderboardRow {
            player: name.clone(),
            score: player.net_score(),
            capital: round2(player.capital),
            penalties: player.penalties,
            decisions_made: player.decisions.len(),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.score.cmp(&a.score).then(
            b.capital
                .partial_cmp(&a.capital)
                .unwrap_or(std::cmp::Ordering::Equal),
        )
    });
    rows
}

/// The shared game engine.
pub struct GameEngine {
    /// Live sessions keyed by game code
    sessions: DashMap<String, Session>,
    /// Finalized results keyed by game code, append-only
    results: DashMap<String, Vec<FinalResult>>,
    /// Disk snapshots of the two documents
    store: Arc<JsonStore>,
}

impl GameEngine {
    /// Load both documents from disk and initialize sessions for any
    /// predefined game code that does not have one yet.
    pub fn new(store: Arc<JsonStore>) -> Arc<Self> {
        let mut session_doc: HashMap<String, Session> = store.load(StoreFile::Sessions);
        let mut result_doc: HashMap<String, Vec<FinalResult>> = store.load(StoreFile::Leaderboards);

        let mut updated = false;
        for game_code in &PREDEFINED_GAME_CODES {
            if !session_doc.contains_key(game_code.code) {
                let assets: Vec<String> = INITIAL_ASSETS.iter().map(|(n, _)| n.to_string()).collect();
                let prices: Vec<f64> = INITIAL_ASSETS.iter().map(|(_, p)| *p).collect();
                let conditions = market::generate_conditions(NUM_ROUNDS);
                session_doc.insert(
                    game_code.code.to_string(),
                    Session::new(assets, prices, conditions),
                );
                info!("Initialized session for game code {}", game_code.code);
                updated = true;
            }
            if !result_doc.contains_key(game_code.code) {
                result_doc.insert(game_code.code.to_string(), Vec::new());
                updated = true;
            }
        }

        let engine = Arc::new(Self {
            sessions: session_doc.into_iter().collect(),
            results: result_doc.into_iter().collect(),
            store,
        });

        if updated {
            engine.snapshot_sessions();
            engine.snapshot_results();
        }

        engine
    }

    /// Write the full session document to disk.
    fn snapshot_sessions(&self) {
        let doc: HashMap<String, Session> = self
            .sessions
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        self.store.save(StoreFile::Sessions, &doc);
    }

    /// Write the full result-log document to disk.
    fn snapshot_results(&self) {
        let doc: HashMap<String, Vec<FinalResult>> = self
            .results
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        self.store.save(StoreFile::Leaderboards, &doc);
    }

    /// A copy of the session for rendering. Full clone; sessions are small.
    pub fn session(&self, code: &str) -> GameResult<Session> {
        self.sessions
            .get(code)
            .map(|s| s.clone())
            .ok_or_else(|| GameError::UnknownGameCode(code.to_string()))
    }

    /// Register a player in a session. Idempotent: re-joining with an
    /// existing name is a no-op. Returns whether the player was new.
    pub fn join(&self, code: &str, name: &str) -> GameResult<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::InvalidPlayerName);
        }

        let joined = {
            let mut session = self
                .sessions
                .get_mut(code)
                .ok_or_else(|| GameError::UnknownGameCode(code.to_string()))?;

            if session.players.contains_key(name) {
                false
            } else {
                session.players.insert(name.to_string(), Player::new());
                true
            }
        };

        if joined {
            info!("Player {} joined game {}", name, code);
            self.snapshot_sessions();
        }
        Ok(joined)
    }

    /// Compute the indicator bundle for an asset pair at the session's
    /// current prices. Fresh noise on every call.
    pub fn pair_stats(
        &self,
        code: &str,
        asset_1: &str,
        asset_2: &str,
    ) -> GameResult<(PairStats, Vec<f64>, Vec<f64>)> {
        let session = self
            .sessions
            .get(code)
            .ok_or_else(|| GameError::UnknownGameCode(code.to_string()))?;

        let (idx_1, idx_2) = resolve_pair(&session, asset_1, asset_2)?;
        stats::compute(&session.asset_prices, idx_1, idx_2)
            .ok_or_else(|| GameError::InvalidPair(format!("{} & {}", asset_1, asset_2)))
    }

    /// Submit one decision for the current round.
    ///
    /// Applies the reward or penalty, records the decision, appends the
    /// round's simulated prices to the history, refreshes the leaderboard
    /// snapshot and advances the round - then snapshots to disk.
    #[allow(clippy::too_many_arguments)]
    pub fn submit_decision(
        &self,
        code: &str,
        name: &str,
        asset_1: &str,
        asset_2: &str,
        action: TradeAction,
        risk_level: u8,
        z_score: f64,
    ) -> GameResult<DecisionRecorded> {
        if !(1..=10).contains(&risk_level) {
            return Err(GameError::InvalidRiskLevel(risk_level));
        }

        let recorded = {
            let mut session = self
                .sessions
                .get_mut(code)
                .ok_or_else(|| GameError::UnknownGameCode(code.to_string()))?;

            if session.is_complete() {
                return Err(GameError::GameOver);
            }
            resolve_pair(&session, asset_1, asset_2)?;
            if !session.players.contains_key(name) {
                return Err(GameError::PlayerNotFound(name.to_string()));
            }

            let round = session.current_round;
            let regime = session
                .current_regime()
                .expect("active session has a scheduled regime");

            let outcome = evaluate(action, risk_level, z_score);

            let player = session
                .players
                .get_mut(name)
                .expect("player presence checked above");
            if outcome.success {
                player.capital += outcome.reward;
                player.score += (outcome.reward / SCORE_DIVISOR) as i64;
            } else if outcome.penalty > 0.0 {
                player.capital -= outcome.penalty;
                player.penalties += outcome.penalty as i64;
            }
            player.capital_history.push(player.capital);
            player.decisions.push(Decision {
                round,
                asset_pair: (asset_1.to_string(), asset_2.to_string()),
                action,
                risk_level,
                reward: outcome.reward,
                penalty: outcome.penalty,
                success: outcome.success,
                timestamp: Utc::now(),
                z_score,
            });

            let capital = player.capital;
            let score = player.score;
            let penalties = player.penalties;

            // Advance the market and extend the per-asset history by one
            // entry for the round just played.
            let next_prices = market::simulate(&session.asset_prices, regime);
            for (i, price) in next_prices.iter().enumerate() {
                let asset = session.assets[i].clone();
                session
                    .asset_price_history
                    .entry(asset)
                    .or_default()
                    .push(*price);
            }
            session.asset_prices = next_prices;

            session.leaderboard = build_leaderboard(&session.players);
            session.current_round += 1;

            DecisionRecorded {
                outcome,
                capital,
                score,
                penalties,
                current_round: session.current_round,
                completed: session.is_complete(),
            }
        };

        self.snapshot_sessions();
        Ok(recorded)
    }

    /// Full recompute of the session ranking from current player state.
    pub fn leaderboard(&self, code: &str) -> GameResult<Vec<LeaderboardRow>> {
        let session = self
            .sessions
            .get(code)
            .ok_or_else(|| GameError::UnknownGameCode(code.to_string()))?;
        Ok(build_leaderboard(&session.players))
    }

    /// A player's own state. Once the session is complete this finalizes
    /// the player into the cross-session log (at most once) and returns
    /// the recorded result.
    pub fn player_view(&self, code: &str, name: &str) -> GameResult<PlayerView> {
        let (player, completed) = {
            let session = self
                .sessions
                .get(code)
                .ok_or_else(|| GameError::UnknownGameCode(code.to_string()))?;
            let player = session
                .players
                .get(name)
                .cloned()
                .ok_or_else(|| GameError::PlayerNotFound(name.to_string()))?;
            (player, session.is_complete())
        };

        let final_result = if completed {
            Some(self.finalize_player(code, name, &player))
        } else {
            None
        };

        Ok(PlayerView {
            player,
            completed,
            final_result,
        })
    }

    /// Append the player's finalized result to the cross-session log,
    /// skipping the append when a result for this player already exists.
    /// The completed view can be rendered any number of times.
    fn finalize_player(&self, code: &str, name: &str, player: &Player) -> FinalResult {
        let mut appended = false;
        let result = {
            let mut log = self.results.entry(code.to_string()).or_default();
            if let Some(existing) = log.iter().find(|r| r.player == name) {
                existing.clone()
            } else {
                let result = FinalResult {
                    player: name.to_string(),
                    final_score: player.net_score(),
                    final_capital: round2(player.capital),
                    date: Utc::now(),
                };
                log.push(result.clone());
                appended = true;
                result
            }
        };

        if appended {
            info!("Finalized {} in game {}", name, code);
            self.snapshot_results();
        }
        result
    }

    /// The append-only result log for a game code.
    pub fn final_results(&self, code: &str) -> GameResult<Vec<FinalResult>> {
        self.results
            .get(code)
            .map(|r| r.clone())
            .ok_or_else(|| GameError::UnknownGameCode(code.to_string()))
    }
}

/// Resolve two asset names to distinct indices in the session's price
/// vector, or fail the request without touching any state.
fn resolve_pair(session: &Session, asset_1: &str, asset_2: &str) -> GameResult<(usize, usize)> {
    let invalid = || GameError::InvalidPair(format!("{} & {}", asset_1, asset_2));
    let idx_1 = session.asset_index(asset_1).ok_or_else(invalid)?;
    let idx_2 = session.asset_index(asset_2).ok_or_else(invalid)?;
    if idx_1 == idx_2 {
        warn!("Rejected pair with identical assets: {}", asset_1);
        return Err(invalid());
    }
    Ok((idx_1, idx_2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::STARTING_CAPITAL;
    use std::fs;
    use std::path::PathBuf;

    struct TestEngine {
        engine: Arc<GameEngine>,
        data_dir: PathBuf,
    }

    impl Drop for TestEngine {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.data_dir);
        }
    }

    fn create_test_engine(name: &str) -> TestEngine {
        let data_dir = PathBuf::from(format!(".test_engine_{}", name));
        if data_dir.exists() {
            let _ = fs::remove_dir_all(&data_dir);
        }
        let store = Arc::new(JsonStore::new(&data_dir));
        TestEngine {
            engine: GameEngine::new(store),
            data_dir,
        }
    }

    #[test]
    fn test_evaluate_long_success() {
        let outcome = evaluate(TradeAction::Long, 5, 1.5);
        assert_eq!(outcome.reward, 7500.0);
        assert_eq!(outcome.penalty, 0.0);
        assert!(outcome.success);
    }

    #[test]
    fn test_evaluate_short_failure() {
        let outcome = evaluate(TradeAction::Short, 5, 1.5);
        assert_eq!(outcome.reward, 0.0);
        assert_eq!(outcome.penalty, 3500.0);
        assert!(!outcome.success);
    }

    #[test]
    fn test_evaluate_hold() {
        let outcome = evaluate(TradeAction::Hold, 5, 1.5);
        assert_eq!(outcome.reward, 0.0);
        assert_eq!(outcome.penalty, 0.0);
        assert!(!outcome.success);
    }

    #[test]
    fn test_evaluate_threshold_is_exclusive() {
        // z exactly at the threshold does not pay.
        assert!(!evaluate(TradeAction::Long, 5, 1.0).success);
        assert!(!evaluate(TradeAction::Short, 5, -1.0).success);
        assert!(evaluate(TradeAction::Short, 5, -1.01).success);
    }

    #[test]
    fn test_evaluate_exclusivity() {
        for (action, z) in [
            (TradeAction::Long, 2.0),
            (TradeAction::Long, 0.0),
            (TradeAction::Short, -2.0),
            (TradeAction::Short, 0.0),
        ] {
            let outcome = evaluate(action, 7, z);
            assert!(
                (outcome.reward > 0.0) ^ (outcome.penalty > 0.0),
                "exactly one of reward/penalty must be nonzero for {:?} z={}",
                action,
                z
            );
        }
    }

    #[test]
    fn test_engine_initializes_predefined_sessions() {
        let t = create_test_engine("init");
        for game_code in &PREDEFINED_GAME_CODES {
            let session = t.engine.session(game_code.code).unwrap();
            assert_eq!(session.current_round, 1);
            assert_eq!(session.num_rounds, NUM_ROUNDS);
            assert_eq!(session.assets.len(), 5);
            assert_eq!(session.market_conditions.len(), NUM_ROUNDS as usize);
            assert!(t.engine.final_results(game_code.code).unwrap().is_empty());
        }
    }

    #[test]
    fn test_unknown_game_code() {
        let t = create_test_engine("unknown");
        assert!(matches!(
            t.engine.session("NOPE"),
            Err(GameError::UnknownGameCode(_))
        ));
    }

    #[test]
    fn test_join_is_idempotent() {
        let t = create_test_engine("join");
        assert!(t.engine.join("GROUPA", "alice").unwrap());
        assert!(!t.engine.join("GROUPA", "alice").unwrap());

        let session = t.engine.session("GROUPA").unwrap();
        assert_eq!(session.players.len(), 1);
        assert_eq!(session.players["alice"].capital, STARTING_CAPITAL);
    }

    #[test]
    fn test_join_rejects_blank_name() {
        let t = create_test_engine("blank");
        assert!(matches!(
            t.engine.join("GROUPA", "   "),
            Err(GameError::InvalidPlayerName)
        ));
    }

    #[test]
    fn test_decision_updates_player_and_round() {
        let t = create_test_engine("decision");
        t.engine.join("GROUPA", "alice").unwrap();

        let recorded = t
            .engine
            .submit_decision("GROUPA", "alice", "Asset A", "Asset B", TradeAction::Long, 5, 1.5)
            .unwrap();
        assert!(recorded.outcome.success);
        assert_eq!(recorded.capital, STARTING_CAPITAL + 7500.0);
        assert_eq!(recorded.score, 50);
        assert_eq!(recorded.current_round, 2);
        assert!(!recorded.completed);

        let session = t.engine.session("GROUPA").unwrap();
        let player = &session.players["alice"];
        assert_eq!(player.decisions.len(), 1);
        assert_eq!(player.capital_history.len(), 2);
        assert_eq!(player.decisions[0].round, 1);
        assert_eq!(player.decisions[0].z_score, 1.5);
    }

    #[test]
    fn test_hold_leaves_capital_unchanged() {
        let t = create_test_engine("hold");
        t.engine.join("GROUPA", "alice").unwrap();

        let recorded = t
            .engine
            .submit_decision("GROUPA", "alice", "Asset A", "Asset B", TradeAction::Hold, 5, 1.5)
            .unwrap();
        assert_eq!(recorded.capital, STARTING_CAPITAL);
        assert_eq!(recorded.score, 0);
        assert_eq!(recorded.penalties, 0);
        // Hold still consumes the round and extends the history.
        assert_eq!(recorded.current_round, 2);

        let session = t.engine.session("GROUPA").unwrap();
        assert_eq!(session.players["alice"].capital_history.len(), 2);
    }

    #[test]
    fn test_penalty_accumulates() {
        let t = create_test_engine("penalty");
        t.engine.join("GROUPA", "bob").unwrap();

        t.engine
            .submit_decision("GROUPA", "bob", "Asset A", "Asset B", TradeAction::Long, 4, 0.0)
            .unwrap();
        let recorded = t
            .engine
            .submit_decision("GROUPA", "bob", "Asset A", "Asset B", TradeAction::Long, 6, 0.0)
            .unwrap();

        assert_eq!(recorded.penalties, 4 * 700 + 6 * 700);
        assert_eq!(recorded.capital, STARTING_CAPITAL - 2800.0 - 4200.0);
    }

    #[test]
    fn test_history_invariant_across_rounds() {
        let t = create_test_engine("history");
        t.engine.join("GROUPA", "alice").unwrap();

        for i in 0..5 {
            t.engine
                .submit_decision(
                    "GROUPA",
                    "alice",
                    "Asset B",
                    "Asset D",
                    TradeAction::Long,
                    3,
                    if i % 2 == 0 { 1.5 } else { -0.5 },
                )
                .unwrap();
            let session = t.engine.session("GROUPA").unwrap();
            let player = &session.players["alice"];
            assert_eq!(player.capital_history.len(), player.decisions.len() + 1);
        }
    }

    #[test]
    fn test_price_history_grows_once_per_round() {
        let t = create_test_engine("prices");
        t.engine.join("GROUPA", "alice").unwrap();

        t.engine
            .submit_decision("GROUPA", "alice", "Asset A", "Asset B", TradeAction::Hold, 1, 0.0)
            .unwrap();
        t.engine
            .submit_decision("GROUPA", "alice", "Asset A", "Asset B", TradeAction::Hold, 1, 0.0)
            .unwrap();

        let session = t.engine.session("GROUPA").unwrap();
        for asset in &session.assets {
            assert_eq!(session.asset_price_history[asset].len(), 3);
        }
        // The latest history entry is the current price vector.
        for (i, asset) in session.assets.iter().enumerate() {
            assert_eq!(
                *session.asset_price_history[asset].last().unwrap(),
                session.asset_prices[i]
            );
        }
    }

    #[test]
    fn test_market_conditions_frozen() {
        let t = create_test_engine("frozen");
        t.engine.join("GROUPA", "alice").unwrap();

        let before = t.engine.session("GROUPA").unwrap().market_conditions;
        t.engine
            .submit_decision("GROUPA", "alice", "Asset A", "Asset B", TradeAction::Hold, 1, 0.0)
            .unwrap();
        let after = t.engine.session("GROUPA").unwrap().market_conditions;
        assert_eq!(before, after);
    }

    #[test]
    fn test_invalid_pair_commits_nothing() {
        let t = create_test_engine("invalid_pair");
        t.engine.join("GROUPA", "alice").unwrap();

        for (a, b) in [("Asset A", "Asset A"), ("Asset A", "Asset Z")] {
            assert!(matches!(
                t.engine
                    .submit_decision("GROUPA", "alice", a, b, TradeAction::Long, 5, 2.0),
                Err(GameError::InvalidPair(_))
            ));
        }

        let session = t.engine.session("GROUPA").unwrap();
        assert_eq!(session.current_round, 1);
        assert!(session.players["alice"].decisions.is_empty());
    }

    #[test]
    fn test_invalid_risk_level() {
        let t = create_test_engine("risk");
        t.engine.join("GROUPA", "alice").unwrap();
        for risk in [0, 11] {
            assert!(matches!(
                t.engine
                    .submit_decision("GROUPA", "alice", "Asset A", "Asset B", TradeAction::Long, risk, 2.0),
                Err(GameError::InvalidRiskLevel(_))
            ));
        }
    }

    fn play_out_session(t: &TestEngine, code: &str, name: &str) {
        for _ in 0..NUM_ROUNDS {
            t.engine
                .submit_decision(code, name, "Asset A", "Asset B", TradeAction::Long, 5, 1.5)
                .unwrap();
        }
    }

    #[test]
    fn test_session_completes_after_all_rounds() {
        let t = create_test_engine("complete");
        t.engine.join("FINANCE2024", "alice").unwrap();
        play_out_session(&t, "FINANCE2024", "alice");

        let session = t.engine.session("FINANCE2024").unwrap();
        assert_eq!(session.current_round, NUM_ROUNDS + 1);
        assert!(session.is_complete());

        assert!(matches!(
            t.engine.submit_decision(
                "FINANCE2024",
                "alice",
                "Asset A",
                "Asset B",
                TradeAction::Long,
                5,
                1.5
            ),
            Err(GameError::GameOver)
        ));
    }

    #[test]
    fn test_finalization_is_idempotent() {
        let t = create_test_engine("finalize");
        t.engine.join("ARBITRAGEX", "alice").unwrap();
        play_out_session(&t, "ARBITRAGEX", "alice");

        let first = t.engine.player_view("ARBITRAGEX", "alice").unwrap();
        assert!(first.completed);
        let result = first.final_result.unwrap();
        assert_eq!(result.final_score, 15 * 50);

        // Revisiting the completed view must not append a duplicate.
        let _ = t.engine.player_view("ARBITRAGEX", "alice").unwrap();
        let _ = t.engine.player_view("ARBITRAGEX", "alice").unwrap();
        let log = t.engine.final_results("ARBITRAGEX").unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].player, "alice");
    }

    #[test]
    fn test_player_view_before_completion_has_no_result() {
        let t = create_test_engine("view");
        t.engine.join("GROUPA", "alice").unwrap();
        let view = t.engine.player_view("GROUPA", "alice").unwrap();
        assert!(!view.completed);
        assert!(view.final_result.is_none());
        assert!(t.engine.final_results("GROUPA").unwrap().is_empty());
    }

    #[test]
    fn test_leaderboard_ordering() {
        let mut players = HashMap::new();
        let mut winner = Player::new();
        winner.score = 100;
        winner.penalties = 10;
        let mut rich_loser = Player::new();
        rich_loser.score = 50;
        rich_loser.capital = 500_000.0;
        let mut poor_loser = Player::new();
        poor_loser.score = 50;
        poor_loser.capital = 100_000.0;
        players.insert("winner".to_string(), winner);
        players.insert("rich".to_string(), rich_loser);
        players.insert("poor".to_string(), poor_loser);

        let rows = build_leaderboard(&players);
        assert_eq!(rows[0].player, "winner");
        assert_eq!(rows[0].score, 90);
        assert_eq!(rows[1].player, "rich");
        assert_eq!(rows[2].player, "poor");
    }

    #[test]
    fn test_leaderboard_snapshot_refreshed_on_decision() {
        let t = create_test_engine("snapshot");
        t.engine.join("GROUPA", "alice").unwrap();
        t.engine.join("GROUPA", "bob").unwrap();

        t.engine
            .submit_decision("GROUPA", "alice", "Asset A", "Asset B", TradeAction::Long, 10, 2.0)
            .unwrap();

        let session = t.engine.session("GROUPA").unwrap();
        assert_eq!(session.leaderboard.len(), 2);
        assert_eq!(session.leaderboard[0].player, "alice");
    }

    #[test]
    fn test_state_survives_reload() {
        let data_dir = PathBuf::from(".test_engine_reload");
        if data_dir.exists() {
            let _ = fs::remove_dir_all(&data_dir);
        }

        {
            let engine = GameEngine::new(Arc::new(JsonStore::new(&data_dir)));
            engine.join("GROUPA", "alice").unwrap();
            engine
                .submit_decision("GROUPA", "alice", "Asset A", "Asset B", TradeAction::Long, 5, 1.5)
                .unwrap();
        }

        let engine = GameEngine::new(Arc::new(JsonStore::new(&data_dir)));
        let session = engine.session("GROUPA").unwrap();
        assert_eq!(session.current_round, 2);
        assert_eq!(session.players["alice"].score, 50);

        let _ = fs::remove_dir_all(&data_dir);
    }
}
