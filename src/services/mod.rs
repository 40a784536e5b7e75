pub mod engine;
pub mod market;
pub mod stats;
pub mod store;

pub use engine::{
    build_leaderboard, evaluate, DecisionRecorded, GameEngine, GameError, GameResult, Outcome,
    PlayerView,
};
pub use store::{JsonStore, StoreFile};
