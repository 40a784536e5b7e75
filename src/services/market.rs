//! Market Simulator
//!
//! Regime-conditioned random walk over the session's asset prices, plus the
//! regime schedule drawn once at session creation.

use crate::types::MarketRegime;
use rand::distributions::WeightedIndex;
use rand::prelude::*;

/// Categorical weights for the per-round regime draw.
const REGIME_WEIGHTS: [(MarketRegime, f64); 4] = [
    (MarketRegime::Stable, 0.3),
    (MarketRegime::Volatile, 0.4),
    (MarketRegime::Bull, 0.2),
    (MarketRegime::Bear, 0.1),
];

/// Round a price to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage-change bounds for one round under the given regime.
fn change_range(regime: MarketRegime) -> (f64, f64) {
    match regime {
        MarketRegime::Bull => (0.05, 0.15),
        MarketRegime::Bear => (-0.15, -0.05),
        MarketRegime::Volatile => (-0.20, 0.20),
        MarketRegime::Stable => (-0.03, 0.03),
    }
}

/// Advance all prices by one round.
///
/// Each price moves independently by a uniform percentage drawn from the
/// regime's range. No floor is enforced: a long bear run can push prices
/// toward zero.
pub fn simulate(prices: &[f64], regime: MarketRegime) -> Vec<f64> {
    let mut rng = rand::thread_rng();
    let (lo, hi) = change_range(regime);

    prices
        .iter()
        .map(|price| {
            let change = rng.gen_range(lo..hi);
            round2(price * (1.0 + change))
        })
        .collect()
}

/// Draw the full regime schedule for a session. Frozen once generated.
pub fn generate_conditions(num_rounds: u32) -> Vec<MarketRegime> {
    let mut rng = rand::thread_rng();
    let dist = WeightedIndex::new(REGIME_WEIGHTS.iter().map(|(_, w)| *w))
        .expect("static regime weights are valid");

    (0..num_rounds)
        .map(|_| REGIME_WEIGHTS[dist.sample(&mut rng)].0)
        .collect()
}
