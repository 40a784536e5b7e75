//! Signal Types
//!
//! Statistical indicator bundle computed for a selected asset pair.

use serde::{Deserialize, Serialize};

/// Indicator bundle for one asset pair, all values rounded to 2 decimals.
///
/// Derived from a synthesized 30-sample correlated price history, so two
/// calls with the same inputs produce different (but plausible) numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairStats {
    /// 5-sample moving average of series 1
    pub ma_short_1: f64,
    /// 20-sample moving average of series 1
    pub ma_long_1: f64,
    pub ma_short_2: f64,
    pub ma_long_2: f64,
    /// Pearson correlation between the two series
    pub correlation: f64,
    /// Standardized distance of the latest spread from its mean
    pub z_score: f64,
    pub bollinger_upper: f64,
    pub bollinger_lower: f64,
    pub rsi: f64,
    /// MACD line: EMA(12) - EMA(26) of series 1
    pub macd: f64,
    /// Signal line: EMA(9) of the MACD series
    pub signal: f64,
    pub macd_hist: f64,
}
