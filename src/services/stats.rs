//! Pair Statistics
//!
//! Synthesizes a 30-sample correlated price history for a selected asset
//! pair and derives the indicator bundle players trade against: moving
//! averages, spread z-score, Bollinger bands, RSI and MACD.
//!
//! Every call draws a fresh correlation and fresh samples, so repeated
//! calls with identical inputs return different statistics. That is the
//! intended behavior: each render of a round shows new market noise.

use crate::services::market::round2;
use crate::types::PairStats;
use rand::prelude::*;
use rand_distr::Normal;

/// Length of the synthesized price history.
const SAMPLES: usize = 30;

/// Standard deviation of both synthesized series.
const SERIES_STD: f64 = 5.0;

const MA_SHORT: usize = 5;
const MA_LONG: usize = 20;
const RSI_PERIOD: usize = 14;
const MACD_FAST: usize = 12;
const MACD_SLOW: usize = 26;
const MACD_SIGNAL: usize = 9;

/// Compute the indicator bundle for the pair at `idx_1`/`idx_2`.
///
/// Returns the statistics plus the two synthesized series (for charting).
/// `None` when the indices do not name two distinct assets in `prices`.
pub fn compute(prices: &[f64], idx_1: usize, idx_2: usize) -> Option<(PairStats, Vec<f64>, Vec<f64>)> {
    if idx_1 == idx_2 || idx_1 >= prices.len() || idx_2 >= prices.len() {
        return None;
    }

    let (series_1, series_2) = sample_correlated_series(prices[idx_1], prices[idx_2]);

    let ma_short_1 = mean(&series_1[SAMPLES - MA_SHORT..]);
    let ma_long_1 = mean(&series_1[SAMPLES - MA_LONG..]);
    let ma_short_2 = mean(&series_2[SAMPLES - MA_SHORT..]);
    let ma_long_2 = mean(&series_2[SAMPLES - MA_LONG..]);

    let correlation = pearson(&series_1, &series_2);

    let spread: Vec<f64> = series_1
        .iter()
        .zip(series_2.iter())
        .map(|(a, b)| a - b)
        .collect();
    let std_spread = std_dev(&spread);
    let z_score = spread_z_score(&spread);

    let bollinger_upper = ma_long_1 + 2.0 * std_spread;
    let bollinger_lower = ma_long_1 - 2.0 * std_spread;

    let rsi = rsi(&series_1);

    let (macd, signal, macd_hist) = macd(&series_1);

    let stats = PairStats {
        ma_short_1: round2(ma_short_1),
        ma_long_1: round2(ma_long_1),
        ma_short_2: round2(ma_short_2),
        ma_long_2: round2(ma_long_2),
        correlation: round2(correlation),
        z_score: round2(z_score),
        bollinger_upper: round2(bollinger_upper),
        bollinger_lower: round2(bollinger_lower),
        rsi: round2(rsi),
        macd: round2(macd),
        signal: round2(signal),
        macd_hist: round2(macd_hist),
    };

    Some((stats, series_1, series_2))
}

/// Draw two correlated series around the pair's current prices.
///
/// Correlation is drawn high (0.5-0.95) so the pair usually looks like a
/// plausible arbitrage candidate. Uses the Cholesky form of a bivariate
/// Gaussian with equal standard deviations.
fn sample_correlated_series(base_1: f64, base_2: f64) -> (Vec<f64>, Vec<f64>) {
    let mut rng = rand::thread_rng();
    let rho: f64 = rng.gen_range(0.5..0.95);
    let unit = Normal::new(0.0, 1.0).expect("unit normal parameters are valid");
    let cross = (1.0 - rho * rho).sqrt();

    let mut series_1 = Vec::with_capacity(SAMPLES);
    let mut series_2 = Vec::with_capacity(SAMPLES);
    for _ in 0..SAMPLES {
        let z1 = unit.sample(&mut rng);
        let z2 = unit.sample(&mut rng);
        series_1.push(base_1 + SERIES_STD * z1);
        series_2.push(base_2 + SERIES_STD * (rho * z1 + cross * z2));
    }

    (series_1, series_2)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Standardized distance of the latest spread value from the spread mean.
/// Zero when the spread has no variance.
fn spread_z_score(spread: &[f64]) -> f64 {
    let std = std_dev(spread);
    if std == 0.0 {
        return 0.0;
    }
    let last = match spread.last() {
        Some(v) => *v,
        None => return 0.0,
    };
    (last - mean(spread)) / std
}

/// Pearson correlation coefficient between two equal-length series.
fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let mx = mean(xs);
    let my = mean(ys);

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        cov += (x - mx) * (y - my);
        var_x += (x - mx).powi(2);
        var_y += (y - my).powi(2);
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    cov / denom
}

/// RSI over the series: mean gain vs mean loss across the last 14 deltas
/// (or all of them when fewer are available). A lossless window pins RSI
/// at 100.
fn rsi(series: &[f64]) -> f64 {
    if series.len() < 2 {
        return 100.0;
    }

    let mut gains = Vec::with_capacity(series.len() - 1);
    let mut losses = Vec::with_capacity(series.len() - 1);
    for window in series.windows(2) {
        let delta = window[1] - window[0];
        if delta > 0.0 {
            gains.push(delta);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(-delta);
        }
    }

    let window = gains.len().min(RSI_PERIOD);
    let avg_gain = mean(&gains[gains.len() - window..]);
    let avg_loss = mean(&losses[losses.len() - window..]);

    if avg_loss == 0.0 {
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

/// Exponential moving average over the whole series, seeded at the first
/// sample (the recurrence pandas calls `adjust=False`).
fn ema_series(values: &[f64], span: usize) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut ema = Vec::with_capacity(values.len());
    ema.push(values[0]);
    for value in &values[1..] {
        let prev = ema[ema.len() - 1];
        ema.push(alpha * value + (1.0 - alpha) * prev);
    }
    ema
}

/// MACD line, signal line and histogram for the series.
///
/// The signal line is the EMA(9) of the MACD series itself, the standard
/// definition. (The system this replaces smoothed the raw price series
/// instead, which made the histogram track price level rather than
/// momentum.)
fn macd(series: &[f64]) -> (f64, f64, f64) {
    let fast = ema_series(series, MACD_FAST);
    let slow = ema_series(series, MACD_SLOW);

    let macd_series: Vec<f64> = fast
        .iter()
        .zip(slow.iter())
        .map(|(f, s)| f - s)
        .collect();
    let signal_series = ema_series(&macd_series, MACD_SIGNAL);

    let macd_line = macd_series.last().copied().unwrap_or(0.0);
    let signal = signal_series.last().copied().unwrap_or(0.0);
    (macd_line, signal, macd_line - signal)
}
