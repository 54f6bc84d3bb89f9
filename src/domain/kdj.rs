//! KDJ oscillator computation.
//!
//! Per bar: rolling window high/low, RSV = 100 * (close - low_n) / (high_n - low_n),
//! K = EMA(rsv), D = EMA(K), J = 3K - 2D. EMA uses alpha = 2/(n+1) and is seeded
//! with its first input value. RSV resolves to 0 when the window range is zero.
//! No line is clamped to [0, 100].
//!
//! Warmup: bars before the rolling window fills carry zeroed fields; the bar
//! where the window first fills carries real high_n/low_n/rsv but seeds the
//! K/D chain without producing an update. Only bars after that are `valid`.

use crate::domain::error::KdjTraderError;
use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone, PartialEq)]
pub struct KdjParams {
    /// Rolling high/low window length in bars.
    pub window: usize,
    /// EMA period for the K and D smooths.
    pub smoothing: usize,
}

impl Default for KdjParams {
    fn default() -> Self {
        KdjParams {
            window: 9,
            smoothing: 3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct KdjPoint {
    pub date: chrono::NaiveDate,
    /// True once the K/D smooths have a seed plus at least one update.
    pub valid: bool,
    pub high_n: f64,
    pub low_n: f64,
    pub rsv: f64,
    pub k: f64,
    pub d: f64,
    pub j: f64,
}

#[derive(Debug, Clone)]
pub struct KdjSeries {
    pub params: KdjParams,
    pub points: Vec<KdjPoint>,
}

impl KdjSeries {
    /// Index of the first valid point, if any.
    pub fn first_valid(&self) -> Option<usize> {
        self.points.iter().position(|p| p.valid)
    }

    pub fn valid_points(&self) -> impl Iterator<Item = &KdjPoint> {
        self.points.iter().filter(|p| p.valid)
    }
}

/// Compute the KDJ series for an ordered bar sequence, one point per bar.
///
/// Fails with `UnorderedInput` on non-increasing dates and with
/// `InsufficientHistory` when fewer than `window` bars are supplied. A
/// sequence of exactly `window` bars succeeds but contains no valid point:
/// its last point has a defined rolling high/low and RSV, yet only seeds
/// the smooths.
pub fn compute_kdj(bars: &[OhlcvBar], params: &KdjParams) -> Result<KdjSeries, KdjTraderError> {
    if params.window == 0 {
        return Err(KdjTraderError::InvalidParams {
            reason: "window must be at least 1".into(),
        });
    }
    if params.smoothing == 0 {
        return Err(KdjTraderError::InvalidParams {
            reason: "smoothing must be at least 1".into(),
        });
    }

    for pair in bars.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(KdjTraderError::UnorderedInput {
                prev: pair[0].date,
                next: pair[1].date,
            });
        }
    }

    if bars.len() < params.window {
        return Err(KdjTraderError::InsufficientHistory {
            bars: bars.len(),
            minimum: params.window,
        });
    }

    let alpha = 2.0 / (params.smoothing as f64 + 1.0);
    let mut points = Vec::with_capacity(bars.len());
    let mut k = 0.0;
    let mut d = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        if i + 1 < params.window {
            points.push(KdjPoint {
                date: bar.date,
                valid: false,
                high_n: 0.0,
                low_n: 0.0,
                rsv: 0.0,
                k: 0.0,
                d: 0.0,
                j: 0.0,
            });
            continue;
        }

        let window = &bars[i + 1 - params.window..=i];
        let high_n = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let low_n = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);

        let range = high_n - low_n;
        let rsv = if range == 0.0 {
            0.0
        } else {
            100.0 * (bar.close - low_n) / range
        };

        let valid = if i + 1 == params.window {
            // Seed both smooths with the first defined RSV.
            k = rsv;
            d = k;
            false
        } else {
            k = alpha * rsv + (1.0 - alpha) * k;
            d = alpha * k + (1.0 - alpha) * d;
            true
        };

        points.push(KdjPoint {
            date: bar.date,
            valid,
            high_n,
            low_n,
            rsv,
            k,
            d,
            j: 3.0 * k - 2.0 * d,
        });
    }

    Ok(KdjSeries {
        params: params.clone(),
        points,
    })
}
