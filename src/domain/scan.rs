//! Signal scan over a bar series.
//!
//! Walks consecutive valid KDJ points, feeds the crossover decider, and
//! tracks an assumed-immediate-fill position: a buy puts the scan long, a
//! sell returns it flat. Order placement, sizing, and fills belong to the
//! external execution harness.

use tracing::{debug, info};

use crate::domain::error::KdjTraderError;
use crate::domain::kdj::{compute_kdj, KdjParams};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::signal::{decide, PositionState, Signal};

#[derive(Debug, Clone, PartialEq)]
pub struct SignalEvent {
    pub date: chrono::NaiveDate,
    pub signal: Signal,
    pub close: f64,
}

/// One decision per bar from the first valid KDJ point pair onward.
///
/// Needs `window + 2` bars: the window fill, the seed update, and a second
/// valid point to form the previous/current pair.
pub fn scan_signals(
    bars: &[OhlcvBar],
    params: &KdjParams,
) -> Result<Vec<SignalEvent>, KdjTraderError> {
    let series = compute_kdj(bars, params)?;

    let minimum = params.window + 2;
    if bars.len() < minimum {
        return Err(KdjTraderError::InsufficientHistory {
            bars: bars.len(),
            minimum,
        });
    }

    let first = series
        .first_valid()
        .ok_or(KdjTraderError::InsufficientHistory {
            bars: bars.len(),
            minimum,
        })?;

    let mut position = PositionState::Flat;
    let mut events = Vec::with_capacity(series.points.len() - first - 1);

    for i in (first + 1)..series.points.len() {
        let prev = &series.points[i - 1];
        let cur = &series.points[i];
        let close = bars[i].close;

        debug!(date = %cur.date, close, j = cur.j, d = cur.d, "bar");

        let signal = decide(prev.j, prev.d, cur.j, cur.d, position);
        match signal {
            Signal::Buy => {
                info!(date = %cur.date, close, "buy signal");
                position = PositionState::Long;
            }
            Signal::Sell => {
                info!(date = %cur.date, close, "sell signal");
                position = PositionState::Flat;
            }
            Signal::Hold => {}
        }

        events.push(SignalEvent {
            date: cur.date,
            signal,
            close,
        });
    }

    Ok(events)
}
