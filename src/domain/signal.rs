//! J/D crossover signal decision.

use std::fmt;

/// Position held by the external execution harness. Read-only input here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionState {
    Flat,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
        }
    }
}

/// Decide one signal from the previous and current J/D values.
///
/// Flat: buy only on a strict sign flip of J - D from negative to positive.
/// Long: sell when J - D was positive on the previous bar or is negative now.
/// The two branches are deliberately asymmetric; exact ties trigger neither
/// a buy nor, on their own, a sell.
pub fn decide(
    j_prev: f64,
    d_prev: f64,
    j_cur: f64,
    d_cur: f64,
    position: PositionState,
) -> Signal {
    let cond_prev = j_prev - d_prev;
    let cond_cur = j_cur - d_cur;

    match position {
        PositionState::Flat => {
            if cond_prev < 0.0 && cond_cur > 0.0 {
                Signal::Buy
            } else {
                Signal::Hold
            }
        }
        PositionState::Long => {
            if cond_prev > 0.0 || cond_cur < 0.0 {
                Signal::Sell
            } else {
                Signal::Hold
            }
        }
    }
}
