//! OHLCV bar representation.

use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct OhlcvBar {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl OhlcvBar {
    /// close >= open
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    /// high - low
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> OhlcvBar {
        OhlcvBar {
            ticker: "TENB".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: 50_000,
        }
    }

    #[test]
    fn bullish_when_close_above_open() {
        let bar = sample_bar();
        assert!(bar.is_bullish());
    }

    #[test]
    fn bearish_when_close_below_open() {
        let mut bar = sample_bar();
        bar.close = 95.0;
        assert!(!bar.is_bullish());
    }

    #[test]
    fn doji_counts_as_bullish() {
        let mut bar = sample_bar();
        bar.close = bar.open;
        assert!(bar.is_bullish());
    }

    #[test]
    fn range_is_high_minus_low() {
        let bar = sample_bar();
        assert!((bar.range() - 20.0).abs() < f64::EPSILON);
    }
}
