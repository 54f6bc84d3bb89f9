#![allow(dead_code)]

use chrono::NaiveDate;
use kdjtrader::domain::error::KdjTraderError;
pub use kdjtrader::domain::ohlcv::OhlcvBar;
use kdjtrader::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, KdjTraderError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(KdjTraderError::Data {
                reason: reason.clone(),
            });
        }
        let mut bars = self.data.get(ticker).cloned().unwrap_or_default();
        bars.retain(|b| b.date >= start_date && b.date <= end_date);
        Ok(bars)
    }

    fn list_tickers(&self) -> Result<Vec<String>, KdjTraderError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, KdjTraderError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(KdjTraderError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(ticker) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn make_bar(ticker: &str, date_str: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        ticker: ticker.to_string(),
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1000,
    }
}

/// Sequential daily bars from a close series, starting 2024-01-01.
pub fn make_bars(ticker: &str, closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            ticker: ticker.to_string(),
            date: date(2024, 1, 1) + chrono::Days::new(i as u64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        })
        .collect()
}

/// Twelve declining closes followed by a rally: produces exactly one buy
/// (the sign flip) and one sell (the next bar) under the crossover rule.
pub const DECLINE_THEN_RALLY: [f64; 15] = [
    100.0, 99.0, 97.0, 96.0, 94.0, 91.0, 90.0, 88.0, 85.0, 83.0, 80.0, 78.0, 90.0, 94.0, 97.0,
];

/// Render bars as a feed CSV file body.
pub fn bars_to_csv(bars: &[OhlcvBar]) -> String {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for bar in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.date.format("%Y-%m-%d"),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume,
        ));
    }
    content
}
