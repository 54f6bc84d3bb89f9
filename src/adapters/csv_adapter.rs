//! CSV file data adapter.
//!
//! Reads `{root}/{TICKER}.csv` with header `date,open,high,low,close,volume`
//! and writes export files named `{ticker}_{first}_{last}_{interval}.csv`.

use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

use crate::domain::error::KdjTraderError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;

pub struct CsvAdapter {
    root: PathBuf,
}

impl CsvAdapter {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.root.join(format!("{}.csv", ticker.to_uppercase()))
    }

    fn parse_field(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, KdjTraderError> {
        record
            .get(index)
            .ok_or_else(|| KdjTraderError::Data {
                reason: format!("missing {} column", name),
            })?
            .parse()
            .map_err(|e| KdjTraderError::Data {
                reason: format!("invalid {} value: {}", name, e),
            })
    }

    fn read_all(&self, ticker: &str) -> Result<Vec<OhlcvBar>, KdjTraderError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| KdjTraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| KdjTraderError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| KdjTraderError::Data {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                KdjTraderError::Data {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            let open = Self::parse_field(&record, 1, "open")?;
            let high = Self::parse_field(&record, 2, "high")?;
            let low = Self::parse_field(&record, 3, "low")?;
            let close = Self::parse_field(&record, 4, "close")?;

            let volume: i64 = record
                .get(5)
                .ok_or_else(|| KdjTraderError::Data {
                    reason: "missing volume column".into(),
                })?
                .parse()
                .map_err(|e| KdjTraderError::Data {
                    reason: format!("invalid volume value: {}", e),
                })?;

            bars.push(OhlcvBar {
                ticker: ticker.to_uppercase(),
                date,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    /// Save bars as `{ticker}_{first}_{last}_{interval}.csv` under the data
    /// root, dates compacted to YYYYMMDD and the ticker lowercased.
    /// Returns the written path.
    pub fn write_ohlcv(
        &self,
        bars: &[OhlcvBar],
        interval: &str,
    ) -> Result<PathBuf, KdjTraderError> {
        let (first, last) = match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(KdjTraderError::Data {
                    reason: "no bars to write".into(),
                })
            }
        };

        let filename = format!(
            "{}_{}_{}_{}.csv",
            first.ticker.to_lowercase(),
            first.date.format("%Y%m%d"),
            last.date.format("%Y%m%d"),
            interval.to_lowercase(),
        );
        let path = self.root.join(filename);

        let mut wtr = csv::Writer::from_path(&path).map_err(|e| KdjTraderError::Data {
            reason: format!("failed to create {}: {}", path.display(), e),
        })?;

        wtr.write_record(["date", "open", "high", "low", "close", "volume"])
            .map_err(|e| KdjTraderError::Data {
                reason: format!("CSV write error: {}", e),
            })?;

        for bar in bars {
            wtr.write_record([
                bar.date.format("%Y-%m-%d").to_string(),
                bar.open.to_string(),
                bar.high.to_string(),
                bar.low.to_string(),
                bar.close.to_string(),
                bar.volume.to_string(),
            ])
            .map_err(|e| KdjTraderError::Data {
                reason: format!("CSV write error: {}", e),
            })?;
        }

        wtr.flush().map_err(|e| KdjTraderError::Data {
            reason: format!("CSV flush error: {}", e),
        })?;

        Ok(path)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, KdjTraderError> {
        let mut bars = self.read_all(ticker)?;
        bars.retain(|b| b.date >= start_date && b.date <= end_date);
        Ok(bars)
    }

    fn list_tickers(&self) -> Result<Vec<String>, KdjTraderError> {
        let entries = fs::read_dir(&self.root).map_err(|e| KdjTraderError::Data {
            reason: format!("failed to read directory {}: {}", self.root.display(), e),
        })?;

        let mut tickers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| KdjTraderError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            // Export files carry underscores; plain {TICKER}.csv files are the feed.
            if let Some(stem) = name_str.strip_suffix(".csv") {
                if !stem.is_empty() && !stem.contains('_') {
                    tickers.push(stem.to_string());
                }
            }
        }

        tickers.sort();
        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, KdjTraderError> {
        let bars = match self.read_all(ticker) {
            Ok(bars) => bars,
            Err(KdjTraderError::Data { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, bars.len()))),
            _ => Ok(None),
        }
    }
}
