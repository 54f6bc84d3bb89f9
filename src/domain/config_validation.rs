//! Configuration validation.

use chrono::NaiveDate;

use crate::domain::error::KdjTraderError;
use crate::ports::config_port::ConfigPort;

/// Require a data root and a sane interval.
pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), KdjTraderError> {
    let root = config
        .get_string("data", "root")
        .ok_or_else(|| KdjTraderError::ConfigMissing {
            section: "data".into(),
            key: "root".into(),
        })?;

    if root.trim().is_empty() {
        return Err(KdjTraderError::ConfigInvalid {
            section: "data".into(),
            key: "root".into(),
            reason: "must not be empty".into(),
        });
    }

    Ok(())
}

/// Window and smoothing must both be at least 1.
pub fn validate_kdj_config(config: &dyn ConfigPort) -> Result<(), KdjTraderError> {
    let window = config.get_int("kdj", "window", 9);
    if window < 1 {
        return Err(KdjTraderError::ConfigInvalid {
            section: "kdj".into(),
            key: "window".into(),
            reason: "must be at least 1".into(),
        });
    }

    let smoothing = config.get_int("kdj", "smoothing", 3);
    if smoothing < 1 {
        return Err(KdjTraderError::ConfigInvalid {
            section: "kdj".into(),
            key: "smoothing".into(),
            reason: "must be at least 1".into(),
        });
    }

    Ok(())
}

/// At least one ticker, and any supplied date range must parse with
/// start <= end.
pub fn validate_scan_config(config: &dyn ConfigPort) -> Result<(), KdjTraderError> {
    let has_ticker = config
        .get_string("scan", "ticker")
        .map(|s| !s.trim().is_empty())
        .unwrap_or(false);
    let has_tickers = config
        .get_string("scan", "tickers")
        .map(|s| !s.trim().is_empty())
        .unwrap_or(false);

    if !has_ticker && !has_tickers {
        return Err(KdjTraderError::ConfigMissing {
            section: "scan".into(),
            key: "ticker".into(),
        });
    }

    let start = parse_config_date(config, "scan", "start_date")?;
    let end = parse_config_date(config, "scan", "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(KdjTraderError::ConfigInvalid {
                section: "scan".into(),
                key: "start_date".into(),
                reason: format!("{start} is after end_date {end}"),
            });
        }
    }

    Ok(())
}

pub fn parse_config_date(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<NaiveDate>, KdjTraderError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| KdjTraderError::ConfigInvalid {
                section: section.into(),
                key: key.into(),
                reason: "invalid date format (expected YYYY-MM-DD)".into(),
            }),
        _ => Ok(None),
    }
}
