//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for kdjtrader.
#[derive(Debug, thiserror::Error)]
pub enum KdjTraderError {
    #[error("insufficient history: have {bars} bars, need {minimum}")]
    InsufficientHistory { bars: usize, minimum: usize },

    #[error("unordered input: bar {next} does not follow {prev}")]
    UnorderedInput { prev: NaiveDate, next: NaiveDate },

    #[error("invalid KDJ parameters: {reason}")]
    InvalidParams { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&KdjTraderError> for std::process::ExitCode {
    fn from(err: &KdjTraderError) -> Self {
        let code: u8 = match err {
            KdjTraderError::Io(_) => 1,
            KdjTraderError::ConfigParse { .. }
            | KdjTraderError::ConfigMissing { .. }
            | KdjTraderError::ConfigInvalid { .. } => 2,
            KdjTraderError::Data { .. } => 3,
            KdjTraderError::InvalidParams { .. } => 4,
            KdjTraderError::NoData { .. }
            | KdjTraderError::InsufficientHistory { .. }
            | KdjTraderError::UnorderedInput { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
