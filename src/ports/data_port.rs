//! Data access port trait.

use chrono::NaiveDate;

use crate::domain::error::KdjTraderError;
use crate::domain::ohlcv::OhlcvBar;

pub trait DataPort {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, KdjTraderError>;

    fn list_tickers(&self) -> Result<Vec<String>, KdjTraderError>;

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, KdjTraderError>;
}
