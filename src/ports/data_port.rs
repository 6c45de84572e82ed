//! Market data access port trait.
//!
//! Implementations hand the core a finite, date-sorted series; nothing
//! downstream of this trait performs I/O.

use crate::domain::error::MacdtraderError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars for `ticker` with `start_date <= date <= end_date`, sorted by date.
    /// A `None` bound is open.
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, MacdtraderError>;

    fn list_symbols(&self) -> Result<Vec<String>, MacdtraderError>;

    /// First date, last date and bar count, or `None` when the ticker has no bars.
    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, MacdtraderError>;
}
