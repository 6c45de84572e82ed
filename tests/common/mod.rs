#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use macdtrader::domain::error::MacdtraderError;
pub use macdtrader::domain::ohlcv::OhlcvBar;
pub use macdtrader::domain::price_point::PricePoint;
use macdtrader::ports::data_port::DataPort;
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

    fn check(&self, ticker: &str) -> Result<(), MacdtraderError> {
        match self.errors.get(ticker) {
            Some(reason) => Err(MacdtraderError::DataSource {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, MacdtraderError> {
        self.check(ticker)?;
        Ok(self
            .data
            .get(ticker)
            .map(|bars| {
                bars.iter()
                    .filter(|b| start_date.is_none_or(|s| b.date >= s))
                    .filter(|b| end_date.is_none_or(|e| b.date <= e))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, MacdtraderError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, MacdtraderError> {
        self.check(ticker)?;
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

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date_str: &str, close: f64) -> OhlcvBar {
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap();
    OhlcvBar {
        date,
        open: close,
        high: close * 1.01,
        low: close * 0.99,
        close,
        volume: 1000,
    }
}

/// Daily bars starting 2024-01-01, one per calendar day, open = close.
pub fn generate_bars(closes: &[f64]) -> Vec<OhlcvBar> {
    let start = date(2024, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            date: start + Duration::days(i as i64),
            open: close,
            high: close * 1.01,
            low: close * 0.99,
            close,
            volume: 1000,
        })
        .collect()
}

/// Closes that fall, rally, then fall again: enough for one MACD round trip
/// with the default parameters.
pub fn swing_closes() -> Vec<f64> {
    let mut closes = Vec::new();
    closes.extend((0..40).map(|i| 100.0 - i as f64 * 0.5));
    closes.extend((0..40).map(|i| 80.0 + i as f64 * 1.5));
    closes.extend((0..40).map(|i| 140.0 - i as f64 * 1.5));
    closes
}

/// A point whose indicator values are chosen directly.
pub fn point(day: i64, open: f64, close: f64, macd: f64, signal_line: f64) -> PricePoint {
    PricePoint {
        date: date(2024, 1, 1) + Duration::days(day),
        open,
        high: open.max(close),
        low: open.min(close),
        close,
        macd,
        signal_line,
    }
}

pub fn bull(day: i64, open: f64, close: f64) -> PricePoint {
    point(day, open, close, 1.0, 0.0)
}

pub fn bear(day: i64, open: f64, close: f64) -> PricePoint {
    point(day, open, close, -1.0, 0.0)
}

pub fn neutral(day: i64, open: f64, close: f64) -> PricePoint {
    point(day, open, close, 0.0, 0.0)
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
