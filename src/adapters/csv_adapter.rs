//! CSV file data adapter.
//!
//! One `<TICKER>.csv` per ticker in a base directory. Columns are found by
//! header name (case-insensitive): `Date`, `Open`, `High`, `Low`, `Close` and
//! optionally `Volume`; anything else, such as `Adj Close`, is ignored.

use crate::domain::error::MacdtraderError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord, path: &Path) -> Result<Self, MacdtraderError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| MacdtraderError::DataSource {
                reason: format!("{}: missing {} column", path.display(), name),
            })
        };

        Ok(Columns {
            date: require("date")?,
            open: require("open")?,
            high: require("high")?,
            low: require("low")?,
            close: require("close")?,
            volume: find("volume"),
        })
    }
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    fn read_all(&self, ticker: &str) -> Result<Vec<OhlcvBar>, MacdtraderError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| MacdtraderError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| MacdtraderError::DataSource {
            reason: format!("CSV header error in {}: {}", path.display(), e),
        })?;
        let columns = Columns::from_headers(headers, &path)?;

        let mut bars = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| MacdtraderError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;
            // header is line 1
            let line = row + 2;

            let date_str = field(&record, columns.date, "date", line)?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                MacdtraderError::DataSource {
                    reason: format!("line {}: invalid date '{}': {}", line, date_str, e),
                }
            })?;

            let volume = match columns.volume {
                Some(idx) => parse_volume(field(&record, idx, "volume", line)?, line)?,
                None => 0,
            };

            bars.push(OhlcvBar {
                date,
                open: parse_price(&record, columns.open, "open", line)?,
                high: parse_price(&record, columns.high, "high", line)?,
                low: parse_price(&record, columns.low, "low", line)?,
                close: parse_price(&record, columns.close, "close", line)?,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

fn field<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    name: &str,
    line: usize,
) -> Result<&'r str, MacdtraderError> {
    record
        .get(idx)
        .map(str::trim)
        .ok_or_else(|| MacdtraderError::DataSource {
            reason: format!("line {}: missing {} value", line, name),
        })
}

fn parse_price(
    record: &csv::StringRecord,
    idx: usize,
    name: &str,
    line: usize,
) -> Result<f64, MacdtraderError> {
    let raw = field(record, idx, name, line)?;
    let price: f64 = raw.parse().map_err(|e| MacdtraderError::DataSource {
        reason: format!("line {}: invalid {} value '{}': {}", line, name, raw, e),
    })?;
    if !(price.is_finite() && price > 0.0) {
        return Err(MacdtraderError::DataSource {
            reason: format!("line {}: {} price must be positive, got '{}'", line, name, raw),
        });
    }
    Ok(price)
}

/// Volumes are integral, but some exports write them as `1234.0`.
fn parse_volume(raw: &str, line: usize) -> Result<i64, MacdtraderError> {
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<i64>()
        .or_else(|_| raw.parse::<f64>().map(|v| v as i64))
        .map_err(|e| MacdtraderError::DataSource {
            reason: format!("line {}: invalid volume value '{}': {}", line, raw, e),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, MacdtraderError> {
        let bars = self.read_all(ticker)?;
        Ok(bars
            .into_iter()
            .filter(|b| start_date.is_none_or(|s| b.date >= s))
            .filter(|b| end_date.is_none_or(|e| b.date <= e))
            .collect())
    }

    fn list_symbols(&self) -> Result<Vec<String>, MacdtraderError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| MacdtraderError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| MacdtraderError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;

            let path = entry.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if !is_csv {
                continue;
            }
            if let Some(stem) = path.file_stem() {
                symbols.push(stem.to_string_lossy().into_owned());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, MacdtraderError> {
        let bars = self.read_all(ticker)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
            _ => None,
        })
    }
}
