//! CSV audit report adapter implementing ReportPort.
//!
//! Signals file: `date,open,close,macd,signal_line,signal`.
//! Trades file: `side,date,price,shares,value`.
//! Either path may be absent, in which case that file is skipped.

use std::path::{Path, PathBuf};

use crate::domain::backtest::BacktestResult;
use crate::domain::error::MacdtraderError;
use crate::domain::price_point::PricePoint;
use crate::ports::report_port::ReportPort;

pub struct CsvReportAdapter {
    signals_path: Option<PathBuf>,
    trades_path: Option<PathBuf>,
}

impl CsvReportAdapter {
    pub fn new(signals_path: Option<PathBuf>, trades_path: Option<PathBuf>) -> Self {
        Self {
            signals_path,
            trades_path,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.signals_path.is_none() && self.trades_path.is_none()
    }
}

fn writer(path: &Path) -> Result<csv::Writer<std::fs::File>, MacdtraderError> {
    csv::Writer::from_path(path).map_err(|e| csv_error(path, e))
}

fn csv_error(path: &Path, e: csv::Error) -> MacdtraderError {
    if e.is_io_error() {
        match e.into_kind() {
            csv::ErrorKind::Io(io) => MacdtraderError::Io(io),
            other => MacdtraderError::DataSource {
                reason: format!("{}: {:?}", path.display(), other),
            },
        }
    } else {
        MacdtraderError::DataSource {
            reason: format!("failed to write {}: {}", path.display(), e),
        }
    }
}

/// NaN indicator values are written as empty cells.
fn cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

impl ReportPort for CsvReportAdapter {
    fn write_signals(
        &self,
        points: &[PricePoint],
        result: &BacktestResult,
    ) -> Result<(), MacdtraderError> {
        let Some(path) = &self.signals_path else {
            return Ok(());
        };
        if points.len() != result.signals.len() {
            return Err(MacdtraderError::UnalignedData {
                reason: format!(
                    "{} points but {} signals",
                    points.len(),
                    result.signals.len()
                ),
            });
        }

        let mut wtr = writer(path)?;
        wtr.write_record(["date", "open", "close", "macd", "signal_line", "signal"])
            .map_err(|e| csv_error(path, e))?;
        for (point, signal) in points.iter().zip(&result.signals) {
            wtr.write_record([
                point.date.to_string(),
                point.open.to_string(),
                point.close.to_string(),
                cell(point.macd),
                cell(point.signal_line),
                signal.to_string(),
            ])
            .map_err(|e| csv_error(path, e))?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_trades(&self, result: &BacktestResult) -> Result<(), MacdtraderError> {
        let Some(path) = &self.trades_path else {
            return Ok(());
        };

        let mut wtr = writer(path)?;
        wtr.write_record(["side", "date", "price", "shares", "value"])
            .map_err(|e| csv_error(path, e))?;
        for fill in &result.portfolio.fills {
            wtr.write_record([
                fill.side.to_string(),
                fill.date.to_string(),
                fill.price.to_string(),
                fill.shares.to_string(),
                fill.value.to_string(),
            ])
            .map_err(|e| csv_error(path, e))?;
        }
        wtr.flush()?;
        Ok(())
    }
}
