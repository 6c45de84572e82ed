//! Indicator-decorated price observations consumed by the backtest core.

use chrono::NaiveDate;

use crate::domain::error::MacdtraderError;
use crate::domain::indicator::MacdPoint;
use crate::domain::ohlcv::OhlcvBar;

/// One bar with its MACD line and signal line. Warm-up points carry NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub macd: f64,
    pub signal_line: f64,
}

impl PricePoint {
    pub fn has_indicator(&self) -> bool {
        !self.macd.is_nan() && !self.signal_line.is_nan()
    }
}

/// Zip bars with their MACD values. Both series must cover the same dates in
/// the same order.
pub fn decorate(bars: &[OhlcvBar], macd: &[MacdPoint]) -> Result<Vec<PricePoint>, MacdtraderError> {
    if bars.len() != macd.len() {
        return Err(MacdtraderError::UnalignedData {
            reason: format!("{} bars but {} indicator values", bars.len(), macd.len()),
        });
    }

    bars.iter()
        .zip(macd)
        .map(|(bar, m)| {
            if bar.date != m.date {
                return Err(MacdtraderError::UnalignedData {
                    reason: format!("bar dated {} paired with indicator dated {}", bar.date, m.date),
                });
            }
            Ok(PricePoint {
                date: bar.date,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                macd: m.line,
                signal_line: m.signal,
            })
        })
        .collect()
}
