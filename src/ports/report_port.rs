//! Backtest audit output port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::MacdtraderError;
use crate::domain::price_point::PricePoint;

/// Port for persisting what a backtest saw and did.
pub trait ReportPort {
    /// Write the per-point signal series. `points` and `result.signals` are aligned.
    fn write_signals(
        &self,
        points: &[PricePoint],
        result: &BacktestResult,
    ) -> Result<(), MacdtraderError>;

    /// Write the executed fills in order.
    fn write_trades(&self, result: &BacktestResult) -> Result<(), MacdtraderError>;

    fn write(&self, points: &[PricePoint], result: &BacktestResult) -> Result<(), MacdtraderError> {
        self.write_signals(points, result)?;
        self.write_trades(result)
    }
}
