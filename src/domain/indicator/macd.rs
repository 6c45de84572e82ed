//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow) of close
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! The line is defined from bar max(fast, slow) - 1, the signal line and
//! histogram from bar max(fast, slow) - 1 + signal - 1. Earlier values are NaN.

use std::fmt;

use chrono::NaiveDate;

use crate::domain::indicator::calculate_ema;
use crate::domain::ohlcv::{closes, OhlcvBar};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        MacdParams {
            fast: DEFAULT_FAST,
            slow: DEFAULT_SLOW,
            signal: DEFAULT_SIGNAL,
        }
    }
}

impl MacdParams {
    /// Index of the first bar with a defined signal line.
    pub fn warmup(&self) -> usize {
        (self.fast.max(self.slow) + self.signal).saturating_sub(2)
    }
}

impl fmt::Display for MacdParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MACD({},{},{})", self.fast, self.slow, self.signal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
    pub date: NaiveDate,
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl MacdPoint {
    pub fn is_valid(&self) -> bool {
        !self.line.is_nan() && !self.signal.is_nan()
    }
}

/// Compute MACD over bar closes. Returns an empty series when any period is zero.
pub fn calculate_macd(bars: &[OhlcvBar], params: &MacdParams) -> Vec<MacdPoint> {
    if bars.is_empty() || params.fast == 0 || params.slow == 0 || params.signal == 0 {
        return Vec::new();
    }

    let close = closes(bars);
    let ema_fast = calculate_ema(&close, params.fast);
    let ema_slow = calculate_ema(&close, params.slow);

    let line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(fast, slow)| fast - slow)
        .collect();
    let signal = calculate_ema(&line, params.signal);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| MacdPoint {
            date: bar.date,
            line: line[i],
            signal: signal[i],
            histogram: line[i] - signal[i],
        })
        .collect()
}
