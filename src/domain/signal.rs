//! MACD crossover-state signals.
//!
//! Each point is classified on its own: no memory between points.

use std::fmt;

use crate::domain::error::MacdtraderError;
use crate::domain::price_point::PricePoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Bull,
    Bear,
    Neutral,
}

impl Signal {
    /// `Bull` when macd > signal line, `Bear` when below, `Neutral` when equal
    /// or when either value is NaN.
    pub fn from_macd(macd: f64, signal_line: f64) -> Self {
        if macd > signal_line {
            Signal::Bull
        } else if macd < signal_line {
            Signal::Bear
        } else {
            Signal::Neutral
        }
    }

    pub fn of(point: &PricePoint) -> Self {
        Signal::from_macd(point.macd, point.signal_line)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Bull => write!(f, "BULL"),
            Signal::Bear => write!(f, "BEAR"),
            Signal::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

pub fn generate_signals(points: &[PricePoint]) -> Vec<Signal> {
    points.iter().map(Signal::of).collect()
}

/// Like [`generate_signals`], but undefined indicator values are only accepted
/// as a leading warm-up run.
pub fn generate_signals_strict(points: &[PricePoint]) -> Result<Vec<Signal>, MacdtraderError> {
    let mut warmed_up = false;
    let mut signals = Vec::with_capacity(points.len());

    for point in points {
        if point.has_indicator() {
            warmed_up = true;
        } else if warmed_up {
            return Err(MacdtraderError::UnalignedData {
                reason: format!("indicator values missing on {} after warm-up", point.date),
            });
        }
        signals.push(Signal::of(point));
    }

    Ok(signals)
}
