//! Signal-driven single-position backtest.
//!
//! State machine over the points in chronological order:
//!
//! | signal  | Flat                  | Long                   |
//! |---------|-----------------------|------------------------|
//! | Bull    | buy all at open       | no-op                  |
//! | Bear    | no-op                 | sell all at open       |
//! | Neutral | no-op                 | no-op                  |
//!
//! Final value = cash + shares * close of the last point.

use super::error::MacdtraderError;
use super::execution::{enter_long, exit_long, mark_to_market};
use super::portfolio::Portfolio;
use super::price_point::PricePoint;
use super::signal::{generate_signals, generate_signals_strict, Signal};

pub const DEFAULT_INITIAL_CAPITAL: f64 = 1000.0;
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    pub strict: bool,
    pub risk_free_rate: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            strict: false,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub final_value: f64,
    pub signals: Vec<Signal>,
    pub portfolio: Portfolio,
}

/// Generate signals for `points` and simulate them.
pub fn run_backtest(
    points: &[PricePoint],
    config: &BacktestConfig,
) -> Result<BacktestResult, MacdtraderError> {
    let signals = if config.strict {
        generate_signals_strict(points)?
    } else {
        generate_signals(points)
    };
    let portfolio = simulate(points, &signals, config.initial_capital)?;

    Ok(BacktestResult {
        final_value: portfolio.final_equity(),
        signals,
        portfolio,
    })
}

/// Fold `signals` over a fresh portfolio. `signals[i]` applies to `points[i]`.
pub fn simulate(
    points: &[PricePoint],
    signals: &[Signal],
    initial_capital: f64,
) -> Result<Portfolio, MacdtraderError> {
    if !(initial_capital.is_finite() && initial_capital > 0.0) {
        return Err(MacdtraderError::InvalidCapital {
            capital: initial_capital,
        });
    }
    if points.is_empty() {
        return Err(MacdtraderError::InsufficientData { bars: 0, minimum: 1 });
    }
    if points.len() != signals.len() {
        return Err(MacdtraderError::UnalignedData {
            reason: format!("{} points but {} signals", points.len(), signals.len()),
        });
    }

    let mut portfolio = Portfolio::new(initial_capital);
    let mut previous = None;

    for (point, &signal) in points.iter().zip(signals) {
        if let Some(prev) = previous {
            if point.date < prev {
                return Err(MacdtraderError::UnorderedData {
                    previous: prev,
                    current: point.date,
                });
            }
        }
        previous = Some(point.date);

        step(&mut portfolio, point, signal)?;
        mark_to_market(&mut portfolio, point)?;
    }

    Ok(portfolio)
}

/// Apply one signal to the portfolio.
pub fn step(
    portfolio: &mut Portfolio,
    point: &PricePoint,
    signal: Signal,
) -> Result<(), MacdtraderError> {
    match signal {
        Signal::Bull => {
            enter_long(portfolio, point)?;
        }
        Signal::Bear => {
            exit_long(portfolio, point)?;
        }
        Signal::Neutral => {}
    }
    Ok(())
}
