//! Single-position portfolio state and equity tracking.

use chrono::NaiveDate;

use super::position::{ClosedTrade, Fill, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
    /// Shares were held at the close of this bar.
    pub long: bool,
}

/// Cash plus at most one long position. Fully invested while long: cash is
/// zero and the whole value sits in shares.
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub cash: f64,
    pub initial_capital: f64,
    pub position: Position,
    pub fills: Vec<Fill>,
    pub closed_trades: Vec<ClosedTrade>,
    pub equity_curve: Vec<EquityPoint>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Portfolio {
            cash: initial_capital,
            initial_capital,
            position: Position::Flat,
            fills: Vec::new(),
            closed_trades: Vec::new(),
            equity_curve: Vec::new(),
        }
    }

    pub fn is_long(&self) -> bool {
        self.position.is_long()
    }

    pub fn shares(&self) -> f64 {
        self.position.shares()
    }

    pub fn record_fill(&mut self, fill: Fill) {
        self.fills.push(fill);
    }

    pub fn record_trade(&mut self, trade: ClosedTrade) {
        self.closed_trades.push(trade);
    }

    pub fn record_equity(&mut self, date: NaiveDate, equity: f64) {
        self.equity_curve.push(EquityPoint {
            date,
            equity,
            long: self.is_long(),
        });
    }

    /// cash + shares * price
    pub fn total_equity(&self, price: f64) -> f64 {
        self.cash + self.shares() * price
    }

    pub fn final_equity(&self) -> f64 {
        self.equity_curve
            .last()
            .map(|p| p.equity)
            .unwrap_or(self.cash)
    }
}
