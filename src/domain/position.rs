//! Position state, fills and completed round trips.

use std::fmt;

use chrono::NaiveDate;

/// Shares held while long, with the entry details.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Holding {
    pub shares: f64,
    pub entry_price: f64,
    pub entry_date: NaiveDate,
}

impl Holding {
    pub fn market_value(&self, price: f64) -> f64 {
        self.shares * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.shares * (price - self.entry_price)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Position {
    #[default]
    Flat,
    Long(Holding),
}

impl Position {
    pub fn is_long(&self) -> bool {
        matches!(self, Position::Long(_))
    }

    pub fn shares(&self) -> f64 {
        match self {
            Position::Flat => 0.0,
            Position::Long(h) => h.shares,
        }
    }

    pub fn entry_price(&self) -> Option<f64> {
        match self {
            Position::Flat => None,
            Position::Long(h) => Some(h.entry_price),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// One executed transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub side: Side,
    pub date: NaiveDate,
    pub price: f64,
    pub shares: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosedTrade {
    pub shares: f64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub pnl: f64,
}

impl ClosedTrade {
    pub fn return_pct(&self) -> f64 {
        (self.exit_price - self.entry_price) / self.entry_price * 100.0
    }

    pub fn holding_days(&self) -> i64 {
        (self.exit_date - self.entry_date).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding() -> Holding {
        Holding {
            shares: 100.0,
            entry_price: 10.0,
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        }
    }

    #[test]
    fn flat_by_default() {
        let pos = Position::default();
        assert!(!pos.is_long());
        assert_eq!(pos.shares(), 0.0);
        assert_eq!(pos.entry_price(), None);
    }

    #[test]
    fn long_reports_holding() {
        let pos = Position::Long(holding());
        assert!(pos.is_long());
        assert_eq!(pos.shares(), 100.0);
        assert_eq!(pos.entry_price(), Some(10.0));
    }

    #[test]
    fn market_value_and_pnl() {
        let h = holding();
        assert!((h.market_value(15.0) - 1500.0).abs() < f64::EPSILON);
        assert!((h.unrealized_pnl(15.0) - 500.0).abs() < f64::EPSILON);
        assert!((h.unrealized_pnl(8.0) - (-200.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn closed_trade_return_and_duration() {
        let trade = ClosedTrade {
            shares: 100.0,
            entry_price: 10.0,
            exit_price: 12.5,
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            exit_date: NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
            pnl: 250.0,
        };
        assert!((trade.return_pct() - 25.0).abs() < f64::EPSILON);
        assert_eq!(trade.holding_days(), 5);
    }

    #[test]
    fn side_display() {
        assert_eq!(Side::Buy.to_string(), "BUY");
        assert_eq!(Side::Sell.to_string(), "SELL");
    }
}
