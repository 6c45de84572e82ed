//! Trade execution at the bar open.
//!
//! Entries invest all cash, exits liquidate all shares. There are no
//! commissions, slippage or partial fills.

use chrono::NaiveDate;

use super::error::MacdtraderError;
use super::portfolio::Portfolio;
use super::position::{ClosedTrade, Fill, Holding, Position, Side};
use super::price_point::PricePoint;

/// Reject prices that cannot be divided by or valued at (zero, negative, NaN, infinite).
pub fn validate_price(
    price: f64,
    date: NaiveDate,
    field: &'static str,
) -> Result<f64, MacdtraderError> {
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(MacdtraderError::InvalidPrice { date, field, price })
    }
}

/// Enter a long position with all cash at the point's open.
///
/// shares = cash / open, entry_price = open, cash = 0.
/// Returns `None` when already long.
pub fn enter_long(
    portfolio: &mut Portfolio,
    point: &PricePoint,
) -> Result<Option<Fill>, MacdtraderError> {
    if portfolio.is_long() {
        return Ok(None);
    }

    let price = validate_price(point.open, point.date, "open")?;
    let value = portfolio.cash;
    let shares = value / price;

    portfolio.cash = 0.0;
    portfolio.position = Position::Long(Holding {
        shares,
        entry_price: price,
        entry_date: point.date,
    });

    let fill = Fill {
        side: Side::Buy,
        date: point.date,
        price,
        shares,
        value,
    };
    portfolio.record_fill(fill);
    Ok(Some(fill))
}

/// Exit the long position at the point's open.
///
/// cash = shares * open, shares = 0. Returns `None` when already flat.
pub fn exit_long(
    portfolio: &mut Portfolio,
    point: &PricePoint,
) -> Result<Option<Fill>, MacdtraderError> {
    let Position::Long(holding) = portfolio.position else {
        return Ok(None);
    };

    let price = validate_price(point.open, point.date, "open")?;
    let value = holding.market_value(price);

    portfolio.cash = value;
    portfolio.position = Position::Flat;

    let fill = Fill {
        side: Side::Sell,
        date: point.date,
        price,
        shares: holding.shares,
        value,
    };
    portfolio.record_fill(fill);
    portfolio.record_trade(ClosedTrade {
        shares: holding.shares,
        entry_price: holding.entry_price,
        exit_price: price,
        entry_date: holding.entry_date,
        exit_date: point.date,
        pnl: holding.unrealized_pnl(price),
    });
    Ok(Some(fill))
}

/// Value the portfolio at the point's close and append it to the equity curve.
/// The close only has to be valid while shares are held.
pub fn mark_to_market(
    portfolio: &mut Portfolio,
    point: &PricePoint,
) -> Result<f64, MacdtraderError> {
    let equity = if portfolio.is_long() {
        let close = validate_price(point.close, point.date, "close")?;
        portfolio.total_equity(close)
    } else {
        portfolio.cash
    };
    portfolio.record_equity(point.date, equity);
    Ok(equity)
}
