//! Performance metrics over a finished backtest.

use super::portfolio::{EquityPoint, Portfolio};

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub final_value: f64,
    pub total_return: f64,
    pub annualized_return: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub max_drawdown: f64,
    pub max_drawdown_duration: i64,
    pub total_trades: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub avg_trade_duration: f64,
    /// Mean per-trade price return, in percent.
    pub avg_trade_return: f64,
    pub exposure: f64,
}

impl Metrics {
    /// `periods_per_year` scales annualization: 252 for daily bars, 52 for weekly.
    pub fn compute(portfolio: &Portfolio, risk_free_rate: f64, periods_per_year: f64) -> Self {
        let equity_curve = &portfolio.equity_curve;
        let initial_capital = portfolio.initial_capital;
        let final_value = portfolio.final_equity();

        let total_return = if initial_capital > 0.0 {
            (final_value - initial_capital) / initial_capital
        } else {
            0.0
        };

        let years = equity_curve.len() as f64 / periods_per_year;
        let annualized_return = if years > 0.0 && total_return.is_finite() {
            (1.0 + total_return).powf(1.0 / years) - 1.0
        } else {
            0.0
        };

        let (max_drawdown, max_drawdown_duration) = compute_drawdown(equity_curve);
        let (sharpe_ratio, sortino_ratio) =
            compute_risk_adjusted(equity_curve, risk_free_rate, periods_per_year);

        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;
        let mut total_duration_days = 0i64;

        for trade in &portfolio.closed_trades {
            if trade.pnl > 0.0 {
                trades_won += 1;
                total_wins += trade.pnl;
                largest_win = largest_win.max(trade.pnl);
            } else if trade.pnl < 0.0 {
                trades_lost += 1;
                total_losses += trade.pnl.abs();
                largest_loss = largest_loss.max(trade.pnl.abs());
            }
            total_duration_days += trade.holding_days();
        }

        let total_trades = portfolio.closed_trades.len();
        let win_rate = if total_trades > 0 {
            trades_won as f64 / total_trades as f64
        } else {
            0.0
        };

        let profit_factor = if total_losses > 0.0 {
            total_wins / total_losses
        } else if total_wins > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        let avg_trade_return = if total_trades > 0 {
            portfolio
                .closed_trades
                .iter()
                .map(|t| t.return_pct())
                .sum::<f64>()
                / total_trades as f64
        } else {
            0.0
        };

        let avg_trade_duration = if total_trades > 0 {
            total_duration_days as f64 / total_trades as f64
        } else {
            0.0
        };

        Metrics {
            final_value,
            total_return,
            annualized_return,
            sharpe_ratio,
            sortino_ratio,
            max_drawdown,
            max_drawdown_duration,
            total_trades,
            trades_won,
            trades_lost,
            win_rate,
            profit_factor,
            largest_win,
            largest_loss,
            avg_trade_duration,
            avg_trade_return,
            exposure: compute_exposure(equity_curve),
        }
    }
}

/// Largest peak-to-trough decline as a fraction, and the longest run of bars
/// spent below a prior peak.
fn compute_drawdown(equity_curve: &[EquityPoint]) -> (f64, i64) {
    let Some(first) = equity_curve.first() else {
        return (0.0, 0);
    };

    let mut peak = first.equity;
    let mut max_dd = 0.0_f64;
    let mut max_dd_duration = 0i64;
    let mut current_dd_duration = 0i64;

    for point in equity_curve {
        if point.equity >= peak {
            peak = point.equity;
            current_dd_duration = 0;
        } else if peak > 0.0 {
            max_dd = max_dd.max((peak - point.equity) / peak);
            current_dd_duration += 1;
            max_dd_duration = max_dd_duration.max(current_dd_duration);
        }
    }

    (max_dd, max_dd_duration)
}

fn compute_risk_adjusted(
    equity_curve: &[EquityPoint],
    risk_free_rate: f64,
    periods_per_year: f64,
) -> (f64, f64) {
    if equity_curve.len() < 2 {
        return (0.0, 0.0);
    }

    let returns: Vec<f64> = equity_curve
        .windows(2)
        .map(|w| {
            if w[0].equity > 0.0 {
                (w[1].equity - w[0].equity) / w[0].equity
            } else {
                0.0
            }
        })
        .collect();

    let n = returns.len() as f64;
    let period_rf = risk_free_rate / periods_per_year;
    let mean = returns.iter().sum::<f64>() / n;
    let stddev = (returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n).sqrt();
    let excess_return = mean - period_rf;

    let sharpe = if stddev > 0.0 {
        (excess_return / stddev) * periods_per_year.sqrt()
    } else {
        0.0
    };

    let downside_sq: f64 = returns
        .iter()
        .filter(|&&r| r < period_rf)
        .map(|&r| (r - period_rf).powi(2))
        .sum();
    let downside_stddev = (downside_sq / n).sqrt();

    let sortino = if downside_stddev > 0.0 {
        (excess_return / downside_stddev) * periods_per_year.sqrt()
    } else {
        0.0
    };

    (sharpe, sortino)
}

/// Fraction of bars that ended holding shares.
fn compute_exposure(equity_curve: &[EquityPoint]) -> f64 {
    if equity_curve.is_empty() {
        return 0.0;
    }
    let bars_long = equity_curve.iter().filter(|p| p.long).count();
    bars_long as f64 / equity_curve.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backtest::simulate;
    use crate::domain::position::ClosedTrade;
    use crate::domain::price_point::PricePoint;
    use crate::domain::resample::TRADING_DAYS_PER_YEAR;
    use crate::domain::signal::Signal;
    use chrono::{Duration, NaiveDate};

    fn day(i: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(i)
    }

    fn make_portfolio(equity: &[f64], trades: Vec<ClosedTrade>) -> Portfolio {
        let initial = equity.first().copied().unwrap_or(1000.0);
        let mut portfolio = Portfolio::new(initial);
        for trade in trades {
            portfolio.record_trade(trade);
        }
        for (i, &value) in equity.iter().enumerate() {
            portfolio.record_equity(day(i as i64), value);
        }
        portfolio
    }

    fn make_trade(pnl: f64, days: i64) -> ClosedTrade {
        ClosedTrade {
            shares: 10.0,
            entry_price: 100.0,
            exit_price: 100.0 + pnl / 10.0,
            entry_date: day(0),
            exit_date: day(days),
            pnl,
        }
    }

    fn point(date: NaiveDate, open: f64) -> PricePoint {
        PricePoint {
            date,
            open,
            high: open,
            low: open,
            close: open,
            macd: f64::NAN,
            signal_line: f64::NAN,
        }
    }

    #[test]
    fn metrics_empty_portfolio() {
        let metrics = Metrics::compute(&Portfolio::new(1000.0), 0.05, TRADING_DAYS_PER_YEAR);
        assert_eq!(metrics.final_value, 1000.0);
        assert_eq!(metrics.total_return, 0.0);
        assert_eq!(metrics.total_trades, 0);
        assert_eq!(metrics.exposure, 0.0);
        assert_eq!(metrics.profit_factor, 0.0);
    }

    #[test]
    fn metrics_total_return() {
        let up = Metrics::compute(&make_portfolio(&[1000.0, 1100.0], vec![]), 0.05, 252.0);
        assert!((up.total_return - 0.10).abs() < 1e-9);

        let down = Metrics::compute(&make_portfolio(&[1000.0, 900.0], vec![]), 0.05, 252.0);
        assert!((down.total_return - (-0.10)).abs() < 1e-9);
    }

    #[test]
    fn metrics_annualized_full_year_equals_total() {
        let mut equity = vec![1000.0; 252];
        equity[251] = 1200.0;
        let metrics = Metrics::compute(&make_portfolio(&equity, vec![]), 0.0, 252.0);
        assert!((metrics.annualized_return - metrics.total_return).abs() < 1e-9);
    }

    #[test]
    fn drawdown_and_duration() {
        let curve = [1000.0, 1200.0, 900.0, 1000.0, 1300.0, 1250.0];
        let metrics = Metrics::compute(&make_portfolio(&curve, vec![]), 0.0, 252.0);
        assert!((metrics.max_drawdown - 0.25).abs() < 1e-9);
        assert_eq!(metrics.max_drawdown_duration, 2);
    }

    #[test]
    fn sharpe_zero_for_flat_curve() {
        let metrics = Metrics::compute(&make_portfolio(&[1000.0; 10], vec![]), 0.0, 252.0);
        assert_eq!(metrics.sharpe_ratio, 0.0);
        assert_eq!(metrics.sortino_ratio, 0.0);
    }

    #[test]
    fn sharpe_positive_for_steady_gains() {
        let curve = [1000.0, 1010.0, 1015.0, 1030.0, 1035.0, 1050.0];
        let metrics = Metrics::compute(&make_portfolio(&curve, vec![]), 0.0, 252.0);
        assert!(metrics.sharpe_ratio > 0.0);
    }

    #[test]
    fn trade_statistics() {
        let trades = vec![make_trade(200.0, 4), make_trade(-50.0, 2), make_trade(100.0, 6)];
        let metrics = Metrics::compute(&make_portfolio(&[1000.0, 1250.0], trades), 0.0, 252.0);

        assert_eq!(metrics.total_trades, 3);
        assert_eq!(metrics.trades_won, 2);
        assert_eq!(metrics.trades_lost, 1);
        assert!((metrics.win_rate - 2.0 / 3.0).abs() < 1e-9);
        assert!((metrics.profit_factor - 6.0).abs() < 1e-9);
        assert!((metrics.largest_win - 200.0).abs() < 1e-9);
        assert!((metrics.largest_loss - 50.0).abs() < 1e-9);
        assert!((metrics.avg_trade_duration - 4.0).abs() < 1e-9);
        // +20%, -5% and +10% on a 100.0 entry
        assert!((metrics.avg_trade_return - 25.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn profit_factor_infinite_without_losses() {
        let metrics = Metrics::compute(
            &make_portfolio(&[1000.0, 1100.0], vec![make_trade(100.0, 1)]),
            0.0,
            252.0,
        );
        assert!(metrics.profit_factor.is_infinite());
    }

    #[test]
    fn exposure_counts_bars_held() {
        let points: Vec<PricePoint> = (0..5).map(|i| point(day(i), 10.0)).collect();
        let signals = [
            Signal::Neutral,
            Signal::Bull,
            Signal::Neutral,
            Signal::Bear,
            Signal::Neutral,
        ];
        let portfolio = simulate(&points, &signals, 1000.0).unwrap();

        let metrics = Metrics::compute(&portfolio, 0.0, 252.0);
        // long after bars 1 and 2, flat again from bar 3
        assert!((metrics.exposure - 0.4).abs() < 1e-9);
    }

    #[test]
    fn exposure_follows_bars_sharing_a_date() {
        let points = [point(day(0), 10.0), point(day(0), 12.0), point(day(1), 12.0)];
        let signals = [Signal::Bull, Signal::Bear, Signal::Neutral];
        let portfolio = simulate(&points, &signals, 1000.0).unwrap();

        let long_flags: Vec<bool> = portfolio.equity_curve.iter().map(|p| p.long).collect();
        assert_eq!(long_flags, vec![true, false, false]);
        let metrics = Metrics::compute(&portfolio, 0.0, 252.0);
        assert!((metrics.exposure - 1.0 / 3.0).abs() < 1e-9);
    }
}
