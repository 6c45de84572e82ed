//! Descriptive statistics for price history.

use super::ohlcv::OhlcvBar;

/// Column summary in the shape of a `describe()` table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1). NaN with fewer than two values.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    /// Summarize the non-NaN values. `None` when there are none.
    pub fn describe(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            (sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        Some(ColumnSummary {
            count,
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        })
    }
}

/// Linear interpolation between closest ranks; `sorted` must be ascending and non-empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Close-to-close percentage change; the first bar has no return.
pub fn daily_returns(bars: &[OhlcvBar]) -> Vec<f64> {
    bars.windows(2)
        .map(|w| {
            if w[0].close != 0.0 {
                (w[1].close - w[0].close) / w[0].close
            } else {
                f64::NAN
            }
        })
        .collect()
}

/// Trailing simple moving average, NaN until `window` values are available.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 {
        return vec![f64::NAN; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, value) in values.iter().enumerate() {
        sum += value;
        if i >= window {
            sum -= values[i - window];
        }
        out.push(if i + 1 >= window {
            sum / window as f64
        } else {
            f64::NAN
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};

    fn bars(closes: &[f64]) -> Vec<OhlcvBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: start + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 10,
            })
            .collect()
    }

    #[test]
    fn describe_matches_hand_computation() {
        let summary = ColumnSummary::describe(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(summary.count, 4);
        assert_relative_eq!(summary.mean, 2.5);
        // sample variance = 5/3
        assert_relative_eq!(summary.std, (5.0_f64 / 3.0).sqrt());
        assert_eq!(summary.min, 1.0);
        assert_relative_eq!(summary.q25, 1.75);
        assert_relative_eq!(summary.median, 2.5);
        assert_relative_eq!(summary.q75, 3.25);
        assert_eq!(summary.max, 4.0);
    }

    #[test]
    fn describe_skips_nan() {
        let summary = ColumnSummary::describe(&[f64::NAN, 2.0, 4.0]).unwrap();
        assert_eq!(summary.count, 2);
        assert_relative_eq!(summary.mean, 3.0);
    }

    #[test]
    fn describe_single_value_has_nan_std() {
        let summary = ColumnSummary::describe(&[7.0]).unwrap();
        assert!(summary.std.is_nan());
        assert_eq!(summary.median, 7.0);
    }

    #[test]
    fn describe_empty_is_none() {
        assert!(ColumnSummary::describe(&[]).is_none());
        assert!(ColumnSummary::describe(&[f64::NAN]).is_none());
    }

    #[test]
    fn daily_returns_pct_change() {
        let returns = daily_returns(&bars(&[100.0, 110.0, 99.0]));
        assert_eq!(returns.len(), 2);
        assert_relative_eq!(returns[0], 0.10);
        assert_relative_eq!(returns[1], -0.10);
    }

    #[test]
    fn daily_returns_zero_close_is_nan() {
        let returns = daily_returns(&bars(&[0.0, 10.0]));
        assert!(returns[0].is_nan());
    }

    #[test]
    fn rolling_mean_window() {
        let ma = rolling_mean(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert!(ma[0].is_nan());
        assert!(ma[1].is_nan());
        assert_relative_eq!(ma[2], 2.0);
        assert_relative_eq!(ma[3], 3.0);
        assert_relative_eq!(ma[4], 4.0);
    }

    #[test]
    fn rolling_mean_window_longer_than_input() {
        let ma = rolling_mean(&[1.0, 2.0], 5);
        assert!(ma.iter().all(|v| v.is_nan()));
    }
}
