//! Bar frequency conversion.
//!
//! Weekly bars are labelled with the Sunday that ends their week and
//! aggregate open=first, high=max, low=min, close=last, volume=sum.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};

use super::ohlcv::OhlcvBar;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
pub const WEEKS_PER_YEAR: f64 = 52.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resample {
    #[default]
    Daily,
    Weekly,
}

impl Resample {
    pub fn apply(self, bars: Vec<OhlcvBar>) -> Vec<OhlcvBar> {
        match self {
            Resample::Daily => bars,
            Resample::Weekly => resample_weekly(&bars),
        }
    }

    pub fn periods_per_year(self) -> f64 {
        match self {
            Resample::Daily => TRADING_DAYS_PER_YEAR,
            Resample::Weekly => WEEKS_PER_YEAR,
        }
    }
}

impl FromStr for Resample {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "d" => Ok(Resample::Daily),
            "weekly" | "w" => Ok(Resample::Weekly),
            other => Err(format!("unknown resample frequency '{other}' (expected daily or weekly)")),
        }
    }
}

impl fmt::Display for Resample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resample::Daily => write!(f, "daily"),
            Resample::Weekly => write!(f, "weekly"),
        }
    }
}

/// The Sunday on or after `date`.
pub fn week_ending(date: NaiveDate) -> NaiveDate {
    date + Duration::days(6 - date.weekday().num_days_from_monday() as i64)
}

/// Aggregate bars into calendar weeks. Input order within a week decides
/// which bar supplies the open and close, so bars should be date-sorted.
pub fn resample_weekly(bars: &[OhlcvBar]) -> Vec<OhlcvBar> {
    let mut weeks: BTreeMap<NaiveDate, OhlcvBar> = BTreeMap::new();

    for bar in bars {
        let label = week_ending(bar.date);
        weeks
            .entry(label)
            .and_modify(|week| {
                week.high = week.high.max(bar.high);
                week.low = week.low.min(bar.low);
                week.close = bar.close;
                week.volume += bar.volume;
            })
            .or_insert_with(|| OhlcvBar {
                date: label,
                ..bar.clone()
            });
    }

    weeks.into_values().collect()
}
