//! Look-back periods such as `5d`, `6mo`, `1y`, `ytd` and `max`.
//!
//! A period resolves to a start date relative to an anchor, normally the date
//! of the latest available bar.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Days(u32),
    Weeks(u32),
    Months(u32),
    Years(u32),
    YearToDate,
    Max,
}

impl Period {
    /// First date covered by the period ending at `anchor`. `None` means unbounded.
    pub fn start_date(&self, anchor: NaiveDate) -> Option<NaiveDate> {
        match *self {
            Period::Days(n) => anchor.checked_sub_signed(Duration::days(n as i64)),
            Period::Weeks(n) => anchor.checked_sub_signed(Duration::weeks(n as i64)),
            Period::Months(n) => anchor.checked_sub_months(Months::new(n)),
            Period::Years(n) => anchor.checked_sub_months(Months::new(n.saturating_mul(12))),
            Period::YearToDate => NaiveDate::from_ymd_opt(anchor.year(), 1, 1),
            Period::Max => None,
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        match input.as_str() {
            "ytd" => return Ok(Period::YearToDate),
            "max" => return Ok(Period::Max),
            _ => {}
        }

        let split = input
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| format!("period '{s}' is missing a unit"))?;
        let (count, unit) = input.split_at(split);
        let n: u32 = count
            .parse()
            .map_err(|_| format!("period '{s}' must start with a count"))?;
        if n == 0 {
            return Err(format!("period '{s}' must be at least 1"));
        }

        match unit {
            "d" => Ok(Period::Days(n)),
            "wk" | "w" => Ok(Period::Weeks(n)),
            "mo" => Ok(Period::Months(n)),
            "y" => Ok(Period::Years(n)),
            _ => Err(format!("unknown period unit '{unit}' in '{s}'")),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Days(n) => write!(f, "{}d", n),
            Period::Weeks(n) => write!(f, "{}wk", n),
            Period::Months(n) => write!(f, "{}mo", n),
            Period::Years(n) => write!(f, "{}y", n),
            Period::YearToDate => write!(f, "ytd"),
            Period::Max => write!(f, "max"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parse_units() {
        assert_eq!("5d".parse::<Period>().unwrap(), Period::Days(5));
        assert_eq!("2wk".parse::<Period>().unwrap(), Period::Weeks(2));
        assert_eq!("6mo".parse::<Period>().unwrap(), Period::Months(6));
        assert_eq!("1Y".parse::<Period>().unwrap(), Period::Years(1));
        assert_eq!("ytd".parse::<Period>().unwrap(), Period::YearToDate);
        assert_eq!(" MAX ".parse::<Period>().unwrap(), Period::Max);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!("".parse::<Period>().is_err());
        assert!("12".parse::<Period>().is_err());
        assert!("y".parse::<Period>().is_err());
        assert!("0d".parse::<Period>().is_err());
        assert!("3h".parse::<Period>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for text in ["5d", "2wk", "6mo", "10y", "ytd", "max"] {
            assert_eq!(text.parse::<Period>().unwrap().to_string(), text);
        }
    }

    #[test]
    fn start_date_calendar_arithmetic() {
        let anchor = d(2024, 3, 31);
        assert_eq!(Period::Days(5).start_date(anchor), Some(d(2024, 3, 26)));
        assert_eq!(Period::Weeks(1).start_date(anchor), Some(d(2024, 3, 24)));
        // clamps to the last day of February
        assert_eq!(Period::Months(1).start_date(anchor), Some(d(2024, 2, 29)));
        assert_eq!(Period::Years(2).start_date(anchor), Some(d(2022, 3, 31)));
        assert_eq!(Period::YearToDate.start_date(anchor), Some(d(2024, 1, 1)));
        assert_eq!(Period::Max.start_date(anchor), None);
    }
}
