//! Configuration validation.
//!
//! Validates all config fields before any data is read.

use crate::domain::backtest::{DEFAULT_INITIAL_CAPITAL, DEFAULT_RISK_FREE_RATE};
use crate::domain::error::MacdtraderError;
use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
use crate::domain::period::Period;
use crate::domain::resample::Resample;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), MacdtraderError> {
    config.require_string("data", "directory")?;
    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), MacdtraderError> {
    validate_initial_capital(config)?;
    validate_risk_free_rate(config)?;
    config.get_bool("backtest", "strict")?;
    validate_date_range(config)?;
    parse_resample(config)?;
    Ok(())
}

pub fn validate_macd_config(config: &dyn ConfigPort) -> Result<(), MacdtraderError> {
    let fast = config.get_int("macd", "fast")?.unwrap_or(DEFAULT_FAST as i64);
    let slow = config.get_int("macd", "slow")?.unwrap_or(DEFAULT_SLOW as i64);
    let signal = config.get_int("macd", "signal")?.unwrap_or(DEFAULT_SIGNAL as i64);

    for (key, value) in [("fast", fast), ("slow", slow), ("signal", signal)] {
        if value < 1 {
            return Err(invalid("macd", key, format!("{key} period must be at least 1")));
        }
    }
    if fast >= slow {
        return Err(invalid("macd", "fast", "fast period must be shorter than slow period".into()));
    }
    Ok(())
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), MacdtraderError> {
    let value = config
        .get_double("backtest", "initial_capital")?
        .unwrap_or(DEFAULT_INITIAL_CAPITAL);
    if !(value.is_finite() && value > 0.0) {
        return Err(invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive".into(),
        ));
    }
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), MacdtraderError> {
    let value = config
        .get_double("backtest", "risk_free_rate")?
        .unwrap_or(DEFAULT_RISK_FREE_RATE);
    if !(0.0..1.0).contains(&value) {
        return Err(invalid(
            "backtest",
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1".into(),
        ));
    }
    Ok(())
}

/// `period` may be combined with `end_date` (it then counts back from it) but
/// not with `start_date`.
fn validate_date_range(config: &dyn ConfigPort) -> Result<(), MacdtraderError> {
    let start = parse_optional_date(config, "start_date")?;
    let end = parse_optional_date(config, "end_date")?;
    let period = parse_period(config)?;

    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(invalid(
                "backtest",
                "start_date",
                "start_date must be before end_date".into(),
            ));
        }
    }
    if period.is_some() && start.is_some() {
        return Err(invalid(
            "backtest",
            "period",
            "period cannot be combined with start_date".into(),
        ));
    }
    Ok(())
}

/// Parse `[backtest] <key>` as YYYY-MM-DD if present.
pub fn parse_optional_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, MacdtraderError> {
    match config.get_string("backtest", key) {
        Some(s) if !s.trim().is_empty() => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                invalid(
                    "backtest",
                    key,
                    format!("invalid {} format, expected YYYY-MM-DD", key),
                )
            }),
        _ => Ok(None),
    }
}

pub fn parse_period(config: &dyn ConfigPort) -> Result<Option<Period>, MacdtraderError> {
    match config.get_string("backtest", "period") {
        Some(s) if !s.trim().is_empty() => s
            .parse()
            .map(Some)
            .map_err(|reason| invalid("backtest", "period", reason)),
        _ => Ok(None),
    }
}

pub fn parse_resample(config: &dyn ConfigPort) -> Result<Resample, MacdtraderError> {
    match config.get_string("backtest", "resample") {
        Some(s) if !s.trim().is_empty() => s
            .parse()
            .map_err(|reason| invalid("backtest", "resample", reason)),
        _ => Ok(Resample::Daily),
    }
}

fn invalid(section: &str, key: &str, reason: String) -> MacdtraderError {
    MacdtraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    }
}
