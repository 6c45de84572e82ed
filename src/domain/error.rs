//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for macdtrader.
#[derive(Debug, thiserror::Error)]
pub enum MacdtraderError {
    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error("insufficient data: have {bars} points, need {minimum}")]
    InsufficientData { bars: usize, minimum: usize },

    #[error("invalid {field} price {price} on {date}")]
    InvalidPrice {
        date: NaiveDate,
        field: &'static str,
        price: f64,
    },

    #[error("unaligned data: {reason}")]
    UnalignedData { reason: String },

    #[error("points out of order: {current} follows {previous}")]
    UnorderedData {
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("starting cash must be positive, got {capital}")]
    InvalidCapital { capital: f64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&MacdtraderError> for std::process::ExitCode {
    fn from(err: &MacdtraderError) -> Self {
        let code: u8 = match err {
            MacdtraderError::Io(_) => 1,
            MacdtraderError::ConfigParse { .. }
            | MacdtraderError::ConfigMissing { .. }
            | MacdtraderError::ConfigInvalid { .. } => 2,
            MacdtraderError::DataSource { .. } => 3,
            MacdtraderError::NoData { .. } | MacdtraderError::InsufficientData { .. } => 5,
            MacdtraderError::InvalidPrice { .. }
            | MacdtraderError::UnalignedData { .. }
            | MacdtraderError::UnorderedData { .. }
            | MacdtraderError::InvalidCapital { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_price_message_names_field_and_date() {
        let err = MacdtraderError::InvalidPrice {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            field: "open",
            price: 0.0,
        };
        assert_eq!(err.to_string(), "invalid open price 0 on 2024-03-01");
    }

    #[test]
    fn insufficient_data_message() {
        let err = MacdtraderError::InsufficientData { bars: 0, minimum: 1 };
        assert_eq!(
            err.to_string(),
            "insufficient data: have 0 points, need 1"
        );
    }

    #[test]
    fn exit_codes_group_by_kind() {
        let config = MacdtraderError::ConfigMissing {
            section: "backtest".into(),
            key: "ticker".into(),
        };
        let series = MacdtraderError::UnorderedData {
            previous: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            current: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert_eq!(
            format!("{:?}", std::process::ExitCode::from(&config)),
            format!("{:?}", std::process::ExitCode::from(2))
        );
        assert_eq!(
            format!("{:?}", std::process::ExitCode::from(&series)),
            format!("{:?}", std::process::ExitCode::from(6))
        );
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: MacdtraderError = io.into();
        assert!(matches!(err, MacdtraderError::Io(_)));
    }
}
