//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod price_point;
pub mod signal;
pub mod position;
pub mod portfolio;
pub mod execution;
pub mod backtest;
pub mod metrics;
pub mod resample;
pub mod period;
pub mod summary;
pub mod config_validation;
pub mod error;
