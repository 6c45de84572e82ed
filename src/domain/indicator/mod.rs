//! Technical indicators feeding the signal generator.
//!
//! Indicator outputs stay aligned one-to-one with the input bars. Points
//! without enough history carry `f64::NAN` instead of a placeholder value, so
//! downstream consumers can tell a warm-up point from a genuine zero.

pub mod ema;
pub mod macd;

pub use ema::calculate_ema;
pub use macd::{calculate_macd, MacdParams, MacdPoint};
