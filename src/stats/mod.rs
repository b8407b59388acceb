//! Stats module - HR indicators

mod indicators;

pub use indicators::{HrIndicators, IndicatorCalculator};
