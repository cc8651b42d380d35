use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary trend label from the relative ordering of current price,
/// short-window average and long-window average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Bullish,
    Bearish,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Bullish => write!(f, "Bullish"),
            Trend::Bearish => write!(f, "Bearish"),
        }
    }
}

/// Result of one trend analysis call. Prices and averages are rounded to
/// 2 decimal places for display; the classification itself is computed
/// from unrounded values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub ticker: String,
    pub current_price: f64,
    pub short_average: f64,
    pub long_average: f64,
    pub short_window: usize,
    pub long_window: usize,
    pub trend: Trend,
}
