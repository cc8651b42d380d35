use crate::models::{PriceSeries, Trend, TrendReport};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("invalid windows: short={short}, long={long} (need 0 < short < long)")]
    InvalidWindow { short: usize, long: usize },
    #[error("insufficient data: need at least {required} closes, have {actual}")]
    InsufficientData { required: usize, actual: usize },
}

/// Classify the latest observation of a price series as Bullish or Bearish.
///
/// Computes the simple moving averages over the trailing `short_window` and
/// `long_window` closes and applies the strict two-condition rule:
/// Bullish iff `current > short average` and `short average > long average`.
/// There is no neutral category.
///
/// The comparison uses unrounded values; the report fields are rounded to
/// 2 decimal places for display only, so borderline classifications cannot
/// flip from rounding.
///
/// Pure function of its inputs: no side effects, deterministic.
pub fn analyze(
    series: &PriceSeries,
    short_window: usize,
    long_window: usize,
) -> Result<TrendReport, AnalysisError> {
    if short_window == 0 || short_window >= long_window {
        return Err(AnalysisError::InvalidWindow {
            short: short_window,
            long: long_window,
        });
    }
    if series.len() < long_window {
        return Err(AnalysisError::InsufficientData {
            required: long_window,
            actual: series.len(),
        });
    }

    let closes = series.closes();
    let short_average = tail_mean(&closes, short_window);
    let long_average = tail_mean(&closes, long_window);
    let current_price = match series.latest() {
        Some(point) => point.close,
        None => {
            return Err(AnalysisError::InsufficientData {
                required: long_window,
                actual: 0,
            })
        }
    };

    let trend = if current_price > short_average && short_average > long_average {
        Trend::Bullish
    } else {
        Trend::Bearish
    };

    Ok(TrendReport {
        ticker: series.ticker().to_string(),
        current_price: round2(current_price),
        short_average: round2(short_average),
        long_average: round2(long_average),
        short_window,
        long_window,
        trend,
    })
}

/// Unweighted arithmetic mean of the trailing `window` values.
/// Caller guarantees `window >= 1` and `values.len() >= window`.
fn tail_mean(values: &[f64], window: usize) -> f64 {
    let tail = &values[values.len() - window..];
    tail.iter().sum::<f64>() / window as f64
}

/// Round to 2 decimal places for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PricePoint;
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint::new(start + chrono::Duration::days(i as i64), close))
            .collect();
        PriceSeries::from_points("TEST", points).unwrap()
    }

    #[test]
    fn test_worked_example_bullish() {
        let report = analyze(&series(&[10.0, 20.0, 30.0, 40.0, 50.0]), 2, 3).unwrap();
        assert_eq!(report.short_average, 45.0);
        assert_eq!(report.long_average, 40.0);
        assert_eq!(report.current_price, 50.0);
        assert_eq!(report.trend, Trend::Bullish);
    }

    #[test]
    fn test_worked_example_bearish() {
        let report = analyze(&series(&[50.0, 40.0, 30.0, 20.0, 10.0]), 2, 3).unwrap();
        assert_eq!(report.short_average, 15.0);
        assert_eq!(report.long_average, 20.0);
        assert_eq!(report.current_price, 10.0);
        assert_eq!(report.trend, Trend::Bearish);
    }

    #[test]
    fn test_flat_series_is_bearish() {
        // No strict inequality holds when every close is identical.
        let report = analyze(&series(&[42.0; 10]), 3, 5).unwrap();
        assert_eq!(report.short_average, 42.0);
        assert_eq!(report.long_average, 42.0);
        assert_eq!(report.trend, Trend::Bearish);
    }

    #[test]
    fn test_monotonically_increasing_is_bullish() {
        let closes: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let report = analyze(&series(&closes), 5, 10).unwrap();
        assert!(report.current_price > report.short_average);
        assert!(report.short_average > report.long_average);
        assert_eq!(report.trend, Trend::Bullish);
    }

    #[test]
    fn test_deterministic() {
        let s = series(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(analyze(&s, 2, 3).unwrap(), analyze(&s, 2, 3).unwrap());
    }

    #[test]
    fn test_insufficient_data_for_every_long_window() {
        for long_window in 1..=10usize {
            let closes: Vec<f64> = vec![10.0; long_window - 1];
            let err = analyze(&series(&closes), long_window - 1, long_window);
            match long_window {
                1 => {
                    // short must stay below long, so 0/1 trips the window check first
                    assert_eq!(
                        err.unwrap_err(),
                        AnalysisError::InvalidWindow { short: 0, long: 1 }
                    );
                }
                _ => {
                    assert_eq!(
                        err.unwrap_err(),
                        AnalysisError::InsufficientData {
                            required: long_window,
                            actual: long_window - 1,
                        }
                    );
                }
            }
        }
    }

    #[test]
    fn test_empty_series_is_insufficient() {
        let empty = PriceSeries::from_points("TEST", Vec::new()).unwrap();
        assert_eq!(
            analyze(&empty, 2, 3).unwrap_err(),
            AnalysisError::InsufficientData {
                required: 3,
                actual: 0
            }
        );
    }

    #[test]
    fn test_invalid_windows() {
        let s = series(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(
            analyze(&s, 0, 3).unwrap_err(),
            AnalysisError::InvalidWindow { short: 0, long: 3 }
        );
        assert_eq!(
            analyze(&s, 3, 3).unwrap_err(),
            AnalysisError::InvalidWindow { short: 3, long: 3 }
        );
        assert_eq!(
            analyze(&s, 4, 2).unwrap_err(),
            AnalysisError::InvalidWindow { short: 4, long: 2 }
        );
    }

    #[test]
    fn test_comparison_uses_unrounded_values() {
        // Unrounded: 10.012 > 10.006 > 10.003 -> Bullish. The rounded
        // display values tie at 10.01, which would have read as Bearish
        // under round-then-compare.
        let report = analyze(&series(&[10.0, 10.0, 10.0, 10.012]), 2, 4).unwrap();
        assert_eq!(report.trend, Trend::Bullish);
        assert_eq!(report.current_price, 10.01);
        assert_eq!(report.short_average, 10.01);
        assert_eq!(report.long_average, 10.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(123.456), 123.46);
        assert_eq!(round2(123.454), 123.45);
        assert_eq!(round2(10.0), 10.0);
    }
}
