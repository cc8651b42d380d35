use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One trading day: date and closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("price points out of order: {prev} is not before {next}")]
    OutOfOrder { prev: NaiveDate, next: NaiveDate },
    #[error("non-positive closing price {close} on {date}")]
    NonPositiveClose { date: NaiveDate, close: f64 },
}

/// Daily closing prices for one ticker, chronologically ascending.
///
/// Invariants are checked at construction: dates strictly increasing,
/// every close positive. Consumers can therefore index and slice without
/// re-validating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    ticker: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from already-ordered points, rejecting any point
    /// that breaks the ordering or positive-price invariants.
    pub fn from_points(ticker: &str, points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::OutOfOrder {
                    prev: pair[0].date,
                    next: pair[1].date,
                });
            }
        }
        for point in &points {
            if point.close <= 0.0 || !point.close.is_finite() {
                return Err(SeriesError::NonPositiveClose {
                    date: point.date,
                    close: point.close,
                });
            }
        }

        Ok(Self {
            ticker: ticker.to_string(),
            points,
        })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent point, if any.
    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Closing prices in chronological order.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_accepts_ascending_series() {
        let points = vec![
            PricePoint::new(day(2), 10.0),
            PricePoint::new(day(3), 11.0),
            PricePoint::new(day(4), 12.5),
        ];
        let series = PriceSeries::from_points("AAPL", points).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.ticker(), "AAPL");
        assert_eq!(series.latest().unwrap().close, 12.5);
        assert_eq!(series.closes(), vec![10.0, 11.0, 12.5]);
    }

    #[test]
    fn test_rejects_out_of_order_dates() {
        let points = vec![
            PricePoint::new(day(3), 10.0),
            PricePoint::new(day(2), 11.0),
        ];
        let err = PriceSeries::from_points("AAPL", points).unwrap_err();
        assert_eq!(
            err,
            SeriesError::OutOfOrder {
                prev: day(3),
                next: day(2)
            }
        );
    }

    #[test]
    fn test_rejects_duplicate_dates() {
        let points = vec![
            PricePoint::new(day(2), 10.0),
            PricePoint::new(day(2), 10.5),
        ];
        assert!(PriceSeries::from_points("AAPL", points).is_err());
    }

    #[test]
    fn test_rejects_non_positive_close() {
        let points = vec![
            PricePoint::new(day(2), 10.0),
            PricePoint::new(day(3), 0.0),
        ];
        let err = PriceSeries::from_points("AAPL", points).unwrap_err();
        assert_eq!(
            err,
            SeriesError::NonPositiveClose {
                date: day(3),
                close: 0.0
            }
        );
    }

    #[test]
    fn test_empty_series_is_valid() {
        let series = PriceSeries::from_points("AAPL", Vec::new()).unwrap();
        assert!(series.is_empty());
        assert!(series.latest().is_none());
    }
}
