use crate::models::{PriceSeries, QuoteSnapshot, SeriesError};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("no data available for the requested ticker/range")]
    DataUnavailable,
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
    #[error("provider rate limit exhausted")]
    RateLimited,
    #[error("provider returned a malformed series: {0}")]
    Series(#[from] SeriesError),
}

/// Abstract market-data provider.
///
/// The analyzer never talks to a provider directly; the driver injects an
/// implementation of this trait, so tests can substitute a canned source.
#[async_trait::async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Time-ordered daily closing prices for `ticker` between `start` and
    /// `end` (inclusive trading days). Fails with
    /// [`SourceError::DataUnavailable`] when the provider has no rows for
    /// the ticker/range.
    async fn fetch_daily_closes(
        &mut self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, SourceError>;

    /// Point-in-time quote for `ticker`.
    async fn fetch_quote(&mut self, ticker: &str) -> Result<QuoteSnapshot, SourceError>;
}
