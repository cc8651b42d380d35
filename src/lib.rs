//! # tickertrend - Stock Moving-Average Trend Reports
//!
//! A small Rust library and CLI for stock trend snapshots featuring:
//! - Daily closing-price history from Yahoo Finance
//! - Simple moving-average trend classification (Bullish / Bearish)
//! - Point-in-time quote snapshots
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tickertrend::prelude::*;
//! use tickertrend::services::YahooClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = YahooClient::new(true, 30)?;
//!     let (start, end) = tickertrend::utils::lookback_range(365);
//!     let series = client.fetch_daily_closes("AAPL", start, end).await?;
//!     let report = analyze(&series, 50, 200)?;
//!     println!("{}: {:?}", report.ticker, report.trend);
//!     Ok(())
//! }
//! ```

// Core modules - these contain the main functionality
pub mod analysis;
pub mod models;
pub mod services;
pub mod utils;

// Prelude for convenient imports
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! Import this module to get the most commonly used types and functions:
    //! ```rust
    //! use tickertrend::prelude::*;
    //! ```

    pub use crate::analysis::{analyze, AnalysisError};
    pub use crate::models::{PricePoint, PriceSeries, QuoteSnapshot, Trend, TrendReport};
    pub use crate::services::{MarketDataSource, SourceError};
}

// Re-export some commonly used utilities
pub use utils::init_logger;
