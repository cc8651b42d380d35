use anyhow::{ensure, Context};
use clap::{Parser, Subcommand};
use tickertrend::analysis::analyze;
use tickertrend::models::{QuoteSnapshot, TrendReport};
use tickertrend::services::{MarketDataSource, YahooClient};
use tickertrend::utils::{init_logger, lookback_range};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "tickertrend")]
#[command(about = "Stock price snapshots and simple moving-average trend reports")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a current quote snapshot per ticker
    Quote {
        /// Ticker symbol(s) to quote (comma-separated)
        #[arg(short, long, default_value = "AAPL,GOOGL,MSFT")]
        tickers: String,
    },
    /// Fetch daily closes and print a moving-average trend report per ticker
    Trend {
        /// Ticker symbol(s) to analyze (comma-separated)
        #[arg(short, long, default_value = "AAPL,GOOGL,MSFT")]
        tickers: String,
        /// Short moving-average window in trading days
        #[arg(long, default_value_t = 50)]
        short_window: usize,
        /// Long moving-average window in trading days
        #[arg(long, default_value_t = 200)]
        long_window: usize,
        /// Calendar days of history to fetch
        #[arg(long, default_value_t = 365)]
        days: i64,
    },
    /// Print quote snapshots followed by trend reports
    Report {
        /// Ticker symbol(s) to cover (comma-separated)
        #[arg(short, long, default_value = "AAPL,GOOGL,MSFT")]
        tickers: String,
        /// Short moving-average window in trading days
        #[arg(long, default_value_t = 50)]
        short_window: usize,
        /// Long moving-average window in trading days
        #[arg(long, default_value_t = 200)]
        long_window: usize,
        /// Calendar days of history to fetch
        #[arg(long, default_value_t = 365)]
        days: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    init_logger()?;

    let cli = Cli::parse();

    let mut client =
        YahooClient::new(true, 30).context("failed to build market data client")?;

    match cli.command {
        Commands::Quote { tickers } => {
            let tickers = split_tickers(&tickers);
            ensure!(!tickers.is_empty(), "no tickers given");

            println!("Stock Price Fetching:");
            let failed = run_quotes(&mut client, &tickers).await;
            ensure!(failed < tickers.len(), "all {} tickers failed", tickers.len());
        }
        Commands::Trend {
            tickers,
            short_window,
            long_window,
            days,
        } => {
            let tickers = split_tickers(&tickers);
            ensure!(!tickers.is_empty(), "no tickers given");

            println!("Moving Average Analysis:");
            let failed =
                run_trends(&mut client, &tickers, short_window, long_window, days).await;
            ensure!(failed < tickers.len(), "all {} tickers failed", tickers.len());
        }
        Commands::Report {
            tickers,
            short_window,
            long_window,
            days,
        } => {
            let tickers = split_tickers(&tickers);
            ensure!(!tickers.is_empty(), "no tickers given");

            println!("Stock Price Fetching:");
            let failed_quotes = run_quotes(&mut client, &tickers).await;

            println!();
            println!("Moving Average Analysis:");
            let failed_trends =
                run_trends(&mut client, &tickers, short_window, long_window, days).await;

            ensure!(
                failed_quotes + failed_trends < tickers.len() * 2,
                "all requests for {} tickers failed",
                tickers.len()
            );
        }
    }

    Ok(())
}

/// Fetch and print a quote snapshot per ticker, sequentially.
/// Returns the number of tickers that failed.
async fn run_quotes<S: MarketDataSource>(source: &mut S, tickers: &[String]) -> usize {
    let mut failed = 0;
    for ticker in tickers {
        info!("fetching quote for {}", ticker);
        println!();
        println!("Stock Price for {}:", ticker);
        match source.fetch_quote(ticker).await {
            Ok(quote) => print_quote(&quote),
            Err(e) => {
                warn!("quote fetch failed for {}: {}", ticker, e);
                println!("  Error: {e}");
                failed += 1;
            }
        }
    }
    failed
}

/// Fetch daily closes and print a trend report per ticker, sequentially.
/// Returns the number of tickers that failed.
async fn run_trends<S: MarketDataSource>(
    source: &mut S,
    tickers: &[String],
    short_window: usize,
    long_window: usize,
    days: i64,
) -> usize {
    let mut failed = 0;
    for ticker in tickers {
        info!("analyzing trend for {}", ticker);
        println!();
        println!("Stock Analysis for {}:", ticker);
        match trend_for_ticker(source, ticker, short_window, long_window, days).await {
            Ok(report) => print_trend_report(&report),
            Err(e) => {
                warn!("trend analysis failed for {}: {:#}", ticker, e);
                println!("  Error: {e:#}");
                failed += 1;
            }
        }
    }
    failed
}

async fn trend_for_ticker<S: MarketDataSource>(
    source: &mut S,
    ticker: &str,
    short_window: usize,
    long_window: usize,
    days: i64,
) -> anyhow::Result<TrendReport> {
    let (start, end) = lookback_range(days);
    let series = source.fetch_daily_closes(ticker, start, end).await?;
    debug!("{}: {} daily closes fetched", ticker, series.len());
    Ok(analyze(&series, short_window, long_window)?)
}

fn split_tickers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn print_quote(quote: &QuoteSnapshot) {
    println!("  Company Name: {}", text_or_na(quote.company_name.as_deref()));
    println!("  Current Price: {}", price_or_na(quote.current_price));
    println!("  Previous Close: {}", price_or_na(quote.previous_close));
    println!(
        "  Market Cap: {}",
        quote
            .market_cap
            .map(|c| c.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    );
}

fn print_trend_report(report: &TrendReport) {
    println!("  Current Price: {:.2}", report.current_price);
    println!("  {}-Day MA: {:.2}", report.short_window, report.short_average);
    println!("  {}-Day MA: {:.2}", report.long_window, report.long_average);
    println!("  Trend: {}", report.trend);
}

fn price_or_na(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "N/A".to_string())
}

fn text_or_na(value: Option<&str>) -> String {
    value.unwrap_or("N/A").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tickertrend::models::{PricePoint, PriceSeries};
    use tickertrend::services::SourceError;

    /// Test double: serves a fixed ascending series, fails configured tickers.
    struct StubSource {
        failing: Vec<String>,
    }

    #[async_trait::async_trait]
    impl MarketDataSource for StubSource {
        async fn fetch_daily_closes(
            &mut self,
            ticker: &str,
            start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<PriceSeries, SourceError> {
            if self.failing.iter().any(|t| t == ticker) {
                return Err(SourceError::DataUnavailable);
            }
            let points = (0..5)
                .map(|i| {
                    PricePoint::new(start + chrono::Duration::days(i), 10.0 * (i + 1) as f64)
                })
                .collect();
            Ok(PriceSeries::from_points(ticker, points).expect("stub series is valid"))
        }

        async fn fetch_quote(&mut self, ticker: &str) -> Result<QuoteSnapshot, SourceError> {
            if self.failing.iter().any(|t| t == ticker) {
                return Err(SourceError::DataUnavailable);
            }
            let mut quote = QuoteSnapshot::empty(ticker);
            quote.current_price = Some(50.0);
            Ok(quote)
        }
    }

    #[test]
    fn test_split_tickers() {
        assert_eq!(split_tickers("AAPL,GOOGL,MSFT").len(), 3);
        assert_eq!(split_tickers(" aapl , msft "), vec!["AAPL", "MSFT"]);
        assert!(split_tickers(",,").is_empty());
    }

    #[tokio::test]
    async fn test_run_trends_counts_failures_and_continues() {
        let mut source = StubSource {
            failing: vec!["BAD".to_string()],
        };
        let tickers = vec!["AAPL".to_string(), "BAD".to_string(), "MSFT".to_string()];
        let failed = run_trends(&mut source, &tickers, 2, 3, 30).await;
        assert_eq!(failed, 1);
    }

    #[tokio::test]
    async fn test_run_quotes_counts_failures() {
        let mut source = StubSource {
            failing: vec!["BAD".to_string(), "WORSE".to_string()],
        };
        let tickers = vec!["BAD".to_string(), "WORSE".to_string()];
        let failed = run_quotes(&mut source, &tickers).await;
        assert_eq!(failed, 2);
    }

    #[tokio::test]
    async fn test_trend_for_ticker_reports_bullish_stub() {
        let mut source = StubSource { failing: vec![] };
        let report = trend_for_ticker(&mut source, "AAPL", 2, 3, 30)
            .await
            .unwrap();
        assert_eq!(report.current_price, 50.0);
        assert_eq!(report.short_average, 45.0);
        assert_eq!(report.long_average, 40.0);
    }
}
