use crate::analysis::round2;
use crate::models::{PricePoint, PriceSeries, QuoteSnapshot};
use crate::services::{MarketDataSource, SourceError};
use crate::utils::unix_range;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::{Duration as StdDuration, SystemTime};
use tokio::time::sleep;
use tracing::debug;

const CHART_ENDPOINT: &str = "/v8/finance/chart";
const QUOTE_ENDPOINT: &str = "/v7/finance/quote";

/// Yahoo Finance client with client-side rate limiting and retry.
pub struct YahooClient {
    client: Client,
    base_url: String,
    rate_limit_per_minute: u32,
    request_timestamps: Vec<SystemTime>,
    user_agents: Vec<String>,
    random_agent: bool,
}

impl YahooClient {
    pub fn new(random_agent: bool, rate_limit_per_minute: u32) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(30))
            .build()?;

        let user_agents = vec![
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:120.0) Gecko/20100101 Firefox/120.0".to_string(),
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.3 Safari/605.1.15".to_string(),
        ];

        Ok(YahooClient {
            client,
            base_url: "https://query1.finance.yahoo.com".to_string(),
            rate_limit_per_minute,
            request_timestamps: Vec::new(),
            user_agents,
            random_agent,
        })
    }

    fn get_user_agent(&self) -> String {
        if self.random_agent {
            use rand::seq::SliceRandom;
            self.user_agents
                .choose(&mut rand::thread_rng())
                .unwrap_or(&self.user_agents[0])
                .clone()
        } else {
            self.user_agents[0].clone()
        }
    }

    async fn enforce_rate_limit(&mut self) {
        let current_time = SystemTime::now();

        // Drop timestamps older than the one-minute window
        self.request_timestamps.retain(|&timestamp| {
            current_time
                .duration_since(timestamp)
                .unwrap_or(StdDuration::from_secs(0))
                < StdDuration::from_secs(60)
        });

        if self.request_timestamps.len() >= self.rate_limit_per_minute as usize {
            if let Some(&oldest_request) = self.request_timestamps.first() {
                let wait_time = StdDuration::from_secs(60)
                    - current_time
                        .duration_since(oldest_request)
                        .unwrap_or(StdDuration::from_secs(0));
                if !wait_time.is_zero() {
                    debug!("rate limit reached, sleeping {:?}", wait_time);
                    sleep(wait_time + StdDuration::from_millis(100)).await;
                }
            }
        }

        self.request_timestamps.push(current_time);
    }

    async fn make_request(
        &mut self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Value, SourceError> {
        const MAX_RETRIES: u32 = 5;
        let mut last_status: Option<StatusCode> = None;

        for attempt in 0..MAX_RETRIES {
            self.enforce_rate_limit().await;

            if attempt > 0 {
                let delay = StdDuration::from_secs_f64(
                    2.0_f64.powi(attempt as i32 - 1) + rand::random::<f64>(),
                );
                let delay = delay.min(StdDuration::from_secs(60));
                debug!("retry {} for {} after {:?}", attempt, url, delay);
                sleep(delay).await;
            }

            let user_agent = self.get_user_agent();

            let response = self
                .client
                .get(url)
                .query(query)
                .header("Accept", "application/json, text/plain, */*")
                .header("Accept-Language", "en-US,en;q=0.9")
                .header("Connection", "keep-alive")
                .header("Cache-Control", "no-cache")
                .header("Pragma", "no-cache")
                .header("User-Agent", user_agent)
                .header("Referer", "https://finance.yahoo.com/")
                .header("Origin", "https://finance.yahoo.com")
                .send()
                .await;

            match response {
                Ok(resp) => {
                    let status = resp.status();
                    last_status = Some(status);

                    if status.is_success() {
                        match resp.json::<Value>().await {
                            Ok(data) => return Ok(data),
                            Err(_) => continue,
                        }
                    } else if status == 403 || status == 429 || status.is_server_error() {
                        debug!("retryable status {} from {}", status, url);
                        continue;
                    } else if status.is_client_error() {
                        return Err(SourceError::InvalidResponse(format!(
                            "request failed with status {status}"
                        )));
                    } else {
                        continue;
                    }
                }
                Err(e) => {
                    debug!("request error: {}", e);
                    continue;
                }
            }
        }

        if last_status == Some(StatusCode::TOO_MANY_REQUESTS) {
            Err(SourceError::RateLimited)
        } else {
            Err(SourceError::InvalidResponse("max retries exceeded".to_string()))
        }
    }

    /// Daily OHLC chart rows for `ticker`, reduced to (date, close) pairs.
    pub async fn get_daily_history(
        &mut self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, SourceError> {
        let (period1, period2) = unix_range(start, end);
        let url = format!("{}{}/{}", self.base_url, CHART_ENDPOINT, ticker);
        let query = [
            ("period1", period1.to_string()),
            ("period2", period2.to_string()),
            ("interval", "1d".to_string()),
        ];

        let body = self.make_request(&url, &query).await?;
        parse_chart_response(ticker, &body)
    }

    /// Current quote fields for `ticker`.
    pub async fn get_quote(&mut self, ticker: &str) -> Result<QuoteSnapshot, SourceError> {
        let url = format!("{}{}", self.base_url, QUOTE_ENDPOINT);
        let query = [("symbols", ticker.to_string())];

        let body = self.make_request(&url, &query).await?;
        parse_quote_response(ticker, &body)
    }
}

#[async_trait::async_trait]
impl MarketDataSource for YahooClient {
    async fn fetch_daily_closes(
        &mut self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, SourceError> {
        self.get_daily_history(ticker, start, end).await
    }

    async fn fetch_quote(&mut self, ticker: &str) -> Result<QuoteSnapshot, SourceError> {
        self.get_quote(ticker).await
    }
}

/// Extract (date, close) rows from a `/v8/finance/chart` body.
fn parse_chart_response(ticker: &str, body: &Value) -> Result<PriceSeries, SourceError> {
    let chart = body
        .get("chart")
        .ok_or_else(|| SourceError::InvalidResponse("missing chart object".to_string()))?;

    if chart.get("error").map(|e| !e.is_null()).unwrap_or(false) {
        return Err(SourceError::DataUnavailable);
    }

    let result = chart
        .get("result")
        .and_then(|r| r.as_array())
        .filter(|r| !r.is_empty())
        .ok_or(SourceError::DataUnavailable)?;

    let item = &result[0];
    let timestamps = item
        .get("timestamp")
        .and_then(|t| t.as_array())
        .ok_or(SourceError::DataUnavailable)?;
    let closes = item
        .get("indicators")
        .and_then(|i| i.get("quote"))
        .and_then(|q| q.as_array())
        .and_then(|q| q.first())
        .and_then(|q| q.get("close"))
        .and_then(|c| c.as_array())
        .ok_or_else(|| SourceError::InvalidResponse("missing close quotes".to_string()))?;

    if closes.len() != timestamps.len() {
        return Err(SourceError::InvalidResponse(
            "inconsistent timestamp/close lengths".to_string(),
        ));
    }

    let mut points: Vec<PricePoint> = Vec::new();
    for (ts, close) in timestamps.iter().zip(closes.iter()) {
        // Non-trading gaps come back as null closes
        let close = match close.as_f64() {
            Some(c) => c,
            None => continue,
        };
        let ts = ts.as_i64().ok_or_else(|| {
            SourceError::InvalidResponse(format!("invalid timestamp: {ts:?}"))
        })?;
        let date = DateTime::<Utc>::from_timestamp(ts, 0)
            .ok_or_else(|| {
                SourceError::InvalidResponse(format!("timestamp out of range: {ts}"))
            })?
            .date_naive();

        // The live candle repeats the last date with an intraday close;
        // keep only the most recent row per date
        match points.last_mut() {
            Some(last) if last.date == date => last.close = close,
            _ => points.push(PricePoint::new(date, close)),
        }
    }

    if points.is_empty() {
        return Err(SourceError::DataUnavailable);
    }

    points.sort_by_key(|p| p.date);
    Ok(PriceSeries::from_points(ticker, points)?)
}

/// Extract snapshot fields from a `/v7/finance/quote` body.
fn parse_quote_response(ticker: &str, body: &Value) -> Result<QuoteSnapshot, SourceError> {
    let result = body
        .get("quoteResponse")
        .and_then(|q| q.get("result"))
        .and_then(|r| r.as_array())
        .ok_or_else(|| SourceError::InvalidResponse("missing quote result".to_string()))?;

    let item = result.first().ok_or(SourceError::DataUnavailable)?;

    let mut snapshot = QuoteSnapshot::empty(ticker);
    if let Some(price) = item.get("regularMarketPrice").and_then(|v| v.as_f64()) {
        snapshot.current_price = Some(round2(price));
    }
    if let Some(name) = item.get("longName").and_then(|v| v.as_str()) {
        snapshot.company_name = Some(name.to_string());
    }
    if let Some(prev) = item
        .get("regularMarketPreviousClose")
        .and_then(|v| v.as_f64())
    {
        snapshot.previous_close = Some(round2(prev));
    }
    if let Some(cap) = item.get("marketCap").and_then(|v| v.as_u64()) {
        snapshot.market_cap = Some(cap);
    }

    Ok(snapshot)
}
