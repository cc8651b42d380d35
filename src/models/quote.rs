use serde::{Deserialize, Serialize};

/// Point-in-time quote for a ticker.
///
/// Fields the provider does not report stay `None`; a partial quote is
/// still a usable snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub ticker: String,
    pub current_price: Option<f64>,
    pub company_name: Option<String>,
    pub previous_close: Option<f64>,
    pub market_cap: Option<u64>,
}

impl QuoteSnapshot {
    pub fn empty(ticker: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            current_price: None,
            company_name: None,
            previous_close: None,
            market_cap: None,
        }
    }
}
