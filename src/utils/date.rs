use chrono::{Datelike, NaiveDate, Utc, Weekday};

/// Parse a YYYY-MM-DD date string.
pub fn parse_date(date_str: &str) -> anyhow::Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(date_str, "%Y-%m-%d")?)
}

/// Format a date as YYYY-MM-DD.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Check if it's weekend (Saturday or Sunday)
pub fn is_weekend(date: NaiveDate) -> bool {
    let weekday = date.weekday();
    weekday == Weekday::Sat || weekday == Weekday::Sun
}

/// Latest trading day (weekends roll back to Friday).
pub fn latest_trading_day() -> NaiveDate {
    let today = Utc::now().date_naive();
    match today.weekday() {
        Weekday::Sun => today - chrono::Duration::days(2),
        Weekday::Sat => today - chrono::Duration::days(1),
        _ => today,
    }
}

/// Lookback range of `days` calendar days ending at the latest trading day.
pub fn lookback_range(days: i64) -> (NaiveDate, NaiveDate) {
    let end = latest_trading_day();
    (end - chrono::Duration::days(days), end)
}

/// Unix-second bounds for a provider history query: midnight UTC at `start`
/// up to midnight UTC after `end`, so the final trading day is included.
pub fn unix_range(start: NaiveDate, end: NaiveDate) -> (i64, i64) {
    (day_start(start), day_start(end + chrono::Duration::days(1)))
}

fn day_start(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}
