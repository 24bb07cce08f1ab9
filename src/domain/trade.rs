//! Trade record: one row of the broker transaction-history export.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, TimeZone};

/// Number of positional columns a data row must carry.
pub const TRADE_COLUMNS: usize = 16;

const NAIVE_DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// A parsed, deduplicated trade. Text columns are kept exactly as exported;
/// only the P&L amount is converted to a number.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub text_date: String,
    pub summary: String,
    pub market_name: String,
    pub period: String,
    pub profit_and_loss: String,
    pub transaction_type: String,
    pub reference: String,
    pub open_level: String,
    pub close_level: String,
    pub size: String,
    pub currency: String,
    pub pl_amount: f64,
    pub cash_transaction: String,
    pub date_utc: String,
    pub open_date_utc: String,
    pub currency_iso_code: String,
}

impl TradeRecord {
    /// Close timestamp as seen from `tz`, or `None` if it does not parse.
    pub fn close_time_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        parse_timestamp(&self.date_utc, tz)
    }

    pub fn open_time_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        parse_timestamp(&self.open_date_utc, tz)
    }

    /// Market name without the " converted at <rate>" suffix some exports append.
    pub fn ticker(&self) -> &str {
        clean_market_name(&self.market_name)
    }

    /// |close - open| when both levels are numeric.
    pub fn points(&self) -> Option<f64> {
        let open = parse_float_prefix(&self.open_level)?;
        let close = parse_float_prefix(&self.close_level)?;
        Some((close - open).abs())
    }
}

/// Text before the first `<whitespace>converted at`, or the whole name.
pub fn clean_market_name(name: &str) -> &str {
    for (idx, _) in name.match_indices("converted at") {
        let prefix = &name[..idx];
        let trimmed = prefix.trim_end();
        if trimmed.len() < prefix.len() && !trimmed.is_empty() {
            return trimmed;
        }
    }
    name
}

/// Parse a timestamp column into `tz`.
///
/// Values carrying an offset are converted; naive date-times are taken as
/// wall-clock time in `tz`; bare dates are UTC midnight.
///
/// A wall-clock time skipped by a daylight-saving jump is moved forward past
/// the gap, so the trade stays on its calendar day.
pub fn parse_timestamp<Tz: TimeZone>(value: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(tz));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return from_wall_clock(naive, tz);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().with_timezone(tz))
}

fn from_wall_clock<Tz: TimeZone>(naive: NaiveDateTime, tz: &Tz) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&naive).earliest().or_else(|| {
        let shifted = naive.checked_add_signed(TimeDelta::hours(1))?;
        tz.from_local_datetime(&shifted).earliest()
    })
}

/// Parse the longest leading `-?digits[.digits]` literal, ignoring the rest.
///
/// Returns `None` when no digit is found before the literal ends.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    let mut digits = 0;

    if bytes.first() == Some(&b'-') || bytes.first() == Some(&b'+') {
        end = 1;
    }
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        let mut frac_digits = 0;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
            frac_digits += 1;
        }
        if digits + frac_digits > 0 {
            end = frac_end;
            digits += frac_digits;
        }
    }

    if digits == 0 {
        return None;
    }
    text[..end].parse::<f64>().ok().filter(|v| !v.is_nan())
}
