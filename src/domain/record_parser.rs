//! Transaction-history CSV parsing.
//!
//! Best-effort: rows that are too short, repeat a reference, or carry an
//! unreadable amount never abort the parse. The first line is always the
//! header. Quoted fields are not supported; every comma separates a field.

use std::collections::HashSet;

use csv::{ReaderBuilder, StringRecord, Terminator};
use tracing::debug;

use super::trade::{parse_float_prefix, TradeRecord, TRADE_COLUMNS};

const REFERENCE_COLUMN: usize = 6;
const AMOUNT_COLUMN: usize = 11;

/// Counters describing what a parse skipped or defaulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Non-empty data lines seen after the header.
    pub rows: usize,
    pub short_rows: usize,
    pub duplicate_rows: usize,
    /// Accepted rows whose amount column held no number and became 0.
    pub zero_amount_fallbacks: usize,
}

impl ParseStats {
    pub fn accepted(&self) -> usize {
        self.rows - self.short_rows - self.duplicate_rows
    }
}

/// Parse raw export text into trade records, first occurrence of each
/// reference winning.
pub fn parse_csv(text: &str) -> Vec<TradeRecord> {
    parse_csv_with_stats(text).0
}

pub fn parse_csv_with_stats(text: &str) -> (Vec<TradeRecord>, ParseStats) {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut stats = ParseStats::default();

    // Header fields are never consulted.
    let Some((_header, body)) = text.split_once('\n') else {
        return (Vec::new(), stats);
    };

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .terminator(Terminator::Any(b'\n'))
        .from_reader(body.as_bytes());

    let mut records = Vec::new();
    let mut seen_references = HashSet::new();

    for (index, result) in rdr.records().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                debug!(row = index + 1, error = %e, "skipping unreadable row");
                continue;
            }
        };

        let fields = trimmed_fields(&row);
        if fields.len() == 1 && fields[0].is_empty() {
            continue;
        }
        stats.rows += 1;

        if fields.len() < TRADE_COLUMNS {
            debug!(row = index + 1, fields = fields.len(), "skipping short row");
            stats.short_rows += 1;
            continue;
        }

        let reference = fields[REFERENCE_COLUMN];
        if !seen_references.insert(reference.to_string()) {
            debug!(row = index + 1, reference, "skipping duplicate reference");
            stats.duplicate_rows += 1;
            continue;
        }

        let pl_amount = match parse_amount(fields[AMOUNT_COLUMN]) {
            Some(amount) => amount,
            None => {
                stats.zero_amount_fallbacks += 1;
                0.0
            }
        };

        records.push(TradeRecord {
            text_date: fields[0].to_string(),
            summary: fields[1].to_string(),
            market_name: fields[2].to_string(),
            period: fields[3].to_string(),
            profit_and_loss: fields[4].to_string(),
            transaction_type: fields[5].to_string(),
            reference: reference.to_string(),
            open_level: fields[7].to_string(),
            close_level: fields[8].to_string(),
            size: fields[9].to_string(),
            currency: fields[10].to_string(),
            pl_amount,
            cash_transaction: fields[12].to_string(),
            date_utc: fields[13].to_string(),
            open_date_utc: fields[14].to_string(),
            currency_iso_code: fields[15].to_string(),
        });
    }

    (records, stats)
}

/// Keep only digits, `-` and `.`, then read the leading number.
///
/// `None` when nothing numeric remains; negative zero comes back as `0.0`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-' || *c == '.')
        .collect();
    parse_float_prefix(&cleaned).map(|v| if v == 0.0 { 0.0 } else { v })
}

// Trims the row as a whole line would be: start of the first field, end of the last.
fn trimmed_fields(row: &StringRecord) -> Vec<&str> {
    let mut fields: Vec<&str> = row.iter().collect();
    if let Some(first) = fields.first_mut() {
        *first = first.trim_start();
    }
    if let Some(last) = fields.last_mut() {
        *last = last.trim_end();
    }
    fields
}
