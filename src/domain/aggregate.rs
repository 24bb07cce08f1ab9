//! Month/day P&L aggregation.
//!
//! Records are bucketed by the calendar date of their close timestamp. The
//! result is unordered; use [`crate::domain::views::sorted_months`] when a
//! (year, month) sequence is needed.

use std::collections::HashMap;
use std::fmt;

use chrono::{Datelike, Local, TimeZone};
use tracing::warn;

use super::trade::TradeRecord;

/// Calendar month key. `month` is zero-based (0 = January).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayAggregate {
    /// Close timestamp text of the first trade routed into this day.
    pub date: String,
    pub total_pl: f64,
    pub trade_count: usize,
    pub transactions: Vec<TradeRecord>,
}

impl DayAggregate {
    fn new(date: String) -> Self {
        Self {
            date,
            total_pl: 0.0,
            trade_count: 0,
            transactions: Vec::new(),
        }
    }

    fn add(&mut self, record: &TradeRecord) {
        self.total_pl += record.pl_amount;
        self.trade_count += 1;
        self.transactions.push(record.clone());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthAggregate {
    pub year: i32,
    /// Zero-based month index.
    pub month: u32,
    pub total_pl: f64,
    /// Keyed by day of month (1-31); days without trades have no entry.
    pub days: HashMap<u32, DayAggregate>,
}

impl MonthAggregate {
    fn new(key: MonthKey) -> Self {
        Self {
            year: key.year,
            month: key.month,
            total_pl: 0.0,
            days: HashMap::new(),
        }
    }

    pub fn key(&self) -> MonthKey {
        MonthKey::new(self.year, self.month)
    }

    pub fn trade_count(&self) -> usize {
        self.days.values().map(|d| d.trade_count).sum()
    }

    /// Day aggregates ordered by day of month.
    pub fn sorted_days(&self) -> Vec<(u32, &DayAggregate)> {
        let mut days: Vec<_> = self.days.iter().map(|(&d, agg)| (d, agg)).collect();
        days.sort_by_key(|(d, _)| *d);
        days
    }
}

/// Group records by month and day in the process's local time zone.
pub fn group_by_month(records: &[TradeRecord]) -> HashMap<MonthKey, MonthAggregate> {
    group_by_month_in(records, &Local)
}

/// Group records by month and day as seen from `tz`.
///
/// Records whose close timestamp cannot be parsed are left out.
pub fn group_by_month_in<Tz: TimeZone>(
    records: &[TradeRecord],
    tz: &Tz,
) -> HashMap<MonthKey, MonthAggregate> {
    let mut months: HashMap<MonthKey, MonthAggregate> = HashMap::new();

    for record in records {
        let Some(closed) = record.close_time_in(tz) else {
            warn!(
                reference = %record.reference,
                date_utc = %record.date_utc,
                "close timestamp does not parse; trade left out of calendar"
            );
            continue;
        };

        let key = MonthKey::new(closed.year(), closed.month0());
        let month = months
            .entry(key)
            .or_insert_with(|| MonthAggregate::new(key));

        month
            .days
            .entry(closed.day())
            .or_insert_with(|| DayAggregate::new(record.date_utc.clone()))
            .add(record);
        month.total_pl += record.pl_amount;
    }

    months
}
