//! Derived views over parsed trades: market filtering, month ordering, and
//! year / week / day breakdowns used by the report renderers.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, TimeDelta, TimeZone};

use super::aggregate::{DayAggregate, MonthAggregate, MonthKey};
use super::trade::TradeRecord;

/// Totals for one slot of a year or week grid.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    /// Zero-based month for year grids, one-based week number for week grids.
    pub index: u32,
    pub total_pl: f64,
    pub trade_count: usize,
    /// Zero-based month of the first trade in the slot.
    pub first_month: Option<u32>,
}

impl PeriodSummary {
    fn empty(index: u32) -> Self {
        Self {
            index,
            total_pl: 0.0,
            trade_count: 0,
            first_month: None,
        }
    }

    fn add(&mut self, record: &TradeRecord, month0: u32) {
        self.total_pl += record.pl_amount;
        self.trade_count += 1;
        self.first_month.get_or_insert(month0);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearOverview {
    pub year: i32,
    /// Always twelve entries, January first.
    pub months: Vec<PeriodSummary>,
    pub total_pl: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickerSummary {
    pub ticker: String,
    pub total_pl: f64,
    pub trade_count: usize,
    pub total_points: f64,
}

/// Clean market names, most traded first; ties keep first-seen order.
pub fn market_names(records: &[TradeRecord]) -> Vec<String> {
    market_counts(records)
        .into_iter()
        .map(|(name, _)| name)
        .collect()
}

/// Clean market names with their trade counts, ordered as [`market_names`].
pub fn market_counts(records: &[TradeRecord]) -> Vec<(String, usize)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let name = record.ticker();
        let count = counts.entry(name).or_insert(0);
        if *count == 0 {
            order.push(name);
        }
        *count += 1;
    }

    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order
        .into_iter()
        .map(|name| (name.to_string(), counts[name]))
        .collect()
}

/// Keep trades of one clean market name. `None` or `"all"` keeps everything.
pub fn filter_by_market(records: &[TradeRecord], market: Option<&str>) -> Vec<TradeRecord> {
    match market {
        None | Some("all") => records.to_vec(),
        Some(market) => records
            .iter()
            .filter(|r| r.ticker() == market)
            .cloned()
            .collect(),
    }
}

/// Month aggregates ordered by (year, month), optionally limited to one year.
pub fn sorted_months(
    months: &HashMap<MonthKey, MonthAggregate>,
    year: Option<i32>,
) -> Vec<&MonthAggregate> {
    let mut sorted: Vec<(&MonthKey, &MonthAggregate)> = months
        .iter()
        .filter(|(key, _)| year.is_none_or(|y| key.year == y))
        .collect();
    sorted.sort_by_key(|(key, _)| **key);
    sorted.into_iter().map(|(_, month)| month).collect()
}

/// Distinct close years, ascending.
pub fn available_years<Tz: TimeZone>(records: &[TradeRecord], tz: &Tz) -> Vec<i32> {
    let mut years: Vec<i32> = records
        .iter()
        .filter_map(|r| r.close_time_in(tz))
        .map(|dt| dt.year())
        .collect();
    years.sort_unstable();
    years.dedup();
    years
}

/// Trades whose close timestamp cannot be placed on the calendar.
pub fn undated<'a, Tz: TimeZone>(records: &'a [TradeRecord], tz: &Tz) -> Vec<&'a TradeRecord> {
    records
        .iter()
        .filter(|r| r.close_time_in(tz).is_none())
        .collect()
}

pub fn year_overview<Tz: TimeZone>(records: &[TradeRecord], year: i32, tz: &Tz) -> YearOverview {
    let mut months: Vec<PeriodSummary> = (0..12).map(PeriodSummary::empty).collect();

    for record in records {
        let Some(closed) = record.close_time_in(tz) else {
            continue;
        };
        if closed.year() == year {
            months[closed.month0() as usize].add(record, closed.month0());
        }
    }

    let total_pl = months.iter().map(|m| m.total_pl).sum();
    YearOverview {
        year,
        months,
        total_pl,
    }
}

/// Sunday-start week of the year; the week holding January 1st is week 1.
pub fn week_number(date: NaiveDate) -> u32 {
    let jan1_offset = NaiveDate::from_ymd_opt(date.year(), 1, 1)
        .map(|d| d.weekday().num_days_from_sunday())
        .unwrap_or(0);
    (date.ordinal0() + jan1_offset) / 7 + 1
}

/// Number of (partial) Sunday-start weeks in `year`: 53, or 54 when a leap
/// year starts on a Saturday.
pub fn weeks_in_year(year: i32) -> u32 {
    NaiveDate::from_ymd_opt(year, 12, 31)
        .map(week_number)
        .unwrap_or(53)
}

/// One summary per week of `year`, week 1 first.
pub fn week_overview<Tz: TimeZone>(
    records: &[TradeRecord],
    year: i32,
    tz: &Tz,
) -> Vec<PeriodSummary> {
    let mut weeks: Vec<PeriodSummary> = (1..=weeks_in_year(year))
        .map(PeriodSummary::empty)
        .collect();

    for record in records {
        let Some(closed) = record.close_time_in(tz) else {
            continue;
        };
        if closed.year() != year {
            continue;
        }
        let week = week_number(closed.date_naive()) as usize;
        if let Some(slot) = weeks.get_mut(week - 1) {
            slot.add(record, closed.month0());
        }
    }

    weeks
}

/// Per-ticker totals for one day, largest absolute P&L first.
pub fn ticker_summary(day: &DayAggregate) -> Vec<TickerSummary> {
    let mut summaries: Vec<TickerSummary> = Vec::new();

    for record in &day.transactions {
        let ticker = record.ticker();
        let idx = match summaries.iter().position(|s| s.ticker == ticker) {
            Some(idx) => idx,
            None => {
                summaries.push(TickerSummary {
                    ticker: ticker.to_string(),
                    total_pl: 0.0,
                    trade_count: 0,
                    total_points: 0.0,
                });
                summaries.len() - 1
            }
        };

        let summary = &mut summaries[idx];
        summary.total_pl += record.pl_amount;
        summary.trade_count += 1;
        if let Some(points) = record.points() {
            summary.total_points += points;
        }
    }

    summaries.sort_by(|a, b| b.total_pl.abs().total_cmp(&a.total_pl.abs()));
    summaries
}

pub fn ticker_trades<'a>(day: &'a DayAggregate, ticker: &str) -> Vec<&'a TradeRecord> {
    day.transactions
        .iter()
        .filter(|r| r.ticker() == ticker)
        .collect()
}

/// Time the position was open; `None` when a timestamp is missing or the
/// close precedes the open.
pub fn trade_duration<Tz: TimeZone>(record: &TradeRecord, tz: &Tz) -> Option<TimeDelta> {
    let open = record.open_time_in(tz)?;
    let close = record.close_time_in(tz)?;
    let held = close.signed_duration_since(open);
    (held >= TimeDelta::zero()).then_some(held)
}

/// `h:mm:ss`, hours unbounded.
pub fn format_duration(held: TimeDelta) -> String {
    let secs = held.num_seconds();
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
