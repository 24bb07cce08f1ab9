//! Plain-text report adapter implementing ReportPort.
//!
//! Renders calendar grids and drill-down tables for a terminal. Amounts in
//! grids use the abbreviated currency label; tables add the exact figure.


use chrono::{Datelike, NaiveDate};

use crate::domain::aggregate::{DayAggregate, MonthAggregate};
use crate::domain::format::format_currency;
use crate::domain::views::{PeriodSummary, TickerSummary, YearOverview};
use crate::ports::report_port::{MonthSummaryRow, ReportPort, TradeLine};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];
const CELL: usize = 9;
const WEEK_COLUMNS: usize = 6;
const YEAR_COLUMNS: usize = 4;

pub struct TextReportAdapter {
    exact_amounts: bool,
}

impl TextReportAdapter {
    pub fn new() -> Self {
        Self {
            exact_amounts: false,
        }
    }

    /// Also print two-decimal amounts next to abbreviated ones in tables.
    pub fn with_exact_amounts(mut self, exact: bool) -> Self {
        self.exact_amounts = exact;
        self
    }

    fn amount(&self, value: f64) -> String {
        if self.exact_amounts {
            format!("{} ({:.2})", format_currency(value), value)
        } else {
            format_currency(value)
        }
    }
}

impl Default for TextReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn month_name(month0: u32) -> &'static str {
    MONTH_NAMES.get(month0 as usize).copied().unwrap_or("?")
}

fn days_in_month(year: i32, month0: u32) -> u32 {
    let (next_year, next_month) = if month0 >= 11 {
        (year + 1, 1)
    } else {
        (year, month0 + 2)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

// Three text lines per cell: label, amount, trade count.
fn push_cell_rows(out: &mut String, cells: &[Option<(String, f64, usize)>]) {
    let mut labels = String::new();
    let mut amounts = String::new();
    let mut counts = String::new();

    for cell in cells {
        match cell {
            Some((label, total, count)) if *count > 0 => {
                labels.push_str(&format!("{label:<CELL$}"));
                amounts.push_str(&format!("{:<CELL$}", format_currency(*total)));
                counts.push_str(&format!("{:<CELL$}", format!("T:{count}")));
            }
            Some((label, _, _)) => {
                labels.push_str(&format!("{label:<CELL$}"));
                amounts.push_str(&format!("{:<CELL$}", "-"));
                counts.push_str(&format!("{:<CELL$}", ""));
            }
            None => {
                labels.push_str(&format!("{:<CELL$}", ""));
                amounts.push_str(&format!("{:<CELL$}", ""));
                counts.push_str(&format!("{:<CELL$}", ""));
            }
        }
    }

    for line in [labels, amounts, counts] {
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

impl ReportPort for TextReportAdapter {
    fn month_list(&self, rows: &[MonthSummaryRow<'_>]) -> String {
        let mut out = String::new();
        out.push_str(&format!("{:<16}{:>8}{:>14}{:>8}{:>6}\n", "Month", "Total", "Exact", "Trades", "Days"));
        for row in rows {
            let m = row.month;
            out.push_str(&format!(
                "{:<16}{:>8}{:>14.2}{:>8}{:>6}\n",
                format!("{} {}", month_name(m.month), m.year),
                format_currency(m.total_pl),
                m.total_pl,
                m.trade_count(),
                row.active_days,
            ));
        }
        out
    }

    fn month_calendar(&self, month: &MonthAggregate) -> String {
        let mut out = String::new();
        out.push_str(&format!("{} {}\n", month_name(month.month), month.year));
        out.push_str(&format!("Total: {}\n", self.amount(month.total_pl)));
        out.push('\n');

        let header: String = WEEKDAYS.iter().map(|d| format!("{d:<CELL$}")).collect();
        out.push_str(header.trim_end());
        out.push('\n');

        let lead = NaiveDate::from_ymd_opt(month.year, month.month + 1, 1)
            .map(|d| d.weekday().num_days_from_sunday() as usize)
            .unwrap_or(0);
        let mut cells: Vec<Option<(String, f64, usize)>> = vec![None; lead];
        for day in 1..=days_in_month(month.year, month.month) {
            let (total, count) = month
                .days
                .get(&day)
                .map(|d| (d.total_pl, d.trade_count))
                .unwrap_or((0.0, 0));
            cells.push(Some((day.to_string(), total, count)));
        }

        for week in cells.chunks(7) {
            push_cell_rows(&mut out, week);
        }
        out
    }

    fn year_grid(&self, overview: &YearOverview) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", overview.year));
        out.push_str(&format!("Total: {}\n", self.amount(overview.total_pl)));
        out.push('\n');

        let cells: Vec<_> = overview
            .months
            .iter()
            .map(|m| {
                let label = month_name(m.index)[..3].to_uppercase();
                Some((label, m.total_pl, m.trade_count))
            })
            .collect();
        for row in cells.chunks(YEAR_COLUMNS) {
            push_cell_rows(&mut out, row);
        }
        out
    }

    fn week_grid(&self, year: i32, weeks: &[PeriodSummary]) -> String {
        let mut out = String::new();
        out.push_str(&format!("{year} by week\n"));
        out.push('\n');

        let cells: Vec<_> = weeks
            .iter()
            .map(|w| Some((format!("W{}", w.index), w.total_pl, w.trade_count)))
            .collect();
        for row in cells.chunks(WEEK_COLUMNS) {
            push_cell_rows(&mut out, row);
        }
        out
    }

    fn day_detail(&self, title: &str, day: &DayAggregate, tickers: &[TickerSummary]) -> String {
        let mut out = String::new();
        out.push_str(&format!("Trading Details: {title}\n"));
        out.push_str(&format!(
            "Total Trades: {}  Total P&L: {}\n",
            day.trade_count,
            self.amount(day.total_pl)
        ));
        out.push('\n');
        out.push_str(&format!("{:<32}{:>8}{:>12}{:>10}\n", "Ticker", "Trades", "P&L", "Points"));
        for t in tickers {
            out.push_str(&format!(
                "{:<32}{:>8}{:>12}{:>10.1}\n",
                t.ticker,
                t.trade_count,
                self.amount(t.total_pl),
                t.total_points
            ));
        }
        out
    }

    fn ticker_trades(&self, title: &str, ticker: &str, trades: &[TradeLine<'_>]) -> String {
        let total: f64 = trades.iter().map(|t| t.record.pl_amount).sum();
        let mut out = String::new();
        out.push_str(&format!("{ticker}: {title}\n"));
        out.push_str(&format!("Trades: {}  Total P&L: {}\n", trades.len(), self.amount(total)));
        out.push('\n');
        out.push_str(&format!(
            "{:<14}{:>8}{:>12}{:>12}{:>12}{:>10}\n",
            "Reference", "Size", "Open", "Close", "P&L", "Held"
        ));
        for line in trades {
            let r = line.record;
            out.push_str(&format!(
                "{:<14}{:>8}{:>12}{:>12}{:>12.2}{:>10}\n",
                r.reference, r.size, r.open_level, r.close_level, r.pl_amount, line.duration
            ));
        }
        out
    }

    fn market_list(&self, markets: &[(String, usize)]) -> String {
        let mut out = String::new();
        for (name, count) in markets {
            out.push_str(&format!("{count:>6}  {name}\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregate::{group_by_month_in, MonthKey};
    use crate::domain::trade::TradeRecord;
    use crate::domain::views::{ticker_summary, week_overview, year_overview};
    use chrono::Utc;

    fn trade(reference: &str, amount: f64, close: &str) -> TradeRecord {
        TradeRecord {
            text_date: String::new(),
            summary: "Trade".into(),
            market_name: "Germany 40".into(),
            period: "DFB".into(),
            profit_and_loss: String::new(),
            transaction_type: "DEAL".into(),
            reference: reference.into(),
            open_level: "100".into(),
            close_level: "110".into(),
            size: "2".into(),
            currency: "£".into(),
            pl_amount: amount,
            cash_transaction: "false".into(),
            date_utc: close.into(),
            open_date_utc: close.into(),
            currency_iso_code: "GBP".into(),
        }
    }

    #[test]
    fn days_in_month_handles_february_and_december() {
        assert_eq!(days_in_month(2024, 1), 29);
        assert_eq!(days_in_month(2023, 1), 28);
        assert_eq!(days_in_month(2024, 11), 31);
        assert_eq!(days_in_month(2024, 3), 30);
    }

    #[test]
    fn calendar_places_first_day_under_its_weekday() {
        // 2024-02-01 is a Thursday
        let records = vec![trade("A", 1500.0, "2024-02-01T10:00:00")];
        let months = group_by_month_in(&records, &Utc);
        let text = TextReportAdapter::new().month_calendar(&months[&MonthKey::new(2024, 1)]);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "February 2024");
        assert_eq!(lines[1], "Total: $2k");
        assert!(lines[3].starts_with("SUN"));
        let first_week = lines[4];
        assert_eq!(first_week.find('1'), Some(4 * CELL));
        assert!(lines[5].contains("$2k"));
        assert!(lines[6].contains("T:1"));
        assert!(text.contains("29"));
        assert!(!text.contains("30"));
    }

    #[test]
    fn exact_amounts_add_two_decimals() {
        let records = vec![trade("A", -12.5, "2024-02-01T10:00:00")];
        let months = group_by_month_in(&records, &Utc);
        let text = TextReportAdapter::new()
            .with_exact_amounts(true)
            .month_calendar(&months[&MonthKey::new(2024, 1)]);
        assert!(text.contains("Total: -$12 (-12.50)"));
    }

    #[test]
    fn month_list_has_one_line_per_month() {
        let records = vec![
            trade("A", 10.0, "2024-01-05T10:00:00"),
            trade("B", 20.0, "2024-01-06T10:00:00"),
            trade("C", -5.0, "2024-03-01T10:00:00"),
        ];
        let months = group_by_month_in(&records, &Utc);
        let jan = &months[&MonthKey::new(2024, 0)];
        let mar = &months[&MonthKey::new(2024, 2)];
        let rows = vec![
            MonthSummaryRow { month: jan, active_days: jan.days.len() },
            MonthSummaryRow { month: mar, active_days: mar.days.len() },
        ];

        let text = TextReportAdapter::new().month_list(&rows);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("January 2024"));
        assert!(lines[1].contains("$30"));
        assert!(lines[1].contains("30.00"));
        assert!(lines[2].contains("-$5"));
    }

    #[test]
    fn year_grid_shows_all_months() {
        let records = vec![trade("A", 10.0, "2024-05-05T10:00:00")];
        let text = TextReportAdapter::new().year_grid(&year_overview(&records, 2024, &Utc));
        for label in ["JAN", "MAY", "DEC"] {
            assert!(text.contains(label));
        }
        assert!(text.contains("T:1"));
        assert!(text.contains("Total: $10"));
    }

    #[test]
    fn week_grid_labels_every_week() {
        let records = vec![trade("A", 10.0, "2023-12-31T10:00:00")];
        let text = TextReportAdapter::new().week_grid(2023, &week_overview(&records, 2023, &Utc));
        assert!(text.contains("W1"));
        assert!(text.contains("W53"));
        assert!(text.contains("$10"));
    }

    #[test]
    fn day_detail_lists_tickers() {
        let records = vec![
            trade("A", 10.0, "2024-05-05T10:00:00"),
            trade("B", 15.0, "2024-05-05T11:00:00"),
        ];
        let months = group_by_month_in(&records, &Utc);
        let day = &months[&MonthKey::new(2024, 4)].days[&5];
        let text = TextReportAdapter::new().day_detail("May 5, 2024", day, &ticker_summary(day));

        assert!(text.contains("Trading Details: May 5, 2024"));
        assert!(text.contains("Total Trades: 2"));
        assert!(text.contains("Germany 40"));
        assert!(text.contains("20.0"));
    }

    #[test]
    fn ticker_trades_table() {
        let record = trade("DEAL1", 7.5, "2024-05-05T10:00:00");
        let lines = vec![TradeLine { record: &record, duration: "0:00:00".into() }];
        let text = TextReportAdapter::new().ticker_trades("May 5, 2024", "Germany 40", &lines);

        assert!(text.starts_with("Germany 40: May 5, 2024"));
        assert!(text.contains("DEAL1"));
        assert!(text.contains("7.50"));
        assert!(text.contains("0:00:00"));
    }

    #[test]
    fn market_list_shows_counts() {
        let text = TextReportAdapter::new()
            .market_list(&[("Gold".to_string(), 3), ("Oil".to_string(), 1)]);
        assert_eq!(text, "     3  Gold\n     1  Oil\n");
    }
}
