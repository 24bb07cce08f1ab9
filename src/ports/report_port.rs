//! Report rendering port trait.

use crate::domain::aggregate::{DayAggregate, MonthAggregate};
use crate::domain::views::{PeriodSummary, TickerSummary, YearOverview};

/// Everything the month view needs besides the aggregate itself.
pub struct MonthSummaryRow<'a> {
    pub month: &'a MonthAggregate,
    pub active_days: usize,
}

/// One trade line of a ticker drill-down.
pub struct TradeLine<'a> {
    pub record: &'a crate::domain::trade::TradeRecord,
    /// Already formatted `h:mm:ss`, or `-` when unknown.
    pub duration: String,
}

/// Port for turning aggregates into printable reports.
pub trait ReportPort {
    fn month_list(&self, rows: &[MonthSummaryRow<'_>]) -> String;

    fn month_calendar(&self, month: &MonthAggregate) -> String;

    fn year_grid(&self, overview: &YearOverview) -> String;

    fn week_grid(&self, year: i32, weeks: &[PeriodSummary]) -> String;

    fn day_detail(&self, title: &str, day: &DayAggregate, tickers: &[TickerSummary]) -> String;

    fn ticker_trades(&self, title: &str, ticker: &str, trades: &[TradeLine<'_>]) -> String;

    fn market_list(&self, markets: &[(String, usize)]) -> String;
}
