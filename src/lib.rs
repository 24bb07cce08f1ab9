//! pnlcal: trading-journal P&L calendar.
//!
//! Hexagonal architecture: CSV parsing, aggregation and formatting in
//! [`domain`], port traits in [`ports`], concrete implementations in
//! [`adapters`], command-line wiring in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;

pub use domain::aggregate::{group_by_month, group_by_month_in, DayAggregate, MonthAggregate, MonthKey};
pub use domain::format::format_currency;
pub use domain::record_parser::parse_csv;
pub use domain::trade::TradeRecord;
