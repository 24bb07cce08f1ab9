//! CLI definition and dispatch.

use chrono::{Datelike, Local, NaiveDate, TimeZone, Utc};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvFileAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report::{month_name, TextReportAdapter};
use crate::domain::aggregate::{group_by_month_in, MonthKey};
use crate::domain::config_validation::{journal_zone, validate_journal_config};
use crate::domain::error::JournalError;
use crate::domain::record_parser::{parse_csv_with_stats, ParseStats};
use crate::domain::trade::TradeRecord;
use crate::domain::views::{
    available_years, filter_by_market, format_duration, market_counts, sorted_months,
    ticker_summary, ticker_trades, trade_duration, undated, week_overview, year_overview,
};
use crate::domain::zone::CalendarZone;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::{MonthSummaryRow, ReportPort, TradeLine};
use crate::ports::trade_source::TradeSource;

#[derive(Parser, Debug)]
#[command(name = "pnlcal", about = "Trading journal P&L calendar", version)]
pub struct Cli {
    #[command(flatten)]
    pub source: SourceArgs,

    /// More log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Transaction history CSV, or - for stdin
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,
    /// INI settings file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Only trades of this market (clean name), or "all"
    #[arg(short, long, global = true)]
    pub market: Option<String>,
    /// Calendar time zone: local, utc or +HH:MM
    #[arg(long, global = true)]
    pub timezone: Option<String>,
    /// Write the report here instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Monthly totals, oldest first
    Months {
        #[arg(long)]
        year: Option<i32>,
    },
    /// Calendar grid of one month (latest month by default)
    Calendar {
        #[arg(long)]
        year: Option<i32>,
        /// 1-12
        #[arg(long)]
        month: Option<u32>,
    },
    /// Twelve-month grid of one year
    Year {
        #[arg(long)]
        year: Option<i32>,
    },
    /// Week-by-week grid of one year
    Weeks {
        #[arg(long)]
        year: Option<i32>,
    },
    /// Per-ticker breakdown of one day
    Day {
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        #[arg(long)]
        ticker: Option<String>,
    },
    /// Markets by number of trades
    Markets,
    /// Parse the file and report skipped rows
    Validate,
}

/// Settings after merging command-line flags over the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalSettings {
    pub file: PathBuf,
    pub zone: CalendarZone,
    pub market: Option<String>,
    pub default_year: Option<i32>,
    pub exact_amounts: bool,
}

/// A parsed export plus the settings it is viewed with.
#[derive(Debug, Clone)]
pub struct Journal {
    pub source: String,
    pub all_records: Vec<TradeRecord>,
    /// `all_records` after the market filter.
    pub records: Vec<TradeRecord>,
    pub stats: ParseStats,
    pub settings: JournalSettings,
}

impl Journal {
    pub fn from_text(source: String, text: &str, settings: JournalSettings) -> Self {
        let (all_records, stats) = parse_csv_with_stats(text);
        let records = filter_by_market(&all_records, settings.market.as_deref());
        Self {
            source,
            all_records,
            records,
            stats,
            settings,
        }
    }
}

pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn execute(cli: &Cli) -> Result<(), JournalError> {
    let config = load_config(cli.source.config.as_ref())?;
    let settings = resolve_settings(&cli.source, &config)?;

    let source = CsvFileAdapter::new(settings.file.clone());
    eprintln!("Loading trades from {}", source.describe());
    let text = source.read_text()?;
    let journal = Journal::from_text(source.describe(), &text, settings);
    eprintln!(
        "Parsed {} trades ({} rows skipped)",
        journal.all_records.len(),
        journal.stats.short_rows + journal.stats.duplicate_rows
    );

    let report = TextReportAdapter::new().with_exact_amounts(journal.settings.exact_amounts);
    let output = cli.source.output.as_ref();

    let rendered = match (&cli.command, render_command(&cli.command, &journal, &report)) {
        // validate prints its findings even when nothing parsed
        (Command::Validate, Err(JournalError::NoTrades)) => {
            emit(&render_validation(&journal), output)?;
            return Err(JournalError::NoTrades);
        }
        (_, result) => result?,
    };
    emit(&rendered, output)
}

fn emit(text: &str, output: Option<&PathBuf>) -> Result<(), JournalError> {
    match output {
        Some(path) => {
            fs::write(path, text)?;
            eprintln!("Report written to: {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, JournalError> {
    match path {
        None => Ok(FileConfigAdapter::empty()),
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            let adapter =
                FileConfigAdapter::from_file(path).map_err(|e| JournalError::ConfigParse {
                    file: path.display().to_string(),
                    reason: e.to_string(),
                })?;
            validate_journal_config(&adapter)?;
            Ok(adapter)
        }
    }
}

pub fn resolve_settings(
    args: &SourceArgs,
    config: &dyn ConfigPort,
) -> Result<JournalSettings, JournalError> {
    let file = match &args.file {
        Some(f) => f.clone(),
        None => config
            .get_string("journal", "file")
            .map(PathBuf::from)
            .ok_or_else(|| JournalError::ConfigMissing {
                section: "journal".into(),
                key: "file".into(),
            })?,
    };

    let zone = match &args.timezone {
        Some(tz) => tz.parse().map_err(|reason| JournalError::InvalidArgument {
            name: "timezone".into(),
            reason,
        })?,
        None => journal_zone(config)?,
    };

    let market = args
        .market
        .clone()
        .or_else(|| config.get_string("journal", "market"))
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty() && m != "all");

    let default_year = match config.get_int("report", "year", 0) {
        0 => None,
        y => Some(i32::try_from(y).map_err(|_| JournalError::ConfigInvalid {
            section: "report".into(),
            key: "year".into(),
            reason: format!("year out of range: {y}"),
        })?),
    };

    Ok(JournalSettings {
        file,
        zone,
        market,
        default_year,
        exact_amounts: config.get_bool("report", "exact_amounts", false),
    })
}

/// Render one subcommand against a loaded journal.
pub fn render_command(
    command: &Command,
    journal: &Journal,
    report: &dyn ReportPort,
) -> Result<String, JournalError> {
    if journal.all_records.is_empty() {
        return Err(JournalError::NoTrades);
    }
    match command {
        Command::Validate => return Ok(render_validation(journal)),
        Command::Markets => return Ok(report.market_list(&market_counts(&journal.all_records))),
        _ => {}
    }
    if journal.records.is_empty() {
        return Err(JournalError::NoData {
            period: format!("market '{}'", journal.settings.market.as_deref().unwrap_or("all")),
        });
    }

    match journal.settings.zone {
        CalendarZone::Local => render_view(command, journal, report, &Local),
        CalendarZone::Utc => render_view(command, journal, report, &Utc),
        CalendarZone::Fixed(offset) => render_view(command, journal, report, &offset),
    }
}

fn render_view<Tz: TimeZone>(
    command: &Command,
    journal: &Journal,
    report: &dyn ReportPort,
    tz: &Tz,
) -> Result<String, JournalError> {
    let records = &journal.records;

    match command {
        Command::Months { year } => {
            let months = group_by_month_in(records, tz);
            let year = year.or(journal.settings.default_year);
            let sorted = sorted_months(&months, year);
            if sorted.is_empty() {
                return Err(no_data_for_year(year));
            }
            let rows: Vec<MonthSummaryRow<'_>> = sorted
                .into_iter()
                .map(|month| MonthSummaryRow {
                    month,
                    active_days: month.days.len(),
                })
                .collect();
            Ok(report.month_list(&rows))
        }
        Command::Calendar { year, month } => {
            let months = group_by_month_in(records, tz);
            let year = year.or(journal.settings.default_year);
            let selected = match month {
                Some(m) => {
                    let month0 = month_index(*m)?;
                    let year = match year {
                        Some(y) => y,
                        None => latest_year(records, tz)?,
                    };
                    months.get(&MonthKey::new(year, month0)).ok_or_else(|| {
                        JournalError::NoData {
                            period: format!("{} {}", month_name(month0), year),
                        }
                    })?
                }
                None => sorted_months(&months, year)
                    .last()
                    .copied()
                    .ok_or_else(|| no_data_for_year(year))?,
            };
            Ok(report.month_calendar(selected))
        }
        Command::Year { year } => {
            let year = resolve_year(*year, journal, tz)?;
            Ok(report.year_grid(&year_overview(records, year, tz)))
        }
        Command::Weeks { year } => {
            let year = resolve_year(*year, journal, tz)?;
            Ok(report.week_grid(year, &week_overview(records, year, tz)))
        }
        Command::Day { date, ticker } => {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
                JournalError::InvalidArgument {
                    name: "date".into(),
                    reason: format!("expected YYYY-MM-DD, got '{date}'"),
                }
            })?;
            let title = format!("{} {}, {}", month_name(date.month0()), date.day(), date.year());

            let months = group_by_month_in(records, tz);
            let day = months
                .get(&MonthKey::new(date.year(), date.month0()))
                .and_then(|m| m.days.get(&date.day()))
                .ok_or_else(|| JournalError::NoData {
                    period: title.clone(),
                })?;

            match ticker {
                None => Ok(report.day_detail(&title, day, &ticker_summary(day))),
                Some(ticker) => {
                    let trades = ticker_trades(day, ticker);
                    if trades.is_empty() {
                        return Err(JournalError::NoData {
                            period: format!("{ticker} on {title}"),
                        });
                    }
                    let lines: Vec<TradeLine<'_>> = trades
                        .into_iter()
                        .map(|record| TradeLine {
                            record,
                            duration: trade_duration(record, tz)
                                .map(format_duration)
                                .unwrap_or_else(|| "-".to_string()),
                        })
                        .collect();
                    Ok(report.ticker_trades(&title, ticker, &lines))
                }
            }
        }
        Command::Markets | Command::Validate => Ok(String::new()),
    }
}

/// Parse statistics plus every trade that cannot be placed on the calendar.
pub fn render_validation(journal: &Journal) -> String {
    let stats = &journal.stats;
    let mut out = String::new();
    out.push_str(&format!("Source:          {}\n", journal.source));
    out.push_str(&format!("Data rows:       {}\n", stats.rows));
    out.push_str(&format!("Trades:          {}\n", journal.all_records.len()));
    out.push_str(&format!("Short rows:      {}\n", stats.short_rows));
    out.push_str(&format!("Duplicate refs:  {}\n", stats.duplicate_rows));
    out.push_str(&format!("Zero amounts:    {}\n", stats.zero_amount_fallbacks));

    let unplaced: Vec<&TradeRecord> = match journal.settings.zone {
        CalendarZone::Local => undated(&journal.all_records, &Local),
        CalendarZone::Utc => undated(&journal.all_records, &Utc),
        CalendarZone::Fixed(offset) => undated(&journal.all_records, &offset),
    };
    out.push_str(&format!("Undated trades:  {}\n", unplaced.len()));
    for record in unplaced {
        out.push_str(&format!("  {} close '{}'\n", record.reference, record.date_utc));
    }
    out
}

fn month_index(month: u32) -> Result<u32, JournalError> {
    if (1..=12).contains(&month) {
        Ok(month - 1)
    } else {
        Err(JournalError::InvalidArgument {
            name: "month".into(),
            reason: format!("expected 1-12, got {month}"),
        })
    }
}

fn latest_year<Tz: TimeZone>(records: &[TradeRecord], tz: &Tz) -> Result<i32, JournalError> {
    available_years(records, tz)
        .last()
        .copied()
        .ok_or_else(|| JournalError::NoData {
            period: "any dated trade".into(),
        })
}

fn resolve_year<Tz: TimeZone>(
    year: Option<i32>,
    journal: &Journal,
    tz: &Tz,
) -> Result<i32, JournalError> {
    match year.or(journal.settings.default_year) {
        Some(y) => Ok(y),
        None => latest_year(&journal.records, tz),
    }
}

fn no_data_for_year(year: Option<i32>) -> JournalError {
    JournalError::NoData {
        period: year.map_or_else(|| "any month".to_string(), |y| y.to_string()),
    }
}
