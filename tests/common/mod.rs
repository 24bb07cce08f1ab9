#![allow(dead_code)]

use pnlcal::cli::JournalSettings;
use pnlcal::domain::trade::TradeRecord;
use pnlcal::domain::zone::CalendarZone;
use std::io::Write;
use std::path::PathBuf;

pub const HEADER: &str = "Date,Summary,MarketName,Period,ProfitAndLoss,TransactionType,Reference,OpenLevel,CloseLevel,Size,Currency,PL Amount,CashTransaction,DateUtc,OpenDateUtc,CurrencyIsoCode";

/// One export row; `amount` goes into both P&L columns with a currency prefix.
pub fn csv_row(reference: &str, market: &str, amount: &str, close: &str, open: &str) -> String {
    format!(
        "{date},Trade,{market},DFB,£{amount},DEAL,{reference},7500.5,7510.5,+1,£,£{amount},false,{close},{open},GBP",
        date = close.get(..10).unwrap_or(""),
    )
}

pub fn csv_text(rows: &[String]) -> String {
    let mut text = String::from(HEADER);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    text
}

/// A small journal spanning two months, two markets and one duplicate row.
pub fn sample_csv() -> String {
    csv_text(&[
        csv_row("R1", "FTSE 100", "120.00", "2024-01-15T10:30:00", "2024-01-15T09:00:00"),
        csv_row("R2", "FTSE 100", "-45.50", "2024-01-15T14:00:00", "2024-01-15T13:30:00"),
        csv_row("R3", "Gold converted at 0.79", "300.25", "2024-01-22T16:00:00", "2024-01-22T11:15:30"),
        csv_row("R2", "FTSE 100", "999.00", "2024-01-16T14:00:00", "2024-01-16T13:30:00"),
        csv_row("R4", "FTSE 100", "-1200.00", "2024-02-01T08:05:00", "2024-02-01T08:00:00"),
        csv_row("R5", "Gold converted at 0.80", "75.00", "2024-02-29T20:00:00", "2024-02-29T19:00:00"),
    ])
}

pub fn make_trade(reference: &str, amount: f64, close: &str) -> TradeRecord {
    TradeRecord {
        text_date: String::new(),
        summary: "Trade".into(),
        market_name: "FTSE 100".into(),
        period: "DFB".into(),
        profit_and_loss: format!("£{amount}"),
        transaction_type: "DEAL".into(),
        reference: reference.into(),
        open_level: "7500".into(),
        close_level: "7510".into(),
        size: "+1".into(),
        currency: "£".into(),
        pl_amount: amount,
        cash_transaction: "false".into(),
        date_utc: close.into(),
        open_date_utc: close.into(),
        currency_iso_code: "GBP".into(),
    }
}

pub fn utc_settings() -> JournalSettings {
    JournalSettings {
        file: PathBuf::from("TradeHistory.csv"),
        zone: CalendarZone::Utc,
        market: None,
        default_year: None,
        exact_amounts: false,
    }
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
