//! Configuration validation.
//!
//! Checks `[journal]` settings before any file is read.

use crate::domain::error::JournalError;
use crate::domain::zone::CalendarZone;
use crate::ports::config_port::ConfigPort;

pub fn validate_journal_config(config: &dyn ConfigPort) -> Result<(), JournalError> {
    validate_file(config)?;
    journal_zone(config)?;
    validate_market(config)?;
    Ok(())
}

/// The configured calendar zone, `local` when unset.
pub fn journal_zone(config: &dyn ConfigPort) -> Result<CalendarZone, JournalError> {
    match config.get_string("journal", "timezone") {
        None => Ok(CalendarZone::default()),
        Some(s) => s.parse().map_err(|reason| JournalError::ConfigInvalid {
            section: "journal".to_string(),
            key: "timezone".to_string(),
            reason,
        }),
    }
}

fn validate_file(config: &dyn ConfigPort) -> Result<(), JournalError> {
    match config.get_string("journal", "file") {
        Some(s) if s.trim().is_empty() => Err(JournalError::ConfigInvalid {
            section: "journal".to_string(),
            key: "file".to_string(),
            reason: "file must not be empty".to_string(),
        }),
        _ => Ok(()),
    }
}

fn validate_market(config: &dyn ConfigPort) -> Result<(), JournalError> {
    match config.get_string("journal", "market") {
        Some(s) if s.trim().is_empty() => Err(JournalError::ConfigInvalid {
            section: "journal".to_string(),
            key: "market".to_string(),
            reason: "market must be a market name or 'all'".to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;
    use chrono::FixedOffset;

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn empty_config_is_valid() {
        assert!(validate_journal_config(&config("")).is_ok());
        assert_eq!(journal_zone(&config("")).unwrap(), CalendarZone::Local);
    }

    #[test]
    fn full_config_is_valid() {
        let cfg = config("[journal]\nfile = trades.csv\nmarket = Germany 40\ntimezone = +01:00\n");
        assert!(validate_journal_config(&cfg).is_ok());
        assert_eq!(
            journal_zone(&cfg).unwrap(),
            CalendarZone::Fixed(FixedOffset::east_opt(3600).unwrap())
        );
    }

    #[test]
    fn bad_timezone_is_rejected() {
        let err = validate_journal_config(&config("[journal]\ntimezone = mars\n")).unwrap_err();
        assert!(matches!(err, JournalError::ConfigInvalid { key, .. } if key == "timezone"));
    }

    #[test]
    fn empty_file_is_rejected() {
        let err = validate_journal_config(&config("[journal]\nfile =\n")).unwrap_err();
        assert!(matches!(err, JournalError::ConfigInvalid { key, .. } if key == "file"));
    }
}
