//! Transaction-history file source.

use crate::domain::error::JournalError;
use crate::ports::trade_source::TradeSource;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

/// Reads an export from disk, or from stdin when the path is `-`.
pub struct CsvFileAdapter {
    path: PathBuf,
}

impl CsvFileAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn is_stdin(&self) -> bool {
        self.path.as_os_str() == "-"
    }
}

impl TradeSource for CsvFileAdapter {
    fn read_text(&self) -> Result<String, JournalError> {
        if self.is_stdin() {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| JournalError::SourceRead {
                    path: self.describe(),
                    reason: e.to_string(),
                })?;
            return Ok(text);
        }

        let bytes = fs::read(&self.path).map_err(|e| JournalError::SourceRead {
            path: self.describe(),
            reason: e.to_string(),
        })?;
        // Broker exports occasionally carry stray Latin-1 currency bytes.
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn describe(&self) -> String {
        if self.is_stdin() {
            "<stdin>".to_string()
        } else {
            self.path.display().to_string()
        }
    }
}
