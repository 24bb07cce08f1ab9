//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    /// Settings-free adapter, used when no `--config` is given.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_deref()
            .and_then(Self::parse_bool)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_journal_section() {
        let content = r#"
[journal]
file = /data/TradeHistory.csv
market = Germany 40
timezone = utc
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("journal", "file"),
            Some("/data/TradeHistory.csv".to_string())
        );
        assert_eq!(
            adapter.get_string("journal", "market"),
            Some("Germany 40".to_string())
        );
        assert_eq!(adapter.get_string("journal", "timezone"), Some("utc".to_string()));
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[journal]\nfile = a.csv\n").unwrap();
        assert_eq!(adapter.get_string("journal", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "file"), None);
    }

    #[test]
    fn empty_adapter_has_no_values() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("journal", "file"), None);
        assert_eq!(adapter.get_int("report", "year", 7), 7);
    }

    #[test]
    fn get_int_returns_value_or_default() {
        let adapter =
            FileConfigAdapter::from_string("[report]\nyear = 2024\nbad = abc\n").unwrap();
        assert_eq!(adapter.get_int("report", "year", 0), 2024);
        assert_eq!(adapter.get_int("report", "bad", 42), 42);
        assert_eq!(adapter.get_int("report", "missing", 42), 42);
    }

    #[test]
    fn get_bool_true_and_false_values() {
        let adapter = FileConfigAdapter::from_string(
            "[report]\na = true\nb = yes\nc = 1\nd = off\ne = no\nf = 0\n",
        )
        .unwrap();
        assert!(adapter.get_bool("report", "a", false));
        assert!(adapter.get_bool("report", "b", false));
        assert!(adapter.get_bool("report", "c", false));
        assert!(!adapter.get_bool("report", "d", true));
        assert!(!adapter.get_bool("report", "e", true));
        assert!(!adapter.get_bool("report", "f", true));
    }

    #[test]
    fn get_bool_returns_default_for_missing_or_garbage() {
        let adapter = FileConfigAdapter::from_string("[report]\nx = maybe\n").unwrap();
        assert!(adapter.get_bool("report", "missing", true));
        assert!(!adapter.get_bool("report", "x", false));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[journal]\ntimezone = +10:00\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("journal", "timezone"),
            Some("+10:00".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/pnlcal.ini");
        assert!(result.is_err());
    }
}
