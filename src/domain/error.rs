//! Domain error types.
//!
//! The parsing and aggregation core never fails; these errors only cover
//! the boundary: reading sources, configuration and command-line input.

/// Top-level error type for pnlcal.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("failed to read {path}: {reason}")]
    SourceRead { path: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no trades found in input")]
    NoTrades,

    #[error("no trades for {period}")]
    NoData { period: String },

    #[error("invalid argument --{name}: {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&JournalError> for std::process::ExitCode {
    fn from(err: &JournalError) -> Self {
        let code: u8 = match err {
            JournalError::Io(_) | JournalError::SourceRead { .. } => 1,
            JournalError::ConfigParse { .. }
            | JournalError::ConfigMissing { .. }
            | JournalError::ConfigInvalid { .. } => 2,
            JournalError::NoTrades | JournalError::NoData { .. } => 3,
            JournalError::InvalidArgument { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::ExitCode;

    // ExitCode has no PartialEq; compare through Debug
    fn code_of(err: &JournalError) -> String {
        format!("{:?}", ExitCode::from(err))
    }

    fn expected(code: u8) -> String {
        format!("{:?}", ExitCode::from(code))
    }

    #[test]
    fn exit_codes_by_category() {
        let io = JournalError::Io(std::io::Error::other("boom"));
        assert_eq!(code_of(&io), expected(1));

        let read = JournalError::SourceRead {
            path: "trades.csv".into(),
            reason: "not found".into(),
        };
        assert_eq!(code_of(&read), expected(1));

        let cfg = JournalError::ConfigMissing {
            section: "journal".into(),
            key: "file".into(),
        };
        assert_eq!(code_of(&cfg), expected(2));

        assert_eq!(code_of(&JournalError::NoTrades), expected(3));
        let no_data = JournalError::NoData {
            period: "March 2024".into(),
        };
        assert_eq!(code_of(&no_data), expected(3));

        let arg = JournalError::InvalidArgument {
            name: "month".into(),
            reason: "expected 1-12".into(),
        };
        assert_eq!(code_of(&arg), expected(4));
    }

    #[test]
    fn messages_name_the_offending_key() {
        let err = JournalError::ConfigInvalid {
            section: "journal".into(),
            key: "timezone".into(),
            reason: "expected local, utc or +HH:MM".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value [journal] timezone: expected local, utc or +HH:MM"
        );
    }
}
