//! Trade history source port trait.

use crate::domain::error::JournalError;

/// Delivers a complete transaction-history export as text.
///
/// Sources hand over the whole file at once; parsing is not streamed.
pub trait TradeSource {
    fn read_text(&self) -> Result<String, JournalError>;

    /// Human-readable origin, used in progress and error messages.
    fn describe(&self) -> String;
}
