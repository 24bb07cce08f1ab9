//! Core domain types and logic.

pub mod trade;
pub mod record_parser;
pub mod aggregate;
pub mod format;
pub mod views;
pub mod zone;
pub mod config_validation;
pub mod error;
