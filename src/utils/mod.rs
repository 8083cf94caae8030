//! Shared helpers: date handling, text normalization and terminal logging.

pub mod date;
pub mod log;
pub mod text;
