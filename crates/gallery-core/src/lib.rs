//! Shared domain types for the gallery statistics workspace.
//!
//! Holds the record model, timestamp normalisation, error type, CLI settings
//! and small formatting helpers used by the data and UI crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;
