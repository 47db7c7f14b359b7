//! Terminal rendering for gallery statistics.
//!
//! Provides themes, the monthly histogram bar chart, the record listing
//! table, a plain-text histogram for non-interactive output, and the
//! application event loop built on top of [`ratatui`].

pub mod app;
pub mod histogram_view;
pub mod records_view;
pub mod text_chart;
pub mod themes;

pub use gallery_core as core;
