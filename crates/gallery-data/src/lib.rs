//! Data layer for gallery statistics.
//!
//! Reads image records from a document store, rewrites their timestamps for
//! display listings, and aggregates them into monthly histogram buckets.

pub mod aggregator;
pub mod listing;
pub mod store;

pub use gallery_core as core;
