//! Core functionality for the lag tracker.
//!
//! This module contains:
//! - Lag window extraction from per-day sample groups
//! - The per-day summary records it produces

pub mod summary;
pub mod windowing;

// Re-export commonly used types
pub use summary::{format_duration, DaySummary};
pub use windowing::{extract_day, extract_lag_windows, group_by_day, LagWindowExtractor};
