//! Utility functions for display formatting.

pub mod format;

pub use format::{format_size_kb, format_timestamp, truncate_string};
