//! Utility functions for currency and number formatting.

pub mod format;

pub use format::{format_compact, format_inr, format_percentage, format_price, truncate_string};
