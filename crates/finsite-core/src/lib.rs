//! Core library for the finsite advisory website tooling.
//!
//! - `sip`: SIP (systematic investment plan) projection calculator
//! - `offline`: offline cache controller with per-resource fetch strategies
//! - `leads`: lead-capture form submission client
//! - `market`: market summary client and background poller
//! - `config`: application configuration
//! - `utils`: currency and number formatting

pub mod config;
pub mod error;
pub mod leads;
pub mod market;
pub mod offline;
pub mod sip;
pub mod utils;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::ApiError;
