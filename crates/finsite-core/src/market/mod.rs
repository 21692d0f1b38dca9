//! Market summary: top gainers/losers, Indian index snapshots and headlines.
//!
//! `MarketClient` fetches the summary once; `MarketPoller` refreshes it in
//! the background every five minutes.

pub mod client;
pub mod models;
pub mod poller;

pub use client::MarketClient;
pub use models::{IndexSnapshot, IndianIndices, MarketSummary, Mover, NewsItem};
pub use poller::{MarketPoller, MarketUpdate, SummarySource, DEFAULT_REFRESH_INTERVAL};
