use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use finsite_core::market::{
    IndexSnapshot, MarketClient, MarketPoller, MarketSummary, MarketUpdate, Mover,
    DEFAULT_REFRESH_INTERVAL,
};
use finsite_core::utils::{format_compact, format_percentage, format_price, truncate_string};
use finsite_core::Config;

use crate::cli::MarketArgs;

/// Max width of a headline in the listing.
const HEADLINE_WIDTH: usize = 80;

pub async fn run(config: &Config, args: &MarketArgs) -> Result<()> {
    let client = MarketClient::new(config)?;

    if !args.watch {
        let summary = client.fetch_summary().await?;
        print!("{}", render(&summary));
        return Ok(());
    }

    let (poller, mut rx) = MarketPoller::spawn(Arc::new(client), DEFAULT_REFRESH_INTERVAL);
    let mut seen = 0;
    while let Some(update) = rx.recv().await {
        match update {
            MarketUpdate::Loaded { summary, fetched_at } => {
                println!("Last updated {}", fetched_at.with_timezone(&Local).format("%H:%M:%S"));
                print!("{}", render(&summary));
            }
            MarketUpdate::Failed(reason) => {
                println!("Failed to fetch market data: {} (retrying at next refresh)", reason);
            }
        }
        seen += 1;
        if args.count.is_some_and(|limit| seen >= limit) {
            break;
        }
    }
    poller.shutdown().await;
    Ok(())
}

fn render_movers(title: &str, movers: &[Mover]) -> String {
    let mut out = format!("{}\n", title);
    if movers.is_empty() {
        out.push_str("  (none)\n");
    }
    for m in movers {
        out.push_str(&format!(
            "  {:<14} {:>14} {:>8}  Vol: {}\n",
            m.symbol,
            format_price(m.price),
            format_percentage(m.change_percent),
            format_compact(m.volume)
        ));
    }
    out
}

fn render(summary: &MarketSummary) -> String {
    let mut out = String::new();

    if let Some(ref indices) = summary.indian_indices {
        out.push_str("Indian indices\n");
        for index in indices.all() {
            let price = index.current_price.map(format_price).unwrap_or_else(|| "-".to_string());
            let change = index
                .change_percent
                .map(format_percentage)
                .unwrap_or_else(|| "-".to_string());
            let status = if index.status == IndexSnapshot::NO_DATA {
                "no data"
            } else {
                index.status.as_str()
            };
            out.push_str(&format!("  {:<16} {:>14} {:>8}  {}\n", index.name, price, change, status));
        }
    }

    out.push_str(&render_movers("Top gainers (India)", &summary.gainers_india));
    out.push_str(&render_movers("Top losers (India)", &summary.losers_india));
    out.push_str(&render_movers("Top gainers (Global)", &summary.gainers_global));
    out.push_str(&render_movers("Top losers (Global)", &summary.losers_global));

    for (title, news) in [("India news", &summary.india_news), ("Global news", &summary.global_news)] {
        if news.is_empty() {
            continue;
        }
        out.push_str(&format!("{}\n", title));
        for item in news {
            out.push_str(&format!("  {} - {}\n", truncate_string(&item.title, HEADLINE_WIDTH), item.publisher));
        }
    }
    out
}
