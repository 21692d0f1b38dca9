//! Market summary payload.

use serde::{Deserialize, Serialize};

/// Response wrapper returned by the market summary endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketEnvelope {
    #[serde(default)]
    pub success: bool,
    pub data: Option<MarketSummary>,
}

/// A gaining or losing stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Mover {
    pub symbol: String,
    #[serde(rename = "regularMarketPrice.raw")]
    pub price: f64,
    #[serde(rename = "regularMarketChangePercent.raw")]
    pub change_percent: f64,
    #[serde(rename = "regularMarketVolume.raw", default)]
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct IndexSnapshot {
    pub symbol: String,
    pub name: String,
    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub volume: Option<f64>,
    #[serde(default)]
    pub status: String,
}

impl IndexSnapshot {
    pub const NO_DATA: &'static str = "no_data";

    /// Placeholder shown for an index the backend did not report.
    pub fn no_data(symbol: &str, name: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            current_price: None,
            previous_close: None,
            change: None,
            change_percent: None,
            volume: None,
            status: Self::NO_DATA.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct IndianIndices {
    #[serde(default)]
    pub nifty: Option<IndexSnapshot>,
    #[serde(default)]
    pub sensex: Option<IndexSnapshot>,
    #[serde(default)]
    pub banknifty: Option<IndexSnapshot>,
    #[serde(default)]
    pub midcap_nifty: Option<IndexSnapshot>,
}

impl IndianIndices {
    /// All four indices in display order; missing ones become `no_data` placeholders.
    pub fn all(&self) -> [IndexSnapshot; 4] {
        let or_placeholder = |index: &Option<IndexSnapshot>, symbol: &str, name: &str| {
            index
                .clone()
                .unwrap_or_else(|| IndexSnapshot::no_data(symbol, name))
        };
        [
            or_placeholder(&self.nifty, "^NSEI", "Nifty"),
            or_placeholder(&self.sensex, "^BSESN", "Sensex"),
            or_placeholder(&self.banknifty, "^NSEBANK", "Bank Nifty"),
            or_placeholder(&self.midcap_nifty, "NIFTYMIDCAP50.NS", "Mid Cap Nifty"),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct NewsItem {
    pub title: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct MarketSummary {
    #[serde(rename = "top5_gainers_global", default)]
    pub gainers_global: Vec<Mover>,
    #[serde(rename = "top5_losers_global", default)]
    pub losers_global: Vec<Mover>,
    #[serde(rename = "top5_gainers_india", default)]
    pub gainers_india: Vec<Mover>,
    #[serde(rename = "top5_losers_india", default)]
    pub losers_india: Vec<Mover>,
    #[serde(default)]
    pub indian_indices: Option<IndianIndices>,
    #[serde(default)]
    pub global_news: Vec<NewsItem>,
    #[serde(default)]
    pub india_news: Vec<NewsItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "success": true,
        "data": {
            "top5_gainers_global": [
                {"symbol": "NVDA", "regularMarketPrice.raw": 131.2, "regularMarketChangePercent.raw": 4.31, "regularMarketVolume.raw": 250000000}
            ],
            "top5_losers_global": [],
            "top5_gainers_india": [
                {"symbol": "TCS.NS", "regularMarketPrice.raw": 4120.5, "regularMarketChangePercent.raw": 2.1, "regularMarketVolume.raw": 1800000}
            ],
            "top5_losers_india": [],
            "indian_indices": {
                "nifty": {"symbol": "^NSEI", "name": "NIFTY 50", "current_price": 24500.1, "previous_close": 24400.0, "change": 100.1, "change_percent": 0.41, "volume": null, "status": "open"},
                "sensex": {"symbol": "^BSESN", "name": "SENSEX", "current_price": null, "previous_close": null, "change": null, "change_percent": null, "volume": null, "status": "closed"},
                "banknifty": {"symbol": "^NSEBANK", "name": "BANK NIFTY", "current_price": 51000.0, "previous_close": 50900.0, "change": 100.0, "change_percent": 0.2, "volume": null, "status": "open"},
                "midcap_nifty": {"symbol": "^NSEMDCP50", "name": "NIFTY MIDCAP 50", "current_price": 15000.0, "previous_close": 15100.0, "change": -100.0, "change_percent": -0.66, "volume": null, "status": "open"}
            },
            "global_news": [{"title": "Markets rally", "publisher": "Wire", "link": "https://news.example.com/1"}],
            "india_news": []
        }
    }"#;

    #[test]
    fn test_parse_full_summary() {
        let envelope: MarketEnvelope = serde_json::from_str(SAMPLE).unwrap();
        assert!(envelope.success);
        let summary = envelope.data.unwrap();
        assert_eq!(summary.gainers_global[0].symbol, "NVDA");
        assert_eq!(summary.gainers_india[0].price, 4120.5);
        let indices = summary.indian_indices.unwrap();
        assert_eq!(indices.nifty.as_ref().and_then(|i| i.change_percent), Some(0.41));
        assert_eq!(indices.sensex.as_ref().and_then(|i| i.current_price), None);
        assert_eq!(indices.all().len(), 4);
        assert_eq!(summary.global_news[0].publisher, "Wire");
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let envelope: MarketEnvelope =
            serde_json::from_str(r#"{"success": true, "data": {}}"#).unwrap();
        let summary = envelope.data.unwrap();
        assert!(summary.gainers_global.is_empty());
        assert!(summary.indian_indices.is_none());
    }

    #[test]
    fn test_partial_indices_keep_the_rest_of_the_summary() {
        let json = r#"{
            "success": true,
            "data": {
                "top5_gainers_india": [
                    {"symbol": "TCS.NS", "regularMarketPrice.raw": 4120.5, "regularMarketChangePercent.raw": 2.1}
                ],
                "indian_indices": {
                    "nifty": {"symbol": "^NSEI", "name": "NIFTY 50", "current_price": 24500.1, "previous_close": null, "change": null, "change_percent": 0.41, "volume": null, "status": "open"}
                },
                "india_news": [{"title": "Sensex steady", "publisher": "Wire", "link": "https://news.example.com/2"}]
            }
        }"#;
        let summary = serde_json::from_str::<MarketEnvelope>(json).unwrap().data.unwrap();
        assert_eq!(summary.gainers_india[0].symbol, "TCS.NS");
        assert_eq!(summary.india_news.len(), 1);

        let all = summary.indian_indices.unwrap().all();
        assert_eq!(all[0].name, "NIFTY 50");
        assert_eq!(all[0].status, "open");
        assert_eq!(all[1].name, "Sensex");
        assert_eq!(all[1].status, IndexSnapshot::NO_DATA);
        assert_eq!(all[1].current_price, None);
        assert_eq!(all[3].symbol, "NIFTYMIDCAP50.NS");
    }
}
