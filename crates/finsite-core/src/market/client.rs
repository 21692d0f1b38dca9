use anyhow::Result;
use reqwest::Client;
use tracing::debug;

use crate::config::Config;
use crate::error::ApiError;

use super::models::{MarketEnvelope, MarketSummary};

const SUMMARY_PATH: &str = "/market-summary/";

/// Read-only client for the market summary endpoint.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct MarketClient {
    client: Client,
    endpoint: String,
}

impl MarketClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}{}", config.backend_base(), SUMMARY_PATH),
        })
    }

    pub async fn fetch_summary(&self) -> Result<MarketSummary, ApiError> {
        let response = self.client.get(&self.endpoint).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::from_status(status, &body));
        }

        let envelope: MarketEnvelope = serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("market summary: {}", e)))?;
        match envelope.data {
            Some(summary) if envelope.success => {
                debug!(
                    gainers = summary.gainers_india.len() + summary.gainers_global.len(),
                    "Market summary fetched"
                );
                Ok(summary)
            }
            _ => Err(ApiError::InvalidResponse(
                "API returned unsuccessful response or no data".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CannedServer;

    fn client_for(server: &CannedServer) -> MarketClient {
        let config = Config {
            backend_url: server.base_url.clone(),
            ..Config::default()
        };
        MarketClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_summary() {
        let body = r#"{"success": true, "data": {"top5_gainers_india": [
            {"symbol": "INFY.NS", "regularMarketPrice.raw": 1890.0, "regularMarketChangePercent.raw": 1.5, "regularMarketVolume.raw": 900000}
        ]}}"#;
        let server = CannedServer::start(vec![(200, body.to_string())]).await;
        let summary = client_for(&server).fetch_summary().await.unwrap();
        assert_eq!(summary.gainers_india[0].symbol, "INFY.NS");
        assert!(server.requests()[0].starts_with("GET /market-summary/ HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_unsuccessful_envelope_is_an_error() {
        let server =
            CannedServer::start(vec![(200, r#"{"success": false, "data": null}"#.to_string())]).await;
        let err = client_for(&server).fetch_summary().await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_http_error_maps_status() {
        let server = CannedServer::start(vec![(502, "bad gateway".to_string())]).await;
        let err = client_for(&server).fetch_summary().await.unwrap_err();
        assert!(matches!(err, ApiError::ServerError(_)));
    }
}
