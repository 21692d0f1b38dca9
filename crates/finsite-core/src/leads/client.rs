//! Client for the lead-intake endpoint.

use anyhow::Result;
use reqwest::{multipart, Client, StatusCode};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::ApiError;

use super::error::LeadError;
use super::form::{Encoding, LeadSubmission};

const SUBMIT_PATH: &str = "/submit-form/";

/// Backend acknowledgement of a lead.
#[derive(Debug, Clone)]
pub struct LeadReceipt {
    pub status: u16,
    pub encoding: Encoding,
    /// Parsed JSON body, when the backend returned one.
    pub body: Option<Value>,
}

/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct LeadClient {
    client: Client,
    endpoint: String,
}

impl LeadClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}{}", config.backend_base(), SUBMIT_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Validate and submit a lead.
    ///
    /// The form's preferred encoding is tried first; a non-2xx answer is
    /// retried once with the other encoding. A transport failure is returned
    /// immediately.
    pub async fn submit(&self, submission: &LeadSubmission) -> Result<LeadReceipt, LeadError> {
        submission.validate()?;

        let preferred = submission.form.preferred_encoding();
        let (status, body) = self.send(submission, preferred).await?;
        if status.is_success() {
            return Ok(Self::receipt(status, preferred, &body));
        }

        let fallback = preferred.other();
        warn!(
            form = submission.form.slug(),
            status = status.as_u16(),
            ?fallback,
            "Lead rejected, retrying with other encoding"
        );
        let (status, body) = self.send(submission, fallback).await?;
        if status.is_success() {
            return Ok(Self::receipt(status, fallback, &body));
        }
        Err(ApiError::from_status(status, &body).into())
    }

    async fn send(
        &self,
        submission: &LeadSubmission,
        encoding: Encoding,
    ) -> Result<(StatusCode, String), ApiError> {
        let payload = submission.payload();
        let request = self.client.post(&self.endpoint);
        let request = match encoding {
            Encoding::Json => {
                let object: Map<String, Value> = payload
                    .into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect();
                request.json(&object)
            }
            Encoding::Multipart => {
                let form = payload
                    .into_iter()
                    .fold(multipart::Form::new(), |form, (k, v)| form.text(k, v));
                request.multipart(form)
            }
        };

        debug!(endpoint = %self.endpoint, ?encoding, form = submission.form.slug(), "Submitting lead");
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Ok((status, body))
    }

    fn receipt(status: StatusCode, encoding: Encoding, body: &str) -> LeadReceipt {
        info!(status = status.as_u16(), ?encoding, "Lead submitted");
        LeadReceipt {
            status: status.as_u16(),
            encoding,
            body: serde_json::from_str(body).ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::form::LeadForm;
    use crate::testing::CannedServer;

    fn client_for(server: &CannedServer) -> LeadClient {
        let config = Config {
            backend_url: server.base_url.clone(),
            ..Config::default()
        };
        LeadClient::new(&config).unwrap()
    }

    fn sip_lead() -> LeadSubmission {
        LeadSubmission::new(LeadForm::SipInvestment)
            .field("name", "Meera")
            .field("email", "meera@example.in")
            .field("mobile", "9876543210")
            .field("gender", "female")
            .field("riskTolerance", "moderate")
            .field("investmentAmount", "5000")
            .field("investmentDuration", "5-10")
    }

    fn hero_lead() -> LeadSubmission {
        LeadSubmission::new(LeadForm::HomepageHero)
            .field("product", "SIP")
            .field("name", "Arjun")
            .field("email", "arjun@example.in")
            .field("mobile", "9123456780")
    }

    #[tokio::test]
    async fn test_page_form_posts_multipart_with_metadata() {
        let server = CannedServer::start(vec![(200, r#"{"success":true}"#.to_string())]).await;
        let receipt = client_for(&server).submit(&sip_lead()).await.unwrap();

        assert_eq!(receipt.status, 200);
        assert_eq!(receipt.encoding, Encoding::Multipart);
        assert_eq!(receipt.body.unwrap()["success"], Value::Bool(true));

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        let raw = &requests[0];
        assert!(raw.starts_with("POST /submit-form/ HTTP/1.1"));
        assert!(raw.to_ascii_lowercase().contains("content-type: multipart/form-data"));
        assert!(raw.contains("name=\"formType\""));
        assert!(raw.contains("SIP Investment Page"));
    }

    #[tokio::test]
    async fn test_hero_form_falls_back_to_multipart() {
        let server = CannedServer::start(vec![
            (415, r#"{"detail":"unsupported"}"#.to_string()),
            (201, "{}".to_string()),
        ])
        .await;
        let receipt = client_for(&server).submit(&hero_lead()).await.unwrap();
        assert_eq!(receipt.encoding, Encoding::Multipart);

        let requests = server.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].to_ascii_lowercase().contains("content-type: application/json"));
        assert!(requests[0].contains("\"subject\":\"Homepage Hero Form Inquiry\""));
        assert!(requests[1].to_ascii_lowercase().contains("multipart/form-data"));
    }

    #[tokio::test]
    async fn test_both_encodings_rejected_is_retryable_error() {
        let server = CannedServer::start(vec![
            (500, "down".to_string()),
            (503, "still down".to_string()),
        ])
        .await;
        let err = client_for(&server).submit(&sip_lead()).await.unwrap_err();
        assert!(matches!(err, LeadError::Api(ApiError::ServerError(_))));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_bad_request_on_both_encodings_is_retryable() {
        let server = CannedServer::start(vec![
            (400, r#"{"detail":"bad"}"#.to_string()),
            (400, r#"{"detail":"still bad"}"#.to_string()),
        ])
        .await;
        let err = client_for(&server).submit(&sip_lead()).await.unwrap_err();
        assert!(matches!(err, LeadError::Api(ApiError::BadRequest(_))));
        assert!(err.is_retryable());
        assert_eq!(server.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_lead_is_not_sent() {
        let server = CannedServer::start(vec![]).await;
        let lead = sip_lead().field("mobile", "12");
        let err = client_for(&server).submit(&lead).await.unwrap_err();
        assert!(matches!(err, LeadError::InvalidMobile(_)));
        assert!(!err.is_retryable());
        assert!(server.requests().is_empty());
    }
}
