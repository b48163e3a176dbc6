//! Reqwest-backed SMS provider adapter.
//!
//! Posts `{ "to", "message", "from"? }` as JSON with a bearer API key. Any
//! non-2xx status is a rejection; the response body is only used to build a
//! short error message.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use tracing::debug;

use crate::domain::OutgoingSms;
use crate::domain::ports::{SmsGateway, SmsGatewayError};

/// API key and optional sender id registered with the provider.
#[derive(Clone)]
pub struct SmsGatewayCredentials {
    pub api_key: String,
    pub sender_id: Option<String>,
}

impl std::fmt::Debug for SmsGatewayCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsGatewayCredentials")
            .field("api_key", &"<redacted>")
            .field("sender_id", &self.sender_id)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct SendSmsBody<'a> {
    to: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<&'a str>,
}

/// SMS gateway that performs one HTTP POST per message.
pub struct HttpSmsGateway {
    client: Client,
    endpoint: Url,
    credentials: SmsGatewayCredentials,
}

impl HttpSmsGateway {
    /// Build a gateway with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        credentials: SmsGatewayCredentials,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            credentials,
        })
    }
}

#[async_trait]
impl SmsGateway for HttpSmsGateway {
    async fn send(&self, sms: &OutgoingSms) -> Result<(), SmsGatewayError> {
        let body = SendSmsBody {
            to: sms.recipient.as_str(),
            message: &sms.message,
            from: self.credentials.sender_id.as_deref(),
        };
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.credentials.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), "sms provider accepted message");
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }
}

fn map_transport_error(error: reqwest::Error) -> SmsGatewayError {
    if error.is_timeout() {
        SmsGatewayError::transport(format!("timed out: {error}"))
    } else {
        SmsGatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> SmsGatewayError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("provider error")
            .to_owned()
    } else {
        preview
    };
    SmsGatewayError::rejected(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
