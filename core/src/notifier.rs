//! Notification sinks.
//!
//! A sink is built once at start-up from configuration and handed to the
//! dispatcher. `ChatPushSink::from_config` returns `None` when delivery is
//! not configured; the dispatcher treats that as "feature disabled".
//! Sinks make exactly one attempt per message. Retrying is the caller's call.

use crate::{
    config::NotifierConfig,
    error::{AlertError, AlertResult},
};
use serde::Serialize;
use std::time::Duration;

pub trait NotificationSink {
    fn send(&self, message: &str) -> AlertResult<()>;
}

#[derive(Debug, Serialize)]
struct PushRequest<'a> {
    to:       &'a str,
    messages: [TextMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

/// Push-message endpoint authenticated with a bearer token.
#[derive(Debug)]
pub struct ChatPushSink {
    endpoint:     String,
    access_token: String,
    destination:  String,
    client:       reqwest::blocking::Client,
}

impl ChatPushSink {
    pub fn new(
        endpoint: impl Into<String>,
        access_token: impl Into<String>,
        destination: impl Into<String>,
        timeout: Duration,
    ) -> AlertResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AlertError::Delivery { reason: format!("cannot build HTTP client: {e}") })?;
        Ok(Self {
            endpoint: endpoint.into(),
            access_token: access_token.into(),
            destination: destination.into(),
            client,
        })
    }

    /// `Ok(None)` when endpoint, token or destination is missing or blank.
    pub fn from_config(config: &NotifierConfig) -> AlertResult<Option<Self>> {
        fn present(v: &Option<String>) -> Option<&str> {
            v.as_deref().map(str::trim).filter(|s| !s.is_empty())
        }

        let (Some(endpoint), Some(token), Some(destination)) = (
            present(&config.endpoint),
            present(&config.access_token),
            present(&config.destination),
        ) else {
            return Ok(None);
        };

        Self::new(endpoint, token, destination, Duration::from_secs(config.timeout_secs)).map(Some)
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }
}

impl NotificationSink for ChatPushSink {
    fn send(&self, message: &str) -> AlertResult<()> {
        let body = PushRequest {
            to: &self.destination,
            messages: [TextMessage { kind: "text", text: message }],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .map_err(|e| AlertError::Delivery { reason: e.to_string() })?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp.text().unwrap_or_default();
            return Err(AlertError::Delivery { reason: format!("HTTP {status}: {body_text}") });
        }

        log::info!("notification delivered to {}", self.destination);
        Ok(())
    }
}
