use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Serialize;

use crate::models::Coordinates;

const USER_AGENT: &str = concat!("prayer-countdown/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UsageEvent {
    PageOpen,
    LocationSet { lat: f64, lon: f64, label: String },
}

impl UsageEvent {
    pub fn location_set(coordinates: &Coordinates) -> Self {
        UsageEvent::LocationSet {
            lat: coordinates.lat,
            lon: coordinates.lon,
            label: coordinates.label.clone().unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UsagePayload<'a> {
    timestamp: String,
    user_agent: &'a str,
    language: &'a str,
    #[serde(flatten)]
    event: &'a UsageEvent,
}

/// Posts anonymous usage events to an optional endpoint. Failures are logged and dropped.
pub struct UsageLogger {
    client: Client,
    endpoint: Option<String>,
    language: String,
}

impl UsageLogger {
    pub fn new(endpoint: Option<String>, language: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build usage HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.filter(|endpoint| !endpoint.trim().is_empty()),
            language: language.into(),
        })
    }

    pub fn disabled() -> anyhow::Result<Self> {
        Self::new(None, "")
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    pub async fn log(&self, event: UsageEvent) {
        let Some(endpoint) = &self.endpoint else {
            return;
        };

        let payload = payload_json(&event, &self.language, Utc::now());
        let result = self
            .client
            .post(endpoint)
            .json(&payload)
            .send()
            .await
            .and_then(|response| response.error_for_status());

        match result {
            Ok(_) => log::debug!("[USAGE] Logged {:?}", event),
            Err(e) => log::warn!("Could not send usage log: {}", e),
        }
    }
}

fn payload_json(event: &UsageEvent, language: &str, at: DateTime<Utc>) -> serde_json::Value {
    let payload = UsagePayload {
        timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        user_agent: USER_AGENT,
        language,
        event,
    };

    serde_json::to_value(payload).unwrap_or(serde_json::Value::Null)
}
