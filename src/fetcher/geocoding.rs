use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde::Deserialize;
use thiserror::Error;

use crate::appsettings::GeocodingSettings;
use crate::models::{Coordinates, InvalidCoordinates};

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("No place matches {0:?}")]
    NotFound(String),
    #[error(transparent)]
    InvalidCoordinates(#[from] InvalidCoordinates),
    #[error("HTTP {0}")]
    Status(StatusCode),
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn search(&self, query: &str) -> Result<Coordinates, GeocodeError>;
}

pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(settings: &GeocodingSettings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .build()
            .context("Failed to build geocoding HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_owned(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &str) -> Result<Coordinates, GeocodeError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GeocodeError::NotFound(String::new()));
        }

        log::info!("[GEOCODE] Searching place. [query = {}]", query);
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .header(header::ACCEPT, "application/json")
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(GeocodeError::Status(status));
        }

        let body = response.text().await?;
        first_place(&body, query)
    }
}

#[derive(Deserialize)]
struct Place {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

/// Picks the first search hit. The place name falls back to `query`.
pub(crate) fn first_place(body: &str, query: &str) -> Result<Coordinates, GeocodeError> {
    let places: Vec<Place> =
        serde_json::from_str(body).map_err(|e| GeocodeError::UnexpectedResponse(e.to_string()))?;

    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::NotFound(query.to_owned()))?;

    let (Ok(lat), Ok(lon)) = (place.lat.trim().parse::<f64>(), place.lon.trim().parse::<f64>()) else {
        return Err(GeocodeError::NotFound(query.to_owned()));
    };

    let label = place
        .display_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| query.to_owned());

    Ok(Coordinates::new(lat, lon, Some(label))?)
}
