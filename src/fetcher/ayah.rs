use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::appsettings::AyahSettings;

use super::{FetchError, aladhan::unwrap_envelope};

#[async_trait]
pub trait AyahSource: Send + Sync {
    async fn random_ayah(&self) -> Result<String, FetchError>;
}

pub fn ayah_edition(language: &str) -> &'static str {
    match language {
        "tr" => "tr.diyanet",
        "de" => "de.aburida",
        _ => "en.sahih",
    }
}

/// Random verse from alquran.cloud in the translation matching the UI language.
pub struct AlQuranClient {
    client: Client,
    base_url: String,
    edition: &'static str,
}

impl AlQuranClient {
    pub fn new(settings: &AyahSettings, language: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build verse HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_owned(),
            edition: ayah_edition(language),
        })
    }
}

#[async_trait]
impl AyahSource for AlQuranClient {
    async fn random_ayah(&self) -> Result<String, FetchError> {
        let url = format!("{}/ayah/random/{}", self.base_url, self.edition);
        log::info!("[FETCH] Daily verse. [edition = {}]", self.edition);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status));
        }

        parse_ayah(&response.text().await?)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AyahData {
    text: String,
    number_in_surah: Option<u32>,
    surah: Option<Surah>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Surah {
    english_name: Option<String>,
}

pub(crate) fn parse_ayah(body: &str) -> Result<String, FetchError> {
    let data: AyahData = unwrap_envelope(body)?;
    let text = data.text.trim();
    if text.is_empty() {
        return Err(FetchError::UnexpectedResponse("empty verse".to_owned()));
    }

    let surah = data
        .surah
        .and_then(|surah| surah.english_name)
        .unwrap_or_default();
    let number = data
        .number_in_surah
        .map(|number| number.to_string())
        .unwrap_or_default();
    let reference = [surah.as_str(), number.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if reference.is_empty() {
        Ok(text.to_owned())
    } else {
        Ok(format!("{text} ({reference})"))
    }
}
