use std::{collections::BTreeMap, fmt, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};

use crate::appsettings::ApiSettings;
use crate::models::{
    BoundaryLabel, Coordinates, DailySchedule, HijriDate, RAMADAN_MONTH_NUMBER,
    RamadanCalendarRow, TimeTable,
};

use super::{FetchError, ScheduleFetcher};

/// Diyanet İşleri Başkanlığı, Turkey.
pub const DIYANET_METHOD: u32 = 13;
/// Muslim World League.
pub const MWL_METHOD: u32 = 3;

const RAMADAN_MONTH_NAME: &str = "Ramadan";

pub fn calculation_method(coordinates: &Coordinates, configured: Option<u32>) -> u32 {
    match configured {
        Some(method) => method,
        None if coordinates.is_in_turkey() => DIYANET_METHOD,
        None => MWL_METHOD,
    }
}

pub struct AladhanClient {
    client: Client,
    base_url: String,
    method: Option<u32>,
    school: u32,
}

impl AladhanClient {
    pub fn new(settings: &ApiSettings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build prayer times HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_owned(),
            method: settings.method,
            school: settings.school,
        })
    }

    async fn get_body(&self, url: &str, coordinates: &Coordinates) -> Result<String, FetchError> {
        let method = calculation_method(coordinates, self.method);
        let response = self
            .client
            .get(url)
            .query(&[
                ("latitude", coordinates.lat.to_string()),
                ("longitude", coordinates.lon.to_string()),
                ("method", method.to_string()),
                ("school", self.school.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl ScheduleFetcher for AladhanClient {
    async fn fetch_today(
        &self,
        coordinates: &Coordinates,
        at: DateTime<Utc>,
    ) -> Result<DailySchedule, FetchError> {
        let url = format!("{}/timings/{}", self.base_url, at.timestamp());
        log::info!("[FETCH] Daily timings. [{}]", coordinates.describe("at"));

        let body = self.get_body(&url, coordinates).await?;
        parse_daily(&body)
    }

    async fn fetch_ramadan_calendar(
        &self,
        coordinates: &Coordinates,
        year: i32,
    ) -> Result<Vec<RamadanCalendarRow>, FetchError> {
        log::info!("[FETCH] Ramadan calendar for {}. [{}]", year, coordinates.describe("at"));
        let mut rows = Vec::new();

        for month in 1..=12 {
            let url = format!("{}/calendar/{}/{}", self.base_url, year, month);
            let month_rows = self
                .get_body(&url, coordinates)
                .await
                .and_then(|body| parse_calendar_month(&body))
                .map_err(|e| FetchError::Month {
                    month,
                    source: Box::new(e),
                })?;
            rows.extend(month_rows);
        }

        log::debug!("[FETCH] Ramadan calendar has {} days", rows.len());
        Ok(rows)
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    code: Option<i64>,
    data: Option<T>,
}

#[derive(Deserialize)]
struct DayData {
    #[serde(default)]
    timings: BTreeMap<String, String>,
    date: Option<DateInfo>,
}

#[derive(Deserialize)]
struct DateInfo {
    readable: Option<String>,
    hijri: Option<HijriInfo>,
}

#[derive(Deserialize)]
struct HijriInfo {
    day: Option<Scalar>,
    month: Option<HijriMonth>,
    year: Option<Scalar>,
}

#[derive(Deserialize)]
struct HijriMonth {
    number: Option<u32>,
    en: Option<String>,
    ar: Option<String>,
}

/// The API is not consistent about quoting numeric date parts.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(i64),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(text) => f.write_str(text),
            Scalar::Number(number) => write!(f, "{number}"),
        }
    }
}

impl HijriInfo {
    fn to_hijri_date(&self) -> HijriDate {
        let month_name = self
            .month
            .as_ref()
            .and_then(|month| {
                [month.ar.as_deref(), month.en.as_deref()]
                    .into_iter()
                    .flatten()
                    .find(|name| !name.is_empty())
            })
            .unwrap_or_default()
            .to_owned();

        HijriDate {
            day: self.day.as_ref().map(Scalar::to_string).unwrap_or_default(),
            month_number: self.month.as_ref().and_then(|month| month.number),
            month_name,
            year: self.year.as_ref().map(Scalar::to_string).unwrap_or_default(),
        }
    }

    fn month_number_is_ramadan(&self) -> bool {
        self.month
            .as_ref()
            .is_some_and(|month| month.number == Some(RAMADAN_MONTH_NUMBER))
    }

    fn is_ramadan(&self) -> bool {
        self.month_number_is_ramadan()
            || self
                .month
                .as_ref()
                .is_some_and(|month| month.en.as_deref() == Some(RAMADAN_MONTH_NAME))
    }
}

pub(super) fn unwrap_envelope<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    let envelope: Envelope<T> = serde_json::from_str(body)
        .map_err(|e| FetchError::UnexpectedResponse(e.to_string()))?;

    match (envelope.code, envelope.data) {
        (Some(200), Some(data)) => Ok(data),
        (code, _) => Err(FetchError::UnexpectedResponse(format!(
            "code {}",
            code.map_or_else(|| "missing".to_owned(), |code| code.to_string())
        ))),
    }
}

pub(crate) fn parse_daily(body: &str) -> Result<DailySchedule, FetchError> {
    let data: DayData = unwrap_envelope(body)?;
    let hijri = data.date.as_ref().and_then(|date| date.hijri.as_ref());

    Ok(DailySchedule {
        table: TimeTable::from_api_timings(
            data.timings
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str())),
        ),
        special_mode: hijri.is_some_and(HijriInfo::is_ramadan),
        readable_date: data.date.as_ref().and_then(|date| date.readable.clone()),
        hijri: hijri.map(HijriInfo::to_hijri_date),
    })
}

pub(crate) fn parse_calendar_month(body: &str) -> Result<Vec<RamadanCalendarRow>, FetchError> {
    let days: Vec<DayData> = unwrap_envelope(body)?;

    Ok(days
        .iter()
        .filter_map(|day| {
            let date = day.date.as_ref()?;
            let hijri = date.hijri.as_ref().filter(|hijri| hijri.month_number_is_ramadan())?;
            let time = |label: BoundaryLabel| {
                day.timings
                    .get(label.api_key())
                    .and_then(|value| value.split_whitespace().next())
                    .unwrap_or_default()
                    .to_owned()
            };

            Some(RamadanCalendarRow {
                gregorian: date.readable.clone().unwrap_or_default(),
                hijri: hijri.to_hijri_date().label(),
                imsak: time(BoundaryLabel::Imsak),
                fajr: time(BoundaryLabel::Fajr),
                maghrib: time(BoundaryLabel::Maghrib),
                isha: time(BoundaryLabel::Isha),
            })
        })
        .collect())
}
