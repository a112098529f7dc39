use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use thiserror::Error;

use crate::models::{Coordinates, DailySchedule, RamadanCalendarRow};

mod aladhan;
mod ayah;
mod geocoding;

pub use aladhan::{AladhanClient, DIYANET_METHOD, MWL_METHOD, calculation_method};
pub use ayah::{AlQuranClient, AyahSource, ayah_edition};
pub use geocoding::{GeocodeError, Geocoder, NominatimGeocoder};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Status(StatusCode),
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{source} (month {month})")]
    Month {
        month: u32,
        #[source]
        source: Box<FetchError>,
    },
}

#[async_trait]
pub trait ScheduleFetcher: Send + Sync {
    async fn fetch_today(
        &self,
        coordinates: &Coordinates,
        at: DateTime<Utc>,
    ) -> Result<DailySchedule, FetchError>;

    /// Every day of `year` that falls in the fasting month, in calendar order.
    async fn fetch_ramadan_calendar(
        &self,
        coordinates: &Coordinates,
        year: i32,
    ) -> Result<Vec<RamadanCalendarRow>, FetchError>;
}
