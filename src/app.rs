use std::{sync::Arc, time::Duration};

use anyhow::Context;
use chrono::{Datelike, Utc};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::countdown::{Clock, CountdownEngine, CountdownState, EngineContext};
use crate::delivery::{Presenter, StatusLevel};
use crate::fetcher::{AyahSource, GeocodeError, Geocoder, ScheduleFetcher};
use crate::i18n::{Catalog, UiText, prayer_note};
use crate::models::{BoundaryLabel, Coordinates, DailySchedule, RamadanCalendarRow};
use crate::presentation::{calendar_table, schedule_lines};
use crate::storage::LocationStore;
use crate::usage::{UsageEvent, UsageLogger};

pub struct Services {
    pub fetcher: Arc<dyn ScheduleFetcher>,
    pub geocoder: Arc<dyn Geocoder>,
    pub ayah: Arc<dyn AyahSource>,
    pub store: Arc<dyn LocationStore>,
    pub usage: UsageLogger,
}

/// Owns the chosen location, the last fetched schedule and the countdown
/// running for it.
pub struct Application {
    services: Services,
    presenter: Arc<dyn Presenter>,
    catalog: Arc<dyn Catalog>,
    clock: Arc<dyn Clock>,
    engine: CountdownEngine,
    coordinates: Option<Coordinates>,
    schedule: Option<DailySchedule>,
    refresh_interval: Duration,
}

impl Application {
    pub fn new(services: Services, context: EngineContext, refresh_interval: Duration) -> Self {
        let presenter = Arc::clone(&context.presenter);
        let catalog = Arc::clone(&context.catalog);
        let clock = Arc::clone(&context.clock);

        Self {
            services,
            presenter,
            catalog,
            clock,
            engine: CountdownEngine::new(context),
            coordinates: None,
            schedule: None,
            refresh_interval,
        }
    }

    pub fn coordinates(&self) -> Option<&Coordinates> {
        self.coordinates.as_ref()
    }

    pub fn schedule(&self) -> Option<&DailySchedule> {
        self.schedule.as_ref()
    }

    pub fn countdown_snapshot(&self) -> CountdownState {
        self.engine.countdown_snapshot()
    }

    pub async fn set_coordinates(
        &mut self,
        lat: f64,
        lon: f64,
        name: Option<String>,
    ) -> anyhow::Result<()> {
        let coordinates = match Coordinates::new(lat, lon, name) {
            Ok(coordinates) => coordinates,
            Err(e) => {
                self.status(StatusLevel::Error, UiText::StatusInvalidCoords);
                return Err(e.into());
            }
        };

        self.set_location(coordinates).await
    }

    pub async fn locate_by_name(&mut self, query: &str) -> anyhow::Result<()> {
        let coordinates = match self.services.geocoder.search(query).await {
            Ok(coordinates) => coordinates,
            Err(e @ (GeocodeError::NotFound(_) | GeocodeError::InvalidCoordinates(_))) => {
                self.status(StatusLevel::Error, UiText::StatusInvalidName);
                return Err(e.into());
            }
            Err(e) => {
                self.error_status(UiText::StatusErrorTimesPrefix, &e);
                return Err(e).context("Place search failed");
            }
        };

        self.set_location(coordinates).await
    }

    pub async fn set_location(&mut self, coordinates: Coordinates) -> anyhow::Result<()> {
        log::info!("[LOCATION] {}", coordinates.describe("Set to"));

        if let Err(e) = self.services.store.save(&coordinates).await {
            log::warn!("Could not save location: {:#}", e);
        }
        self.services
            .usage
            .log(UsageEvent::location_set(&coordinates))
            .await;

        self.coordinates = Some(coordinates);
        self.refresh().await
    }

    /// Loads the saved location, if any, and its schedule.
    ///
    /// A store that cannot be read counts as having no saved location.
    pub async fn restore_location(&mut self) -> anyhow::Result<Option<Coordinates>> {
        let saved = match self.services.store.load().await {
            Ok(saved) => saved,
            Err(e) => {
                log::warn!("Could not load saved location: {:#}", e);
                None
            }
        };

        let Some(coordinates) = saved else {
            self.status(StatusLevel::Info, UiText::StatusWaiting);
            return Ok(None);
        };

        log::info!("[LOCATION] {}", coordinates.describe("Restored"));
        self.coordinates = Some(coordinates.clone());
        self.refresh().await?;
        Ok(Some(coordinates))
    }

    /// Re-fetches today's schedule. On failure the running countdown is kept.
    pub async fn refresh(&mut self) -> anyhow::Result<()> {
        let Some(coordinates) = self.coordinates.clone() else {
            self.status(StatusLevel::Info, UiText::StatusWaiting);
            return Ok(());
        };

        self.status(StatusLevel::Info, UiText::StatusLoadingTimes);

        let schedule = match self
            .services
            .fetcher
            .fetch_today(&coordinates, Utc::now())
            .await
        {
            Ok(schedule) => schedule,
            Err(e) => {
                log::error!("[FETCH] Daily timings failed: {}", e);
                self.error_status(UiText::StatusErrorTimesPrefix, &e);
                return Err(e).context("Failed to fetch prayer times");
            }
        };

        let day_of_year = self.clock.now().ordinal() as usize;
        let mut lines = schedule_lines(
            &schedule,
            Some(&coordinates),
            self.catalog.as_ref(),
            day_of_year,
        );
        if let Some(verse) = self.verse_fallback(&schedule, day_of_year).await {
            lines.push(verse);
        }
        self.presenter.render_schedule(&lines);
        self.engine
            .start(schedule.table.clone(), schedule.special_mode);
        self.schedule = Some(schedule);

        self.status(StatusLevel::Success, UiText::StatusSuccessTimes);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.coordinates = None;
        self.schedule = None;
        self.engine.stop();
    }

    /// Fetches and renders the fasting-month calendar of `year` for the
    /// current location.
    pub async fn ramadan_calendar(&mut self, year: i32) -> anyhow::Result<Vec<RamadanCalendarRow>> {
        let Some(coordinates) = self.coordinates.clone() else {
            self.status(StatusLevel::Info, UiText::StatusWaiting);
            anyhow::bail!("No location set");
        };

        self.status(StatusLevel::Info, UiText::CalStatusLoading);

        let rows = match self
            .services
            .fetcher
            .fetch_ramadan_calendar(&coordinates, year)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                log::error!("[FETCH] Ramadan calendar failed: {}", e);
                self.error_status(UiText::CalStatusErrorPrefix, &e);
                return Err(e).context("Failed to fetch Ramadan calendar");
            }
        };

        if rows.is_empty() {
            self.status(StatusLevel::Info, UiText::CalStatusNoData);
        } else {
            self.presenter
                .render_schedule(&calendar_table(&rows, self.catalog.as_ref()));
        }

        Ok(rows)
    }

    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) {
        self.services.usage.log(UsageEvent::PageOpen).await;

        let mut interval = time::interval_at(
            Instant::now() + self.refresh_interval,
            self.refresh_interval,
        );
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    log::info!("[SHUTDOWN] Stopping");
                    break;
                }
                _ = interval.tick() => {
                    log::info!("[REFRESH] Scheduled schedule refresh");
                    if let Err(e) = self.refresh().await {
                        log::warn!("Scheduled refresh failed, keeping current countdown: {:#}", e);
                    }
                }
            }
        }

        self.engine.stop();
    }

    /// A random verse when the language pack has no note for imsak today.
    async fn verse_fallback(&self, schedule: &DailySchedule, day_of_year: usize) -> Option<String> {
        let note = prayer_note(
            self.catalog.as_ref(),
            BoundaryLabel::Imsak,
            day_of_year,
            schedule.special_mode,
        );
        if note.is_some() {
            return None;
        }

        match self.services.ayah.random_ayah().await {
            Ok(verse) => Some(verse),
            Err(e) => {
                log::warn!("[FETCH] Daily verse failed, showing none: {}", e);
                None
            }
        }
    }

    fn status(&self, level: StatusLevel, text: UiText) {
        self.presenter
            .render_status(level, &self.catalog.template(text));
    }

    fn error_status(&self, prefix: UiText, error: &dyn std::fmt::Display) {
        let text = format!("{}{}", self.catalog.template(prefix), error);
        self.presenter.render_status(StatusLevel::Error, &text);
    }
}

#[cfg(test)]
mod tests;
