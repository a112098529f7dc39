use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};

use crate::countdown::{Clock, EngineContext};
use crate::delivery::{NotificationSurface, Presenter, StatusLevel};
use crate::fetcher::{AyahSource, FetchError, GeocodeError, Geocoder, ScheduleFetcher};
use crate::i18n::Language;
use crate::models::{Coordinates, DailySchedule, RamadanCalendarRow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Countdown(String),
    Dual(String, String),
    NoData(String),
    Status(StatusLevel, String),
    Schedule(Vec<String>),
}

#[derive(Default)]
pub struct RecordingPresenter {
    pub rendered: Mutex<Vec<Rendered>>,
}

impl RecordingPresenter {
    pub fn all(&self) -> Vec<Rendered> {
        self.rendered.lock().unwrap().clone()
    }

    pub fn countdowns(&self) -> Vec<String> {
        self.all()
            .into_iter()
            .filter_map(|rendered| match rendered {
                Rendered::Countdown(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&Rendered) -> bool) -> usize {
        self.all().iter().filter(|rendered| predicate(rendered)).count()
    }

    fn push(&self, rendered: Rendered) {
        self.rendered.lock().unwrap().push(rendered);
    }
}

impl Presenter for RecordingPresenter {
    fn render_countdown(&self, text: &str) {
        self.push(Rendered::Countdown(text.to_owned()));
    }

    fn render_dual_countdown(&self, dawn_text: &str, sunset_text: &str) {
        self.push(Rendered::Dual(dawn_text.to_owned(), sunset_text.to_owned()));
    }

    fn render_no_data(&self, text: &str) {
        self.push(Rendered::NoData(text.to_owned()));
    }

    fn render_status(&self, level: StatusLevel, text: &str) {
        self.push(Rendered::Status(level, text.to_owned()));
    }

    fn render_schedule(&self, lines: &[String]) {
        self.push(Rendered::Schedule(lines.to_vec()));
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl NotificationSurface for RecordingNotifier {
    fn present(&self, message: &str) -> anyhow::Result<()> {
        self.messages.lock().unwrap().push(message.to_owned());
        if self.fail {
            anyhow::bail!("Permission denied")
        }
        Ok(())
    }
}

/// Wall clock that starts at `base` and advances with tokio's (paused) clock.
pub struct PausedClock {
    base: NaiveDateTime,
    started: tokio::time::Instant,
}

impl PausedClock {
    pub fn starting_at(base: NaiveDateTime) -> Self {
        Self {
            base,
            started: tokio::time::Instant::now(),
        }
    }
}

impl Clock for PausedClock {
    fn now(&self) -> NaiveDateTime {
        let elapsed = TimeDelta::from_std(self.started.elapsed()).unwrap();
        self.base + elapsed
    }
}

pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
    test_date().and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap())
}

pub struct TestContext {
    pub presenter: Arc<RecordingPresenter>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_notifier(RecordingNotifier::default())
    }

    pub fn with_notifier(notifier: RecordingNotifier) -> Self {
        Self {
            presenter: Arc::new(RecordingPresenter::default()),
            notifier: Arc::new(notifier),
        }
    }

    pub fn engine_context(&self, now: NaiveDateTime, notifications_enabled: bool) -> EngineContext {
        self.engine_context_in(Language::builtin(), now, notifications_enabled)
    }

    pub fn engine_context_in(
        &self,
        language: Language,
        now: NaiveDateTime,
        notifications_enabled: bool,
    ) -> EngineContext {
        EngineContext {
            presenter: self.presenter.clone(),
            notifier: self.notifier.clone(),
            catalog: Arc::new(language),
            clock: Arc::new(PausedClock::starting_at(now)),
            notifications_enabled,
        }
    }
}

pub struct StubFetcher {
    pub schedule: Mutex<DailySchedule>,
    pub calendar: Vec<RamadanCalendarRow>,
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
}

impl StubFetcher {
    pub fn new(schedule: DailySchedule) -> Self {
        Self {
            schedule: Mutex::new(schedule),
            calendar: Vec::new(),
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_calendar(mut self, calendar: Vec<RamadanCalendarRow>) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(FetchError::UnexpectedResponse("code 500".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl ScheduleFetcher for StubFetcher {
    async fn fetch_today(
        &self,
        _coordinates: &Coordinates,
        _at: DateTime<Utc>,
    ) -> Result<DailySchedule, FetchError> {
        self.check()?;
        Ok(self.schedule.lock().unwrap().clone())
    }

    async fn fetch_ramadan_calendar(
        &self,
        _coordinates: &Coordinates,
        _year: i32,
    ) -> Result<Vec<RamadanCalendarRow>, FetchError> {
        self.check()?;
        Ok(self.calendar.clone())
    }
}

pub struct StubGeocoder {
    pub name: &'static str,
    pub coordinates: Coordinates,
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn search(&self, query: &str) -> Result<Coordinates, GeocodeError> {
        if query.trim().eq_ignore_ascii_case(self.name) {
            Ok(self.coordinates.clone())
        } else {
            Err(GeocodeError::NotFound(query.to_owned()))
        }
    }
}

pub struct StubAyah {
    pub verse: Option<&'static str>,
    pub calls: AtomicUsize,
}

impl StubAyah {
    pub fn new(verse: Option<&'static str>) -> Self {
        Self {
            verse,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AyahSource for StubAyah {
    async fn random_ayah(&self) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.verse
            .map(str::to_owned)
            .ok_or_else(|| FetchError::UnexpectedResponse("code 503".to_owned()))
    }
}
