use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::i18n::{Language, LanguagePack};
use crate::models::{BoundaryLabel, TimeTable};
use crate::storage::InMemoryLocationStore;
use crate::test_utils::{Rendered, StubAyah, StubFetcher, StubGeocoder, TestContext, at};

use super::*;

struct BrokenStore;

#[async_trait]
impl LocationStore for BrokenStore {
    async fn load(&self) -> anyhow::Result<Option<Coordinates>> {
        anyhow::bail!("disk on fire")
    }

    async fn save(&self, _coordinates: &Coordinates) -> anyhow::Result<()> {
        anyhow::bail!("disk on fire")
    }
}

fn schedule() -> DailySchedule {
    DailySchedule {
        table: [
            (BoundaryLabel::Fajr, "05:00"),
            (BoundaryLabel::Sunrise, "06:30"),
            (BoundaryLabel::Dhuhr, "12:15"),
            (BoundaryLabel::Maghrib, "19:45"),
        ]
        .into_iter()
        .collect::<TimeTable>(),
        special_mode: false,
        readable_date: Some("10 Mar 2025".to_owned()),
        hijri: None,
    }
}

fn istanbul() -> Coordinates {
    Coordinates::new(41.0082, 28.9784, Some("Istanbul".to_owned())).unwrap()
}

const VERSE: &str = "Indeed, with hardship [will be] ease. (Ash-Sharh 6)";

struct Fixture {
    ctx: TestContext,
    fetcher: Arc<StubFetcher>,
    ayah: Arc<StubAyah>,
    store: Arc<dyn LocationStore>,
    app: Application,
}

fn fixture_in(
    language: Language,
    fetcher: StubFetcher,
    ayah: StubAyah,
    store: Arc<dyn LocationStore>,
) -> Fixture {
    let ctx = TestContext::new();
    let fetcher = Arc::new(fetcher);
    let ayah = Arc::new(ayah);
    let services = Services {
        fetcher: fetcher.clone(),
        geocoder: Arc::new(StubGeocoder {
            name: "istanbul",
            coordinates: istanbul(),
        }),
        ayah: ayah.clone(),
        store: Arc::clone(&store),
        usage: UsageLogger::disabled().unwrap(),
    };
    let app = Application::new(
        services,
        ctx.engine_context_in(language, at(12, 0), false),
        Duration::from_secs(60),
    );

    Fixture {
        ctx,
        fetcher,
        ayah,
        store,
        app,
    }
}

fn fixture_with(fetcher: StubFetcher, store: Arc<dyn LocationStore>) -> Fixture {
    fixture_in(Language::builtin(), fetcher, StubAyah::new(Some(VERSE)), store)
}

fn fixture() -> Fixture {
    fixture_with(
        StubFetcher::new(schedule()),
        Arc::new(InMemoryLocationStore::new()),
    )
}

fn schedules(ctx: &TestContext) -> Vec<Vec<String>> {
    ctx.presenter
        .all()
        .into_iter()
        .filter_map(|rendered| match rendered {
            Rendered::Schedule(lines) => Some(lines),
            _ => None,
        })
        .collect()
}

fn statuses(ctx: &TestContext) -> Vec<(StatusLevel, String)> {
    ctx.presenter
        .all()
        .into_iter()
        .filter_map(|rendered| match rendered {
            Rendered::Status(level, text) => Some((level, text)),
            _ => None,
        })
        .collect()
}

fn last_status(ctx: &TestContext) -> (StatusLevel, String) {
    statuses(ctx).pop().unwrap()
}

#[tokio::test(start_paused = true)]
async fn setting_a_location_starts_the_countdown() {
    let mut f = fixture();

    f.app.set_location(istanbul()).await.unwrap();

    assert_eq!(f.store.load().await.unwrap(), Some(istanbul()));
    assert_eq!(f.app.coordinates(), Some(&istanbul()));
    assert_eq!(f.app.schedule(), Some(&schedule()));

    let snapshot = f.app.countdown_snapshot();
    assert_eq!(snapshot.current.unwrap().label, BoundaryLabel::Sunrise);
    assert_eq!(snapshot.next.unwrap().label, BoundaryLabel::Dhuhr);

    assert_eq!(
        last_status(&f.ctx),
        (StatusLevel::Success, "Prayer times updated.".to_owned())
    );
    assert_eq!(
        schedules(&f.ctx),
        [[
            "10 Mar 2025",
            "Location: Istanbul (41.0082, 28.9784)",
            "  Imsak    —",
            "  Fajr     05:00",
            "  Sunrise  06:30",
            "  Dhuhr    12:15",
            "  Asr      —",
            "  Maghrib  19:45",
            "  Isha     —",
            VERSE,
        ]]
    );
    assert_eq!(
        f.ctx.presenter.countdowns().last().unwrap(),
        "Now Sunrise • 15 min until Dhuhr"
    );
}

#[tokio::test(start_paused = true)]
async fn language_notes_replace_the_daily_verse() {
    let pack: LanguagePack = serde_json::from_str(
        r#"{ "prayerTexts": { "Imsak": ["Intention before dawn"] } }"#,
    )
    .unwrap();
    let mut f = fixture_in(
        Language::new("en", pack),
        StubFetcher::new(schedule()),
        StubAyah::new(Some(VERSE)),
        Arc::new(InMemoryLocationStore::new()),
    );

    f.app.set_location(istanbul()).await.unwrap();

    let lines = schedules(&f.ctx).pop().unwrap();
    assert_eq!(f.ayah.calls(), 0);
    assert_eq!(lines[2], "  Imsak    —");
    assert_eq!(lines[3], "           Intention before dawn");
    assert!(!lines.iter().any(|line| line == VERSE));
}

#[tokio::test(start_paused = true)]
async fn failed_verse_still_renders_the_schedule() {
    let mut f = fixture_in(
        Language::builtin(),
        StubFetcher::new(schedule()),
        StubAyah::new(None),
        Arc::new(InMemoryLocationStore::new()),
    );

    f.app.set_location(istanbul()).await.unwrap();

    assert_eq!(f.ayah.calls(), 1);
    let lines = schedules(&f.ctx).pop().unwrap();
    assert_eq!(lines.last().unwrap(), "  Isha     —");
    assert_eq!(
        last_status(&f.ctx),
        (StatusLevel::Success, "Prayer times updated.".to_owned())
    );
}

#[tokio::test(start_paused = true)]
async fn failed_refresh_keeps_the_running_countdown() {
    let mut f = fixture();
    f.app.set_location(istanbul()).await.unwrap();

    f.fetcher.set_failing(true);
    let result = f.app.refresh().await;

    assert!(result.is_err());
    assert_eq!(
        last_status(&f.ctx),
        (
            StatusLevel::Error,
            "Could not load prayer times: Unexpected response: code 500".to_owned()
        )
    );
    assert_eq!(
        f.app.countdown_snapshot().next.unwrap().label,
        BoundaryLabel::Dhuhr
    );

    let before = f.ctx.presenter.countdowns().len();
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(f.ctx.presenter.countdowns().len(), before + 2);
}

#[tokio::test(start_paused = true)]
async fn refresh_without_location_waits() {
    let mut f = fixture();

    f.app.refresh().await.unwrap();

    assert_eq!(f.fetcher.calls(), 0);
    assert_eq!(
        last_status(&f.ctx),
        (StatusLevel::Info, "Waiting for a location.".to_owned())
    );
}

#[tokio::test(start_paused = true)]
async fn invalid_coordinates_are_reported() {
    let mut f = fixture();

    let result = f.app.set_coordinates(f64::NAN, 28.0, None).await;

    assert!(result.is_err());
    assert_eq!(
        last_status(&f.ctx),
        (StatusLevel::Error, "Invalid coordinates.".to_owned())
    );
    assert_eq!(f.fetcher.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn place_search_sets_location_or_reports_unknown_name() {
    let mut f = fixture();

    assert!(f.app.locate_by_name("atlantis").await.is_err());
    assert_eq!(
        last_status(&f.ctx),
        (StatusLevel::Error, "Place not found.".to_owned())
    );
    assert_eq!(f.app.coordinates(), None);

    f.app.locate_by_name("Istanbul").await.unwrap();
    assert_eq!(f.app.coordinates(), Some(&istanbul()));
    assert_eq!(f.fetcher.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn saved_location_is_restored() {
    let store: Arc<dyn LocationStore> = Arc::new(InMemoryLocationStore::new());
    store.save(&istanbul()).await.unwrap();
    let mut f = fixture_with(StubFetcher::new(schedule()), store);

    let restored = f.app.restore_location().await.unwrap();

    assert_eq!(restored, Some(istanbul()));
    assert_eq!(f.fetcher.calls(), 1);
    assert!(f.app.countdown_snapshot().current.is_some());
}

#[tokio::test(start_paused = true)]
async fn unreadable_store_counts_as_no_location() {
    let mut f = fixture_with(StubFetcher::new(schedule()), Arc::new(BrokenStore));

    assert_eq!(f.app.restore_location().await.unwrap(), None);
    assert_eq!(f.fetcher.calls(), 0);

    f.app.set_location(istanbul()).await.unwrap();
    assert_eq!(f.fetcher.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn clearing_stops_the_countdown() {
    let mut f = fixture();
    f.app.set_location(istanbul()).await.unwrap();

    f.app.clear();
    let before = f.ctx.presenter.countdowns().len();
    tokio::time::sleep(Duration::from_secs(3)).await;

    assert_eq!(f.app.coordinates(), None);
    assert_eq!(f.app.countdown_snapshot(), CountdownState::default());
    assert_eq!(f.ctx.presenter.countdowns().len(), before);
}

#[tokio::test(start_paused = true)]
async fn ramadan_calendar_renders_table_or_no_data() {
    let row = RamadanCalendarRow {
        gregorian: "01 Mar 2025".to_owned(),
        hijri: "1 Ramadan 1446".to_owned(),
        imsak: "05:08".to_owned(),
        fajr: "05:18".to_owned(),
        maghrib: "18:16".to_owned(),
        isha: "19:36".to_owned(),
    };
    let mut f = fixture_with(
        StubFetcher::new(schedule()).with_calendar(vec![row.clone()]),
        Arc::new(InMemoryLocationStore::new()),
    );

    assert!(f.app.ramadan_calendar(2025).await.is_err());

    f.app.set_location(istanbul()).await.unwrap();
    let rows = f.app.ramadan_calendar(2025).await.unwrap();

    assert_eq!(rows, vec![row]);
    assert_eq!(
        f.ctx.presenter.all().last().unwrap(),
        &Rendered::Schedule(vec![
            "Date         Hijri           Imsak  Fajr   Maghrib  Isha".to_owned(),
            "01 Mar 2025  1 Ramadan 1446  05:08  05:18  18:16    19:36".to_owned(),
        ])
    );

    let mut empty = fixture();
    empty.app.set_location(istanbul()).await.unwrap();
    assert!(empty.app.ramadan_calendar(2030).await.unwrap().is_empty());
    assert_eq!(
        last_status(&empty.ctx),
        (
            StatusLevel::Info,
            "No Ramadan days found for this year.".to_owned()
        )
    );
}

#[tokio::test(start_paused = true)]
async fn run_refreshes_on_interval_until_shutdown() {
    let mut f = fixture();
    f.app.set_location(istanbul()).await.unwrap();

    f.app
        .run(tokio::time::sleep(Duration::from_secs(150)))
        .await;

    assert_eq!(f.fetcher.calls(), 3);
    let before = f.ctx.presenter.countdowns().len();
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(f.ctx.presenter.countdowns().len(), before);
}

#[tokio::test(start_paused = true)]
async fn run_survives_failing_refreshes() {
    let mut f = fixture();
    f.app.set_location(istanbul()).await.unwrap();
    f.fetcher.set_failing(true);

    f.app
        .run(tokio::time::sleep(Duration::from_secs(130)))
        .await;

    assert_eq!(f.fetcher.calls(), 3);
    assert_eq!(last_status(&f.ctx).0, StatusLevel::Error);
}
