use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use chrono::NaiveDateTime;
use tokio::{
    task::{self, JoinHandle},
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::delivery::{NotificationSurface, Presenter};
use crate::i18n::Catalog;
use crate::models::TimeTable;

use super::{
    clock::Clock,
    fasting::FastingCountdown,
    format::{self, CountdownMessage},
    gate::{MonitoredEvent, NotificationGate},
    segment::{CountdownState, Segment, build_segments, locate_current},
};

const TICK_PERIOD: Duration = Duration::from_secs(1);

pub struct EngineContext {
    pub presenter: Arc<dyn Presenter>,
    pub notifier: Arc<dyn NotificationSurface>,
    pub catalog: Arc<dyn Catalog>,
    pub clock: Arc<dyn Clock>,
    pub notifications_enabled: bool,
}

/// Drives the once-a-second countdown for the schedule currently loaded.
///
/// At most one session exists at a time. Starting a new one drops the old
/// session first, which cancels its ticker.
pub struct CountdownEngine {
    context: Arc<EngineContext>,
    session: Option<CountdownSession>,
}

struct CountdownSession {
    state: Arc<Mutex<SessionState>>,
    _ticker: Ticker,
}

struct SessionState {
    table: TimeTable,
    segments: Vec<Segment>,
    special_mode: bool,
    gate: NotificationGate,
    snapshot: CountdownState,
}

struct Ticker {
    task: JoinHandle<()>,
    cancellation_token: CancellationToken,
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
        self.task.abort();
    }
}

impl CountdownEngine {
    pub fn new(context: EngineContext) -> Self {
        Self {
            context: Arc::new(context),
            session: None,
        }
    }

    /// Replaces the running session, if any, with one for `table`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, table: TimeTable, special_mode: bool) {
        self.stop();

        let now = self.context.clock.now();
        let segments = build_segments(&table, now.date());

        if segments.is_empty() {
            log::warn!(
                "[START] No parseable boundaries in schedule, countdown not started. [entries = {}]",
                table.len()
            );
            let text = CountdownMessage::NoData.format(self.context.catalog.as_ref());
            self.context.presenter.render_no_data(&text);
            return;
        }

        log::info!(
            "[START] Countdown session with {} boundaries. [special_mode = {}]",
            segments.len(),
            special_mode
        );

        let mut state = SessionState {
            table,
            segments,
            special_mode,
            gate: NotificationGate::new(),
            snapshot: CountdownState::default(),
        };
        run_tick(&mut state, &self.context, now);

        let state = Arc::new(Mutex::new(state));
        let ticker = spawn_ticker(Arc::clone(&state), Arc::clone(&self.context));

        self.session = Some(CountdownSession {
            state,
            _ticker: ticker,
        });
    }

    pub fn stop(&mut self) {
        if self.session.take().is_some() {
            log::info!("[STOP] Countdown session stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// State derived by the latest tick, or the empty state when stopped.
    pub fn countdown_snapshot(&self) -> CountdownState {
        self.session
            .as_ref()
            .map(|session| lock(&session.state).snapshot.clone())
            .unwrap_or_default()
    }
}

fn spawn_ticker(state: Arc<Mutex<SessionState>>, context: Arc<EngineContext>) -> Ticker {
    let cancellation_token = CancellationToken::new();
    let task_cancellation_token = cancellation_token.child_token();

    let task = task::spawn(async move {
        let mut interval = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = task_cancellation_token.cancelled() => {
                    log::debug!("[TICK] Countdown ticker cancelled");
                    break;
                }
                _ = interval.tick() => {
                    if task_cancellation_token.is_cancelled() {
                        break;
                    }
                    let mut guard = lock(&state);
                    let now = context.clock.now();
                    run_tick(&mut guard, &context, now);
                }
            }
        }
    });

    Ticker {
        task,
        cancellation_token,
    }
}

fn run_tick(state: &mut SessionState, context: &EngineContext, now: NaiveDateTime) {
    let catalog = context.catalog.as_ref();
    let countdown = locate_current(&state.segments, now);

    context.presenter.render_clock(&format::format_wall_clock(now));

    if state.special_mode {
        let fasting = FastingCountdown::compute(&state.table, now);

        if context.notifications_enabled {
            for event in MonitoredEvent::ALL {
                if state.gate.check(event, fasting.instant(event), now) {
                    notify(context, event);
                }
            }
        }

        let texts = format::fasting_texts(&fasting, now, catalog);
        context.presenter.render_countdown(&texts.headline);
        context
            .presenter
            .render_dual_countdown(&texts.dawn, &texts.sunset);
    } else {
        let text = CountdownMessage::from_state(&countdown).format(catalog);
        context.presenter.render_countdown(&text);
    }

    state.snapshot = countdown;
}

fn notify(context: &EngineContext, event: MonitoredEvent) {
    let message = format::notification_text(event, context.catalog.as_ref());
    log::info!("[NOTIFY] Threshold reached. [event = {:?}]", event);

    if let Err(e) = context.notifier.present(&message) {
        log::warn!("Could not present notification. [event = {:?}]: {:#}", event, e);
    }
}

fn lock(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
