use chrono::{NaiveDateTime, TimeDelta};

use crate::models::BoundaryLabel;

pub const NOTIFICATION_THRESHOLD_MINUTES: i64 = 10;

pub fn notification_threshold() -> TimeDelta {
    TimeDelta::minutes(NOTIFICATION_THRESHOLD_MINUTES)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonitoredEvent {
    /// Imsak, the start of the fast.
    Dawn,
    /// Maghrib, the iftar.
    Sunset,
}

impl MonitoredEvent {
    pub const ALL: [MonitoredEvent; 2] = [MonitoredEvent::Dawn, MonitoredEvent::Sunset];

    pub fn boundary(&self) -> BoundaryLabel {
        match self {
            MonitoredEvent::Dawn => BoundaryLabel::Imsak,
            MonitoredEvent::Sunset => BoundaryLabel::Maghrib,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OneShot {
    sent: bool,
}

impl OneShot {
    pub fn is_sent(&self) -> bool {
        self.sent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdCheck {
    pub fire: bool,
    pub state: OneShot,
}

/// Fires once when `event_instant` is at most `threshold` ahead of `now`.
///
/// Passed events and events further away than `threshold` never fire,
/// whatever the state. Once fired the returned state stays sent.
pub fn check_threshold(
    state: OneShot,
    event_instant: Option<NaiveDateTime>,
    now: NaiveDateTime,
    threshold: TimeDelta,
) -> ThresholdCheck {
    let Some(event_instant) = event_instant else {
        return ThresholdCheck { fire: false, state };
    };

    let remaining = event_instant - now;
    let in_window = remaining > TimeDelta::zero() && remaining <= threshold;

    if in_window && !state.sent {
        ThresholdCheck {
            fire: true,
            state: OneShot { sent: true },
        }
    } else {
        ThresholdCheck { fire: false, state }
    }
}

/// One-shot flags for both monitored events. Lives exactly as long as a
/// countdown session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationGate {
    dawn: OneShot,
    sunset: OneShot,
}

impl NotificationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(
        &mut self,
        event: MonitoredEvent,
        event_instant: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> bool {
        let flag = self.flag_mut(event);
        let check = check_threshold(*flag, event_instant, now, notification_threshold());
        *flag = check.state;
        check.fire
    }

    fn flag_mut(&mut self, event: MonitoredEvent) -> &mut OneShot {
        match event {
            MonitoredEvent::Dawn => &mut self.dawn,
            MonitoredEvent::Sunset => &mut self.sunset,
        }
    }
}
