use chrono::{NaiveDateTime, TimeDelta};

use crate::i18n::{Catalog, UiText};
use crate::models::BoundaryLabel;

use super::{fasting::FastingCountdown, gate::MonitoredEvent, segment::CountdownState};

const PART_SEPARATOR: &str = " • ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownMessage {
    CurrentAndNext {
        current: BoundaryLabel,
        next: BoundaryLabel,
        remaining: TimeDelta,
    },
    CurrentOnly {
        current: BoundaryLabel,
        remaining: TimeDelta,
    },
    Finished,
    NoData,
}

impl CountdownMessage {
    pub fn from_state(state: &CountdownState) -> Self {
        match (state.current, state.next) {
            (None, _) => CountdownMessage::Finished,
            _ if state.remaining <= TimeDelta::zero() => CountdownMessage::Finished,
            (Some(current), Some(next)) => CountdownMessage::CurrentAndNext {
                current: current.label,
                next: next.label,
                remaining: state.remaining,
            },
            (Some(current), None) => CountdownMessage::CurrentOnly {
                current: current.label,
                remaining: state.remaining,
            },
        }
    }

    pub fn format(&self, catalog: &dyn Catalog) -> String {
        match self {
            CountdownMessage::CurrentAndNext {
                current,
                next,
                remaining,
            } => {
                let current = catalog.prayer_label(*current);
                let next = catalog.prayer_label(*next);
                let minutes = ceil_minutes(*remaining).to_string();
                fill(
                    &catalog.template(UiText::CountdownCurrentAndNext),
                    &[
                        ("current", &*current),
                        ("next", &*next),
                        ("minutes", minutes.as_str()),
                    ],
                )
            }
            CountdownMessage::CurrentOnly { current, remaining } => {
                let current = catalog.prayer_label(*current);
                let minutes = ceil_minutes(*remaining).to_string();
                fill(
                    &catalog.template(UiText::CountdownCurrentAndGeneric),
                    &[("current", &*current), ("minutes", minutes.as_str())],
                )
            }
            CountdownMessage::Finished => catalog.template(UiText::CountdownFinished).into_owned(),
            CountdownMessage::NoData => catalog.template(UiText::CountdownNoData).into_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemainingUnit {
    Clock,
    /// Whole minutes, rounded up.
    Minutes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FastingMessage {
    Upcoming {
        event: MonitoredEvent,
        remaining: TimeDelta,
        unit: RemainingUnit,
    },
    Started {
        event: MonitoredEvent,
    },
}

impl FastingMessage {
    pub fn format(&self, catalog: &dyn Catalog) -> String {
        match self {
            FastingMessage::Upcoming {
                event,
                remaining,
                unit: RemainingUnit::Clock,
            } => {
                let text = match event {
                    MonitoredEvent::Dawn => UiText::RamadanImsakInTime,
                    MonitoredEvent::Sunset => UiText::RamadanIftarInTime,
                };
                let time = format_clock(*remaining);
                fill(&catalog.template(text), &[("time", time.as_str())])
            }
            FastingMessage::Upcoming {
                event,
                remaining,
                unit: RemainingUnit::Minutes,
            } => {
                let text = match event {
                    MonitoredEvent::Dawn => UiText::RamadanImsakInMinutes,
                    MonitoredEvent::Sunset => UiText::RamadanIftarInMinutes,
                };
                let minutes = ceil_minutes(*remaining).to_string();
                fill(&catalog.template(text), &[("minutes", minutes.as_str())])
            }
            FastingMessage::Started { event } => {
                let text = match event {
                    MonitoredEvent::Dawn => UiText::RamadanImsakStarted,
                    MonitoredEvent::Sunset => UiText::RamadanIftarStarted,
                };
                catalog.template(text).into_owned()
            }
        }
    }
}

/// Texts produced for one fasting-month tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastingTexts {
    /// Both events with `HH:MM:SS`, replacing the ordinary countdown line.
    pub headline: String,
    pub dawn: String,
    pub sunset: String,
}

pub fn fasting_texts(
    countdown: &FastingCountdown,
    now: NaiveDateTime,
    catalog: &dyn Catalog,
) -> FastingTexts {
    let message = |event: MonitoredEvent, unit: RemainingUnit| {
        countdown.segment(event).map(|segment| {
            let message = if segment.is_ahead_of(now) {
                FastingMessage::Upcoming {
                    event,
                    remaining: segment.remaining_from(now),
                    unit,
                }
            } else {
                FastingMessage::Started { event }
            };
            message.format(catalog)
        })
    };

    let headline = MonitoredEvent::ALL
        .into_iter()
        .filter_map(|event| message(event, RemainingUnit::Clock))
        .collect::<Vec<_>>()
        .join(PART_SEPARATOR);
    let headline = if headline.is_empty() {
        CountdownMessage::Finished.format(catalog)
    } else {
        headline
    };

    let dawn = message(MonitoredEvent::Dawn, RemainingUnit::Minutes);
    let sunset = message(MonitoredEvent::Sunset, RemainingUnit::Minutes);
    let (dawn, sunset) = match (dawn, sunset) {
        (None, None) => (catalog.template(UiText::RamadanInlineNoData).into_owned(), String::new()),
        (dawn, sunset) => (dawn.unwrap_or_default(), sunset.unwrap_or_default()),
    };

    FastingTexts {
        headline,
        dawn,
        sunset,
    }
}

pub fn notification_text(event: MonitoredEvent, catalog: &dyn Catalog) -> String {
    let text = match event {
        MonitoredEvent::Dawn => UiText::NotifImsakSoon,
        MonitoredEvent::Sunset => UiText::NotifIftarSoon,
    };
    catalog.template(text).into_owned()
}

/// Whole minutes left, rounded up. Zero or negative durations give zero.
pub fn ceil_minutes(remaining: TimeDelta) -> i64 {
    let millis = remaining.num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    (millis + 59_999) / 60_000
}

pub fn format_clock(remaining: TimeDelta) -> String {
    let total_seconds = remaining.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

pub fn format_wall_clock(now: NaiveDateTime) -> String {
    now.format("%H:%M:%S").to_string()
}

fn fill(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_owned(), |text, (name, value)| {
            text.replace(&format!("{{{name}}}"), value)
        })
}
