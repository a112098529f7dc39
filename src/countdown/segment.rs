use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::models::{BoundaryLabel, TimeTable};

use super::boundary::parse_boundary;

/// The period starting at `instant`, named after the boundary that opens it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub label: BoundaryLabel,
    pub instant: NaiveDateTime,
}

impl Segment {
    pub fn remaining_from(&self, now: NaiveDateTime) -> TimeDelta {
        (self.instant - now).max(TimeDelta::zero())
    }

    pub fn is_ahead_of(&self, now: NaiveDateTime) -> bool {
        self.instant > now
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownState {
    pub current: Option<Segment>,
    pub next: Option<Segment>,
    pub remaining: TimeDelta,
}

impl Default for CountdownState {
    fn default() -> Self {
        Self {
            current: None,
            next: None,
            remaining: TimeDelta::zero(),
        }
    }
}

/// Parses every boundary of `table` against `reference_date` and sorts the
/// result by instant. Unparseable entries are left out. Equal instants keep
/// the declaration order of [`BoundaryLabel`].
pub fn build_segments(table: &TimeTable, reference_date: NaiveDate) -> Vec<Segment> {
    let mut segments: Vec<Segment> = BoundaryLabel::ALL
        .into_iter()
        .filter_map(|label| {
            let raw = table.get(label)?;
            parse_boundary(reference_date, raw).map(|instant| Segment { label, instant })
        })
        .collect();

    // stable
    segments.sort_by_key(|segment| segment.instant);
    segments
}

/// Finds the segment `now` falls in and the one after it.
///
/// Before the first boundary the first segment is reported as current.
/// After the last boundary there is no next segment and nothing remains.
pub fn locate_current(segments: &[Segment], now: NaiveDateTime) -> CountdownState {
    match segments.iter().position(|segment| segment.is_ahead_of(now)) {
        None => CountdownState {
            current: segments.last().copied(),
            next: None,
            remaining: TimeDelta::zero(),
        },
        Some(0) => {
            let first = segments[0];
            CountdownState {
                current: Some(first),
                next: segments.get(1).copied(),
                remaining: first.instant - now,
            }
        }
        Some(next_index) => {
            let next = segments[next_index];
            CountdownState {
                current: Some(segments[next_index - 1]),
                next: Some(next),
                remaining: next.instant - now,
            }
        }
    }
}
