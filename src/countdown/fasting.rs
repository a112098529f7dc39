use chrono::NaiveDateTime;

use crate::models::TimeTable;

use super::{
    gate::MonitoredEvent,
    segment::{Segment, build_segments},
};

/// Imsak and iftar boundaries for the fasting-month countdown.
///
/// Built with the ordinary segment builder over a two-label table, against
/// the date of `now`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FastingCountdown {
    segments: Vec<Segment>,
}

impl FastingCountdown {
    pub fn compute(table: &TimeTable, now: NaiveDateTime) -> Self {
        let labels = MonitoredEvent::ALL.map(|event| event.boundary());
        let segments = build_segments(&table.subset(&labels), now.date());
        Self { segments }
    }

    pub fn segment(&self, event: MonitoredEvent) -> Option<Segment> {
        self.segments
            .iter()
            .find(|segment| segment.label == event.boundary())
            .copied()
    }

    pub fn instant(&self, event: MonitoredEvent) -> Option<NaiveDateTime> {
        self.segment(event).map(|segment| segment.instant)
    }
}
