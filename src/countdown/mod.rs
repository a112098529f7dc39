mod boundary;
mod clock;
mod engine;
mod fasting;
pub mod format;
mod gate;
mod segment;

pub use boundary::parse_boundary;
pub use clock::{Clock, SystemClock};
pub use engine::{CountdownEngine, EngineContext};
pub use fasting::FastingCountdown;
pub use gate::{
    MonitoredEvent, NOTIFICATION_THRESHOLD_MINUTES, NotificationGate, OneShot, ThresholdCheck,
    check_threshold, notification_threshold,
};
pub use segment::{CountdownState, Segment, build_segments, locate_current};
