pub mod location;
pub mod schedule;
pub mod timetable;

pub use location::{Coordinates, InvalidCoordinates};
pub use schedule::{DailySchedule, HijriDate, RAMADAN_MONTH_NUMBER, RamadanCalendarRow};
pub use timetable::{BoundaryLabel, TimeTable};
