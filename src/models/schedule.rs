use super::timetable::TimeTable;

pub const RAMADAN_MONTH_NUMBER: u32 = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HijriDate {
    pub day: String,
    pub month_number: Option<u32>,
    pub month_name: String,
    pub year: String,
}

impl HijriDate {
    pub fn label(&self) -> String {
        format!("{} {} {}", self.day, self.month_name, self.year)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySchedule {
    pub table: TimeTable,
    pub special_mode: bool,
    pub readable_date: Option<String>,
    pub hijri: Option<HijriDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RamadanCalendarRow {
    pub gregorian: String,
    pub hijri: String,
    pub imsak: String,
    pub fajr: String,
    pub maghrib: String,
    pub isha: String,
}
