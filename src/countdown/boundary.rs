use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Turns an API time label such as `"05:34"` or `"05:34 (+03)"` into an
/// instant on `reference_date`.
///
/// Only the leading `HH:MM` token is significant. Anything malformed yields
/// `None`; a bad label never falls back to midnight. The result is local wall
/// clock time, no timezone conversion is applied.
pub fn parse_boundary(reference_date: NaiveDate, label: &str) -> Option<NaiveDateTime> {
    let main = label.split_whitespace().next()?;
    let mut parts = main.split(':');

    let hour = parse_component(parts.next()?)?;
    let minute = parse_component(parts.next()?)?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;

    Some(reference_date.and_time(time))
}

fn parse_component(component: &str) -> Option<u32> {
    if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    component.parse().ok()
}
