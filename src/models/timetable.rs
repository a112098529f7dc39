use std::{collections::BTreeMap, fmt};

/// Named prayer-time boundaries, in the order the day declares them.
///
/// The declaration order doubles as the tie-break when two boundaries
/// share the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BoundaryLabel {
    Imsak,
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    /// Sunset, also the iftar boundary.
    Maghrib,
    Isha,
}

impl BoundaryLabel {
    pub const ALL: [BoundaryLabel; 7] = [
        BoundaryLabel::Imsak,
        BoundaryLabel::Fajr,
        BoundaryLabel::Sunrise,
        BoundaryLabel::Dhuhr,
        BoundaryLabel::Asr,
        BoundaryLabel::Maghrib,
        BoundaryLabel::Isha,
    ];

    /// Key used by the prayer-times API and by language packs.
    pub fn api_key(&self) -> &'static str {
        match self {
            BoundaryLabel::Imsak => "Imsak",
            BoundaryLabel::Fajr => "Fajr",
            BoundaryLabel::Sunrise => "Sunrise",
            BoundaryLabel::Dhuhr => "Dhuhr",
            BoundaryLabel::Asr => "Asr",
            BoundaryLabel::Maghrib => "Maghrib",
            BoundaryLabel::Isha => "Isha",
        }
    }

    pub fn from_api_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.api_key() == key)
    }
}

impl fmt::Display for BoundaryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_key())
    }
}

/// Raw time-of-day strings for today, keyed by boundary.
///
/// Values are kept exactly as the API returned them ("05:34", "05:34 (+03)");
/// parsing happens when segments are built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeTable(BTreeMap<BoundaryLabel, String>);

impl TimeTable {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builds a table from API key/value pairs, ignoring keys that are not boundaries.
    pub fn from_api_timings<'a>(timings: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        timings
            .into_iter()
            .filter_map(|(key, value)| BoundaryLabel::from_api_key(key).map(|label| (label, value)))
            .collect()
    }

    pub fn get(&self, label: BoundaryLabel) -> Option<&str> {
        self.0.get(&label).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BoundaryLabel, &str)> {
        self.0.iter().map(|(label, value)| (*label, value.as_str()))
    }

    pub fn subset(&self, labels: &[BoundaryLabel]) -> TimeTable {
        self.iter()
            .filter(|(label, _)| labels.contains(label))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(BoundaryLabel, S)> for TimeTable {
    fn from_iter<T: IntoIterator<Item = (BoundaryLabel, S)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(label, value)| (label, value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_keys_map_back_to_labels() {
        for label in BoundaryLabel::ALL {
            assert_eq!(BoundaryLabel::from_api_key(label.api_key()), Some(label));
        }
        assert_eq!(BoundaryLabel::from_api_key("Midnight"), None);
    }

    #[test]
    fn api_timings_skip_unknown_keys() {
        let table = TimeTable::from_api_timings([
            ("Fajr", "05:10"),
            ("Sunset", "19:40"),
            ("Midnight", "00:30"),
            ("Maghrib", "19:45 (+03)"),
        ]);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(BoundaryLabel::Fajr), Some("05:10"));
        assert_eq!(table.get(BoundaryLabel::Maghrib), Some("19:45 (+03)"));
        assert_eq!(table.get(BoundaryLabel::Isha), None);
    }

    #[test]
    fn subset_keeps_only_requested_labels() {
        let table: TimeTable = [
            (BoundaryLabel::Imsak, "04:50"),
            (BoundaryLabel::Dhuhr, "12:15"),
            (BoundaryLabel::Maghrib, "19:45"),
        ]
        .into_iter()
        .collect();

        let subset = table.subset(&[BoundaryLabel::Imsak, BoundaryLabel::Maghrib]);

        assert_eq!(subset.len(), 2);
        assert!(subset.get(BoundaryLabel::Dhuhr).is_none());
    }
}
