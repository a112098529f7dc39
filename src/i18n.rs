use std::{
    borrow::Cow,
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;

use crate::models::BoundaryLabel;

pub const SUPPORTED_LANGUAGES: [&str; 10] = ["tr", "en", "de", "ar", "es", "fr", "ru", "pt", "hi", "zh"];
pub const FALLBACK_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiText {
    CountdownCurrentAndNext,
    CountdownCurrentAndGeneric,
    CountdownFinished,
    CountdownNoData,
    RamadanImsakInTime,
    RamadanIftarInTime,
    RamadanImsakInMinutes,
    RamadanIftarInMinutes,
    RamadanImsakStarted,
    RamadanIftarStarted,
    RamadanInlineNoData,
    RamadanBadge,
    NotifImsakSoon,
    NotifIftarSoon,
    HijriPrefix,
    CoordsPrefix,
    StatusWaiting,
    StatusLoadingTimes,
    StatusSuccessTimes,
    StatusErrorTimesPrefix,
    StatusInvalidName,
    StatusInvalidCoords,
    CalStatusLoading,
    CalStatusNoData,
    CalStatusErrorPrefix,
}

impl UiText {
    pub fn key(&self) -> &'static str {
        match self {
            UiText::CountdownCurrentAndNext => "countdownCurrentAndNext",
            UiText::CountdownCurrentAndGeneric => "countdownCurrentAndGeneric",
            UiText::CountdownFinished => "countdownFinished",
            UiText::CountdownNoData => "countdownNoData",
            UiText::RamadanImsakInTime => "ramadanImsakInTime",
            UiText::RamadanIftarInTime => "ramadanIftarInTime",
            UiText::RamadanImsakInMinutes => "ramadanImsakInMinutes",
            UiText::RamadanIftarInMinutes => "ramadanIftarInMinutes",
            UiText::RamadanImsakStarted => "ramadanImsakStarted",
            UiText::RamadanIftarStarted => "ramadanIftarStarted",
            UiText::RamadanInlineNoData => "ramadanInlineNoData",
            UiText::RamadanBadge => "ramadanBadge",
            UiText::NotifImsakSoon => "notifImsakSoon",
            UiText::NotifIftarSoon => "notifIftarSoon",
            UiText::HijriPrefix => "hijriPrefix",
            UiText::CoordsPrefix => "coordsPrefix",
            UiText::StatusWaiting => "statusWaiting",
            UiText::StatusLoadingTimes => "statusLoadingTimes",
            UiText::StatusSuccessTimes => "statusSuccessTimes",
            UiText::StatusErrorTimesPrefix => "statusErrorTimesPrefix",
            UiText::StatusInvalidName => "statusInvalidName",
            UiText::StatusInvalidCoords => "statusInvalidCoords",
            UiText::CalStatusLoading => "calStatusLoading",
            UiText::CalStatusNoData => "calStatusNoData",
            UiText::CalStatusErrorPrefix => "calStatusErrorPrefix",
        }
    }

    pub fn default_template(&self) -> &'static str {
        match self {
            UiText::CountdownCurrentAndNext => "Now {current} • {minutes} min until {next}",
            UiText::CountdownCurrentAndGeneric => "Now {current} • {minutes} min until the next prayer",
            UiText::CountdownFinished => "No prayer times left for today",
            UiText::CountdownNoData => "No prayer times available",
            UiText::RamadanImsakInTime => "Imsak in {time}",
            UiText::RamadanIftarInTime => "Iftar in {time}",
            UiText::RamadanImsakInMinutes => "{minutes} minutes until imsak",
            UiText::RamadanIftarInMinutes => "{minutes} minutes until iftar",
            UiText::RamadanImsakStarted => "Imsak time has begun",
            UiText::RamadanIftarStarted => "Iftar time has begun",
            UiText::RamadanInlineNoData => "No data for the Ramadan countdown today.",
            UiText::RamadanBadge => "🌙 Ramadan",
            UiText::NotifImsakSoon => "10 minutes left until imsak",
            UiText::NotifIftarSoon => "10 minutes left until iftar",
            UiText::HijriPrefix => "Hijri:",
            UiText::CoordsPrefix => "Location:",
            UiText::StatusWaiting => "Waiting for a location.",
            UiText::StatusLoadingTimes => "Loading prayer times...",
            UiText::StatusSuccessTimes => "Prayer times updated.",
            UiText::StatusErrorTimesPrefix => "Could not load prayer times: ",
            UiText::StatusInvalidName => "Place not found.",
            UiText::StatusInvalidCoords => "Invalid coordinates.",
            UiText::CalStatusLoading => "Loading Ramadan calendar...",
            UiText::CalStatusNoData => "No Ramadan days found for this year.",
            UiText::CalStatusErrorPrefix => "Could not load Ramadan calendar: ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarColumn {
    Gregorian,
    Hijri,
    Imsak,
    Fajr,
    Maghrib,
    Isha,
}

impl CalendarColumn {
    pub const ALL: [CalendarColumn; 6] = [
        CalendarColumn::Gregorian,
        CalendarColumn::Hijri,
        CalendarColumn::Imsak,
        CalendarColumn::Fajr,
        CalendarColumn::Maghrib,
        CalendarColumn::Isha,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            CalendarColumn::Gregorian => "gregorian",
            CalendarColumn::Hijri => "hijri",
            CalendarColumn::Imsak => "imsak",
            CalendarColumn::Fajr => "fajr",
            CalendarColumn::Maghrib => "maghrib",
            CalendarColumn::Isha => "isha",
        }
    }

    pub fn default_header(&self) -> &'static str {
        match self {
            CalendarColumn::Gregorian => "Date",
            CalendarColumn::Hijri => "Hijri",
            CalendarColumn::Imsak => "Imsak",
            CalendarColumn::Fajr => "Fajr",
            CalendarColumn::Maghrib => "Maghrib",
            CalendarColumn::Isha => "Isha",
        }
    }
}

pub trait Catalog: Send + Sync {
    fn template(&self, text: UiText) -> Cow<'_, str>;
    fn prayer_label(&self, label: BoundaryLabel) -> Cow<'_, str>;
    fn calendar_header(&self, column: CalendarColumn) -> Cow<'_, str>;

    fn prayer_texts(&self, _label: BoundaryLabel) -> &[String] {
        &[]
    }

    fn ramadan_notes(&self) -> &[String] {
        &[]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguagePack {
    #[serde(default)]
    pub ui: HashMap<String, String>,
    #[serde(default)]
    pub prayer_labels: HashMap<String, String>,
    #[serde(default)]
    pub calendar_headers: HashMap<String, String>,
    #[serde(default)]
    pub prayer_texts: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub ramadan_notes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Language {
    code: &'static str,
    pack: LanguagePack,
}

impl Language {
    pub fn builtin() -> Self {
        Self {
            code: FALLBACK_LANGUAGE,
            pack: LanguagePack::default(),
        }
    }

    pub fn new(code: &str, pack: LanguagePack) -> Self {
        Self {
            code: normalize_language(code),
            pack,
        }
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Loads `<dir>/<code>.json`, falling back to English and then to the
    /// built-in texts. Never fails.
    pub async fn load(dir: Option<&Path>, code: &str) -> Self {
        let normalized = normalize_language(code);
        let Some(dir) = dir else {
            return Self::builtin();
        };

        match read_pack(&pack_path(dir, normalized)).await {
            Ok(pack) => return Self::new(normalized, pack),
            Err(e) => log::warn!("Language load error [code = {normalized}]: {e:#}"),
        }

        if normalized != FALLBACK_LANGUAGE {
            match read_pack(&pack_path(dir, FALLBACK_LANGUAGE)).await {
                Ok(pack) => return Self::new(FALLBACK_LANGUAGE, pack),
                Err(e) => log::warn!("Fallback language load error: {e:#}"),
            }
        }

        Self::builtin()
    }
}

impl Catalog for Language {
    fn template(&self, text: UiText) -> Cow<'_, str> {
        self.pack
            .ui
            .get(text.key())
            .filter(|value| !value.is_empty())
            .map(|value| Cow::Borrowed(value.as_str()))
            .unwrap_or(Cow::Borrowed(text.default_template()))
    }

    fn prayer_label(&self, label: BoundaryLabel) -> Cow<'_, str> {
        self.pack
            .prayer_labels
            .get(label.api_key())
            .filter(|value| !value.is_empty())
            .map(|value| Cow::Borrowed(value.as_str()))
            .unwrap_or(Cow::Borrowed(label.api_key()))
    }

    fn calendar_header(&self, column: CalendarColumn) -> Cow<'_, str> {
        self.pack
            .calendar_headers
            .get(column.key())
            .filter(|value| !value.is_empty())
            .map(|value| Cow::Borrowed(value.as_str()))
            .unwrap_or(Cow::Borrowed(column.default_header()))
    }

    fn prayer_texts(&self, label: BoundaryLabel) -> &[String] {
        self.pack
            .prayer_texts
            .get(label.api_key())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn ramadan_notes(&self) -> &[String] {
        &self.pack.ramadan_notes
    }
}

/// Picks `pool[index % len]`. The fasting-month pool wins over the
/// per-boundary texts whenever `special_mode` is set and it is not empty.
pub fn pick_note<'a>(
    texts: &'a [String],
    ramadan_notes: &'a [String],
    index: usize,
    special_mode: bool,
) -> Option<&'a str> {
    let pool = if special_mode && !ramadan_notes.is_empty() {
        ramadan_notes
    } else {
        texts
    };

    if pool.is_empty() {
        return None;
    }

    Some(pool[index % pool.len()].as_str()).filter(|note| !note.is_empty())
}

/// Note shown under `label` on the given day. Each boundary is offset by its
/// position in the day, so neighbouring rows do not repeat the same entry.
pub fn prayer_note(
    catalog: &dyn Catalog,
    label: BoundaryLabel,
    day_of_year: usize,
    special_mode: bool,
) -> Option<&str> {
    let offset = BoundaryLabel::ALL
        .iter()
        .position(|candidate| *candidate == label)
        .unwrap_or_default();

    pick_note(
        catalog.prayer_texts(label),
        catalog.ramadan_notes(),
        day_of_year + offset,
        special_mode,
    )
}

/// Maps a locale such as `de_DE.UTF-8` or `pt-BR` to a supported language code.
pub fn detect_language(locale: &str) -> &'static str {
    let locale = locale.to_lowercase();
    SUPPORTED_LANGUAGES
        .into_iter()
        .find(|code| locale.starts_with(code))
        .unwrap_or(FALLBACK_LANGUAGE)
}

/// Language of the process environment (`LC_ALL`, `LC_MESSAGES`, `LANG`).
pub fn detect_from_env() -> &'static str {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .into_iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.is_empty() && value != "C" && value != "POSIX")
        .map(|value| detect_language(&value))
        .unwrap_or(FALLBACK_LANGUAGE)
}

pub fn normalize_language(code: &str) -> &'static str {
    SUPPORTED_LANGUAGES
        .into_iter()
        .find(|supported| supported.eq_ignore_ascii_case(code))
        .unwrap_or(FALLBACK_LANGUAGE)
}

fn pack_path(dir: &Path, code: &str) -> PathBuf {
    dir.join(format!("{code}.json"))
}

async fn read_pack(path: &Path) -> anyhow::Result<LanguagePack> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read language file {}", path.display()))?;
    let pack = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse language file {}", path.display()))?;
    Ok(pack)
}
