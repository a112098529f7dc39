use std::{
    io::{self, Write},
    sync::{Mutex, PoisonError},
};

use crossterm::{
    cursor::MoveToColumn,
    queue,
    style::Print,
    terminal::{Clear, ClearType},
    tty::IsTty,
};

use crate::delivery::{Presenter, StatusLevel};
use crate::i18n::{CalendarColumn, Catalog, UiText, prayer_note};
use crate::models::{BoundaryLabel, Coordinates, DailySchedule, RamadanCalendarRow};

const COLUMN_GAP: &str = "  ";
const MISSING_TIME: &str = "—";

#[derive(Default)]
struct LiveLine {
    clock: String,
    countdown: String,
    dual: Option<(String, String)>,
    last_printed: String,
}

impl LiveLine {
    fn compose(&self) -> String {
        let mut line = if self.clock.is_empty() {
            self.countdown.clone()
        } else {
            format!("{}{}{}", self.clock, COLUMN_GAP, self.countdown)
        };

        if let Some((dawn, sunset)) = &self.dual {
            let parts: Vec<&str> = [dawn.as_str(), sunset.as_str()]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect();
            if !parts.is_empty() {
                line.push_str(&format!(" ({})", parts.join(" | ")));
            }
        }

        line
    }
}

/// When stdout is not a terminal the line is printed only when its countdown
/// text changes, without the wall clock.
pub struct TerminalPresenter {
    interactive: bool,
    line: Mutex<LiveLine>,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self {
            interactive: io::stdout().is_tty(),
            line: Mutex::new(LiveLine::default()),
        }
    }

    fn update(&self, change: impl FnOnce(&mut LiveLine)) {
        let mut line = self.line.lock().unwrap_or_else(PoisonError::into_inner);
        change(&mut line);

        let mut stdout = io::stdout().lock();
        let result = if self.interactive {
            redraw(&mut stdout, &line.compose()).and_then(|_| stdout.flush())
        } else {
            let text = LiveLine {
                clock: String::new(),
                countdown: line.countdown.clone(),
                dual: line.dual.clone(),
                last_printed: String::new(),
            }
            .compose();
            if text == line.last_printed {
                return;
            }
            let result = writeln!(stdout, "{}", text);
            line.last_printed = text;
            result
        };

        if let Err(e) = result {
            log::debug!("Could not write countdown line: {}", e);
        }
    }

    fn print_above(&self, lines: &[String]) {
        let line = self.line.lock().unwrap_or_else(PoisonError::into_inner);
        let mut stdout = io::stdout().lock();

        let result = (|| -> io::Result<()> {
            if self.interactive {
                redraw(&mut stdout, "")?;
            }
            for text in lines {
                queue!(stdout, Print(text), Print('\n'))?;
            }
            if self.interactive && !line.countdown.is_empty() {
                queue!(stdout, Print(line.compose()))?;
            }
            stdout.flush()
        })();

        if let Err(e) = result {
            log::debug!("Could not write to stdout: {}", e);
        }
    }
}

fn redraw(out: &mut impl Write, text: &str) -> io::Result<()> {
    queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine), Print(text))
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for TerminalPresenter {
    fn render_countdown(&self, text: &str) {
        self.update(|line| {
            line.countdown = text.to_owned();
            line.dual = None;
        });
    }

    fn render_dual_countdown(&self, dawn_text: &str, sunset_text: &str) {
        self.update(|line| line.dual = Some((dawn_text.to_owned(), sunset_text.to_owned())));
    }

    fn render_no_data(&self, text: &str) {
        self.update(|line| {
            line.countdown = text.to_owned();
            line.dual = None;
        });
    }

    fn render_clock(&self, text: &str) {
        let mut line = self.line.lock().unwrap_or_else(PoisonError::into_inner);
        line.clock = text.to_owned();
    }

    fn render_status(&self, level: StatusLevel, text: &str) {
        let marker = match level {
            StatusLevel::Info => "·",
            StatusLevel::Success => "✓",
            StatusLevel::Error => "✗",
        };
        self.print_above(&[format!("{} {}", marker, text)]);
    }

    fn render_schedule(&self, lines: &[String]) {
        self.print_above(lines);
    }
}

/// Header block and every boundary of the day, with the day's note for it
/// underneath when the language pack has one.
pub fn schedule_lines(
    schedule: &DailySchedule,
    coordinates: Option<&Coordinates>,
    catalog: &dyn Catalog,
    day_of_year: usize,
) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(date) = &schedule.readable_date {
        lines.push(date.clone());
    }

    if let Some(hijri) = &schedule.hijri {
        let mut line = format!("{} {}", catalog.template(UiText::HijriPrefix), hijri.label());
        if schedule.special_mode {
            line.push(' ');
            line.push_str(&catalog.template(UiText::RamadanBadge));
        }
        lines.push(line);
    }

    if let Some(coordinates) = coordinates {
        lines.push(coordinates.describe(&catalog.template(UiText::CoordsPrefix)));
    }

    let names: Vec<_> = BoundaryLabel::ALL
        .into_iter()
        .map(|label| (label, catalog.prayer_label(label)))
        .collect();
    let width = names
        .iter()
        .map(|(_, name)| name.chars().count())
        .max()
        .unwrap_or_default();

    for (label, name) in names {
        let value = schedule.table.get(label).unwrap_or(MISSING_TIME);
        lines.push(format!("  {name:<width$}{COLUMN_GAP}{value}"));

        if let Some(note) = prayer_note(catalog, label, day_of_year, schedule.special_mode) {
            lines.push(format!("  {:width$}{COLUMN_GAP}{note}", ""));
        }
    }

    lines
}

pub fn calendar_table(rows: &[RamadanCalendarRow], catalog: &dyn Catalog) -> Vec<String> {
    let header: Vec<String> = CalendarColumn::ALL
        .into_iter()
        .map(|column| catalog.calendar_header(column).into_owned())
        .collect();

    let cells: Vec<[&str; 6]> = rows
        .iter()
        .map(|row| {
            [
                row.gregorian.as_str(),
                row.hijri.as_str(),
                row.imsak.as_str(),
                row.fajr.as_str(),
                row.maghrib.as_str(),
                row.isha.as_str(),
            ]
        })
        .collect();

    let widths: Vec<usize> = (0..CalendarColumn::ALL.len())
        .map(|index| {
            cells
                .iter()
                .map(|row| row[index])
                .chain(std::iter::once(header[index].as_str()))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or_default()
        })
        .collect();

    let format_row = |row: &[&str]| {
        row.iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP)
            .trim_end()
            .to_owned()
    };

    let header_refs: Vec<&str> = header.iter().map(String::as_str).collect();
    std::iter::once(format_row(&header_refs))
        .chain(cells.iter().map(|row| format_row(row)))
        .collect()
}
