mod terminal;

pub use terminal::{TerminalPresenter, calendar_table, schedule_lines};
