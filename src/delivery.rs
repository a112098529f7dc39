#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Error,
}

/// Receives already formatted, localized text from the countdown and the
/// application. Implementations only display it.
pub trait Presenter: Send + Sync + 'static {
    fn render_countdown(&self, text: &str);

    fn render_dual_countdown(&self, dawn_text: &str, sunset_text: &str);

    fn render_no_data(&self, text: &str);

    fn render_clock(&self, _text: &str) {}

    fn render_status(&self, _level: StatusLevel, _text: &str) {}

    fn render_schedule(&self, _lines: &[String]) {}
}

/// Best-effort notification channel. Errors are reported to the caller,
/// which logs and drops them.
pub trait NotificationSurface: Send + Sync + 'static {
    fn present(&self, message: &str) -> anyhow::Result<()>;
}
