use crate::delivery::NotificationSurface;

pub struct LogSurface;

impl NotificationSurface for LogSurface {
    fn present(&self, message: &str) -> anyhow::Result<()> {
        log::info!("[NOTIFY] {}", message);
        Ok(())
    }
}
