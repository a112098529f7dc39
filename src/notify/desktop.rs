use notify_rust::{Notification, Timeout};

use crate::delivery::NotificationSurface;

const SUMMARY: &str = "Prayer times";

pub struct DesktopSurface {
    timeout: Timeout,
}

impl DesktopSurface {
    pub fn new() -> Self {
        Self {
            timeout: Timeout::Milliseconds(10_000),
        }
    }
}

impl Default for DesktopSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSurface for DesktopSurface {
    fn present(&self, message: &str) -> anyhow::Result<()> {
        Notification::new()
            .summary(SUMMARY)
            .body(message)
            .timeout(self.timeout)
            .show()
            .map_err(|e| anyhow::anyhow!("Failed to show notification: {}", e))?;

        Ok(())
    }
}
