use std::sync::Arc;

use crate::delivery::NotificationSurface;

/// Presents on every inner surface. One failing surface does not stop the others.
pub struct FanOutSurface {
    surfaces: Vec<Arc<dyn NotificationSurface>>,
}

impl FanOutSurface {
    pub fn new(surfaces: Vec<Arc<dyn NotificationSurface>>) -> Self {
        Self { surfaces }
    }
}

impl NotificationSurface for FanOutSurface {
    fn present(&self, message: &str) -> anyhow::Result<()> {
        let failures = self
            .surfaces
            .iter()
            .filter_map(|surface| surface.present(message).err())
            .inspect(|e| log::warn!("Notification surface failed: {:#}", e))
            .count();

        if failures == self.surfaces.len() && failures > 0 {
            anyhow::bail!("All {} notification surfaces failed", failures);
        }

        Ok(())
    }
}
