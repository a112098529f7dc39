use std::sync::Arc;

use crate::appsettings::NotificationSettings;
use crate::delivery::NotificationSurface;

mod desktop;
mod fan_out;
mod log_surface;
mod telegram;

pub use desktop::DesktopSurface;
pub use fan_out::FanOutSurface;
pub use log_surface::LogSurface;
pub use telegram::{TelegramSurface, TelegramSurfaceError};

/// Every configured surface, or only the log when nothing else is enabled.
pub fn build_notifier(settings: &NotificationSettings) -> Arc<dyn NotificationSurface> {
    let mut surfaces: Vec<Arc<dyn NotificationSurface>> = Vec::new();

    if settings.desktop {
        surfaces.push(Arc::new(DesktopSurface::new()));
    }

    if let Some(telegram) = &settings.telegram {
        surfaces.push(Arc::new(TelegramSurface::create(
            telegram.token.clone(),
            telegram.chat_id,
        )));
    }

    if surfaces.is_empty() {
        return Arc::new(LogSurface);
    }

    Arc::new(FanOutSurface::new(surfaces))
}
