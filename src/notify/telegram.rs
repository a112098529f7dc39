use teloxide::prelude::*;
use thiserror::Error;
use tokio::runtime::Handle;

use crate::delivery::NotificationSurface;

#[derive(Debug, Error)]
pub enum TelegramSurfaceError {
    #[error("Telegram delivery needs a running tokio runtime")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

/// Sends notifications to a single configured chat.
///
/// The request runs on a spawned task, so delivery errors only reach the log.
pub struct TelegramSurface {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramSurface {
    pub fn create(token: String, chat_id: i64) -> Self {
        let bot = Bot::new(token);

        Self {
            bot,
            chat_id: ChatId(chat_id),
        }
    }
}

impl NotificationSurface for TelegramSurface {
    fn present(&self, message: &str) -> anyhow::Result<()> {
        let handle = Handle::try_current().map_err(TelegramSurfaceError::from)?;
        let bot = self.bot.clone();
        let chat_id = self.chat_id;
        let text = message.to_owned();

        handle.spawn(async move {
            if let Err(e) = bot.send_message(chat_id, text).await {
                log::warn!("[NOTIFY] Telegram delivery failed. [chat_id = {}]: {}", chat_id.0, e);
            }
        });

        Ok(())
    }
}
