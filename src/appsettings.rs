use std::path::PathBuf;

use config::{
    Config, ConfigError, Environment, File,
    builder::{ConfigBuilder, DefaultState},
};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub method: Option<u32>,
    pub school: u32,
    pub timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GeocodingSettings {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AyahSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct LanguageSettings {
    pub code: Option<String>,
    pub dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TelegramSettings {
    pub token: String,
    pub chat_id: i64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NotificationSettings {
    pub enabled: bool,
    pub desktop: bool,
    pub telegram: Option<TelegramSettings>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct StorageSettings {
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct UsageSettings {
    pub endpoint: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RefreshSettings {
    pub interval_secs: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    pub api: ApiSettings,
    pub geocoding: GeocodingSettings,
    pub ayah: AyahSettings,
    #[serde(default)]
    pub language: LanguageSettings,
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub usage: UsageSettings,
    pub refresh: RefreshSettings,
    pub timezone: Option<String>,
}

impl AppSettings {
    /// `appsettings.*`, then `appsettings.local.*`, then `APP_` variables
    /// (`APP_API__METHOD=13`). Every file is optional.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name("appsettings").required(false))
                .add_source(File::with_name("appsettings.local").required(false))
                .add_source(
                    Environment::with_prefix("APP")
                        .prefix_separator("_")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings = builder
            .set_default("api.base_url", "https://api.aladhan.com/v1")?
            .set_default("api.school", 1)?
            .set_default("api.timeout_secs", 20)?
            .set_default("geocoding.base_url", "https://nominatim.openstreetmap.org")?
            .set_default(
                "geocoding.user_agent",
                concat!("prayer-countdown/", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("geocoding.timeout_secs", 20)?
            .set_default("ayah.base_url", "https://api.alquran.cloud/v1")?
            .set_default("ayah.timeout_secs", 10)?
            .set_default("notifications.enabled", false)?
            .set_default("notifications.desktop", true)?
            .set_default("refresh.interval_secs", 6 * 60 * 60)?
            .build()?;

        settings.try_deserialize()
    }
}
