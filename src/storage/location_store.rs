use std::{
    io::ErrorKind,
    path::PathBuf,
};

use anyhow::Context;
use async_trait::async_trait;
use directories::ProjectDirs;
use tokio::sync::RwLock;

use crate::models::Coordinates;

use super::model::StoredCoordinates;

const LOCATION_FILE: &str = "last_location.json";

#[async_trait]
pub trait LocationStore: Send + Sync {
    /// `Ok(None)` when nothing was saved yet.
    async fn load(&self) -> anyhow::Result<Option<Coordinates>>;
    async fn save(&self, coordinates: &Coordinates) -> anyhow::Result<()>;
}

pub struct FileLocationStore {
    path: PathBuf,
}

impl FileLocationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/last_location.json` for the current user, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "PrayerCountdown", "prayer-countdown")
            .map(|dirs| dirs.data_dir().join(LOCATION_FILE))
    }
}

#[async_trait]
impl LocationStore for FileLocationStore {
    async fn load(&self) -> anyhow::Result<Option<Coordinates>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read saved location {}", self.path.display())
                });
            }
        };

        let stored: StoredCoordinates = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse saved location {}", self.path.display()))?;

        Ok(Some(stored.try_into()?))
    }

    async fn save(&self, coordinates: &Coordinates) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = serde_json::to_string(&StoredCoordinates::from(coordinates))?;
        tokio::fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write saved location {}", self.path.display()))?;

        log::debug!("[STORE] Location saved to {}", self.path.display());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryLocationStore {
    store: RwLock<Option<StoredCoordinates>>,
}

impl InMemoryLocationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocationStore for InMemoryLocationStore {
    async fn load(&self) -> anyhow::Result<Option<Coordinates>> {
        let store = self.store.read().await;
        Ok(store.clone().map(Coordinates::try_from).transpose()?)
    }

    async fn save(&self, coordinates: &Coordinates) -> anyhow::Result<()> {
        let mut store = self.store.write().await;
        *store = Some(coordinates.into());
        Ok(())
    }
}
