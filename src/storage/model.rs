use serde::{Deserialize, Serialize};

use crate::models::{Coordinates, InvalidCoordinates};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCoordinates {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<&Coordinates> for StoredCoordinates {
    fn from(coordinates: &Coordinates) -> Self {
        Self {
            lat: coordinates.lat,
            lon: coordinates.lon,
            name: coordinates.label.clone(),
        }
    }
}

impl TryFrom<StoredCoordinates> for Coordinates {
    type Error = InvalidCoordinates;

    fn try_from(stored: StoredCoordinates) -> Result<Self, Self::Error> {
        Coordinates::new(stored.lat, stored.lon, stored.name)
    }
}
