use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("Invalid coordinates [lat = {lat}, lon = {lon}]")]
pub struct InvalidCoordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
    pub label: Option<String>,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64, label: Option<String>) -> Result<Self, InvalidCoordinates> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);

        if !valid {
            return Err(InvalidCoordinates { lat, lon });
        }

        let label = label
            .map(|label| label.trim().to_owned())
            .filter(|label| !label.is_empty());

        Ok(Self { lat, lon, label })
    }

    /// Human readable location line, e.g. `Location: Istanbul (41.0082, 28.9784)`.
    pub fn describe(&self, prefix: &str) -> String {
        match &self.label {
            Some(label) => format!("{prefix} {label} ({:.4}, {:.4})", self.lat, self.lon),
            None => format!("{prefix} {:.4}, {:.4}", self.lat, self.lon),
        }
    }

    /// Rough bounding box of Turkey, where the Diyanet calculation method applies.
    pub fn is_in_turkey(&self) -> bool {
        (35.8..=42.3).contains(&self.lat) && (25.5..=45.0).contains(&self.lon)
    }
}
