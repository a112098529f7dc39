mod location_store;
mod model;

pub use location_store::{FileLocationStore, InMemoryLocationStore, LocationStore};
pub use model::StoredCoordinates;
