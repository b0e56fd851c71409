pub mod model;
pub mod service;

pub use model::GeoPoint;
pub use model::ZoneDataset;
pub use model::ZoneRepo;
