pub mod feature;
pub mod ports;
pub mod record;

pub use feature::{Boundary, Coordinate, Feature, FeatureGeometry, TagFilter};
pub use ports::{BoundaryGeocoder, FeatureSource, PlaceSearch, ReverseGeocoder};
pub use record::{AmenityCounts, MarinaRecord};
