//! Seams to the external data providers. The pipeline only talks to these
//! traits, so it can run against the HTTP clients in `api` or in-memory fakes.

use crate::domain::{Boundary, Coordinate, Feature, TagFilter};
use crate::error::ServiceError;

/// Place name -> polygon boundary.
pub trait BoundaryGeocoder {
    /// Returns the boundary of the highest-ranked candidate that has polygon
    /// geometry. Same-named places are never disambiguated. `Ok(None)` means
    /// no candidate had a polygon.
    fn resolve_boundary(&self, place: &str) -> Result<Option<Boundary>, ServiceError>;
}

/// Tagged-feature spatial index.
pub trait FeatureSource {
    fn query_features(
        &self,
        boundary: &Boundary,
        tag: &TagFilter,
    ) -> Result<Vec<Feature>, ServiceError>;
}

/// Coordinate -> human-readable address.
pub trait ReverseGeocoder {
    fn reverse(&self, coord: Coordinate) -> Result<Option<String>, ServiceError>;
}

/// Free-text query -> all candidate locations.
pub trait PlaceSearch {
    fn search(&self, query: &str) -> Result<Vec<Coordinate>, ServiceError>;
}
