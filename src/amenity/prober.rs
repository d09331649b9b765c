use crate::config::AmenityConfig;
use crate::domain::{AmenityCounts, Coordinate, PlaceSearch, ReverseGeocoder};
use crate::error::ProbeError;
use crate::geometry::within_radius;

/// The three fixed amenity categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmenityCategory {
    Grocery,
    Culture,
    Hotel,
}

impl AmenityCategory {
    pub const ALL: [AmenityCategory; 3] = [
        AmenityCategory::Grocery,
        AmenityCategory::Culture,
        AmenityCategory::Hotel,
    ];

    /// Free-text phrase sent to the geocoder for this category
    pub fn search_term(self, config: &AmenityConfig) -> &str {
        match self {
            AmenityCategory::Grocery => &config.terms.grocery,
            AmenityCategory::Culture => &config.terms.culture,
            AmenityCategory::Hotel => &config.terms.hotel,
        }
    }
}

/// Counts geocoder search hits around a coordinate.
///
/// The coordinate is reverse-geocoded once; each category then searches for
/// "{term} near {address}" and counts candidates within `radius_m`
/// (great-circle, boundary inclusive).
pub struct AmenityProber<'a> {
    reverse: &'a dyn ReverseGeocoder,
    search: &'a dyn PlaceSearch,
    config: &'a AmenityConfig,
}

impl<'a> AmenityProber<'a> {
    pub fn new(
        reverse: &'a dyn ReverseGeocoder,
        search: &'a dyn PlaceSearch,
        config: &'a AmenityConfig,
    ) -> Self {
        Self {
            reverse,
            search,
            config,
        }
    }

    /// Any error here is local to this coordinate; the caller decides how to
    /// degrade.
    pub fn probe(&self, center: Coordinate) -> Result<AmenityCounts, ProbeError> {
        let address = self
            .reverse
            .reverse(center)?
            .ok_or(ProbeError::NoAddress {
                lat: center.lat,
                lon: center.lon,
            })?;
        tracing::debug!("({:.5}, {:.5}) -> {}", center.lat, center.lon, address);

        let mut counts = AmenityCounts::default();
        for category in AmenityCategory::ALL {
            let count = self.count_category(center, category, &address)?;
            match category {
                AmenityCategory::Grocery => counts.grocery = Some(count),
                AmenityCategory::Culture => counts.culture = Some(count),
                AmenityCategory::Hotel => counts.hotel = Some(count),
            }
        }
        Ok(counts)
    }

    fn count_category(
        &self,
        center: Coordinate,
        category: AmenityCategory,
        address: &str,
    ) -> Result<u32, ProbeError> {
        let query = format!("{} near {}", category.search_term(self.config), address);
        let candidates = self.search.search(&query)?;

        let count = candidates
            .into_iter()
            .filter(|&candidate| within_radius(center, candidate, self.config.radius_m))
            .count();
        Ok(count as u32)
    }
}
