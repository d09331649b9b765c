use crate::domain::Coordinate;

/// Nearby-amenity counts for one feature. `None` means the lookup failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AmenityCounts {
    pub grocery: Option<u32>,
    pub culture: Option<u32>,
    pub hotel: Option<u32>,
}

impl AmenityCounts {
    pub fn new(grocery: u32, culture: u32, hotel: u32) -> Self {
        Self {
            grocery: Some(grocery),
            culture: Some(culture),
            hotel: Some(hotel),
        }
    }

    /// All three categories null
    pub fn unavailable() -> Self {
        Self::default()
    }
}

/// One output row
#[derive(Debug, Clone, PartialEq)]
pub struct MarinaRecord {
    pub city: String,
    /// 1-based position in the feature query result
    pub marina_number: usize,
    pub coordinate: Option<Coordinate>,
    pub water_capacity: Option<String>,
    pub land_capacity: Option<String>,
    /// Present only when enrichment is enabled
    pub amenities: Option<AmenityCounts>,
}

impl MarinaRecord {
    pub fn latitude(&self) -> Option<f64> {
        self.coordinate.map(|c| c.lat)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.coordinate.map(|c| c.lon)
    }
}
