//! Boundary -> features -> per-feature normalize/probe/assemble -> CSV.
//!
//! Everything runs sequentially on the calling thread. Boundary and feature
//! query failures abort the run before any file is touched; amenity probe
//! failures only blank that feature's amenity columns.

use std::path::PathBuf;

use crate::amenity::AmenityProber;
use crate::config::{CapacityTags, PipelineConfig};
use crate::domain::{
    AmenityCounts, Boundary, BoundaryGeocoder, Coordinate, Feature, FeatureSource, MarinaRecord,
    PlaceSearch, ReverseGeocoder, TagFilter,
};
use crate::error::PipelineError;
use crate::geometry::representative_coordinate;
use crate::output::{write_count, write_records};

/// The four external collaborators a run needs
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub boundary: &'a dyn BoundaryGeocoder,
    pub features: &'a dyn FeatureSource,
    pub reverse: &'a dyn ReverseGeocoder,
    pub search: &'a dyn PlaceSearch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub rows: usize,
    pub output: PathBuf,
}

/// Merge one feature's pieces into an output row. Pure.
pub fn assemble_record(
    place: &str,
    ordinal: usize,
    coordinate: Option<Coordinate>,
    feature: &Feature,
    capacity: &CapacityTags,
    amenities: Option<AmenityCounts>,
) -> MarinaRecord {
    MarinaRecord {
        city: place.to_string(),
        marina_number: ordinal,
        coordinate,
        water_capacity: feature.tag(&capacity.water).map(str::to_string),
        land_capacity: feature.tag(&capacity.land).map(str::to_string),
        amenities,
    }
}

/// First-match boundary for `place`; no candidate is a run-fatal error.
pub fn resolve_boundary(
    geocoder: &dyn BoundaryGeocoder,
    place: &str,
) -> Result<Boundary, PipelineError> {
    let boundary = geocoder
        .resolve_boundary(place)
        .map_err(|source| PipelineError::Boundary {
            place: place.to_string(),
            source,
        })?
        .ok_or_else(|| PipelineError::BoundaryNotFound {
            place: place.to_string(),
        })?;

    tracing::info!(
        "Resolved boundary for {} ({} polygon(s))",
        place,
        boundary.0.len()
    );
    Ok(boundary)
}

pub fn query_features(
    source: &dyn FeatureSource,
    boundary: &Boundary,
    tag: &TagFilter,
) -> Result<Vec<Feature>, PipelineError> {
    let features = source
        .query_features(boundary, tag)
        .map_err(|source| PipelineError::FeatureQuery { source })?;
    tracing::info!("Found {} features tagged {}", features.len(), tag);
    Ok(features)
}

/// Build one record per feature, in query order. `on_progress(done, total)`
/// is called after each feature.
pub fn collect_records(
    config: &PipelineConfig,
    services: Services<'_>,
    mut on_progress: impl FnMut(usize, usize),
) -> Result<Vec<MarinaRecord>, PipelineError> {
    let boundary = resolve_boundary(services.boundary, &config.place)?;
    let features = query_features(services.features, &boundary, &config.tag)?;

    let prober = AmenityProber::new(services.reverse, services.search, &config.amenity);
    let total = features.len();
    let mut records = Vec::with_capacity(total);

    for (index, feature) in features.iter().enumerate() {
        let ordinal = index + 1;
        let coordinate = representative_coordinate(&feature.geometry);

        let amenities = if config.enrich {
            Some(match coordinate {
                Some(center) => prober.probe(center).unwrap_or_else(|e| {
                    tracing::warn!("Marina {}: amenity lookup failed: {}", ordinal, e);
                    AmenityCounts::unavailable()
                }),
                None => {
                    tracing::debug!("Marina {}: no coordinate, skipping amenity lookup", ordinal);
                    AmenityCounts::unavailable()
                }
            })
        } else {
            None
        };

        records.push(assemble_record(
            &config.place,
            ordinal,
            coordinate,
            feature,
            &config.capacity,
            amenities,
        ));
        on_progress(ordinal, total);
    }

    Ok(records)
}

/// Full run: collect all records, then write the table once.
pub fn run(
    config: &PipelineConfig,
    services: Services<'_>,
    on_progress: impl FnMut(usize, usize),
) -> Result<RunSummary, PipelineError> {
    let records = collect_records(config, services, on_progress)?;
    write_records(&config.output, &records, config.enrich)?;
    tracing::info!(
        "Wrote {} rows to {}",
        records.len(),
        config.output.display()
    );

    Ok(RunSummary {
        rows: records.len(),
        output: config.output.clone(),
    })
}

/// Count-only run: writes a single `city,marina_count` row.
pub fn count(config: &PipelineConfig, services: Services<'_>) -> Result<usize, PipelineError> {
    let boundary = resolve_boundary(services.boundary, &config.place)?;
    let features = query_features(services.features, &boundary, &config.tag)?;

    write_count(&config.output, &config.place, features.len())?;
    tracing::info!(
        "Found {} marinas in {}; saved to {}",
        features.len(),
        config.place,
        config.output.display()
    );
    Ok(features.len())
}
