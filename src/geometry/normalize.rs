use geo::Centroid;

use crate::domain::{Coordinate, FeatureGeometry};

/// Reduce a feature's geometry to one representative coordinate.
///
/// Points are used as-is and polygons collapse to their centroid. The
/// centroid of a concave polygon can fall outside it; that is accepted.
/// Every other geometry type yields `None`.
pub fn representative_coordinate(geometry: &FeatureGeometry) -> Option<Coordinate> {
    match geometry {
        FeatureGeometry::Point(point) => Some(Coordinate::from_point(*point)),
        FeatureGeometry::Polygon(polygon) => polygon.centroid().map(Coordinate::from_point),
        FeatureGeometry::LineString(_)
        | FeatureGeometry::MultiPolygon(_)
        | FeatureGeometry::Unknown => None,
    }
}
