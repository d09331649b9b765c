use geo::{LineString, MultiPolygon, Point, Polygon};

use crate::api::OverpassResponse;
use crate::api::overpass::{Element, LatLon};
use crate::domain::{Feature, FeatureGeometry};

fn to_line(points: &[LatLon]) -> LineString<f64> {
    points.iter().map(|p| (p.lon, p.lat)).collect()
}

fn is_closed_way(points: &[LatLon]) -> bool {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return false;
    };
    (first.lat - last.lat).abs() < 1e-9 && (first.lon - last.lon).abs() < 1e-9
}

fn way_geometry(points: &[LatLon]) -> FeatureGeometry {
    if points.len() >= 4 && is_closed_way(points) {
        FeatureGeometry::Polygon(Polygon::new(to_line(points), vec![]))
    } else if points.len() >= 2 {
        FeatureGeometry::LineString(to_line(points))
    } else {
        FeatureGeometry::Unknown
    }
}

/// Relation outers that already close on their own. Rings split over several
/// member ways are not stitched together.
fn relation_geometry(element: &Element) -> FeatureGeometry {
    let Some(members) = &element.members else {
        return FeatureGeometry::Unknown;
    };

    let outers: Vec<Polygon<f64>> = members
        .iter()
        .filter(|m| m.type_ == "way" && m.role == "outer")
        .filter_map(|m| m.geometry.as_deref())
        .filter(|points| points.len() >= 4 && is_closed_way(points))
        .map(|points| Polygon::new(to_line(points), vec![]))
        .collect();

    FeatureGeometry::MultiPolygon(MultiPolygon::new(outers))
}

fn element_geometry(element: &Element) -> FeatureGeometry {
    match element.type_.as_str() {
        "node" => match (element.lat, element.lon) {
            (Some(lat), Some(lon)) => FeatureGeometry::Point(Point::new(lon, lat)),
            _ => FeatureGeometry::Unknown,
        },
        "way" => element
            .geometry
            .as_deref()
            .map(way_geometry)
            .unwrap_or(FeatureGeometry::Unknown),
        "relation" => relation_geometry(element),
        _ => FeatureGeometry::Unknown,
    }
}

/// Turn an `out tags geom` response into features, one per element, in
/// response order. Elements with unusable geometry are kept as `Unknown` so
/// that every matched element still produces an output row.
pub fn parse_features(response: &OverpassResponse) -> Vec<Feature> {
    response
        .elements
        .iter()
        .map(|element| Feature {
            osm_type: element.type_.clone(),
            osm_id: element.id,
            tags: element.tags.clone().unwrap_or_default(),
            geometry: element_geometry(element),
        })
        .collect()
}
