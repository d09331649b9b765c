use geo::{LineString, MultiPolygon, Polygon};
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::thread;
use std::time::Duration;

use crate::config::NominatimConfig;
use crate::domain::{Boundary, BoundaryGeocoder, Coordinate, PlaceSearch, ReverseGeocoder};
use crate::error::ServiceError;

const SERVICE: &str = "Nominatim";

/// Nominatim's maximum page size
const BOUNDARY_CANDIDATES: u32 = 50;

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    geojson: Option<GeoJsonGeometry>,
}

/// Only the shapes a city boundary can take are modelled
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum GeoJsonGeometry {
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<[f64; 2]>>> },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ReverseResult {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn ring(points: Vec<[f64; 2]>) -> LineString<f64> {
    // GeoJSON positions are [lon, lat], which is already geo's x/y order
    points.into_iter().map(|[x, y]| (x, y)).collect()
}

fn polygon(rings: Vec<Vec<[f64; 2]>>) -> Option<Polygon<f64>> {
    let mut rings = rings.into_iter();
    let exterior = ring(rings.next()?);
    let interiors = rings.map(ring).collect();
    Some(Polygon::new(exterior, interiors))
}

impl GeoJsonGeometry {
    fn into_boundary(self) -> Option<Boundary> {
        let polygons: Vec<Polygon<f64>> = match self {
            GeoJsonGeometry::Polygon { coordinates } => polygon(coordinates).into_iter().collect(),
            GeoJsonGeometry::MultiPolygon { coordinates } => {
                coordinates.into_iter().filter_map(polygon).collect()
            }
            GeoJsonGeometry::Other => Vec::new(),
        };

        if polygons.is_empty() {
            None
        } else {
            Some(MultiPolygon::new(polygons))
        }
    }
}

fn parse_coordinate(lat: &str, lon: &str) -> Result<Coordinate, ServiceError> {
    let malformed = |what: &str, value: &str| ServiceError::Malformed {
        service: SERVICE,
        message: format!("invalid {}: {:?}", what, value),
    };
    let lat: f64 = lat.parse().map_err(|_| malformed("latitude", lat))?;
    let lon: f64 = lon.parse().map_err(|_| malformed("longitude", lon))?;
    Ok(Coordinate::new(lat, lon))
}

/// Blocking Nominatim client serving boundary lookup, reverse geocoding and
/// free-text search.
///
/// Every request waits `request_delay_ms` first; Nominatim's usage policy
/// allows at most one request per second.
pub struct NominatimClient {
    client: Client,
    config: NominatimConfig,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ServiceError> {
        if self.config.request_delay_ms > 0 {
            thread::sleep(Duration::from_millis(self.config.request_delay_ms));
        }

        let url = self.endpoint(path);
        tracing::debug!("GET {} {:?}", url, query);

        let response: Response = self.client.get(&url).query(query).send()?;
        if !response.status().is_success() {
            return Err(ServiceError::Status {
                service: SERVICE,
                status: response.status(),
            });
        }

        response.json().map_err(|e| ServiceError::Malformed {
            service: SERVICE,
            message: e.to_string(),
        })
    }
}

impl BoundaryGeocoder for NominatimClient {
    fn resolve_boundary(&self, place: &str) -> Result<Option<Boundary>, ServiceError> {
        let results: Vec<SearchResult> = self.get(
            "search",
            &[
                ("q", place.to_string()),
                ("format", "json".to_string()),
                ("limit", BOUNDARY_CANDIDATES.to_string()),
                ("polygon_geojson", "1".to_string()),
            ],
        )?;

        // Top-ranked candidate with polygon geometry; place nodes are skipped
        // and same-named places are not disambiguated
        Ok(results.into_iter().find_map(|candidate| {
            let boundary = candidate.geojson.and_then(GeoJsonGeometry::into_boundary)?;
            tracing::debug!("Boundary candidate: {}", candidate.display_name);
            Some(boundary)
        }))
    }
}

impl ReverseGeocoder for NominatimClient {
    fn reverse(&self, coord: Coordinate) -> Result<Option<String>, ServiceError> {
        let result: ReverseResult = self.get(
            "reverse",
            &[
                ("lat", coord.lat.to_string()),
                ("lon", coord.lon.to_string()),
                ("format", "json".to_string()),
            ],
        )?;

        if let Some(error) = result.error {
            tracing::debug!("Reverse geocoding returned no address: {}", error);
            return Ok(None);
        }
        Ok(result.display_name.filter(|name| !name.is_empty()))
    }
}

impl PlaceSearch for NominatimClient {
    fn search(&self, query: &str) -> Result<Vec<Coordinate>, ServiceError> {
        let results: Vec<SearchResult> = self.get(
            "search",
            &[
                ("q", query.to_string()),
                ("format", "json".to_string()),
                ("limit", self.config.search_limit.to_string()),
            ],
        )?;

        results
            .iter()
            .map(|r| parse_coordinate(&r.lat, &r.lon))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let json = r#"[{"lat":"59.9606739","lon":"30.1586551","display_name":"Saint Petersburg, Russia"}]"#;
        let results: Vec<SearchResult> = serde_json::from_str(json).unwrap();

        assert_eq!(results.len(), 1);
        assert!(results[0].geojson.is_none());
        let coord = parse_coordinate(&results[0].lat, &results[0].lon).unwrap();
        assert_eq!(coord, Coordinate::new(59.9606739, 30.1586551));
    }

    #[test]
    fn test_polygon_geojson_becomes_boundary() {
        let json = r#"{"type":"Polygon","coordinates":[[[30.0,59.0],[31.0,59.0],[31.0,60.0],[30.0,60.0],[30.0,59.0]]]}"#;
        let geometry: GeoJsonGeometry = serde_json::from_str(json).unwrap();
        let boundary = geometry.into_boundary().unwrap();

        assert_eq!(boundary.0.len(), 1);
        let first = boundary.0[0].exterior().0[0];
        assert_eq!((first.x, first.y), (30.0, 59.0));
    }

    #[test]
    fn test_multipolygon_geojson_becomes_boundary() {
        let json = r#"{"type":"MultiPolygon","coordinates":[
            [[[0.0,0.0],[1.0,0.0],[1.0,1.0],[0.0,0.0]]],
            [[[5.0,5.0],[6.0,5.0],[6.0,6.0],[5.0,5.0]]]
        ]}"#;
        let geometry: GeoJsonGeometry = serde_json::from_str(json).unwrap();
        assert_eq!(geometry.into_boundary().unwrap().0.len(), 2);
    }

    #[test]
    fn test_point_geojson_is_not_a_boundary() {
        let json = r#"{"type":"Point","coordinates":[30.0,59.0]}"#;
        let geometry: GeoJsonGeometry = serde_json::from_str(json).unwrap();
        assert!(geometry.into_boundary().is_none());
    }

    #[test]
    fn test_parse_reverse_error() {
        let json = r#"{"error":"Unable to geocode"}"#;
        let result: ReverseResult = serde_json::from_str(json).unwrap();
        assert!(result.display_name.is_none());
        assert_eq!(result.error.as_deref(), Some("Unable to geocode"));
    }

    #[test]
    fn test_parse_coordinate_rejects_garbage() {
        assert!(matches!(
            parse_coordinate("north", "30.0"),
            Err(ServiceError::Malformed { .. })
        ));
    }
}
