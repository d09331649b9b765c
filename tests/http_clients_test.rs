use httpmock::prelude::*;
use serde_json::json;
use geo::polygon;

use marinascan::amenity::AmenityProber;
use marinascan::api::{NominatimClient, OverpassClient};
use marinascan::config::{AmenityConfig, NominatimConfig, OverpassConfig};
use marinascan::domain::{
    BoundaryGeocoder, Coordinate, FeatureGeometry, FeatureSource, PlaceSearch, ReverseGeocoder,
    TagFilter,
};
use marinascan::error::{ProbeError, ServiceError};

fn nominatim(server: &MockServer) -> NominatimClient {
    NominatimClient::new(NominatimConfig {
        base_url: server.base_url(),
        request_delay_ms: 0,
        ..NominatimConfig::default()
    })
    .unwrap()
}

fn overpass(server: &MockServer) -> OverpassClient {
    OverpassClient::new(OverpassConfig {
        url: server.url("/api/interpreter"),
        ..OverpassConfig::default()
    })
    .unwrap()
}

#[test]
fn test_boundary_skips_candidates_without_polygon() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/search")
            .query_param("q", "Testport")
            .query_param("limit", "50")
            .query_param("polygon_geojson", "1");
        then.status(200).json_body(json!([
            {
                "lat": "10.5", "lon": "20.5", "display_name": "Testport (place node)",
                "geojson": {"type": "Point", "coordinates": [20.5, 10.5]}
            },
            {
                "lat": "10.5", "lon": "20.5", "display_name": "Testport",
                "geojson": {"type": "Polygon", "coordinates": [[[20.0, 10.0], [21.0, 10.0], [21.0, 11.0], [20.0, 10.0]]]}
            },
            {
                "lat": "0.5", "lon": "0.5", "display_name": "Other Testport",
                "geojson": {"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]]}
            }
        ]));
    });

    let boundary = nominatim(&server)
        .resolve_boundary("Testport")
        .unwrap()
        .unwrap();
    mock.assert();
    assert_eq!(boundary.0.len(), 1);
    assert_eq!(boundary.0[0].exterior().0.len(), 4);
    let first = boundary.0[0].exterior().0[0];
    assert_eq!((first.x, first.y), (20.0, 10.0));
}

#[test]
fn test_boundary_without_any_polygon() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(200).json_body(json!([
            {
                "lat": "10.5", "lon": "20.5", "display_name": "Testport",
                "geojson": {"type": "Point", "coordinates": [20.5, 10.5]}
            }
        ]));
    });

    assert!(nominatim(&server).resolve_boundary("Testport").unwrap().is_none());
}

#[test]
fn test_boundary_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(200).json_body(json!([]));
    });

    assert!(nominatim(&server).resolve_boundary("Atlantis").unwrap().is_none());
}

#[test]
fn test_boundary_http_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(503);
    });

    let err = nominatim(&server).resolve_boundary("Testport").unwrap_err();
    assert!(matches!(err, ServiceError::Status { .. }));
}

#[test]
fn test_reverse_and_search() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/reverse")
            .query_param("lat", "59.93")
            .query_param("lon", "30.31");
        then.status(200)
            .json_body(json!({"display_name": "Palace Embankment, Saint Petersburg"}));
    });
    let search = server.mock(|when, then| {
        when.method(GET)
            .path("/search")
            .query_param("q", "Hotel near Palace Embankment, Saint Petersburg")
            .query_param("limit", "10");
        then.status(200).json_body(json!([
            {"lat": "59.931", "lon": "30.31", "display_name": "Near"},
            {"lat": "59.99", "lon": "30.31", "display_name": "Far"}
        ]));
    });

    let client = nominatim(&server);
    let address = client.reverse(Coordinate::new(59.93, 30.31)).unwrap();
    assert_eq!(
        address.as_deref(),
        Some("Palace Embankment, Saint Petersburg")
    );

    let hits = client
        .search("Hotel near Palace Embankment, Saint Petersburg")
        .unwrap();
    search.assert();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0], Coordinate::new(59.931, 30.31));
}

#[test]
fn test_reverse_without_address() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/reverse");
        then.status(200).json_body(json!({"error": "Unable to geocode"}));
    });

    let client = nominatim(&server);
    assert_eq!(client.reverse(Coordinate::new(0.0, -160.0)).unwrap(), None);

    let config = AmenityConfig::default();
    let err = AmenityProber::new(&client, &client, &config)
        .probe(Coordinate::new(0.0, -160.0))
        .unwrap_err();
    assert!(matches!(err, ProbeError::NoAddress { .. }));
}

#[test]
fn test_overpass_features() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/interpreter")
            .body_contains("data=");
        then.status(200).json_body(json!({
            "elements": [
                {"type": "node", "id": 1, "lat": 10.0, "lon": 20.0,
                 "tags": {"leisure": "marina", "water_capacity": "5"}},
                {"type": "way", "id": 2, "tags": {"leisure": "marina"},
                 "geometry": [
                    {"lat": 10.0, "lon": 20.0}, {"lat": 10.0, "lon": 22.0},
                    {"lat": 12.0, "lon": 22.0}, {"lat": 12.0, "lon": 20.0},
                    {"lat": 10.0, "lon": 20.0}
                 ]}
            ]
        }));
    });

    let boundary = geo::MultiPolygon::new(vec![geo::polygon![
        (x: 0.0, y: 0.0),
        (x: 40.0, y: 0.0),
        (x: 40.0, y: 40.0),
        (x: 0.0, y: 0.0),
    ]]);
    let features = overpass(&server)
        .query_features(&boundary, &TagFilter::default())
        .unwrap();

    mock.assert();
    assert_eq!(features.len(), 2);
    assert!(matches!(features[0].geometry, FeatureGeometry::Point(_)));
    assert_eq!(features[0].tag("water_capacity"), Some("5"));
    assert!(matches!(features[1].geometry, FeatureGeometry::Polygon(_)));
    assert_eq!(features[1].osm_id, 2);
}

#[test]
fn test_overpass_error_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/interpreter");
        then.status(504);
    });

    let boundary = geo::MultiPolygon::new(vec![]);
    let err = overpass(&server)
        .query_features(&boundary, &TagFilter::default())
        .unwrap_err();
    assert!(matches!(err, ServiceError::Status { .. }));
}
