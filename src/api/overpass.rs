use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt::Write;
use std::time::Duration;

use crate::config::OverpassConfig;
use crate::domain::{Boundary, Feature, FeatureSource, TagFilter};
use crate::error::ServiceError;
use crate::geometry::simplify_boundary;
use crate::osm::parse_features;

const SERVICE: &str = "Overpass";

/// Raw Overpass API response
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<Element>,
}

/// Vertex of an inline `out geom` geometry
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// Relation member with inline geometry
#[derive(Debug, Deserialize)]
pub struct Member {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub geometry: Option<Vec<LatLon>>,
}

/// A single element from Overpass (node, way or relation)
#[derive(Debug, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub type_: String,
    pub id: u64,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub geometry: Option<Vec<LatLon>>,
    #[serde(default)]
    pub members: Option<Vec<Member>>,
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Overpass `poly:` filter value: "lat lon lat lon ..." over the exterior ring
fn poly_filter(polygon: &geo::Polygon<f64>) -> String {
    let mut out = String::new();
    for coord in polygon.exterior().coords() {
        if !out.is_empty() {
            out.push(' ');
        }
        let _ = write!(out, "{} {}", coord.y, coord.x);
    }
    out
}

/// Build the Overpass QL query selecting every node, way and relation with
/// the tag inside any polygon of the boundary.
pub fn build_query(boundary: &Boundary, tag: &TagFilter, timeout_secs: u32) -> String {
    let mut query = format!("[out:json][timeout:{}];\n(\n", timeout_secs);
    for polygon in boundary {
        let _ = writeln!(
            query,
            "  nwr[\"{key}\"=\"{value}\"](poly:\"{poly}\");",
            key = escape(&tag.key),
            value = escape(&tag.value),
            poly = poly_filter(polygon)
        );
    }
    query.push_str(");\nout tags geom;");
    query
}

/// Blocking Overpass client. One request per query, no retry.
pub struct OverpassClient {
    client: Client,
    config: OverpassConfig,
}

impl OverpassClient {
    pub fn new(config: OverpassConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn execute(&self, query: &str) -> Result<OverpassResponse, ServiceError> {
        tracing::debug!("POST {} ({} bytes of QL)", self.config.url, query.len());

        // Overpass expects form-encoded POST data: data=<query>
        let response = self
            .client
            .post(&self.config.url)
            .form(&[("data", query)])
            .send()?;

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

impl FeatureSource for OverpassClient {
    fn query_features(
        &self,
        boundary: &Boundary,
        tag: &TagFilter,
    ) -> Result<Vec<Feature>, ServiceError> {
        let boundary = simplify_boundary(boundary, self.config.simplify_epsilon);
        let query = build_query(&boundary, tag, self.config.query_timeout_secs);
        let response = self.execute(&query)?;
        Ok(parse_features(&response))
    }
}
