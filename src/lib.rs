//! marinascan - collect OpenStreetMap marinas within a city boundary, count
//! nearby amenities, and write the result as CSV

pub mod amenity;
pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod osm;
pub mod output;
pub mod pipeline;

pub use config::PipelineConfig;
pub use error::{PipelineError, ProbeError, ServiceError};
pub use pipeline::{RunSummary, Services, collect_records, count, run};
