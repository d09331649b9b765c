use thiserror::Error;

/// Failure talking to one of the external services.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned error status: {status}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("{service} returned a malformed response: {message}")]
    Malformed {
        service: &'static str,
        message: String,
    },
}

/// Errors that abort a whole run. No output file is written when one of these
/// is returned.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Place not found: {place}")]
    BoundaryNotFound { place: String },

    #[error("Failed to resolve boundary for {place}: {source}")]
    Boundary {
        place: String,
        #[source]
        source: ServiceError,
    },

    #[error("Feature query failed: {source}")]
    FeatureQuery {
        #[source]
        source: ServiceError,
    },

    #[error(transparent)]
    Output(#[from] OutputError),
}

impl PipelineError {
    /// Boundary and feature-query failures stop the run before any output exists.
    pub fn is_run_fatal(&self) -> bool {
        matches!(
            self,
            PipelineError::BoundaryNotFound { .. }
                | PipelineError::Boundary { .. }
                | PipelineError::FeatureQuery { .. }
        )
    }
}

/// Feature-local enrichment failure. Degrades one record's amenity columns to
/// empty values; never aborts the run.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("No address found for ({lat:.6}, {lon:.6})")]
    NoAddress { lat: f64, lon: f64 },

    #[error(transparent)]
    Service(#[from] ServiceError),
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_fatal_kinds() {
        let not_found = PipelineError::BoundaryNotFound {
            place: "Atlantis".to_string(),
        };
        assert!(not_found.is_run_fatal());
        assert_eq!(not_found.to_string(), "Place not found: Atlantis");

        let query = PipelineError::FeatureQuery {
            source: ServiceError::Malformed {
                service: "Overpass",
                message: "truncated".to_string(),
            },
        };
        assert!(query.is_run_fatal());

        let output = PipelineError::Output(OutputError::Io(std::io::Error::other("disk full")));
        assert!(!output.is_run_fatal());
    }
}
