pub mod nominatim;
pub mod overpass;

pub use nominatim::NominatimClient;
pub use overpass::{OverpassClient, OverpassResponse};

use crate::config::PipelineConfig;
use crate::error::ServiceError;
use crate::pipeline::Services;

/// Nominatim + Overpass clients configured for a run
pub struct HttpServices {
    pub nominatim: NominatimClient,
    pub overpass: OverpassClient,
}

impl HttpServices {
    pub fn from_config(config: &PipelineConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            nominatim: NominatimClient::new(config.nominatim.clone())?,
            overpass: OverpassClient::new(config.overpass.clone())?,
        })
    }

    pub fn services(&self) -> Services<'_> {
        Services {
            boundary: &self.nominatim,
            features: &self.overpass,
            reverse: &self.nominatim,
            search: &self.nominatim,
        }
    }
}
