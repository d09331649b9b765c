use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::TagFilter;
use crate::error::ConfigError;

pub const DEFAULT_PLACE: &str = "Санкт-Петербург";
pub const DEFAULT_OUTPUT: &str = "marinas.csv";
pub const DEFAULT_RADIUS_M: f64 = 1000.0;

const USER_AGENT: &str = "marinascan/0.1.0 (marina amenity survey)";

fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_overpass_url() -> String {
    "https://overpass-api.de/api/interpreter".to_string()
}

fn default_user_agent() -> String {
    USER_AGENT.to_string()
}

fn default_nominatim_timeout_secs() -> u64 {
    30
}

fn default_request_delay_ms() -> u64 {
    1000
}

fn default_search_limit() -> u32 {
    10
}

fn default_overpass_timeout_secs() -> u64 {
    200
}

fn default_query_timeout_secs() -> u32 {
    180
}

fn default_radius_m() -> f64 {
    DEFAULT_RADIUS_M
}

fn default_grocery_term() -> String {
    "Grocery Store".to_string()
}

fn default_culture_term() -> String {
    "Cultural Attraction".to_string()
}

fn default_hotel_term() -> String {
    "Hotel".to_string()
}

fn default_water_key() -> String {
    "water_capacity".to_string()
}

fn default_land_key() -> String {
    "land_capacity".to_string()
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct NominatimConfig {
    #[serde(default = "default_nominatim_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_nominatim_timeout_secs")]
    pub timeout_secs: u64,
    /// Fixed pause before every request; Nominatim allows one request per second
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    /// Maximum candidates returned by an amenity search
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_nominatim_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_nominatim_timeout_secs(),
            request_delay_ms: default_request_delay_ms(),
            search_limit: default_search_limit(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OverpassConfig {
    #[serde(default = "default_overpass_url")]
    pub url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Client timeout, slightly above the server-side query timeout
    #[serde(default = "default_overpass_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u32,
    /// Douglas-Peucker tolerance in degrees for the boundary; 0 disables
    #[serde(default)]
    pub simplify_epsilon: f64,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            url: default_overpass_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_overpass_timeout_secs(),
            query_timeout_secs: default_query_timeout_secs(),
            simplify_epsilon: 0.0,
        }
    }
}

/// Search terms sent to the geocoder for each amenity category. These are
/// plain free-text phrases, not provider category filters.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AmenityTerms {
    #[serde(default = "default_grocery_term")]
    pub grocery: String,
    #[serde(default = "default_culture_term")]
    pub culture: String,
    #[serde(default = "default_hotel_term")]
    pub hotel: String,
}

impl Default for AmenityTerms {
    fn default() -> Self {
        Self {
            grocery: default_grocery_term(),
            culture: default_culture_term(),
            hotel: default_hotel_term(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AmenityConfig {
    #[serde(default = "default_radius_m")]
    pub radius_m: f64,
    #[serde(default)]
    pub terms: AmenityTerms,
}

impl Default for AmenityConfig {
    fn default() -> Self {
        Self {
            radius_m: default_radius_m(),
            terms: AmenityTerms::default(),
        }
    }
}

/// Feature tag keys holding the capacity values
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CapacityTags {
    #[serde(default = "default_water_key")]
    pub water: String,
    #[serde(default = "default_land_key")]
    pub land: String,
}

impl Default for CapacityTags {
    fn default() -> Self {
        Self {
            water: default_water_key(),
            land: default_land_key(),
        }
    }
}

/// Everything a single run needs.
///
/// `Default` gives the documented defaults: Saint Petersburg, `marinas.csv`,
/// `leisure=marina`, no enrichment, 1000 m amenity radius.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub place: String,
    pub output: PathBuf,
    pub tag: TagFilter,
    pub enrich: bool,
    pub amenity: AmenityConfig,
    pub capacity: CapacityTags,
    pub nominatim: NominatimConfig,
    pub overpass: OverpassConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            place: DEFAULT_PLACE.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            tag: TagFilter::default(),
            enrich: false,
            amenity: AmenityConfig::default(),
            capacity: CapacityTags::default(),
            nominatim: NominatimConfig::default(),
            overpass: OverpassConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Layer file settings over the defaults
    pub fn from_file(file: FileConfig) -> Self {
        let defaults = Self::default();
        Self {
            place: file.city.unwrap_or(defaults.place),
            output: file.output.unwrap_or(defaults.output),
            tag: file.tag.unwrap_or(defaults.tag),
            enrich: file.enrich,
            amenity: file.amenity.unwrap_or(defaults.amenity),
            capacity: file.capacity.unwrap_or(defaults.capacity),
            nominatim: file.nominatim.unwrap_or(defaults.nominatim),
            overpass: file.overpass.unwrap_or(defaults.overpass),
        }
    }
}

/// On-disk settings; every field is optional.
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub tag: Option<TagFilter>,
    #[serde(default)]
    pub enrich: bool,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub amenity: Option<AmenityConfig>,
    #[serde(default)]
    pub capacity: Option<CapacityTags>,
    #[serde(default)]
    pub nominatim: Option<NominatimConfig>,
    #[serde(default)]
    pub overpass: Option<OverpassConfig>,
}

impl FileConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Search the default locations. Runs before logging is set up, so
    /// problems are collected rather than logged.
    pub fn load() -> LoadedConfig {
        Self::load_from(&get_config_paths())
    }

    /// First parseable file among `paths`. Unparseable files are skipped and
    /// reported in `LoadedConfig::skipped`.
    pub fn load_from(paths: &[PathBuf]) -> LoadedConfig {
        let mut loaded = LoadedConfig::default();
        for path in paths {
            if !path.exists() {
                continue;
            }
            match Self::from_path(path) {
                Ok(config) => {
                    loaded.config = Some(config);
                    loaded.path = Some(path.clone());
                    break;
                }
                Err(e) => loaded.skipped.push(e),
            }
        }
        loaded
    }
}

/// Result of config auto-discovery
#[derive(Debug, Default)]
pub struct LoadedConfig {
    pub config: Option<FileConfig>,
    pub path: Option<PathBuf>,
    pub skipped: Vec<ConfigError>,
}

impl LoadedConfig {
    pub fn verbose(&self) -> bool {
        self.config.as_ref().is_some_and(|c| c.verbose)
    }

    /// Emit the deferred discovery messages once a subscriber exists
    pub fn log(&self) {
        for e in &self.skipped {
            tracing::warn!("{}", e);
        }
        if let Some(path) = &self.path {
            tracing::debug!("Loaded config from {}", path.display());
        }
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("marinascan.toml"));
    paths.push(PathBuf::from(".marinascan.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("marinascan").join("config.toml"));
        paths.push(config_dir.join("marinascan.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".marinascan.toml"));
    }

    paths
}
