use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::{
    outranking::DEFAULT_CREDIBILITY_THRESHOLD,
    report::DEFAULT_TOP_N,
    thresholds::{DEFAULT_K_INDIFFERENCE, DEFAULT_K_PREFERENCE},
    Bounds, CriterionMaxima, OutrankingParams, ScoreBounds,
};
use crate::models::{Criterion, GeoPoint, Zone};
use crate::services::SearchOptions;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub places: PlacesSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    pub search: SearchSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub outranking: OutrankingSettings,
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlacesSettings {
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    pub timeout_secs: Option<u64>,
    pub max_concurrency: Option<usize>,
    pub included_types: Option<Vec<String>>,
    pub excluded_types: Option<Vec<String>>,
    pub language_code: Option<String>,
    pub max_result_count: Option<u8>,
}

impl PlacesSettings {
    pub fn search_options(&self) -> SearchOptions {
        let defaults = SearchOptions::default();
        SearchOptions {
            included_types: self.included_types.clone().unwrap_or(defaults.included_types),
            excluded_types: self.excluded_types.clone().unwrap_or(defaults.excluded_types),
            language_code: self.language_code.clone().unwrap_or(defaults.language_code),
            max_result_count: self.max_result_count.unwrap_or(defaults.max_result_count),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    #[serde(default)]
    pub enabled: bool,
    pub ttl_secs: Option<u64>,
    pub capacity: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    /// Default user position when a request does not carry one
    pub user_latitude: f64,
    pub user_longitude: f64,
    #[serde(default)]
    pub zones: Vec<Zone>,
}

impl SearchSettings {
    pub fn user_location(&self) -> GeoPoint {
        GeoPoint::new(self.user_latitude, self.user_longitude)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default = "default_rating_bounds")]
    pub rating: Bounds,
    #[serde(default = "default_price_bounds")]
    pub price: Bounds,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            rating: default_rating_bounds(),
            price: default_price_bounds(),
            top_n: default_top_n(),
        }
    }
}

impl ScoringSettings {
    pub fn bounds(&self) -> ScoreBounds {
        ScoreBounds {
            rating: self.rating,
            price: self.price,
        }
    }
}

fn default_rating_bounds() -> Bounds { ScoreBounds::default().rating }
fn default_price_bounds() -> Bounds { ScoreBounds::default().price }
fn default_top_n() -> usize { DEFAULT_TOP_N }

#[derive(Debug, Clone, Deserialize)]
pub struct OutrankingSettings {
    #[serde(default = "default_k_indifference")]
    pub k_indifference: f64,
    #[serde(default = "default_k_preference")]
    pub k_preference: f64,
    #[serde(default = "default_credibility_threshold")]
    pub credibility_threshold: f64,
    #[serde(default)]
    pub criterion_max: CriterionMaxConfig,
}

impl Default for OutrankingSettings {
    fn default() -> Self {
        Self {
            k_indifference: default_k_indifference(),
            k_preference: default_k_preference(),
            credibility_threshold: default_credibility_threshold(),
            criterion_max: CriterionMaxConfig::default(),
        }
    }
}

impl OutrankingSettings {
    pub fn params(&self) -> OutrankingParams {
        OutrankingParams {
            k_indifference: self.k_indifference,
            k_preference: self.k_preference,
            credibility_threshold: self.credibility_threshold,
            criterion_maxima: self.criterion_max.maxima(),
        }
    }
}

fn default_k_indifference() -> f64 { DEFAULT_K_INDIFFERENCE }
fn default_k_preference() -> f64 { DEFAULT_K_PREFERENCE }
fn default_credibility_threshold() -> f64 { DEFAULT_CREDIBILITY_THRESHOLD }

/// Per-criterion maxima used to scale veto thresholds
#[derive(Debug, Clone, Deserialize)]
pub struct CriterionMaxConfig {
    #[serde(default = "default_rating_max")]
    pub rating: f64,
    #[serde(default = "default_price_max")]
    pub price: f64,
    #[serde(default = "default_distance_max")]
    pub distance: f64,
    #[serde(default = "default_flag_max")]
    pub pets: f64,
    #[serde(default = "default_flag_max")]
    pub live_music: f64,
    #[serde(default = "default_flag_max")]
    pub outdoor_seating: f64,
    #[serde(default = "default_flag_max")]
    pub vegetarian: f64,
    #[serde(default = "default_flag_max")]
    pub child_menu: f64,
}

impl Default for CriterionMaxConfig {
    fn default() -> Self {
        Self {
            rating: default_rating_max(),
            price: default_price_max(),
            distance: default_distance_max(),
            pets: default_flag_max(),
            live_music: default_flag_max(),
            outdoor_seating: default_flag_max(),
            vegetarian: default_flag_max(),
            child_menu: default_flag_max(),
        }
    }
}

impl CriterionMaxConfig {
    pub fn maxima(&self) -> CriterionMaxima {
        CriterionMaxima::new([
            (Criterion::Rating, self.rating),
            (Criterion::Price, self.price),
            (Criterion::Distance, self.distance),
            (Criterion::Pets, self.pets),
            (Criterion::LiveMusic, self.live_music),
            (Criterion::OutdoorSeating, self.outdoor_seating),
            (Criterion::Vegetarian, self.vegetarian),
            (Criterion::ChildMenu, self.child_menu),
        ])
    }
}

fn default_rating_max() -> f64 { 5.0 }
fn default_price_max() -> f64 { 4.0 }
fn default_distance_max() -> f64 { 10.0 }
fn default_flag_max() -> f64 { 1.0 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportSettings {
    /// When set, every recommendation is also written there as CSV
    pub output_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with RESTO_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., RESTO__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("RESTO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        let settings: Self = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("RESTO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Self = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check cross-field invariants the engine relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let outranking = &self.outranking;
        if !(outranking.k_indifference > 0.0 && outranking.k_indifference < outranking.k_preference) {
            return Err(ConfigError::Message(format!(
                "outranking.k_indifference ({}) must be positive and below k_preference ({})",
                outranking.k_indifference, outranking.k_preference
            )));
        }
        if !(outranking.credibility_threshold > 0.0 && outranking.credibility_threshold <= 1.0) {
            return Err(ConfigError::Message(format!(
                "outranking.credibility_threshold ({}) must be in (0, 1]",
                outranking.credibility_threshold
            )));
        }
        for (name, bounds) in [("rating", self.scoring.rating), ("price", self.scoring.price)] {
            if bounds.min > bounds.max {
                return Err(ConfigError::Message(format!(
                    "scoring.{} bounds are inverted ({} > {})",
                    name, bounds.min, bounds.max
                )));
            }
        }
        if let Some(zone) = self.search.zones.iter().find(|z| z.radius_m <= 0.0) {
            return Err(ConfigError::Message(format!(
                "zone ({}, {}) has non-positive radius {}",
                zone.latitude, zone.longitude, zone.radius_m
            )));
        }
        Ok(())
    }
}

/// Substitute secrets from well-known environment variables
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    // PLACES_API_KEY wins over RESTO__PLACES__API_KEY
    let api_key = env::var("PLACES_API_KEY").ok();

    let mut builder = Config::builder().add_source(settings);
    if let Some(api_key) = api_key {
        builder = builder.set_override("places.api_key", api_key)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    const MINIMAL: &str = r#"
        [server]
        host = "127.0.0.1"
        port = 8080

        [places]
        endpoint = "https://places.googleapis.com"

        [search]
        user_latitude = 48.8566
        user_longitude = 2.3522

        [[search.zones]]
        latitude = 48.8610
        longitude = 2.3361
        radius_m = 763.0
    "#;

    fn parse(toml: &str) -> Result<Settings, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    #[test]
    fn test_minimal_settings_use_defaults() {
        let settings = parse(MINIMAL).unwrap();

        assert_eq!(settings.search.zones.len(), 1);
        assert_eq!(settings.scoring.top_n, 5);
        assert_eq!(settings.scoring.bounds(), ScoreBounds::default());
        assert_eq!(settings.outranking.params(), OutrankingParams::default());
        assert!(!settings.cache.enabled);
        assert_eq!(settings.places.search_options().max_result_count, 10);
    }

    #[test]
    fn test_inverted_k_factors_rejected() {
        let toml = format!("{}\n[outranking]\nk_indifference = 0.5\nk_preference = 0.3\n", MINIMAL);
        assert!(parse(&toml).is_err());
    }

    #[test]
    fn test_credibility_threshold_out_of_range_rejected() {
        let toml = format!("{}\n[outranking]\ncredibility_threshold = 1.2\n", MINIMAL);
        assert!(parse(&toml).is_err());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }
}
