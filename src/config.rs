use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub supabase: SupabaseSettings,
    #[serde(default)]
    pub geocoding: GeocodingSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
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
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseSettings {
    pub url: String,
    pub anon_key: String,
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingSettings {
    #[serde(default = "default_geocoding_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    pub country_codes: Option<String>,
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    #[serde(default = "default_geocoding_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeocodingSettings {
    fn default() -> Self {
        Self {
            endpoint: default_geocoding_endpoint(),
            user_agent: default_user_agent(),
            country_codes: Some("us".to_string()),
            min_interval_ms: default_min_interval_ms(),
            timeout_secs: default_geocoding_timeout_secs(),
        }
    }
}

fn default_geocoding_endpoint() -> String { "https://nominatim.openstreetmap.org".to_string() }
fn default_user_agent() -> String { "DispoMatch Healthcare Facility Finder".to_string() }
fn default_min_interval_ms() -> u64 { 1000 }
fn default_geocoding_timeout_secs() -> u64 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub redis_url: Option<String>,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_l1_cache_size")]
    pub l1_cache_size: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            redis_url: None,
            ttl_secs: default_ttl_secs(),
            l1_cache_size: default_l1_cache_size(),
        }
    }
}

fn default_ttl_secs() -> u64 { 300 }
fn default_l1_cache_size() -> u64 { 1000 }

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_page_size")]
    pub default_limit: u16,
    #[serde(default = "default_max_page_size")]
    pub max_limit: u16,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_limit: default_page_size(),
            max_limit: default_max_page_size(),
        }
    }
}

fn default_page_size() -> u16 { 5 }
fn default_max_page_size() -> u16 { 100 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

/// Relative weight per filter dimension; equal weights split the score evenly
#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_weight")]
    pub facility_type: f64,
    #[serde(default = "default_weight")]
    pub insurance: f64,
    #[serde(default = "default_weight")]
    pub service: f64,
    #[serde(default = "default_weight")]
    pub bed_availability: f64,
    #[serde(default = "default_weight")]
    pub name: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            facility_type: default_weight(),
            insurance: default_weight(),
            service: default_weight(),
            bed_availability: default_weight(),
            name: default_weight(),
        }
    }
}

fn default_weight() -> f64 { 1.0 }

impl WeightsConfig {
    /// Convert to engine weights, rejecting zero, negative or non-finite values
    pub fn to_weights(&self) -> Result<ScoringWeights, ConfigError> {
        let weights = ScoringWeights {
            facility_type: self.facility_type,
            insurance: self.insurance,
            service: self.service,
            bed_availability: self.bed_availability,
            name: self.name,
        };

        let all = [
            ("facility_type", weights.facility_type),
            ("insurance", weights.insurance),
            ("service", weights.service),
            ("bed_availability", weights.bed_availability),
            ("name", weights.name),
        ];

        for (name, value) in all {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Message(format!(
                    "scoring.weights.{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        Ok(weights)
    }
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
    /// 4. Environment variables (prefixed with DISPOMATCH__)
    /// 5. Well-known variables such as DATABASE_URL and SUPABASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., DISPOMATCH__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("DISPOMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("DISPOMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the conventional, unprefixed variables a Supabase deployment exports
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("DATABASE_URL", "database.url"),
        ("SUPABASE_URL", "supabase.url"),
        ("SUPABASE_ANON_KEY", "supabase.anon_key"),
        ("SUPABASE_JWT_SECRET", "supabase.jwt_secret"),
        ("REDIS_URL", "cache.redis_url"),
    ];

    let mut builder = Config::builder().add_source(settings);

    for (var, key) in overrides {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [server]
        host = "0.0.0.0"
        port = 8080

        [database]
        url = "postgres://localhost/dispomatch"

        [supabase]
        url = "https://project.supabase.co"
        anon_key = "anon"
        jwt_secret = "secret"

        [scoring.weights]
        insurance = 2.0
    "#;

    #[test]
    fn test_default_weights_equal() {
        let weights = WeightsConfig::default().to_weights().unwrap();
        assert_eq!(weights, ScoringWeights::default());
    }

    #[test]
    fn test_rejects_non_positive_weight() {
        let config = WeightsConfig {
            service: 0.0,
            ..Default::default()
        };
        assert!(config.to_weights().is_err());
    }

    #[test]
    fn test_sample_file_parses_with_defaults() {
        let settings: Settings = toml::from_str(SAMPLE).unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.scoring.weights.insurance, 2.0);
        assert_eq!(settings.scoring.weights.service, 1.0);
        assert_eq!(settings.search.default_limit, 5);
        assert_eq!(settings.geocoding.min_interval_ms, 1000);
        assert!(settings.cache.redis_url.is_none());
        assert_eq!(settings.logging.format, "json");
    }

    #[test]
    fn test_shipped_default_config_loads() {
        let settings = Settings::load_from("config/default.toml").unwrap();

        assert_eq!(settings.geocoding.country_codes.as_deref(), Some("us"));
        assert_eq!(settings.search.max_limit, 100);
        assert!(settings.scoring.weights.to_weights().is_ok());
    }
}
