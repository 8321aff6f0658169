use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::UserRole;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Simulated authentication backend settings
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Simulated round trip for every auth call
    #[serde(default = "default_auth_latency_ms")]
    pub latency_ms: u64,
    /// Random extra latency, up to this many milliseconds
    #[serde(default)]
    pub jitter_ms: u64,
    /// Role given to newly registered accounts
    #[serde(default)]
    pub default_role: UserRole,
    /// Whether a successful sign-in is offered back by the restore probe
    #[serde(default)]
    pub remember_sessions: bool,
    /// Email of a seeded account treated as already signed in at start-up.
    /// Sessions are kept in memory, so this is how a fresh process restores one.
    #[serde(default)]
    pub persisted_session: Option<String>,
    /// Account seeded at start-up; `None` starts with no accounts
    #[serde(default = "default_demo_account")]
    pub demo_account: Option<DemoAccountConfig>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DemoAccountConfig {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Where the model catalog comes from
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    #[default]
    Fixture,
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub source: CatalogSource,
    /// TOML catalog, required for `source = "file"`
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Simulated round trip for the fixture catalog
    #[serde(default = "default_catalog_latency_ms")]
    pub latency_ms: u64,
    /// Make the fixture catalog fail to load
    #[serde(default)]
    pub unavailable: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_auth_latency_ms() -> u64 {
    1000
}

fn default_catalog_latency_ms() -> u64 {
    800
}

fn default_demo_account() -> Option<DemoAccountConfig> {
    Some(DemoAccountConfig {
        name: "Demo User".to_string(),
        email: "user@example.com".to_string(),
        password: "password123".to_string(),
        role: UserRole::Researcher,
    })
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            latency_ms: default_auth_latency_ms(),
            jitter_ms: 0,
            default_role: UserRole::default(),
            remember_sessions: false,
            persisted_session: None,
            demo_account: default_demo_account(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: CatalogSource::default(),
            path: None,
            latency_ms: default_catalog_latency_ms(),
            unavailable: false,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
