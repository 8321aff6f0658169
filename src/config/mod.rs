//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, CatalogConfig, CatalogSource, DemoAccountConfig, LogFormat,
    LoggingConfig,
};
