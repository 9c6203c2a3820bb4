//! Server settings loaded with the `config` crate.
//!
//! Sources, lowest precedence first: serde defaults, an optional TOML file
//! named by `PITCHSIDE_CONFIG` (default `pitchside.toml`), and `PITCHSIDE_*`
//! environment variables using `__` between nested keys.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use pitchside_core::{
    AggregateConfig, EndpointSpec, EndpointTable, PitchsideError, SoftFailureMarker,
    default_endpoints,
};
use pitchside_upstream::{UpstreamConfig, validate_base_url};
use serde::Deserialize;
use thiserror::Error;

use crate::cache::CacheConfig;

/// Variable naming the settings file.
pub const CONFIG_FILE_VAR: &str = "PITCHSIDE_CONFIG";

/// Settings file used when `PITCHSIDE_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "pitchside.toml";

const ENV_PREFIX: &str = "PITCHSIDE";

const RESERVED_ROUTES: &[&str] = &["/health", "/metrics"];

/// Errores de configuracion al arrancar.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error(transparent)]
    Invalid(#[from] PitchsideError),

    #[error("invalid listen address '{0}'")]
    Address(String),
}

/// Cache section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Freshness window in seconds.
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl_secs: 60 }
    }
}

/// Top-level server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub aggregate: AggregateConfig,

    #[serde(default)]
    pub soft_failure: SoftFailureMarker,

    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<EndpointSpec>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Settings {
    /// Loads settings from the process environment.
    pub fn load() -> Result<Self, SettingsError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Loads settings from an explicit set of variables.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, SettingsError> {
        let file = vars
            .get(CONFIG_FILE_VAR)
            .cloned()
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

        let settings: Settings = Config::builder()
            .add_source(File::new(&file, FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(Some(vars)),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        validate_base_url(self.upstream.base_url())?;
        self.socket_addr()?;
        Ok(())
    }

    /// Direccion de escucha.
    pub fn socket_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| SettingsError::Address(raw))
    }

    /// Compiles the endpoint table.
    ///
    /// Routes may not shadow `/health` or `/metrics`.
    pub fn endpoint_table(&self) -> Result<EndpointTable, SettingsError> {
        if let Some(spec) = self
            .endpoints
            .iter()
            .find(|spec| RESERVED_ROUTES.contains(&spec.route.as_str()))
        {
            return Err(PitchsideError::invalid_config(format!(
                "endpoint '{}' uses reserved route '{}'",
                spec.name, spec.route
            ))
            .into());
        }

        Ok(EndpointTable::compile(self.endpoints.clone())?)
    }

    /// Cache configuration derived from these settings.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            ttl: Duration::from_secs(self.cache.ttl_secs),
            aggregate: self.aggregate.clone(),
            soft_failure: self.soft_failure.clone(),
        }
    }
}
