//! Configuration data structures for [filemesh](https://docs.rs/filemesh).
//!
//! This module contains the configuration for the tracker service and the
//! peer data server. The current version for configuration is [`v1`].
//!
//! Configuration is loaded from, by increasing priority:
//!
//! 1. The built-in defaults.
//! 2. A TOML file (`FILEMESH_CONFIG_TOML_PATH`) or, when set, the TOML content
//!    of the `FILEMESH_CONFIG_TOML` environment variable.
//! 3. Single-value overrides: `FILEMESH_CONFIG_OVERRIDE_<SECTION>__<FIELD>`,
//!    for example `FILEMESH_CONFIG_OVERRIDE_CORE__SEED_TIMEOUT=30000`.
pub mod v1;

use std::env;
use std::panic::Location;
use std::time::Duration;

use thiserror::Error;

/// The well-known port the tracker listens on.
pub const TRACKER_PORT: u16 = 8081;

/// How long a seed stays active without refreshing itself.
pub const DEFAULT_SEED_TIMEOUT: Duration = Duration::from_millis(60_000);

/// Default timeout for clients waiting on a connection or a response.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

// Environment variables

/// The whole `filemesh.toml` file content. It has priority over the config file.
const ENV_VAR_CONFIG_TOML: &str = "FILEMESH_CONFIG_TOML";

/// The `filemesh.toml` file location.
pub const ENV_VAR_CONFIG_TOML_PATH: &str = "FILEMESH_CONFIG_TOML_PATH";

/// Prefix for environment variables overriding single values.
const CONFIG_OVERRIDE_PREFIX: &str = "FILEMESH_CONFIG_OVERRIDE_";

/// Path separator in env var names for nested values.
const CONFIG_OVERRIDE_SEPARATOR: &str = "__";

pub type Configuration = v1::Configuration;
pub type Core = v1::core::Core;
pub type Logging = v1::logging::Logging;
pub type Threshold = v1::logging::Threshold;
pub type TraceStyle = v1::logging::TraceStyle;
pub type TrackerServer = v1::tracker::TrackerServer;
pub type PeerServer = v1::peer_server::PeerServer;

/// Information required for loading config
#[derive(Debug, Default, Clone)]
pub struct Info {
    config_toml: Option<String>,
    config_toml_path: String,
}

impl Info {
    /// Build Configuration Info
    ///
    /// # Errors
    ///
    /// Will return `Err` if unable to obtain a configuration.
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(default_config_toml_path: String) -> Result<Self, Error> {
        let config_toml = if let Ok(config_toml) = env::var(ENV_VAR_CONFIG_TOML) {
            println!("Loading configuration from environment variable:\n {config_toml}");
            Some(config_toml)
        } else {
            None
        };

        let config_toml_path = if let Ok(config_toml_path) = env::var(ENV_VAR_CONFIG_TOML_PATH) {
            println!("Loading configuration from file: `{config_toml_path}` ...");
            config_toml_path
        } else {
            println!("Loading configuration from default configuration file: `{default_config_toml_path}` ...");
            default_config_toml_path
        };

        Ok(Self {
            config_toml,
            config_toml_path,
        })
    }
}

/// Errors that can occur when loading the configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// The merged configuration sources could not be extracted into a
    /// [`Configuration`].
    #[error("Failed processing the configuration: {source}, {location}")]
    ConfigError {
        source: Box<figment::Error>,
        location: &'static Location<'static>,
    },

    #[error("Failed encoding the configuration: {source}, {location}")]
    EncodingError {
        source: toml::ser::Error,
        location: &'static Location<'static>,
    },
}

impl From<figment::Error> for Error {
    #[track_caller]
    fn from(err: figment::Error) -> Self {
        Self::ConfigError {
            source: Box::new(err),
            location: Location::caller(),
        }
    }
}

impl From<toml::ser::Error> for Error {
    #[track_caller]
    fn from(err: toml::ser::Error) -> Self {
        Self::EncodingError {
            source: err,
            location: Location::caller(),
        }
    }
}
