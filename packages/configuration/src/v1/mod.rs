//! Version `1` for configuration.
//!
//! A complete configuration file with the default values:
//!
//! ```toml
//! [logging]
//! threshold = "info"
//! style = "default"
//!
//! [core]
//! snapshot_path = "./storage/tracker/lib/snapshot.bin"
//! seed_timeout = 60000
//!
//! [tracker]
//! bind_address = "0.0.0.0:8081"
//! ```
//!
//! Two sections are optional:
//!
//! - `core.inactive_seed_cleanup_interval`: when set to a positive value, a
//!   background job removes stale seeds every given number of seconds.
//! - `[peer_server]`: when present, the node also serves the files listed in
//!   the `shared.toml` manifest of `current_dir`, in chunks of `chunk_size`
//!   bytes.
//!
//! ```toml
//! [peer_server]
//! bind_address = "0.0.0.0:8082"
//! chunk_size = 1048576
//! current_dir = "."
//! ```
pub mod core;
pub mod logging;
pub mod peer_server;
pub mod tracker;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use self::core::Core;
use self::logging::Logging;
use self::peer_server::PeerServer;
use self::tracker::TrackerServer;
use crate::{Error, Info, CONFIG_OVERRIDE_PREFIX, CONFIG_OVERRIDE_SEPARATOR};

/// Core configuration for the tracker.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Default, Clone)]
pub struct Configuration {
    /// Logging configuration
    #[serde(default)]
    pub logging: Logging,

    /// Catalog, persistence and seed liveness.
    #[serde(default)]
    pub core: Core,

    /// The tracker service.
    #[serde(default)]
    pub tracker: TrackerServer,

    /// The peer data server. It's only started when present.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer_server: Option<PeerServer>,
}

impl Configuration {
    /// Loads the configuration from the `Info` struct. The whole
    /// configuration in toml format is included in the `info.config_toml`
    /// string, otherwise it's read from `info.config_toml_path`.
    ///
    /// Configuration provided via env var has priority over config file path.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the environment variable does not exist or has a bad configuration.
    pub fn load(info: &Info) -> Result<Configuration, Error> {
        let figment = if let Some(config_toml) = &info.config_toml {
            Figment::from(Serialized::defaults(Configuration::default())).merge(Toml::string(config_toml))
        } else {
            Figment::from(Serialized::defaults(Configuration::default())).merge(Toml::file(&info.config_toml_path))
        };

        let figment = figment.merge(Env::prefixed(CONFIG_OVERRIDE_PREFIX).split(CONFIG_OVERRIDE_SEPARATOR));

        let config: Configuration = figment.extract()?;

        Ok(config)
    }

    /// Encodes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Will return `Err` if a value can't be represented in TOML.
    pub fn to_toml(&self) -> Result<String, Error> {
        Ok(toml::to_string(self)?)
    }
}
