//! Initialize configuration from file or env var.
//!
//! All environment variables are prefixed with `FILEMESH_CONFIG_`.
use filemesh_configuration::{Configuration, Info};

// Default values
pub const DEFAULT_PATH_CONFIG: &str = "./share/default/config/filemesh.toml";

/// It loads the application configuration from the environment.
///
/// There are two methods to inject the configuration:
///
/// 1. By using a config file: `filemesh.toml`.
/// 2. Environment variable: `FILEMESH_CONFIG_TOML`. The variable contains the same contents as the `filemesh.toml` file.
///
/// Environment variable has priority over the config file. Single options
/// can be overridden with `FILEMESH_CONFIG_OVERRIDE_` variables, for example
/// `FILEMESH_CONFIG_OVERRIDE_CORE__SEED_TIMEOUT=30000`.
///
/// # Panics
///
/// Will panic if it can't load the configuration from either
/// `./share/default/config/filemesh.toml` file or the env var `FILEMESH_CONFIG_TOML`.
#[must_use]
pub fn initialize_configuration() -> Configuration {
    let info = Info::new(DEFAULT_PATH_CONFIG.to_string()).expect("the configuration info should be loaded");

    Configuration::load(&info).expect("the configuration should be loaded")
}
