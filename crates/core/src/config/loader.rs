use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment overrides, e.g. `LECTERN_SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "LECTERN_";

/// Variables sharing the prefix that are not config keys.
const NON_CONFIG_VARS: &[&str] = &["CONFIG", "OUTPUT_DIR"];

/// Load configuration from a TOML file, then apply `LECTERN_*` overrides.
///
/// Nested keys are separated by a double underscore.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    Figment::new()
        .merge(Toml::file(path))
        .merge(env_overrides())
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from a TOML string, without environment overrides.
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn env_overrides() -> Env {
    Env::prefixed(ENV_PREFIX).ignore(NON_CONFIG_VARS).split("__")
}
