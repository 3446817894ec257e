//! CLI command implementations.

pub mod classify;
pub mod convert;
pub mod init_config;

use std::path::Path;

use idmint::IdmintConfig;

/// Load the configuration file if one was given, else the defaults.
fn load_config(path: Option<&Path>) -> idmint::Result<IdmintConfig> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            IdmintConfig::load(path)
        }
        None => Ok(IdmintConfig::default()),
    }
}
