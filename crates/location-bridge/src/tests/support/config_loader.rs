//! Configuration loaders for scenarios covering success and failure paths.

use std::ffi::OsString;
use std::sync::Arc;

use location_bridge_config::Config;
use ortho_config::{OrthoConfig, OrthoError};

use crate::bootstrap::ConfigLoader;

/// Configuration used by bootstrap tests.
#[must_use]
pub fn test_config() -> Config {
    Config {
        log_filter: "location_bridge=debug".to_owned(),
        ..Config::default()
    }
}

/// Loader that fails by passing an unknown conflict policy on the command line.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("location-bridge"),
            OsString::from("--pending-conflict"),
            OsString::from("queue"),
        ];
        Config::load_from_iter(args)
    }
}
