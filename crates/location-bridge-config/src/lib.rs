//! Shared configuration for the location command bridge.
//!
//! Configuration is layered by `ortho_config`: built-in defaults, then a
//! TOML file named by `--config-path` or `LOCATION_BRIDGE_CONFIG_PATH`, then
//! `LOCATION_BRIDGE_*` environment variables, then CLI flags. The resulting
//! [`Config`] carries the telemetry settings, the policy applied when a
//! request kind already has an outstanding continuation, and the capability
//! overrides applied on top of platform detection.

mod capability;
mod defaults;
mod logging;
mod policy;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use capability::{
    CapabilityDirective, CapabilityDirectiveParseError, CapabilityOverride, CapabilityOverrides,
    PlatformCapability, deduplicate_directives,
};
pub use defaults::{
    DEFAULT_LOG_FILTER, default_log_filter, default_log_filter_string, default_log_format,
    default_pending_conflict,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use policy::PendingConflictPolicy;

/// Resolved bridge configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "LOCATION_BRIDGE")]
pub struct Config {
    /// Tracing filter expression in `EnvFilter` syntax.
    #[ortho_config(default = default_log_filter_string())]
    #[serde(default = "default_log_filter_string")]
    pub log_filter: String,
    /// Output format for structured telemetry.
    #[ortho_config(default = default_log_format())]
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
    /// Handling of a request that arrives while one of its kind waits.
    #[ortho_config(default = default_pending_conflict())]
    #[serde(default = "default_pending_conflict")]
    pub pending_conflict: PendingConflictPolicy,
    /// Directives forcing or denying detected platform capabilities.
    #[ortho_config(merge_strategy = "append")]
    #[serde(default)]
    pub capability_overrides: Vec<CapabilityDirective>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            pending_conflict: default_pending_conflict(),
            capability_overrides: Vec::new(),
        }
    }
}

impl Config {
    /// Returns the tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Returns the telemetry output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns the policy for conflicting pending requests.
    #[must_use]
    pub const fn pending_conflict(&self) -> PendingConflictPolicy {
        self.pending_conflict
    }

    /// Collapses the configured directives into an override map.
    ///
    /// Duplicate directives for the same capability resolve to the last one
    /// supplied, so CLI flags appended after file entries take precedence.
    #[must_use]
    pub fn capability_overrides(&self) -> CapabilityOverrides {
        let mut directives = self.capability_overrides.clone();
        deduplicate_directives(&mut directives);
        CapabilityOverrides::from_directives(&directives)
    }
}
