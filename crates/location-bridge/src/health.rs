//! Structured health reporting for bootstrap events.

use std::sync::Arc;

use location_bridge_config::Config;

use crate::bootstrap::BootstrapError;
use crate::capabilities::Capabilities;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer for bootstrap lifecycle events.
pub trait HealthReporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked once the bridge is ready.
    fn bootstrap_succeeded(&self, config: &Config, capabilities: &Capabilities);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config, capabilities: &Capabilities) {
        (**self).bootstrap_succeeded(config, capabilities);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }
}

/// Reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            "starting location bridge bootstrap"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config, capabilities: &Capabilities) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            log_filter = %config.log_filter(),
            log_format = %config.log_format(),
            pending_conflict = %config.pending_conflict(),
            runtime_permissions = capabilities.runtime_permissions.is_supported(),
            background_permission = capabilities.background_permission.is_supported(),
            notification_channels = capabilities.notification_channels.is_supported(),
            "location bridge ready"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "location bridge bootstrap failed"
        );
    }
}
