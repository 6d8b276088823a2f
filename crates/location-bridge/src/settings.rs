//! Location request settings.

use serde_json::Value;
use tracing::debug;

use crate::dispatch::DispatchError;
use crate::platform::LocationSubsystem;
use crate::translate::{AccuracyLevel, LocationPriority};

const SETTINGS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::settings");

/// Normalised location request settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    accuracy: AccuracyLevel,
    interval_ms: i64,
    fastest_interval_ms: i64,
    distance_filter_meters: f64,
}

impl Settings {
    /// Builds settings; the fastest interval is half the requested interval,
    /// rounded down.
    #[must_use]
    pub const fn new(accuracy: AccuracyLevel, interval_ms: i64, distance_filter_meters: f64) -> Self {
        Self {
            accuracy,
            interval_ms,
            fastest_interval_ms: interval_ms.div_euclid(2),
            distance_filter_meters,
        }
    }

    /// Requested accuracy level.
    #[must_use]
    pub const fn accuracy(&self) -> AccuracyLevel {
        self.accuracy
    }

    /// Platform priority derived from the accuracy level.
    #[must_use]
    pub const fn priority(&self) -> LocationPriority {
        self.accuracy.priority()
    }

    /// Desired update interval in milliseconds.
    #[must_use]
    pub const fn interval_ms(&self) -> i64 {
        self.interval_ms
    }

    /// Fastest interval the caller accepts, in milliseconds.
    #[must_use]
    pub const fn fastest_interval_ms(&self) -> i64 {
        self.fastest_interval_ms
    }

    /// Minimum displacement between updates, in metres.
    #[must_use]
    pub const fn distance_filter_meters(&self) -> f64 {
        self.distance_filter_meters
    }
}

/// Validates and forwards settings changes to the location subsystem.
#[derive(Debug, Default)]
pub struct SettingsCoordinator {
    applied: Option<Settings>,
}

impl SettingsCoordinator {
    /// Creates a coordinator with nothing applied yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalises the caller's settings and applies them.
    ///
    /// Nothing reaches the subsystem when the accuracy token is unknown.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAccuracy` for tokens outside the accuracy table and
    /// `Platform` if the subsystem rejects the settings.
    pub fn change_settings(
        &mut self,
        location: &mut dyn LocationSubsystem,
        accuracy: &Value,
        interval_ms: i64,
        distance_filter_meters: f64,
    ) -> Result<Settings, DispatchError> {
        let level = AccuracyLevel::from_token(accuracy)
            .ok_or_else(|| DispatchError::unknown_accuracy(accuracy.to_string()))?;
        let settings = Settings::new(level, interval_ms, distance_filter_meters);
        location.apply_settings(&settings)?;
        debug!(
            target: SETTINGS_TARGET,
            accuracy = %level,
            priority = settings.priority().code(),
            interval_ms,
            fastest_interval_ms = settings.fastest_interval_ms(),
            "applied location settings"
        );
        self.applied = Some(settings);
        Ok(settings)
    }

    /// The settings most recently accepted by the subsystem.
    #[must_use]
    pub const fn applied(&self) -> Option<&Settings> {
        self.applied.as_ref()
    }
}
