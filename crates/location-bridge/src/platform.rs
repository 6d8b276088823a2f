//! Collaborator traits for the host platform's subsystems.
//!
//! The bridge never talks to the operating system directly. Hosts implement
//! these traits over their native APIs and hand them to the bridge through
//! [`Platform`]. Calls that only *start* an asynchronous flow (permission
//! dialogs, service resolution, location fetches) return as soon as the flow
//! is underway; the answer arrives later as a
//! [`PlatformEvent`](crate::PlatformEvent).

use thiserror::Error;

use crate::notification::{Notification, NotificationChannel};
use crate::settings::Settings;

/// Failure reported by a platform collaborator.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct PlatformError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl PlatformError {
    /// Builds an error without an underlying source.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Builds an error that wraps an underlying source.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Human-readable message describing the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Location permission as currently recorded by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    /// The user has not been asked yet.
    NotDetermined,
    /// The user refused.
    Denied,
    /// Location is available while the application is in use.
    GrantedForeground,
    /// Location is available at all times.
    GrantedBackground,
}

impl PermissionState {
    /// Returns `true` for either granted state.
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::GrantedForeground | Self::GrantedBackground)
    }
}

/// The platform's location provider.
pub trait LocationSubsystem {
    /// Applies normalised request settings.
    fn apply_settings(&mut self, settings: &Settings) -> Result<(), PlatformError>;

    /// Reports whether the device location service is switched on.
    fn service_enabled(&self) -> Result<bool, PlatformError>;

    /// Starts the flow asking the user to switch the location service on.
    fn request_service(&mut self) -> Result<(), PlatformError>;

    /// Starts fetching a single location fix.
    fn start_location_fetch(&mut self) -> Result<(), PlatformError>;
}

/// The platform's permission model.
pub trait PermissionPlatform {
    /// Current permission state.
    fn permission_state(&self) -> PermissionState;

    /// Starts the foreground location permission dialog.
    fn request_foreground(&mut self) -> Result<(), PlatformError>;

    /// Starts the background location permission dialog.
    fn request_background(&mut self) -> Result<(), PlatformError>;
}

/// Long-running service performing continuous background collection.
pub trait BackgroundService {
    /// Reports whether the service runs in foreground-service mode.
    fn is_foreground(&self) -> bool;

    /// Promotes the service to foreground mode showing `notification`.
    fn start_foreground(&mut self, notification: &Notification) -> Result<(), PlatformError>;

    /// Leaves foreground mode and removes the persistent notification.
    fn stop_foreground(&mut self) -> Result<(), PlatformError>;

    /// Replaces the visible persistent notification.
    fn update_notification(&mut self, notification: &Notification) -> Result<(), PlatformError>;
}

/// The platform's notification manager.
pub trait NotificationCenter {
    /// Posts or refreshes a notification.
    fn notify(&mut self, notification: &Notification) -> Result<(), PlatformError>;

    /// Removes a posted notification.
    fn cancel(&mut self, id: i32) -> Result<(), PlatformError>;

    /// Registers (or updates) a notification channel.
    fn create_channel(&mut self, channel: &NotificationChannel) -> Result<(), PlatformError>;
}

/// Collaborators available when the bridge is constructed.
///
/// The background service is attached separately because hosts usually bind
/// to it after start-up.
pub struct Platform {
    /// Platform API level used for capability detection.
    pub api_level: u32,
    /// Location provider.
    pub location: Box<dyn LocationSubsystem>,
    /// Permission model.
    pub permissions: Box<dyn PermissionPlatform>,
    /// Notification manager, when the host exposes one.
    pub notifications: Option<Box<dyn NotificationCenter>>,
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Platform")
            .field("api_level", &self.api_level)
            .field("notifications", &self.notifications.is_some())
            .finish_non_exhaustive()
    }
}
