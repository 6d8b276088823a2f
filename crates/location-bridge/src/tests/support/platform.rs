//! Recording doubles for the platform collaborator traits.
//!
//! Each double shares its state through an `Arc<Mutex<..>>`, so a test keeps
//! a clone for assertions while the bridge owns the boxed original.

use std::sync::{Arc, Mutex};

use mockall::mock;

use crate::events::LocationFix;
use crate::notification::{Notification, NotificationChannel};
use crate::platform::{
    BackgroundService, LocationSubsystem, NotificationCenter, PermissionPlatform,
    PermissionState, PlatformError,
};
use crate::settings::Settings;

mock! {
    pub Center {}
    impl NotificationCenter for Center {
        fn notify(&mut self, notification: &Notification) -> Result<(), PlatformError>;
        fn cancel(&mut self, id: i32) -> Result<(), PlatformError>;
        fn create_channel(&mut self, channel: &NotificationChannel) -> Result<(), PlatformError>;
    }
}

fn failure(message: Option<&String>) -> Result<(), PlatformError> {
    message.map_or(Ok(()), |message| Err(PlatformError::new(message.clone())))
}

/// A fix with recognisable values.
#[must_use]
pub fn sample_fix() -> LocationFix {
    LocationFix {
        latitude: -33.45,
        longitude: -70.66,
        accuracy: 5.0,
        vertical_accuracy: 3.0,
        altitude: 570.0,
        speed: 1.5,
        speed_accuracy: 0.5,
        heading: 90.0,
        heading_accuracy: 10.0,
        time: 1_700_000_000_000.0,
        is_mock: false,
        provider: "gps".to_owned(),
    }
}

#[derive(Default)]
struct LocationState {
    applied: Vec<Settings>,
    fetches: usize,
    service_requests: usize,
    service_enabled: bool,
    settings_failure: Option<String>,
    fetch_failure: Option<String>,
    service_query_failure: Option<String>,
}

/// Location subsystem that records what it is asked to do.
#[derive(Clone, Default)]
pub struct RecordingLocation {
    state: Arc<Mutex<LocationState>>,
}

impl RecordingLocation {
    fn with_state<R>(&self, action: impl FnOnce(&mut LocationState) -> R) -> R {
        let mut state = self.state.lock().expect("location state mutex poisoned");
        action(&mut state)
    }

    /// Makes `apply_settings` fail.
    #[must_use]
    pub fn failing_settings(self, message: &str) -> Self {
        self.with_state(|state| state.settings_failure = Some(message.to_owned()));
        self
    }

    /// Makes `start_location_fetch` fail.
    #[must_use]
    pub fn failing_fetch(self, message: &str) -> Self {
        self.with_state(|state| state.fetch_failure = Some(message.to_owned()));
        self
    }

    /// Makes `service_enabled` fail.
    #[must_use]
    pub fn failing_service_query(self, message: &str) -> Self {
        self.with_state(|state| state.service_query_failure = Some(message.to_owned()));
        self
    }

    /// Sets the reported service state.
    pub fn set_service_enabled(&self, enabled: bool) {
        self.with_state(|state| state.service_enabled = enabled);
    }

    /// Settings accepted so far.
    #[must_use]
    pub fn applied(&self) -> Vec<Settings> {
        self.with_state(|state| state.applied.clone())
    }

    /// Number of fetches started.
    #[must_use]
    pub fn fetches(&self) -> usize {
        self.with_state(|state| state.fetches)
    }

    /// Number of service request flows started.
    #[must_use]
    pub fn service_requests(&self) -> usize {
        self.with_state(|state| state.service_requests)
    }
}

impl LocationSubsystem for RecordingLocation {
    fn apply_settings(&mut self, settings: &Settings) -> Result<(), PlatformError> {
        self.with_state(|state| {
            failure(state.settings_failure.as_ref())?;
            state.applied.push(*settings);
            Ok(())
        })
    }

    fn service_enabled(&self) -> Result<bool, PlatformError> {
        self.with_state(|state| {
            failure(state.service_query_failure.as_ref())?;
            Ok(state.service_enabled)
        })
    }

    fn request_service(&mut self) -> Result<(), PlatformError> {
        self.with_state(|state| {
            state.service_requests += 1;
            Ok(())
        })
    }

    fn start_location_fetch(&mut self) -> Result<(), PlatformError> {
        self.with_state(|state| {
            failure(state.fetch_failure.as_ref())?;
            state.fetches += 1;
            Ok(())
        })
    }
}

struct PermissionsState {
    state: PermissionState,
    state_queries: usize,
    foreground_requests: usize,
    background_requests: usize,
    request_failure: Option<String>,
}

impl Default for PermissionsState {
    fn default() -> Self {
        Self {
            state: PermissionState::NotDetermined,
            state_queries: 0,
            foreground_requests: 0,
            background_requests: 0,
            request_failure: None,
        }
    }
}

/// Permission platform with a settable state that records dialog requests.
#[derive(Clone, Default)]
pub struct RecordingPermissions {
    state: Arc<Mutex<PermissionsState>>,
}

impl RecordingPermissions {
    fn with_state<R>(&self, action: impl FnOnce(&mut PermissionsState) -> R) -> R {
        let mut state = self.state.lock().expect("permission state mutex poisoned");
        action(&mut state)
    }

    /// Sets the state reported to the bridge.
    pub fn set_state(&self, permission: PermissionState) {
        self.with_state(|state| state.state = permission);
    }

    /// Makes both dialogs fail to start.
    pub fn fail_requests(&self, message: &str) {
        self.with_state(|state| state.request_failure = Some(message.to_owned()));
    }

    /// Number of times the state was read.
    #[must_use]
    pub fn state_queries(&self) -> usize {
        self.with_state(|state| state.state_queries)
    }

    /// Number of foreground dialogs started.
    #[must_use]
    pub fn foreground_requests(&self) -> usize {
        self.with_state(|state| state.foreground_requests)
    }

    /// Number of background dialogs started.
    #[must_use]
    pub fn background_requests(&self) -> usize {
        self.with_state(|state| state.background_requests)
    }
}

impl PermissionPlatform for RecordingPermissions {
    fn permission_state(&self) -> PermissionState {
        self.with_state(|state| {
            state.state_queries += 1;
            state.state
        })
    }

    fn request_foreground(&mut self) -> Result<(), PlatformError> {
        self.with_state(|state| {
            failure(state.request_failure.as_ref())?;
            state.foreground_requests += 1;
            Ok(())
        })
    }

    fn request_background(&mut self) -> Result<(), PlatformError> {
        self.with_state(|state| {
            failure(state.request_failure.as_ref())?;
            state.background_requests += 1;
            Ok(())
        })
    }
}

#[derive(Default)]
struct ServiceState {
    foreground: bool,
    starts: Vec<Notification>,
    stops: usize,
    updates: Vec<Notification>,
    start_failure: Option<String>,
    stop_failure: Option<String>,
}

/// Background service that records foreground transitions.
#[derive(Clone, Default)]
pub struct RecordingBackgroundService {
    state: Arc<Mutex<ServiceState>>,
}

impl RecordingBackgroundService {
    fn with_state<R>(&self, action: impl FnOnce(&mut ServiceState) -> R) -> R {
        let mut state = self.state.lock().expect("service state mutex poisoned");
        action(&mut state)
    }

    /// Puts the service in (or out of) foreground mode.
    pub fn set_foreground(&self, foreground: bool) {
        self.with_state(|state| state.foreground = foreground);
    }

    /// Makes `start_foreground` fail.
    pub fn fail_start(&self, message: &str) {
        self.with_state(|state| state.start_failure = Some(message.to_owned()));
    }

    /// Makes `stop_foreground` fail.
    pub fn fail_stop(&self, message: &str) {
        self.with_state(|state| state.stop_failure = Some(message.to_owned()));
    }

    /// Whether the service is in foreground mode.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.with_state(|state| state.foreground)
    }

    /// Notifications the service was started with.
    #[must_use]
    pub fn starts(&self) -> Vec<Notification> {
        self.with_state(|state| state.starts.clone())
    }

    /// Number of stop requests.
    #[must_use]
    pub fn stops(&self) -> usize {
        self.with_state(|state| state.stops)
    }

    /// Notifications the visible one was replaced with.
    #[must_use]
    pub fn updates(&self) -> Vec<Notification> {
        self.with_state(|state| state.updates.clone())
    }
}

impl BackgroundService for RecordingBackgroundService {
    fn is_foreground(&self) -> bool {
        self.with_state(|state| state.foreground)
    }

    fn start_foreground(&mut self, notification: &Notification) -> Result<(), PlatformError> {
        self.with_state(|state| {
            failure(state.start_failure.as_ref())?;
            state.starts.push(notification.clone());
            state.foreground = true;
            Ok(())
        })
    }

    fn stop_foreground(&mut self) -> Result<(), PlatformError> {
        self.with_state(|state| {
            state.stops += 1;
            failure(state.stop_failure.as_ref())?;
            state.foreground = false;
            Ok(())
        })
    }

    fn update_notification(&mut self, notification: &Notification) -> Result<(), PlatformError> {
        self.with_state(|state| {
            state.updates.push(notification.clone());
            Ok(())
        })
    }
}

#[derive(Default)]
struct CenterState {
    notified: Vec<Notification>,
    cancelled: Vec<i32>,
    channels: Vec<NotificationChannel>,
}

/// Notification center that records posts, cancellations, and channels.
#[derive(Clone, Default)]
pub struct RecordingNotificationCenter {
    state: Arc<Mutex<CenterState>>,
}

impl RecordingNotificationCenter {
    fn with_state<R>(&self, action: impl FnOnce(&mut CenterState) -> R) -> R {
        let mut state = self.state.lock().expect("center state mutex poisoned");
        action(&mut state)
    }

    /// Notifications posted so far.
    #[must_use]
    pub fn notified(&self) -> Vec<Notification> {
        self.with_state(|state| state.notified.clone())
    }

    /// Ids cancelled so far.
    #[must_use]
    pub fn cancelled(&self) -> Vec<i32> {
        self.with_state(|state| state.cancelled.clone())
    }

    /// Channels registered so far.
    #[must_use]
    pub fn channels(&self) -> Vec<NotificationChannel> {
        self.with_state(|state| state.channels.clone())
    }
}

impl NotificationCenter for RecordingNotificationCenter {
    fn notify(&mut self, notification: &Notification) -> Result<(), PlatformError> {
        self.with_state(|state| state.notified.push(notification.clone()));
        Ok(())
    }

    fn cancel(&mut self, id: i32) -> Result<(), PlatformError> {
        self.with_state(|state| state.cancelled.push(id));
        Ok(())
    }

    fn create_channel(&mut self, channel: &NotificationChannel) -> Result<(), PlatformError> {
        self.with_state(|state| state.channels.push(channel.clone()));
        Ok(())
    }
}
