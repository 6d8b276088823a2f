//! Permission acquisition and permission-gated requests.
//!
//! The coordinator owns the continuations waiting on the foreground
//! permission dialog, on a location fix, and on the service request flow.
//! A single platform dialog serves every slot waiting on it.

use location_bridge_config::PendingConflictPolicy;
use serde_json::Value;
use tracing::{debug, warn};

use crate::capabilities::Capabilities;
use crate::dispatch::{DispatchError, ErrorCode, Outcome, Reply};
use crate::events::{LocationFix, PermissionResponse};
use crate::pending::{PendingSlot, Registration, RequestKind};
use crate::platform::{LocationSubsystem, PermissionPlatform, PermissionState, PlatformError};

pub(crate) const PERMISSION_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::permission");

/// `requestPermission` value for a grant.
pub const PERMISSION_GRANTED: i64 = 1;
/// `requestPermission` value for a denial.
pub const PERMISSION_DENIED: i64 = 0;
/// `requestPermission` value for a permanent denial.
pub const PERMISSION_DENIED_FOREVER: i64 = 2;

/// Correlates permission dialogs and location fetches with the commands
/// waiting on them.
pub struct PermissionCoordinator {
    platform: Box<dyn PermissionPlatform>,
    capabilities: Capabilities,
    location: PendingSlot,
    permission: PendingSlot,
    service: PendingSlot,
    dialog_in_flight: bool,
}

impl PermissionCoordinator {
    /// Creates a coordinator over the platform's permission model.
    #[must_use]
    pub fn new(
        platform: Box<dyn PermissionPlatform>,
        capabilities: Capabilities,
        policy: PendingConflictPolicy,
    ) -> Self {
        Self {
            platform,
            capabilities,
            location: PendingSlot::new(RequestKind::Location, policy),
            permission: PendingSlot::new(RequestKind::ForegroundPermission, policy),
            service: PendingSlot::new(RequestKind::ServiceRequest, policy),
            dialog_in_flight: false,
        }
    }

    /// Permission state reported by the platform.
    #[must_use]
    pub fn state(&self) -> PermissionState {
        self.platform.permission_state()
    }

    /// Reports whether location may be used in the foreground. Platforms
    /// without runtime permissions are never queried.
    #[must_use]
    pub fn has_permission(&self) -> bool {
        if !self.capabilities.runtime_permissions.is_supported() {
            return true;
        }
        self.state().is_granted()
    }

    /// Reports whether location may be used in the background.
    #[must_use]
    pub fn has_background_permission(&self) -> bool {
        if !self.capabilities.runtime_permissions.is_supported() {
            return true;
        }
        if self.capabilities.background_permission.is_supported() {
            self.state() == PermissionState::GrantedBackground
        } else {
            self.state().is_granted()
        }
    }

    /// Handles `requestPermission`.
    pub fn request_permission(&mut self, reply: Reply) {
        if !self.capabilities.runtime_permissions.is_supported() {
            reply.success(PERMISSION_GRANTED);
            return;
        }
        if self.permission.register(reply) != Registration::Stored {
            return;
        }
        if let Err(error) = self.open_foreground_dialog() {
            warn!(target: PERMISSION_TARGET, %error, "could not start the permission dialog");
            self.permission.resolve(Outcome::error(
                ErrorCode::PermissionRequestError,
                format!("could not request location permission: {error}"),
            ));
        }
    }

    /// Handles `getLocation`: fetches immediately when permitted, otherwise
    /// asks for permission first.
    pub fn get_location(&mut self, location: &mut dyn LocationSubsystem, reply: Reply) {
        if self.location.register(reply) != Registration::Stored {
            return;
        }
        if self.has_permission() {
            self.start_fetch(location);
        } else if let Err(error) = self.open_foreground_dialog() {
            warn!(target: PERMISSION_TARGET, %error, "could not start the permission dialog");
            self.location.resolve(Outcome::error(
                ErrorCode::PermissionRequestError,
                format!("could not request location permission: {error}"),
            ));
        }
    }

    /// Handles `serviceEnabled`.
    ///
    /// # Errors
    ///
    /// Returns `Platform` if the service state cannot be read.
    pub fn service_enabled(location: &dyn LocationSubsystem) -> Result<Value, DispatchError> {
        let enabled = location.service_enabled()?;
        Ok(Value::from(i64::from(enabled)))
    }

    /// Handles `requestService`.
    pub fn request_service(&mut self, location: &mut dyn LocationSubsystem, reply: Reply) {
        match location.service_enabled() {
            Ok(true) => {
                reply.success(1);
                return;
            }
            Ok(false) => {}
            Err(error) => {
                reply.error(
                    ErrorCode::ServiceStatusError,
                    format!("location service status unavailable: {error}"),
                );
                return;
            }
        }
        if self.service.register(reply) != Registration::Stored {
            return;
        }
        if let Err(error) = location.request_service() {
            self.service.resolve(Outcome::error(
                ErrorCode::ServiceStatusError,
                format!("could not request the location service: {error}"),
            ));
        }
    }

    /// Asks for the background grant on behalf of background mode.
    ///
    /// Where the platform has no separate background grant the foreground
    /// dialog is used instead.
    ///
    /// # Errors
    ///
    /// Returns the platform's error if the dialog cannot be started.
    pub fn request_background(&mut self) -> Result<(), PlatformError> {
        if self.capabilities.background_permission.is_supported() {
            self.platform.request_background()
        } else {
            self.open_foreground_dialog()
        }
    }

    /// Resolves everything waiting on the foreground dialog.
    pub fn on_foreground_result(
        &mut self,
        response: PermissionResponse,
        location: &mut dyn LocationSubsystem,
    ) {
        self.dialog_in_flight = false;
        debug!(target: PERMISSION_TARGET, ?response, "foreground permission result");
        match response {
            PermissionResponse::Granted => {
                if self.location.is_pending() {
                    self.start_fetch(location);
                }
                self.permission.resolve(Outcome::success(PERMISSION_GRANTED));
            }
            PermissionResponse::Denied {
                can_ask_again: false,
            } => {
                self.location.resolve(Outcome::error(
                    ErrorCode::PermissionDeniedNeverAsk,
                    "Location permission denied forever - please open app settings",
                ));
                self.permission
                    .resolve(Outcome::success(PERMISSION_DENIED_FOREVER));
            }
            PermissionResponse::Denied {
                can_ask_again: true,
            } => {
                self.location.resolve(Outcome::error(
                    ErrorCode::PermissionDenied,
                    "Location permission denied",
                ));
                self.permission.resolve(Outcome::success(PERMISSION_DENIED));
            }
        }
    }

    /// Resolves the waiting `getLocation` with a fix.
    pub fn on_location_fix(&mut self, fix: &LocationFix) {
        match serde_json::to_value(fix) {
            Ok(value) => {
                self.location.resolve(Outcome::success(value));
            }
            Err(error) => {
                self.location.resolve(Outcome::error(
                    ErrorCode::LocationError,
                    format!("could not encode the location fix: {error}"),
                ));
            }
        }
    }

    /// Resolves the waiting `getLocation` with the platform's failure.
    pub fn on_location_failed(&mut self, code: String, message: String) {
        self.location.resolve(Outcome::platform_error(code, message));
    }

    /// Resolves the waiting `requestService`.
    pub fn on_service_resolved(&mut self, enabled: bool) {
        self.service
            .resolve(Outcome::success(i64::from(enabled)));
    }

    /// Returns `true` while a request of `kind` is waiting.
    #[must_use]
    pub const fn is_pending(&self, kind: RequestKind) -> bool {
        match kind {
            RequestKind::Location => self.location.is_pending(),
            RequestKind::ForegroundPermission => self.permission.is_pending(),
            RequestKind::ServiceRequest => self.service.is_pending(),
            RequestKind::BackgroundPermission => false,
        }
    }

    fn open_foreground_dialog(&mut self) -> Result<(), PlatformError> {
        if self.dialog_in_flight {
            debug!(
                target: PERMISSION_TARGET,
                "permission dialog already open; waiting for its result"
            );
            return Ok(());
        }
        self.platform.request_foreground()?;
        self.dialog_in_flight = true;
        Ok(())
    }

    fn start_fetch(&mut self, location: &mut dyn LocationSubsystem) {
        if let Err(error) = location.start_location_fetch() {
            warn!(target: PERMISSION_TARGET, %error, "could not start the location fetch");
            self.location.resolve(Outcome::error(
                ErrorCode::LocationError,
                format!("could not start the location fetch: {error}"),
            ));
        }
    }
}

impl std::fmt::Debug for PermissionCoordinator {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("PermissionCoordinator")
            .field("capabilities", &self.capabilities)
            .field("location", &self.location)
            .field("permission", &self.permission)
            .field("service", &self.service)
            .field("dialog_in_flight", &self.dialog_in_flight)
            .finish_non_exhaustive()
    }
}
