//! Background collection state machine.
//!
//! Enabling background mode promotes the background service to a
//! foreground service showing the persistent notification. Enabling
//! without the background grant first asks for it; the pending command is
//! resolved when the platform reports the answer.

use location_bridge_config::PendingConflictPolicy;
use tracing::{debug, info, warn};

use crate::dispatch::{DispatchError, ErrorCode, Outcome, Reply};
use crate::events::PermissionResponse;
use crate::notification::{
    FOREGROUND_NOTIFICATION_ID, Notification, NotificationCoordinator, NotificationMetadata,
    NotificationOptions,
};
use crate::pending::{PendingSlot, Registration, RequestKind};
use crate::permission::PermissionCoordinator;
use crate::platform::BackgroundService;

pub(crate) const BACKGROUND_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::background");

const BACKGROUND_SERVICE: &str = "background service";

/// Reported when background mode is on.
pub const BACKGROUND_ENABLED: i64 = 1;
/// Reported when background mode is off or the request was a no-op.
pub const BACKGROUND_DISABLED: i64 = 0;

/// States of background collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackgroundState {
    /// Nothing has been requested yet.
    #[default]
    Idle,
    /// Waiting for the background permission dialog.
    PermissionPending,
    /// Collecting in foreground-service mode.
    Active,
    /// Collection was stopped or refused.
    Inactive,
}

/// Drives background collection and owns the foreground notification.
pub struct BackgroundModeCoordinator {
    service: Option<Box<dyn BackgroundService>>,
    state: BackgroundState,
    pending: PendingSlot,
    dialog_in_flight: bool,
    foreground: NotificationOptions,
}

impl BackgroundModeCoordinator {
    /// Creates a coordinator with no service attached.
    #[must_use]
    pub fn new(policy: PendingConflictPolicy) -> Self {
        Self {
            service: None,
            state: BackgroundState::Idle,
            pending: PendingSlot::new(RequestKind::BackgroundPermission, policy),
            dialog_in_flight: false,
            foreground: NotificationOptions::default(),
        }
    }

    /// Attaches the background service, returning the previous one.
    pub fn attach(
        &mut self,
        service: Box<dyn BackgroundService>,
    ) -> Option<Box<dyn BackgroundService>> {
        self.service.replace(service)
    }

    /// Detaches the background service.
    pub fn detach(&mut self) -> Option<Box<dyn BackgroundService>> {
        self.service.take()
    }

    /// Returns `true` while a background service is attached.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.service.is_some()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> BackgroundState {
        self.state
    }

    /// Returns `true` while an `enableBackgroundMode` waits for permission.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_pending()
    }

    /// Options of the persistent foreground notification.
    #[must_use]
    pub const fn foreground_options(&self) -> &NotificationOptions {
        &self.foreground
    }

    /// Handles `isBackgroundModeEnabled`.
    #[must_use]
    pub fn is_background_mode_enabled(&self) -> bool {
        self.service
            .as_ref()
            .is_some_and(|service| service.is_foreground())
    }

    /// Handles `enableBackgroundMode`.
    pub fn enable_background_mode(
        &mut self,
        enable: Option<bool>,
        permissions: &mut PermissionCoordinator,
        notifications: &mut NotificationCoordinator,
        reply: Reply,
    ) {
        let Some(enable) = enable else {
            debug!(target: BACKGROUND_TARGET, "enable flag unspecified; nothing to do");
            reply.success(BACKGROUND_DISABLED);
            return;
        };
        if self.service.is_none() {
            debug!(target: BACKGROUND_TARGET, "no background service attached; nothing to do");
            reply.success(BACKGROUND_DISABLED);
            return;
        }

        if !enable {
            self.disable();
            reply.success(BACKGROUND_DISABLED);
            return;
        }

        if permissions.has_background_permission() {
            match self.start(notifications) {
                Ok(()) => reply.success(BACKGROUND_ENABLED),
                Err(error) => reply.error(
                    ErrorCode::BackgroundModeError,
                    format!("could not start background collection: {error}"),
                ),
            }
            return;
        }

        if self.pending.register(reply) == Registration::Rejected {
            return;
        }
        self.state = BackgroundState::PermissionPending;
        if self.dialog_in_flight {
            debug!(
                target: BACKGROUND_TARGET,
                "background permission dialog already open; waiting for its result"
            );
            return;
        }
        self.dialog_in_flight = true;
        if let Err(error) = permissions.request_background() {
            warn!(target: BACKGROUND_TARGET, %error, "could not request background permission");
            self.dialog_in_flight = false;
            self.state = BackgroundState::Inactive;
            self.pending.resolve(Outcome::error(
                ErrorCode::PermissionRequestError,
                format!("could not request background permission: {error}"),
            ));
        }
    }

    /// Resolves a waiting `enableBackgroundMode` from a permission result.
    pub fn on_permission_result(
        &mut self,
        response: PermissionResponse,
        notifications: &mut NotificationCoordinator,
    ) {
        self.dialog_in_flight = false;
        if self.state == BackgroundState::PermissionPending {
            self.state = BackgroundState::Inactive;
        }
        if !self.pending.is_pending() {
            debug!(target: BACKGROUND_TARGET, "no background request waiting for permission");
            return;
        }

        let outcome = match response {
            PermissionResponse::Granted => match self.start(notifications) {
                Ok(()) => Outcome::success(BACKGROUND_ENABLED),
                Err(error) => Outcome::error(
                    ErrorCode::BackgroundModeError,
                    format!("could not start background collection: {error}"),
                ),
            },
            PermissionResponse::Denied {
                can_ask_again: false,
            } => Outcome::error(
                ErrorCode::PermissionDeniedNeverAsk,
                "Background location permission denied forever - please open app settings",
            ),
            PermissionResponse::Denied {
                can_ask_again: true,
            } => Outcome::error(
                ErrorCode::PermissionDenied,
                "Background location permission denied",
            ),
        };
        self.pending.resolve(outcome);
    }

    /// Stores ongoing notification options as the foreground notification.
    ///
    /// Returns the foreground notification's identifiers when the service is
    /// in foreground mode, after refreshing the visible notification.
    ///
    /// # Errors
    ///
    /// Returns `SubsystemUnavailable` without a background service and
    /// `Platform` if refreshing the notification fails.
    pub fn change_notification_options(
        &mut self,
        options: NotificationOptions,
        notifications: &mut NotificationCoordinator,
    ) -> Result<Option<NotificationMetadata>, DispatchError> {
        let service = self
            .service
            .as_mut()
            .ok_or_else(|| DispatchError::subsystem_unavailable(BACKGROUND_SERVICE))?;
        self.foreground = options;
        if !service.is_foreground() {
            return Ok(None);
        }
        notifications.prepare_channel(&self.foreground)?;
        service.update_notification(&foreground_notification(&self.foreground))?;
        Ok(Some(NotificationMetadata {
            channel_id: self.foreground.channel_id.clone(),
            notification_id: FOREGROUND_NOTIFICATION_ID,
        }))
    }

    fn start(&mut self, notifications: &mut NotificationCoordinator) -> Result<(), DispatchError> {
        let service = self
            .service
            .as_mut()
            .ok_or_else(|| DispatchError::subsystem_unavailable(BACKGROUND_SERVICE))?;
        if service.is_foreground() {
            info!(target: BACKGROUND_TARGET, "background collection already running");
            self.state = BackgroundState::Active;
            return Ok(());
        }
        notifications.prepare_channel(&self.foreground)?;
        service.start_foreground(&foreground_notification(&self.foreground))?;
        self.state = BackgroundState::Active;
        info!(target: BACKGROUND_TARGET, "background collection started");
        Ok(())
    }

    fn disable(&mut self) {
        if self.pending.resolve(Outcome::success(BACKGROUND_DISABLED)) {
            debug!(
                target: BACKGROUND_TARGET,
                "background mode disabled while waiting for permission"
            );
        }
        if let Some(service) = self.service.as_mut() {
            if let Err(error) = service.stop_foreground() {
                warn!(
                    target: BACKGROUND_TARGET,
                    %error,
                    "stopping background collection failed"
                );
            }
        }
        self.state = BackgroundState::Inactive;
        info!(target: BACKGROUND_TARGET, "background collection stopped");
    }
}

/// The persistent notification always uses the foreground id, whatever id
/// the options carry.
fn foreground_notification(options: &NotificationOptions) -> Notification {
    let mut notification = options.to_notification();
    notification.id = FOREGROUND_NOTIFICATION_ID;
    notification
}

impl std::fmt::Debug for BackgroundModeCoordinator {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("BackgroundModeCoordinator")
            .field("attached", &self.is_attached())
            .field("state", &self.state)
            .field("pending", &self.pending)
            .field("dialog_in_flight", &self.dialog_in_flight)
            .finish_non_exhaustive()
    }
}
