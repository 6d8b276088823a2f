//! Notification and channel coordination.
//!
//! One-shot notifications are posted directly through the
//! [`NotificationCenter`]. Ongoing options describe the persistent
//! foreground-service notification and are handed to the
//! [`BackgroundModeCoordinator`], which owns that notification.

mod channel;
mod options;

pub use channel::{NotificationChannel, VIBRATION_PATTERN};
pub use options::{
    ArrivalContent, DEFAULT_CHANNEL_ID, DEFAULT_CHANNEL_NAME, DEFAULT_ICON_NAME,
    DEFAULT_NOTIFICATION_TITLE, FOREGROUND_NOTIFICATION_ID, Notification, NotificationContent,
    NotificationMetadata, NotificationOptions, TravelContent, TravelMode,
};

use serde_json::Value;
use tracing::debug;

use crate::background::BackgroundModeCoordinator;
use crate::capabilities::Capability;
use crate::dispatch::{DispatchError, Fields};
use crate::platform::NotificationCenter;

pub(crate) const NOTIFICATION_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::notification");

const NOTIFICATION_CENTER: &str = "notification center";

/// Builds, posts, and cancels notifications and registers channels.
pub struct NotificationCoordinator {
    center: Option<Box<dyn NotificationCenter>>,
    channels: Capability,
}

impl NotificationCoordinator {
    /// Creates a coordinator. `channels` reports whether the platform uses
    /// notification channels.
    #[must_use]
    pub fn new(center: Option<Box<dyn NotificationCenter>>, channels: Capability) -> Self {
        Self { center, channels }
    }

    /// Installs a notification center, returning the previous one.
    pub fn attach(
        &mut self,
        center: Box<dyn NotificationCenter>,
    ) -> Option<Box<dyn NotificationCenter>> {
        self.center.replace(center)
    }

    /// Removes the notification center.
    pub fn detach(&mut self) -> Option<Box<dyn NotificationCenter>> {
        self.center.take()
    }

    /// Returns `true` while a notification center is attached.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.center.is_some()
    }

    /// Applies a `changeNotificationOptions` payload.
    ///
    /// Returns the foreground notification's metadata for ongoing options
    /// while the service is in foreground mode, and `null` otherwise. A
    /// missing payload is a no-op.
    ///
    /// # Errors
    ///
    /// Returns parse errors from [`NotificationOptions::from_payload`],
    /// `SubsystemUnavailable` when the required subsystem is detached, and
    /// `Platform` for platform failures.
    pub fn change_notification_options(
        &mut self,
        payload: Option<Fields<'_>>,
        icon_override: Option<&str>,
        background: &mut BackgroundModeCoordinator,
    ) -> Result<Value, DispatchError> {
        let Some(payload) = payload else {
            debug!(
                target: NOTIFICATION_TARGET,
                "no notification payload supplied; nothing to change"
            );
            return Ok(Value::Null);
        };

        let options = NotificationOptions::from_payload(payload, icon_override)?;
        if options.ongoing {
            let metadata = background.change_notification_options(options, self)?;
            return match metadata {
                Some(metadata) => Ok(serde_json::to_value(metadata)?),
                None => Ok(Value::Null),
            };
        }

        self.post(&options)?;
        Ok(Value::Null)
    }

    /// Posts a one-shot notification.
    ///
    /// # Errors
    ///
    /// Returns `SubsystemUnavailable` without a notification center and
    /// `Platform` if posting fails.
    pub fn post(&mut self, options: &NotificationOptions) -> Result<(), DispatchError> {
        self.prepare_channel(options)?;
        let center = self.center_mut()?;
        center.notify(&options.to_notification())?;
        debug!(
            target: NOTIFICATION_TARGET,
            notification_id = options.notification_id,
            channel_id = %options.channel_id,
            "posted notification"
        );
        Ok(())
    }

    /// Registers the default channel before something is posted to it.
    ///
    /// Does nothing for other channels, on platforms without channels, or
    /// when no notification center is attached.
    ///
    /// # Errors
    ///
    /// Returns `Platform` if channel registration fails.
    pub fn prepare_channel(&mut self, options: &NotificationOptions) -> Result<(), DispatchError> {
        if !options.uses_default_channel() || !self.channels.is_supported() {
            return Ok(());
        }
        let Some(center) = self.center.as_mut() else {
            debug!(
                target: NOTIFICATION_TARGET,
                "no notification center; skipping default channel registration"
            );
            return Ok(());
        };
        center.create_channel(&options.channel())?;
        Ok(())
    }

    /// Cancels a posted notification.
    ///
    /// # Errors
    ///
    /// Returns `SubsystemUnavailable` without a notification center and
    /// `Platform` if cancelling fails.
    pub fn cancel(&mut self, id: i32) -> Result<(), DispatchError> {
        self.center_mut()?.cancel(id)?;
        debug!(target: NOTIFICATION_TARGET, notification_id = id, "cancelled notification");
        Ok(())
    }

    /// Registers a caller-defined channel.
    ///
    /// A missing payload, or a platform without channels, is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArguments` for malformed payloads,
    /// `SubsystemUnavailable` without a notification center, and `Platform`
    /// if registration fails.
    pub fn create_channel(&mut self, payload: Option<Fields<'_>>) -> Result<(), DispatchError> {
        let Some(payload) = payload else {
            return Ok(());
        };
        if !self.channels.is_supported() {
            debug!(
                target: NOTIFICATION_TARGET,
                "platform has no notification channels; ignoring channel"
            );
            return Ok(());
        }
        let channel = NotificationChannel::from_payload(payload)?;
        self.center_mut()?.create_channel(&channel)?;
        debug!(target: NOTIFICATION_TARGET, channel_id = %channel.id, "registered channel");
        Ok(())
    }

    fn center_mut(&mut self) -> Result<&mut (dyn NotificationCenter + 'static), DispatchError> {
        self.center
            .as_deref_mut()
            .ok_or_else(|| DispatchError::subsystem_unavailable(NOTIFICATION_CENTER))
    }
}

impl std::fmt::Debug for NotificationCoordinator {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("NotificationCoordinator")
            .field("attached", &self.is_attached())
            .field("channels", &self.channels)
            .finish()
    }
}
