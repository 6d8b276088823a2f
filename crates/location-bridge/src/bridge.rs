//! The bridge: command entry point and platform event pump.

use location_bridge_config::{Config, PendingConflictPolicy};
use tracing::debug;

use crate::background::BackgroundModeCoordinator;
use crate::capabilities::Capabilities;
use crate::dispatch::{Command, CommandRouter, Handler, Reply};
use crate::events::{EventQueue, EventSender, PermissionScope, PlatformEvent};
use crate::lifecycle::{Attachment, LifecycleGuard, TransportBinding};
use crate::notification::NotificationCoordinator;
use crate::permission::PermissionCoordinator;
use crate::platform::{BackgroundService, LocationSubsystem, NotificationCenter, Platform};
use crate::settings::SettingsCoordinator;

const BRIDGE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::bridge");

/// Options fixed when a bridge is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeOptions {
    /// Capabilities after overrides.
    pub capabilities: Capabilities,
    /// Behaviour for a second request of a kind already waiting.
    pub pending_conflict: PendingConflictPolicy,
}

impl BridgeOptions {
    /// Detects capabilities for `api_level` and applies the configured
    /// overrides and conflict policy.
    #[must_use]
    pub fn from_config(api_level: u32, config: &Config) -> Self {
        Self {
            capabilities: Capabilities::detect(api_level)
                .with_overrides(&config.capability_overrides()),
            pending_conflict: config.pending_conflict(),
        }
    }
}

/// State handed to command handlers. Each coordinator owns its own state.
pub struct BridgeContext {
    pub(crate) capabilities: Capabilities,
    pub(crate) location: Box<dyn LocationSubsystem>,
    pub(crate) settings: SettingsCoordinator,
    pub(crate) permissions: PermissionCoordinator,
    pub(crate) background: BackgroundModeCoordinator,
    pub(crate) notifications: NotificationCoordinator,
}

impl BridgeContext {
    fn new(platform: Platform, options: BridgeOptions) -> Self {
        let Platform {
            location,
            permissions,
            notifications,
            ..
        } = platform;
        Self {
            capabilities: options.capabilities,
            location,
            settings: SettingsCoordinator::new(),
            permissions: PermissionCoordinator::new(
                permissions,
                options.capabilities,
                options.pending_conflict,
            ),
            background: BackgroundModeCoordinator::new(options.pending_conflict),
            notifications: NotificationCoordinator::new(
                notifications,
                options.capabilities.notification_channels,
            ),
        }
    }

    /// Capabilities the bridge was built with.
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Settings coordinator.
    #[must_use]
    pub const fn settings(&self) -> &SettingsCoordinator {
        &self.settings
    }

    /// Permission coordinator.
    #[must_use]
    pub const fn permissions(&self) -> &PermissionCoordinator {
        &self.permissions
    }

    /// Background mode coordinator.
    #[must_use]
    pub const fn background(&self) -> &BackgroundModeCoordinator {
        &self.background
    }

    /// Notification coordinator.
    #[must_use]
    pub const fn notifications(&self) -> &NotificationCoordinator {
        &self.notifications
    }

    /// Location subsystem, for handlers registered by the host.
    pub fn location_mut(&mut self) -> &mut dyn LocationSubsystem {
        self.location.as_mut()
    }

    fn handle_event(&mut self, event: PlatformEvent) {
        match event {
            PlatformEvent::PermissionResult {
                scope: PermissionScope::Foreground,
                response,
            } => {
                self.permissions
                    .on_foreground_result(response, self.location.as_mut());
                if !self.capabilities.background_permission.is_supported() {
                    self.background
                        .on_permission_result(response, &mut self.notifications);
                }
            }
            PlatformEvent::PermissionResult {
                scope: PermissionScope::Background,
                response,
            } => {
                self.background
                    .on_permission_result(response, &mut self.notifications);
            }
            PlatformEvent::LocationFix(fix) => self.permissions.on_location_fix(&fix),
            PlatformEvent::LocationFailed { code, message } => {
                self.permissions.on_location_failed(code, message);
            }
            PlatformEvent::ServiceResolved { enabled } => {
                self.permissions.on_service_resolved(enabled);
            }
        }
    }
}

impl std::fmt::Debug for BridgeContext {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("BridgeContext")
            .field("capabilities", &self.capabilities)
            .field("settings", &self.settings)
            .field("permissions", &self.permissions)
            .field("background", &self.background)
            .field("notifications", &self.notifications)
            .finish_non_exhaustive()
    }
}

/// Routes commands to coordinators and feeds them platform results.
///
/// All methods run on the command thread. Platform callbacks on other
/// threads post through [`Bridge::event_sender`]; call
/// [`Bridge::pump_events`] on the command thread to apply them.
#[derive(Debug)]
pub struct Bridge {
    context: BridgeContext,
    router: CommandRouter,
    events: EventQueue,
    lifecycle: LifecycleGuard,
}

impl Bridge {
    /// Builds a bridge serving the built-in commands.
    #[must_use]
    pub fn new(platform: Platform, options: BridgeOptions) -> Self {
        debug!(
            target: BRIDGE_TARGET,
            api_level = platform.api_level,
            capabilities = ?options.capabilities,
            policy = %options.pending_conflict,
            "building bridge"
        );
        Self {
            context: BridgeContext::new(platform, options),
            router: CommandRouter::with_default_handlers(),
            events: EventQueue::new(),
            lifecycle: LifecycleGuard::new(),
        }
    }

    /// Builds a bridge configured from `config`.
    #[must_use]
    pub fn from_config(platform: Platform, config: &Config) -> Self {
        let options = BridgeOptions::from_config(platform.api_level, config);
        Self::new(platform, options)
    }

    /// Dispatches one command. The outcome arrives through `reply`, possibly
    /// after later calls to [`Bridge::pump_events`].
    pub fn dispatch(&mut self, command: &Command, reply: Reply) {
        self.router.route(&mut self.context, command, reply);
    }

    /// Registers or replaces a command handler.
    pub fn register_command(&mut self, name: &'static str, handler: Handler) -> Option<Handler> {
        self.router.register(name, handler)
    }

    /// Handle for posting platform events from any thread.
    #[must_use]
    pub fn event_sender(&self) -> EventSender {
        self.events.sender()
    }

    /// Applies every queued platform event. Returns how many were applied.
    pub fn pump_events(&mut self) -> usize {
        let events = self.events.drain();
        let count = events.len();
        for event in events {
            self.context.handle_event(event);
        }
        count
    }

    /// Attaches the bridge to a transport, releasing any previous binding.
    pub fn attach_transport(&mut self, binding: Box<dyn TransportBinding>) -> Attachment {
        self.lifecycle.attach(binding)
    }

    /// Detaches the bridge from its transport.
    pub fn detach_transport(&mut self) -> bool {
        self.lifecycle.detach()
    }

    /// Returns `true` while a transport binding is attached.
    #[must_use]
    pub const fn is_transport_attached(&self) -> bool {
        self.lifecycle.is_attached()
    }

    /// Attaches the background service once the host has bound to it.
    pub fn attach_background_service(
        &mut self,
        service: Box<dyn BackgroundService>,
    ) -> Option<Box<dyn BackgroundService>> {
        debug!(target: BRIDGE_TARGET, "background service attached");
        self.context.background.attach(service)
    }

    /// Detaches the background service.
    pub fn detach_background_service(&mut self) -> Option<Box<dyn BackgroundService>> {
        debug!(target: BRIDGE_TARGET, "background service detached");
        self.context.background.detach()
    }

    /// Attaches a notification center.
    pub fn attach_notification_center(
        &mut self,
        center: Box<dyn NotificationCenter>,
    ) -> Option<Box<dyn NotificationCenter>> {
        self.context.notifications.attach(center)
    }

    /// Detaches the notification center.
    pub fn detach_notification_center(&mut self) -> Option<Box<dyn NotificationCenter>> {
        self.context.notifications.detach()
    }

    /// Read access to coordinator state.
    #[must_use]
    pub const fn context(&self) -> &BridgeContext {
        &self.context
    }
}
