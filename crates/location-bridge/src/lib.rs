//! Command bridge between a caller and the host platform's location and
//! notification subsystems.
//!
//! The caller sends named commands with loosely typed arguments; the
//! [`Bridge`] routes each to a coordinator and answers through a one-shot
//! [`Reply`]. Queries answer immediately. Requests gated on the user (a
//! permission dialog, switching the location service on) park their reply
//! until the platform reports back through an [`EventSender`], and
//! [`Bridge::pump_events`] resolves them on the command thread.
//!
//! How commands cross into the host, and how the platform subsystems are
//! implemented, is up to the embedding host: it implements the traits in
//! [`platform`] and drives the bridge through [`Bridge::dispatch`].
//!
//! ```no_run
//! use location_bridge::{Command, Outcome, Platform, Reply, bootstrap};
//!
//! fn serve(platform: Platform) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut bridge = bootstrap(platform)?;
//!     let (reply, outcome) = Reply::channel();
//!     bridge.dispatch(&Command::new("hasPermission"), reply);
//!     assert!(matches!(outcome.recv()?, Outcome::Success { .. }));
//!     Ok(())
//! }
//! ```

mod background;
mod bootstrap;
mod bridge;
mod capabilities;
mod dispatch;
mod events;
mod health;
mod lifecycle;
mod notification;
mod pending;
mod permission;
pub mod platform;
mod settings;
pub mod telemetry;
pub mod translate;

pub use background::{
    BACKGROUND_DISABLED, BACKGROUND_ENABLED, BackgroundModeCoordinator, BackgroundState,
};
pub use bootstrap::{
    BootstrapError, ConfigLoader, StaticConfigLoader, SystemConfigLoader, bootstrap,
    bootstrap_with,
};
pub use bridge::{Bridge, BridgeContext, BridgeOptions};
pub use capabilities::{
    BACKGROUND_PERMISSION_API_LEVEL, Capabilities, Capability, NOTIFICATION_CHANNELS_API_LEVEL,
    RUNTIME_PERMISSIONS_API_LEVEL,
};
pub use dispatch::{
    Command, CommandRouter, DispatchError, ErrorCode, Fields, Handler, Outcome, Reply,
};
pub use events::{
    EventChannelClosed, EventSender, LocationFix, PermissionResponse, PermissionScope,
    PlatformEvent,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use lifecycle::{Attachment, LifecycleGuard, TransportBinding};
pub use location_bridge_config::{Config, LogFormat, PendingConflictPolicy};
pub use notification::{
    ArrivalContent, DEFAULT_CHANNEL_ID, DEFAULT_CHANNEL_NAME, DEFAULT_ICON_NAME,
    DEFAULT_NOTIFICATION_TITLE, FOREGROUND_NOTIFICATION_ID, Notification, NotificationChannel,
    NotificationContent, NotificationCoordinator, NotificationMetadata, NotificationOptions,
    TravelContent, TravelMode, VIBRATION_PATTERN,
};
pub use pending::{PendingSlot, Registration, RequestKind};
pub use permission::{
    PERMISSION_DENIED, PERMISSION_DENIED_FOREVER, PERMISSION_GRANTED, PermissionCoordinator,
};
pub use platform::{
    BackgroundService, LocationSubsystem, NotificationCenter, PermissionPlatform,
    PermissionState, Platform, PlatformError,
};
pub use settings::{Settings, SettingsCoordinator};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use translate::{AccuracyLevel, Importance, LocationPriority, Visibility};

#[cfg(test)]
mod tests;
