//! Test doubles and harness utilities shared by unit and behaviour tests.

mod config_loader;
mod logs;
mod platform;
mod reporter;
mod transport;
mod world;

pub use logs::{SharedBuffer, capture_logs};
pub use platform::{
    MockCenter, RecordingBackgroundService, RecordingLocation, RecordingNotificationCenter,
    RecordingPermissions, sample_fix,
};
pub use reporter::HealthEvent;
pub use transport::RecordingTransport;
pub use world::{BridgeWorld, world};
