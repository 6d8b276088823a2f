//! Platform capability detection.
//!
//! Coordinators consult [`Capabilities`] instead of comparing platform
//! versions themselves. Detection is driven by the platform API level and
//! can be adjusted with configured overrides.

use location_bridge_config::{CapabilityOverride, CapabilityOverrides, PlatformCapability};

/// First API level with runtime permission dialogs.
pub const RUNTIME_PERMISSIONS_API_LEVEL: u32 = 23;

/// First API level with notification channels.
pub const NOTIFICATION_CHANNELS_API_LEVEL: u32 = 26;

/// First API level with a separate background location grant.
pub const BACKGROUND_PERMISSION_API_LEVEL: u32 = 29;

/// Whether the platform offers a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The platform offers the capability.
    Supported,
    /// The platform lacks the capability.
    Unsupported,
}

impl Capability {
    const fn from_threshold(api_level: u32, threshold: u32) -> Self {
        if api_level >= threshold {
            Self::Supported
        } else {
            Self::Unsupported
        }
    }

    /// Returns `true` for [`Capability::Supported`].
    #[must_use]
    pub const fn is_supported(self) -> bool {
        matches!(self, Self::Supported)
    }

    const fn apply(self, directive: CapabilityOverride) -> Self {
        match directive {
            CapabilityOverride::Force => Self::Supported,
            CapabilityOverride::Deny => Self::Unsupported,
            CapabilityOverride::Allow => self,
        }
    }
}

/// Capabilities relevant to command handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Permissions are requested at runtime rather than granted at install.
    pub runtime_permissions: Capability,
    /// Background location is a grant of its own. When unsupported, the
    /// foreground grant implies it.
    pub background_permission: Capability,
    /// Notifications require a registered channel.
    pub notification_channels: Capability,
}

impl Capabilities {
    /// Detects capabilities from a platform API level.
    #[must_use]
    pub const fn detect(api_level: u32) -> Self {
        Self {
            runtime_permissions: Capability::from_threshold(
                api_level,
                RUNTIME_PERMISSIONS_API_LEVEL,
            ),
            background_permission: Capability::from_threshold(
                api_level,
                BACKGROUND_PERMISSION_API_LEVEL,
            ),
            notification_channels: Capability::from_threshold(
                api_level,
                NOTIFICATION_CHANNELS_API_LEVEL,
            ),
        }
    }

    /// Applies configured overrides on top of the detected values.
    #[must_use]
    pub fn with_overrides(self, overrides: &CapabilityOverrides) -> Self {
        Self {
            runtime_permissions: self
                .runtime_permissions
                .apply(overrides.override_for(PlatformCapability::RuntimePermissions)),
            background_permission: self
                .background_permission
                .apply(overrides.override_for(PlatformCapability::BackgroundPermission)),
            notification_channels: self
                .notification_channels
                .apply(overrides.override_for(PlatformCapability::NotificationChannels)),
        }
    }
}
