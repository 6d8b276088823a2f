//! Notification channel definitions.

use crate::dispatch::{DispatchError, Fields};
use crate::translate::{Importance, Visibility};

/// Vibration pattern applied to every channel the bridge registers.
pub const VIBRATION_PATTERN: [i64; 6] = [200, 500, 200, 500, 200, 500];

/// A platform notification channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationChannel {
    /// Channel identifier.
    pub id: String,
    /// User-visible channel name.
    pub name: String,
    /// Importance of notifications posted to the channel.
    pub importance: Importance,
    /// Lock-screen visibility.
    pub visibility: Visibility,
    /// Whether notifications show a launcher badge.
    pub show_badge: bool,
    /// Whether notifications vibrate.
    pub vibration_enabled: bool,
    /// Vibration pattern in milliseconds, alternating wait and vibrate.
    pub vibration_pattern: Vec<i64>,
}

impl NotificationChannel {
    /// Builds a channel from a `createChannel` payload.
    ///
    /// Unknown importance or visibility tokens fall back to the least
    /// intrusive level.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArguments` when the id or name is missing, or a flag
    /// is malformed.
    pub fn from_payload(payload: Fields<'_>) -> Result<Self, DispatchError> {
        let importance = payload
            .optional_string("channelImportance")?
            .map(Importance::from_token)
            .unwrap_or_default();
        let visibility = payload
            .optional_string("channelVisibility")?
            .map(Visibility::from_token)
            .unwrap_or_default();

        Ok(Self {
            id: payload.string("channelId")?.to_owned(),
            name: payload.string("channelName")?.to_owned(),
            importance,
            visibility,
            show_badge: payload.optional_flag("channelShowBadge")?.unwrap_or(false),
            vibration_enabled: payload
                .optional_flag("channelVibrationEnabled")?
                .unwrap_or(false),
            vibration_pattern: VIBRATION_PATTERN.to_vec(),
        })
    }
}
