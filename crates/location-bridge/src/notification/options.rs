//! Notification options parsed from caller payloads.
//!
//! A payload names one of three content layouts and carries the layout's
//! fields as a JSON string under `notificationMetadata`.

use std::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value};
use strum::EnumString;

use super::channel::{NotificationChannel, VIBRATION_PATTERN};
use crate::dispatch::{DispatchError, Fields};
use crate::translate::{Importance, Visibility};

/// Channel used by the foreground notification until options change.
pub const DEFAULT_CHANNEL_ID: &str = "flutter_location_channel_01";

/// Display name of the default channel.
pub const DEFAULT_CHANNEL_NAME: &str = "Location background service";

/// Title of the default foreground notification.
pub const DEFAULT_NOTIFICATION_TITLE: &str = "Location background service running";

/// Icon used when none is supplied.
pub const DEFAULT_ICON_NAME: &str = "navigation_empty_icon";

/// Id under which the foreground notification is posted.
pub const FOREGROUND_NOTIFICATION_ID: i32 = 75418;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
enum NotificationKind {
    #[strum(serialize = "NotificationType.NORMAL", serialize = "NORMAL")]
    Normal,
    #[strum(serialize = "NotificationType.ARRIVAL", serialize = "ARRIVAL")]
    Arrival,
    #[strum(serialize = "NotificationType.TRAVEL", serialize = "TRAVEL")]
    Travel,
}

/// Content of an arrival notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalContent {
    /// Code of the stop being approached.
    pub stop_code: String,
    /// First line of text.
    pub top_message: String,
    /// Second line of text.
    pub bottom_message: String,
    /// Whether the vehicle is arriving now.
    pub arriving: bool,
    /// Vehicle plate, when known.
    pub plate: Option<String>,
}

impl ArrivalContent {
    /// First line as displayed, prefixed with the plate when present.
    #[must_use]
    pub fn top_line(&self) -> String {
        match self.plate.as_deref().filter(|plate| !plate.is_empty()) {
            Some(plate) => format!("{plate}: {}", self.top_message),
            None => self.top_message.clone(),
        }
    }
}

/// Kind of stop a trip is heading to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelMode {
    /// A rail station.
    Station,
    /// A bus stop.
    BusStop,
    /// Any other code; shown without a stop icon.
    Other(i64),
}

impl TravelMode {
    /// Decodes the caller's mode code.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Station,
            3 => Self::BusStop,
            other => Self::Other(other),
        }
    }
}

/// Content of a travel notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelContent {
    /// Code of the destination stop; empty when there is no destination.
    pub destination_code: String,
    /// Number of stops left, preformatted by the caller.
    pub destination_stops: String,
    /// Name of the destination stop.
    pub destination_name: String,
    /// First line of text.
    pub top_message: String,
    /// Suffix after the stop count (for pluralisation).
    pub destination_stops_suffix: String,
    /// Kind of destination stop.
    pub mode: TravelMode,
    /// Text shown when there is no destination.
    pub no_destination: String,
}

impl TravelContent {
    /// Returns `false` for the "no destination" layout.
    #[must_use]
    pub fn has_destination(&self) -> bool {
        !self.destination_code.is_empty()
    }
}

/// Content layouts a notification can use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationContent {
    /// Title and message.
    Normal {
        /// Title line.
        title: String,
        /// Body text.
        message: String,
    },
    /// Vehicle arrival at a stop.
    Arrival(ArrivalContent),
    /// Progress of a trip.
    Travel(TravelContent),
}

impl NotificationContent {
    fn parse(kind: NotificationKind, metadata: Fields<'_>) -> Result<Self, DispatchError> {
        match kind {
            NotificationKind::Normal => Ok(Self::Normal {
                title: owned(metadata.string("title")?),
                message: owned(metadata.string("message")?),
            }),
            NotificationKind::Arrival => Ok(Self::Arrival(ArrivalContent {
                stop_code: owned(metadata.string("stopCode")?),
                top_message: owned(metadata.string("topMessage")?),
                bottom_message: owned(metadata.string("bottomMessage")?),
                arriving: metadata.flag("arriving")?,
                plate: metadata.optional_string("plate")?.map(owned),
            })),
            NotificationKind::Travel => Ok(Self::Travel(TravelContent {
                destination_code: owned(metadata.string("destinationCode")?),
                destination_stops: owned(metadata.string("destinationStops")?),
                destination_name: owned(metadata.string("destinationName")?),
                top_message: owned(metadata.string("topMessage")?),
                destination_stops_suffix: owned(metadata.string("destinationStopsSuffix")?),
                mode: TravelMode::from_code(metadata.int("mode")?),
                no_destination: owned(metadata.string("noDestination")?),
            })),
        }
    }
}

fn owned(text: &str) -> String {
    text.to_owned()
}

/// A notification ready to be posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Platform notification id.
    pub id: i32,
    /// Channel the notification is posted to.
    pub channel_id: String,
    /// Small icon resource name.
    pub icon_name: String,
    /// Whether the notification is persistent.
    pub ongoing: bool,
    /// Whether posting vibrates.
    pub vibration_enabled: bool,
    /// Visible content.
    pub content: NotificationContent,
}

/// Identifiers of the foreground notification returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationMetadata {
    /// Channel of the foreground notification.
    pub channel_id: String,
    /// Id of the foreground notification.
    pub notification_id: i32,
}

/// Options describing one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationOptions {
    /// Persistent foreground-service notification rather than one-shot.
    pub ongoing: bool,
    /// Small icon resource name.
    pub icon_name: Option<String>,
    /// Channel to post to.
    pub channel_id: String,
    /// Channel display name, used when the bridge registers the channel.
    pub channel_name: String,
    /// Platform notification id.
    pub notification_id: i32,
    /// Channel importance, used when the bridge registers the channel.
    pub importance: Importance,
    /// Channel lock-screen visibility, used when the bridge registers it.
    pub visibility: Visibility,
    /// Whether the channel shows badges.
    pub show_badge: bool,
    /// Whether posting vibrates.
    pub vibration_enabled: bool,
    /// Visible content.
    pub content: NotificationContent,
}

impl Default for NotificationOptions {
    fn default() -> Self {
        Self {
            ongoing: true,
            icon_name: Some(DEFAULT_ICON_NAME.to_owned()),
            channel_id: DEFAULT_CHANNEL_ID.to_owned(),
            channel_name: DEFAULT_CHANNEL_NAME.to_owned(),
            notification_id: FOREGROUND_NOTIFICATION_ID,
            importance: Importance::None,
            visibility: Visibility::Private,
            show_badge: false,
            vibration_enabled: false,
            content: NotificationContent::Normal {
                title: DEFAULT_NOTIFICATION_TITLE.to_owned(),
                message: String::new(),
            },
        }
    }
}

impl NotificationOptions {
    /// Parses a `notificationData` payload. `icon_override` wins over the
    /// payload's own icon.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedNotificationType` for unknown types,
    /// `MissingMetadata` or `MalformedMetadata` for bad metadata, and
    /// `InvalidArguments` for missing or mistyped fields.
    pub fn from_payload(
        payload: Fields<'_>,
        icon_override: Option<&str>,
    ) -> Result<Self, DispatchError> {
        let kind_token = payload.string("notificationType")?;
        let kind = NotificationKind::from_str(kind_token)
            .map_err(|_| DispatchError::unsupported_notification_type(kind_token))?;

        let raw_metadata = payload
            .optional_string("notificationMetadata")?
            .ok_or(DispatchError::MissingMetadata)?;
        let metadata: Map<String, Value> = serde_json::from_str(raw_metadata)?;
        let content = NotificationContent::parse(kind, Fields::new(&metadata))?;

        let icon_name = match icon_override {
            Some(icon) => Some(icon.to_owned()),
            None => payload.optional_string("iconName")?.map(owned),
        };

        Ok(Self {
            ongoing: payload.flag("ongoing")?,
            icon_name,
            channel_id: owned(payload.string("channelId")?),
            channel_name: payload
                .optional_string("channelName")?
                .unwrap_or(DEFAULT_CHANNEL_NAME)
                .to_owned(),
            notification_id: payload.int32("notificationId")?,
            importance: payload
                .optional_string("importance")?
                .map_or(Importance::None, Importance::from_token),
            visibility: payload
                .optional_string("visibility")?
                .map_or(Visibility::Private, Visibility::from_token),
            show_badge: payload.optional_flag("showBadge")?.unwrap_or(false),
            vibration_enabled: payload.flag("notificationVibration")?,
            content,
        })
    }

    /// Returns `true` when the options target the default channel.
    #[must_use]
    pub fn uses_default_channel(&self) -> bool {
        self.channel_id == DEFAULT_CHANNEL_ID
    }

    /// Channel registered on the caller's behalf for these options.
    #[must_use]
    pub fn channel(&self) -> NotificationChannel {
        NotificationChannel {
            id: self.channel_id.clone(),
            name: self.channel_name.clone(),
            importance: self.importance,
            visibility: self.visibility,
            show_badge: self.show_badge,
            vibration_enabled: self.vibration_enabled,
            vibration_pattern: VIBRATION_PATTERN.to_vec(),
        }
    }

    /// Builds the notification to post.
    #[must_use]
    pub fn to_notification(&self) -> Notification {
        Notification {
            id: self.notification_id,
            channel_id: self.channel_id.clone(),
            icon_name: self
                .icon_name
                .clone()
                .filter(|icon| !icon.is_empty())
                .unwrap_or_else(|| DEFAULT_ICON_NAME.to_owned()),
            ongoing: self.ongoing,
            vibration_enabled: self.vibration_enabled,
            content: self.content.clone(),
        }
    }
}
