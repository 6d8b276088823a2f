//! Error types for command handling failures.
//!
//! Handlers return [`DispatchError`] internally. At the handler boundary the
//! error is settled into a labeled [`Outcome`](super::Outcome) carrying the
//! command's [`ErrorCode`] and this error's display text.

use thiserror::Error;

use crate::platform::PlatformError;

/// Errors surfaced while handling a command.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Invalid or missing command arguments.
    #[error("invalid arguments: {message}")]
    InvalidArguments {
        /// Description of the offending argument.
        message: String,
    },

    /// The accuracy token is not in the accuracy table.
    #[error("unknown accuracy: {token}")]
    UnknownAccuracy {
        /// Accuracy token as received.
        token: String,
    },

    /// A platform subsystem required by the command is not attached.
    #[error("{subsystem} is not attached")]
    SubsystemUnavailable {
        /// Name of the missing subsystem.
        subsystem: &'static str,
    },

    /// The notification payload names a type the bridge cannot build.
    #[error("unsupported notification type: {kind}")]
    UnsupportedNotificationType {
        /// Notification type token as received.
        kind: String,
    },

    /// The notification payload carries no metadata.
    #[error("notification payload is missing its metadata")]
    MissingMetadata,

    /// The notification metadata is not valid JSON.
    #[error("malformed notification metadata: {0}")]
    MalformedMetadata(#[from] serde_json::Error),

    /// A platform collaborator reported a failure.
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),
}

impl DispatchError {
    /// Creates an invalid arguments error.
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            message: message.into(),
        }
    }

    /// Creates an invalid arguments error for a missing field.
    pub fn missing(field: &str) -> Self {
        Self::invalid_arguments(format!("missing required argument '{field}'"))
    }

    /// Creates an invalid arguments error for a field of the wrong type.
    pub fn wrong_type(field: &str, expected: &str) -> Self {
        Self::invalid_arguments(format!("argument '{field}' must be {expected}"))
    }

    /// Creates an unknown accuracy error.
    pub fn unknown_accuracy(token: impl Into<String>) -> Self {
        Self::UnknownAccuracy {
            token: token.into(),
        }
    }

    /// Creates a subsystem unavailable error.
    pub const fn subsystem_unavailable(subsystem: &'static str) -> Self {
        Self::SubsystemUnavailable { subsystem }
    }

    /// Creates an unsupported notification type error.
    pub fn unsupported_notification_type(kind: impl Into<String>) -> Self {
        Self::UnsupportedNotificationType { kind: kind.into() }
    }
}

/// Labels attached to error outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// `changeSettings` failed.
    ChangeSettingsError,
    /// The location service status could not be determined.
    ServiceStatusError,
    /// `changeNotificationOptions` failed.
    ChangeNotificationOptionsError,
    /// `createChannel` failed.
    CreateChannelError,
    /// `cancelNotification` failed.
    CancelNotificationError,
    /// The user denied location permission.
    PermissionDenied,
    /// The user denied location permission and asked not to be asked again.
    PermissionDeniedNeverAsk,
    /// The permission dialog could not be started.
    PermissionRequestError,
    /// The location fetch could not be started or failed.
    LocationError,
    /// Foreground collection could not be started.
    BackgroundModeError,
    /// A request of the same kind is already waiting for the platform.
    RequestPending,
    /// A newer request of the same kind replaced this one.
    RequestSuperseded,
}
