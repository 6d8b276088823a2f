//! Handlers for the built-in commands.
//!
//! Synchronous handlers settle a `Result` at the boundary so every fault
//! becomes a labeled error outcome. Permission-gated handlers pass the reply
//! on to a coordinator, which resolves it when the platform answers.

use serde_json::Value;
use tracing::warn;

use super::arguments::Fields;
use super::command::Command;
use super::errors::{DispatchError, ErrorCode};
use super::outcome::Reply;
use super::router::{DISPATCH_TARGET, Handler};
use crate::bridge::BridgeContext;
use crate::permission::PermissionCoordinator;

pub(super) const DEFAULT_HANDLERS: &[(&str, Handler)] = &[
    ("changeSettings", change_settings),
    ("getLocation", get_location),
    ("hasPermission", has_permission),
    ("requestPermission", request_permission),
    ("serviceEnabled", service_enabled),
    ("requestService", request_service),
    ("isBackgroundModeEnabled", is_background_mode_enabled),
    ("enableBackgroundMode", enable_background_mode),
    ("changeNotificationOptions", change_notification_options),
    ("createChannel", create_channel),
    ("cancelNotification", cancel_notification),
];

fn change_settings(context: &mut BridgeContext, command: &Command, reply: Reply) {
    let result = apply_settings(context, command);
    reply.settle(
        ErrorCode::ChangeSettingsError,
        "location settings change failed",
        result,
    );
}

fn apply_settings(context: &mut BridgeContext, command: &Command) -> Result<Value, DispatchError> {
    let fields = command.fields();
    let accuracy = fields
        .value("accuracy")
        .ok_or_else(|| DispatchError::missing("accuracy"))?;
    let interval = fields.int("interval")?;
    let distance_filter = fields.number("distanceFilter")?;
    context.settings.change_settings(
        context.location.as_mut(),
        accuracy,
        interval,
        distance_filter,
    )?;
    Ok(Value::from(1))
}

fn get_location(context: &mut BridgeContext, _command: &Command, reply: Reply) {
    context
        .permissions
        .get_location(context.location.as_mut(), reply);
}

fn has_permission(context: &mut BridgeContext, _command: &Command, reply: Reply) {
    reply.success(i64::from(context.permissions.has_permission()));
}

fn request_permission(context: &mut BridgeContext, _command: &Command, reply: Reply) {
    context.permissions.request_permission(reply);
}

fn service_enabled(context: &mut BridgeContext, _command: &Command, reply: Reply) {
    let result = PermissionCoordinator::service_enabled(context.location.as_ref());
    reply.settle(
        ErrorCode::ServiceStatusError,
        "location service status unavailable",
        result,
    );
}

fn request_service(context: &mut BridgeContext, _command: &Command, reply: Reply) {
    context
        .permissions
        .request_service(context.location.as_mut(), reply);
}

fn is_background_mode_enabled(context: &mut BridgeContext, _command: &Command, reply: Reply) {
    reply.success(i64::from(context.background.is_background_mode_enabled()));
}

fn enable_background_mode(context: &mut BridgeContext, command: &Command, reply: Reply) {
    let enable = command.fields().optional_flag("enable").unwrap_or_else(|error| {
        warn!(target: DISPATCH_TARGET, %error, "ignoring malformed enable flag");
        None
    });
    context.background.enable_background_mode(
        enable,
        &mut context.permissions,
        &mut context.notifications,
        reply,
    );
}

fn change_notification_options(context: &mut BridgeContext, command: &Command, reply: Reply) {
    let result = apply_notification_options(context, command);
    reply.settle(
        ErrorCode::ChangeNotificationOptionsError,
        "notification options change failed",
        result,
    );
}

fn apply_notification_options(
    context: &mut BridgeContext,
    command: &Command,
) -> Result<Value, DispatchError> {
    let fields = command.fields();
    let payload = fields
        .value("notificationData")
        .and_then(Value::as_object)
        .map(Fields::new);
    let icon_override = fields.optional_string("iconName")?;
    context.notifications.change_notification_options(
        payload,
        icon_override,
        &mut context.background,
    )
}

fn create_channel(context: &mut BridgeContext, command: &Command, reply: Reply) {
    let result = command
        .fields()
        .optional_object("channelData")
        .and_then(|payload| context.notifications.create_channel(payload))
        .map(|()| Value::Bool(true));
    reply.settle(
        ErrorCode::CreateChannelError,
        "notification channel creation failed",
        result,
    );
}

fn cancel_notification(context: &mut BridgeContext, command: &Command, reply: Reply) {
    let result = command
        .fields()
        .int32("notificationId")
        .and_then(|id| context.notifications.cancel(id))
        .map(|()| Value::Bool(true));
    reply.settle(
        ErrorCode::CancelNotificationError,
        "notification cancellation failed",
        result,
    );
}
