//! Asynchronous results delivered by the platform.
//!
//! Platform callbacks may fire on any thread. They post a [`PlatformEvent`]
//! through an [`EventSender`]; the bridge drains the queue on its command
//! thread so coordinator state is only ever touched there.

use std::sync::mpsc;

use serde::Serialize;
use thiserror::Error;

/// Which permission dialog produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionScope {
    /// The foreground location dialog.
    Foreground,
    /// The background location dialog.
    Background,
}

/// The user's answer to a permission dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionResponse {
    /// Permission was granted.
    Granted,
    /// Permission was refused.
    Denied {
        /// `false` once the user has asked never to be asked again.
        can_ask_again: bool,
    },
}

/// A single location fix.
///
/// Serialises with the keys callers expect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationFix {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Horizontal accuracy in metres.
    pub accuracy: f64,
    /// Vertical accuracy in metres.
    #[serde(rename = "verticalAccuracy")]
    pub vertical_accuracy: f64,
    /// Altitude in metres.
    pub altitude: f64,
    /// Speed in metres per second.
    pub speed: f64,
    /// Speed accuracy in metres per second.
    pub speed_accuracy: f64,
    /// Heading in degrees.
    pub heading: f64,
    /// Heading accuracy in degrees.
    #[serde(rename = "headingAccuracy")]
    pub heading_accuracy: f64,
    /// Milliseconds since the Unix epoch.
    pub time: f64,
    /// Whether the fix came from a mock provider.
    #[serde(rename = "isMock")]
    pub is_mock: bool,
    /// Provider that produced the fix.
    pub provider: String,
}

/// Results posted by platform callbacks.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// A permission dialog finished.
    PermissionResult {
        /// Dialog that finished.
        scope: PermissionScope,
        /// The user's answer.
        response: PermissionResponse,
    },
    /// A location fetch produced a fix.
    LocationFix(LocationFix),
    /// A location fetch failed.
    LocationFailed {
        /// Platform error code.
        code: String,
        /// Platform error message.
        message: String,
    },
    /// The location service request flow finished.
    ServiceResolved {
        /// Whether the service ended up switched on.
        enabled: bool,
    },
}

/// Returned when the bridge that owned the queue has been dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("the bridge is no longer receiving platform events")]
pub struct EventChannelClosed;

/// Cloneable handle for posting platform events.
#[derive(Debug, Clone)]
pub struct EventSender {
    inner: mpsc::Sender<PlatformEvent>,
}

impl EventSender {
    /// Posts an event for the bridge to handle on its next pump.
    ///
    /// # Errors
    ///
    /// Returns [`EventChannelClosed`] if the bridge has been dropped.
    pub fn send(&self, event: PlatformEvent) -> Result<(), EventChannelClosed> {
        self.inner.send(event).map_err(|_| EventChannelClosed)
    }

    /// Posts a permission dialog result.
    ///
    /// # Errors
    ///
    /// Returns [`EventChannelClosed`] if the bridge has been dropped.
    pub fn permission_result(
        &self,
        scope: PermissionScope,
        response: PermissionResponse,
    ) -> Result<(), EventChannelClosed> {
        self.send(PlatformEvent::PermissionResult { scope, response })
    }

    /// Posts a location fix.
    ///
    /// # Errors
    ///
    /// Returns [`EventChannelClosed`] if the bridge has been dropped.
    pub fn location_fix(&self, fix: LocationFix) -> Result<(), EventChannelClosed> {
        self.send(PlatformEvent::LocationFix(fix))
    }

    /// Posts a failed location fetch.
    ///
    /// # Errors
    ///
    /// Returns [`EventChannelClosed`] if the bridge has been dropped.
    pub fn location_failed(
        &self,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<(), EventChannelClosed> {
        self.send(PlatformEvent::LocationFailed {
            code: code.into(),
            message: message.into(),
        })
    }

    /// Posts the end of the service request flow.
    ///
    /// # Errors
    ///
    /// Returns [`EventChannelClosed`] if the bridge has been dropped.
    pub fn service_resolved(&self, enabled: bool) -> Result<(), EventChannelClosed> {
        self.send(PlatformEvent::ServiceResolved { enabled })
    }
}

/// Receiving end owned by the bridge.
#[derive(Debug)]
pub(crate) struct EventQueue {
    sender: mpsc::Sender<PlatformEvent>,
    receiver: mpsc::Receiver<PlatformEvent>,
}

impl EventQueue {
    pub(crate) fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    pub(crate) fn sender(&self) -> EventSender {
        EventSender {
            inner: self.sender.clone(),
        }
    }

    /// Takes every event queued so far without blocking.
    pub(crate) fn drain(&self) -> Vec<PlatformEvent> {
        self.receiver.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use serde_json::json;

    use super::*;

    #[test]
    fn events_cross_threads_in_order() {
        let queue = EventQueue::new();
        let sender = queue.sender();

        thread::spawn(move || {
            sender.service_resolved(true).expect("queue open");
            sender
                .location_failed("TIMEOUT", "no fix")
                .expect("queue open");
        })
        .join()
        .expect("sender thread");

        assert_eq!(
            queue.drain(),
            vec![
                PlatformEvent::ServiceResolved { enabled: true },
                PlatformEvent::LocationFailed {
                    code: "TIMEOUT".to_owned(),
                    message: "no fix".to_owned(),
                },
            ]
        );
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn sending_after_the_queue_is_gone_fails() {
        let sender = EventQueue::new().sender();
        assert_eq!(sender.service_resolved(false), Err(EventChannelClosed));
    }

    #[test]
    fn fixes_serialise_with_caller_keys() {
        let fix = LocationFix {
            latitude: 1.0,
            longitude: 2.0,
            accuracy: 3.0,
            vertical_accuracy: 4.0,
            altitude: 5.0,
            speed: 6.0,
            speed_accuracy: 7.0,
            heading: 8.0,
            heading_accuracy: 9.0,
            time: 10.0,
            is_mock: false,
            provider: "gps".to_owned(),
        };
        let encoded = serde_json::to_value(&fix).expect("serialise fix");
        assert_eq!(encoded["verticalAccuracy"], json!(4.0));
        assert_eq!(encoded["speed_accuracy"], json!(7.0));
        assert_eq!(encoded["headingAccuracy"], json!(9.0));
        assert_eq!(encoded["isMock"], json!(false));
    }
}
