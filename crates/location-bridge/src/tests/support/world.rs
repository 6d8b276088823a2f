//! BDD test world: a bridge over recording doubles plus the outcomes of
//! every command dispatched during a scenario.

use std::cell::RefCell;
use std::sync::Arc;
use std::sync::mpsc::Receiver;

use location_bridge_config::PendingConflictPolicy;

use crate::bootstrap::{ConfigLoader, StaticConfigLoader, bootstrap_with};
use crate::bridge::{Bridge, BridgeOptions};
use crate::capabilities::Capabilities;
use crate::dispatch::{Command, Outcome, Reply};
use crate::events::PlatformEvent;
use crate::platform::Platform;

use super::config_loader::{FailingConfigLoader, test_config};
use super::platform::{
    RecordingBackgroundService, RecordingLocation, RecordingNotificationCenter,
    RecordingPermissions,
};
use super::reporter::RecordingHealthReporter;

struct Dispatched {
    receiver: Receiver<Outcome>,
    outcome: Option<Outcome>,
}

/// Scenario world shared across BDD steps.
pub struct BridgeWorld {
    api_level: u32,
    policy: PendingConflictPolicy,
    attach_service: bool,
    pub location: RecordingLocation,
    pub permissions: RecordingPermissions,
    pub service: RecordingBackgroundService,
    pub center: RecordingNotificationCenter,
    pub reporter: Arc<RecordingHealthReporter>,
    bridge: Option<Bridge>,
    bootstrap_error: Option<String>,
    dispatched: Vec<Dispatched>,
}

impl BridgeWorld {
    /// Builds a world for a modern platform with every subsystem attached.
    #[must_use]
    pub fn new() -> Self {
        Self {
            api_level: 30,
            policy: PendingConflictPolicy::Reject,
            attach_service: true,
            location: RecordingLocation::default(),
            permissions: RecordingPermissions::default(),
            service: RecordingBackgroundService::default(),
            center: RecordingNotificationCenter::default(),
            reporter: Arc::new(RecordingHealthReporter::default()),
            bridge: None,
            bootstrap_error: None,
            dispatched: Vec::new(),
        }
    }

    /// Sets the platform API level; must precede the first command.
    pub fn set_api_level(&mut self, api_level: u32) {
        self.api_level = api_level;
        self.bridge = None;
    }

    /// Sets the conflict policy; must precede the first command.
    pub fn set_policy(&mut self, policy: PendingConflictPolicy) {
        self.policy = policy;
        self.bridge = None;
    }

    /// Leaves the background service unattached.
    pub fn without_background_service(&mut self) {
        self.attach_service = false;
        self.bridge = None;
    }

    fn platform(&self) -> Platform {
        Platform {
            api_level: self.api_level,
            location: Box::new(self.location.clone()),
            permissions: Box::new(self.permissions.clone()),
            notifications: Some(Box::new(self.center.clone())),
        }
    }

    /// Runs the bootstrap sequence with a loader that succeeds or fails.
    pub fn bootstrap(&mut self, succeed: bool) {
        let loader: Box<dyn ConfigLoader> = if succeed {
            Box::new(StaticConfigLoader::new(test_config()))
        } else {
            Box::new(FailingConfigLoader)
        };
        let platform = self.platform();
        match bootstrap_with(loader.as_ref(), self.reporter.clone(), platform) {
            Ok(bridge) => {
                self.bridge = Some(bridge);
                self.bootstrap_error = None;
            }
            Err(error) => {
                self.bridge = None;
                self.bootstrap_error = Some(error.to_string());
            }
        }
    }

    /// Error reported by the last bootstrap, if any.
    #[must_use]
    pub fn bootstrap_error(&self) -> Option<&str> {
        self.bootstrap_error.as_deref()
    }

    /// Returns `true` once a bridge exists.
    #[must_use]
    pub const fn has_bridge(&self) -> bool {
        self.bridge.is_some()
    }

    /// The bridge, built on first use.
    pub fn bridge(&mut self) -> &mut Bridge {
        if self.bridge.is_none() {
            let options = BridgeOptions {
                capabilities: Capabilities::detect(self.api_level),
                pending_conflict: self.policy,
            };
            let mut built = Bridge::new(self.platform(), options);
            if self.attach_service {
                built.attach_background_service(Box::new(self.service.clone()));
            }
            self.bridge = Some(built);
        }
        self.bridge.as_mut().expect("bridge built above")
    }

    /// Dispatches `command` and keeps its reply for later assertions.
    pub fn dispatch(&mut self, command: &Command) {
        let (reply, receiver) = Reply::channel();
        self.bridge().dispatch(command, reply);
        self.dispatched.push(Dispatched {
            receiver,
            outcome: None,
        });
    }

    /// Posts a platform event and pumps it.
    pub fn deliver(&mut self, event: PlatformEvent) {
        let bridge = self.bridge();
        bridge.event_sender().send(event).expect("bridge alive");
        bridge.pump_events();
    }

    /// Outcome of the command dispatched `index`-th, if resolved.
    pub fn outcome(&mut self, index: usize) -> Option<Outcome> {
        let dispatched = self.dispatched.get_mut(index)?;
        if dispatched.outcome.is_none() {
            dispatched.outcome = dispatched.receiver.try_recv().ok();
        }
        dispatched.outcome.clone()
    }

    /// Outcome of the most recent command, if resolved.
    pub fn latest_outcome(&mut self) -> Option<Outcome> {
        let index = self.dispatched.len().checked_sub(1)?;
        self.outcome(index)
    }
}

impl Default for BridgeWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Default test world fixture.
#[must_use]
pub fn world() -> RefCell<BridgeWorld> {
    RefCell::new(BridgeWorld::new())
}
