//! Single-occupancy slots for requests waiting on the platform.
//!
//! Each asynchronous flow (a location fetch, a permission dialog, the
//! service request) holds at most one continuation. What happens to a second
//! request while the first is outstanding is governed by
//! [`PendingConflictPolicy`]; either way, no continuation is ever dropped
//! without being resolved.

use location_bridge_config::PendingConflictPolicy;
use strum::Display;
use tracing::{debug, info};

use crate::dispatch::{ErrorCode, Outcome, Reply};

const PENDING_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::pending");

/// Kinds of request that wait for the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum RequestKind {
    /// A single location fix.
    Location,
    /// The foreground permission dialog.
    ForegroundPermission,
    /// The background permission dialog.
    BackgroundPermission,
    /// The location service request flow.
    ServiceRequest,
}

/// What happened when a continuation was registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The slot was empty; the caller should start the platform flow.
    Stored,
    /// An older continuation was resolved with `REQUEST_SUPERSEDED`; the
    /// platform flow is already running.
    Superseded,
    /// The newcomer was resolved with `REQUEST_PENDING` and not stored.
    Rejected,
}

/// Slot holding at most one waiting continuation.
#[derive(Debug)]
pub struct PendingSlot {
    kind: RequestKind,
    policy: PendingConflictPolicy,
    reply: Option<Reply>,
}

impl PendingSlot {
    /// Creates an empty slot.
    #[must_use]
    pub const fn new(kind: RequestKind, policy: PendingConflictPolicy) -> Self {
        Self {
            kind,
            policy,
            reply: None,
        }
    }

    /// Stores `reply`, applying the conflict policy when the slot is taken.
    pub fn register(&mut self, reply: Reply) -> Registration {
        let Some(previous) = self.reply.take() else {
            self.reply = Some(reply);
            return Registration::Stored;
        };

        match self.policy {
            PendingConflictPolicy::Reject => {
                self.reply = Some(previous);
                info!(
                    target: PENDING_TARGET,
                    kind = %self.kind,
                    "rejecting request while another is outstanding"
                );
                reply.error(
                    ErrorCode::RequestPending,
                    format!("a {} request is already waiting for the platform", self.kind),
                );
                Registration::Rejected
            }
            PendingConflictPolicy::Supersede => {
                info!(
                    target: PENDING_TARGET,
                    kind = %self.kind,
                    "superseding outstanding request"
                );
                previous.error(
                    ErrorCode::RequestSuperseded,
                    format!("superseded by a newer {} request", self.kind),
                );
                self.reply = Some(reply);
                Registration::Superseded
            }
        }
    }

    /// Resolves the waiting continuation, if any. Returns whether one was
    /// waiting.
    pub fn resolve(&mut self, outcome: Outcome) -> bool {
        if let Some(reply) = self.reply.take() {
            reply.send(outcome);
            true
        } else {
            debug!(
                target: PENDING_TARGET,
                kind = %self.kind,
                "no continuation waiting; result ignored"
            );
            false
        }
    }

    /// Returns `true` while a continuation is waiting.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.reply.is_some()
    }

    /// The kind of request this slot holds.
    #[must_use]
    pub const fn kind(&self) -> RequestKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn stores_into_an_empty_slot() {
        let mut slot = PendingSlot::new(RequestKind::Location, PendingConflictPolicy::Reject);
        let (reply, receiver) = Reply::channel();

        assert_eq!(slot.register(reply), Registration::Stored);
        assert!(slot.is_pending());
        assert!(receiver.try_recv().is_err());

        assert!(slot.resolve(Outcome::success(1)));
        assert_eq!(receiver.try_recv().expect("outcome"), Outcome::success(1));
        assert!(!slot.is_pending());
    }

    #[test]
    fn reject_answers_the_newcomer() {
        let mut slot = PendingSlot::new(
            RequestKind::ForegroundPermission,
            PendingConflictPolicy::Reject,
        );
        let (first, first_rx) = Reply::channel();
        let (second, second_rx) = Reply::channel();

        slot.register(first);
        assert_eq!(slot.register(second), Registration::Rejected);

        let rejected = second_rx.try_recv().expect("newcomer answered");
        assert_eq!(rejected.error_code(), Some("REQUEST_PENDING"));
        assert!(first_rx.try_recv().is_err());

        slot.resolve(Outcome::success(1));
        assert_eq!(first_rx.try_recv().expect("original"), Outcome::success(1));
    }

    #[test]
    fn supersede_answers_the_original() {
        let mut slot = PendingSlot::new(RequestKind::Location, PendingConflictPolicy::Supersede);
        let (first, first_rx) = Reply::channel();
        let (second, second_rx) = Reply::channel();

        slot.register(first);
        assert_eq!(slot.register(second), Registration::Superseded);

        let superseded = first_rx.try_recv().expect("original answered");
        assert_eq!(superseded.error_code(), Some("REQUEST_SUPERSEDED"));

        slot.resolve(Outcome::success(0));
        assert_eq!(second_rx.try_recv().expect("newcomer"), Outcome::success(0));
    }

    #[rstest]
    #[case(PendingConflictPolicy::Reject)]
    #[case(PendingConflictPolicy::Supersede)]
    fn resolving_an_empty_slot_is_a_no_op(#[case] policy: PendingConflictPolicy) {
        let mut slot = PendingSlot::new(RequestKind::ServiceRequest, policy);
        assert!(!slot.resolve(Outcome::success(true)));
    }

    #[test]
    fn kinds_render_for_messages() {
        assert_eq!(RequestKind::BackgroundPermission.to_string(), "background-permission");
    }
}
