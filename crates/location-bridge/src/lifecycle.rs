//! Transport binding lifecycle.
//!
//! The bridge serves one transport binding at a time. Attaching a second
//! binding without detaching the first is tolerated: the old binding is
//! released before the new one is stored, and the anomaly is logged.

use tracing::{debug, warn};

const LIFECYCLE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::lifecycle");

/// A registration of the bridge with a transport.
pub trait TransportBinding {
    /// Short description used in logs.
    fn describe(&self) -> String;

    /// Unregisters the bridge from the transport.
    fn release(&mut self);
}

/// Result of attaching a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    /// No binding was attached before.
    Attached,
    /// A previous binding was released and replaced.
    Replaced,
}

/// Holds at most one transport binding.
#[derive(Default)]
pub struct LifecycleGuard {
    binding: Option<Box<dyn TransportBinding>>,
}

impl LifecycleGuard {
    /// Creates a guard with nothing attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `binding`, releasing any binding still attached.
    pub fn attach(&mut self, binding: Box<dyn TransportBinding>) -> Attachment {
        let attachment = match self.binding.take() {
            Some(mut previous) => {
                warn!(
                    target: LIFECYCLE_TARGET,
                    previous = %previous.describe(),
                    next = %binding.describe(),
                    "attaching a transport binding before the previous one was detached"
                );
                previous.release();
                Attachment::Replaced
            }
            None => Attachment::Attached,
        };
        debug!(target: LIFECYCLE_TARGET, binding = %binding.describe(), "transport attached");
        self.binding = Some(binding);
        attachment
    }

    /// Releases the attached binding. Returns `false` if nothing was attached.
    pub fn detach(&mut self) -> bool {
        let Some(mut binding) = self.binding.take() else {
            debug!(
                target: LIFECYCLE_TARGET,
                "tried to detach when no transport binding was attached"
            );
            return false;
        };
        binding.release();
        debug!(target: LIFECYCLE_TARGET, binding = %binding.describe(), "transport detached");
        true
    }

    /// Returns `true` while a binding is attached.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.binding.is_some()
    }
}

impl std::fmt::Debug for LifecycleGuard {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("LifecycleGuard")
            .field(
                "binding",
                &self.binding.as_ref().map(|binding| binding.describe()),
            )
            .finish()
    }
}
