//! Registered-handler routing for command dispatch.
//!
//! Each command name maps to a plain handler function. Unknown names are
//! answered with [`Outcome::NotImplemented`](super::Outcome), which callers
//! treat as "no such capability" rather than as an error.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use super::command::Command;
use super::handlers;
use super::outcome::Reply;
use crate::bridge::BridgeContext;

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Handles one command. The handler must resolve `reply`, either before
/// returning or later through a pending slot.
pub type Handler = fn(&mut BridgeContext, &Command, Reply);

/// Routes commands to registered handlers.
#[derive(Clone, Default)]
pub struct CommandRouter {
    handlers: HashMap<&'static str, Handler>,
}

impl CommandRouter {
    /// Creates a router with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a router serving the bridge's built-in commands.
    #[must_use]
    pub fn with_default_handlers() -> Self {
        let mut router = Self::new();
        for (name, handler) in handlers::DEFAULT_HANDLERS {
            router.register(*name, *handler);
        }
        router
    }

    /// Registers `handler` for `name`, returning the handler it replaced.
    pub fn register(&mut self, name: &'static str, handler: Handler) -> Option<Handler> {
        self.handlers.insert(name, handler)
    }

    /// Returns `true` if a handler is registered for `name`.
    #[must_use]
    pub fn handles(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Routes `command` to its handler.
    pub fn route(&self, context: &mut BridgeContext, command: &Command, reply: Reply) {
        let Some(handler) = self.handlers.get(command.name()) else {
            debug!(
                target: DISPATCH_TARGET,
                command = command.name(),
                "no handler registered"
            );
            reply.not_implemented();
            return;
        };
        debug!(target: DISPATCH_TARGET, command = command.name(), "routing command");
        handler(context, command, reply);
    }
}

impl fmt::Debug for CommandRouter {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        formatter
            .debug_struct("CommandRouter")
            .field("commands", &names)
            .finish()
    }
}
