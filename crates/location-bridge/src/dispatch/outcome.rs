//! Command outcomes and the one-shot reply continuation.
//!
//! Every command resolves its [`Reply`] exactly once. Consuming `self` in
//! each resolving method makes a second resolution impossible to express.

use std::fmt;
use std::sync::mpsc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::errors::{DispatchError, ErrorCode};
use super::router::DISPATCH_TARGET;

/// Result of a command as seen by the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// The command completed with a value (possibly `null`).
    Success {
        /// Returned value.
        value: Value,
    },
    /// The command failed with a labeled error.
    Error {
        /// Machine-readable label.
        code: String,
        /// Human-readable message.
        message: String,
    },
    /// No handler is registered for the command name.
    NotImplemented,
}

impl Outcome {
    /// Creates a success outcome.
    pub fn success(value: impl Into<Value>) -> Self {
        Self::Success {
            value: value.into(),
        }
    }

    /// Creates an error outcome with one of the bridge's own codes.
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }

    /// Creates an error outcome with a code chosen by the platform.
    pub fn platform_error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Returns the success value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Success { value } => Some(value),
            _ => None,
        }
    }

    /// Returns the error code, if any.
    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Error { code, .. } => Some(code),
            _ => None,
        }
    }
}

type Callback = Box<dyn FnOnce(Outcome) + Send>;

/// One-shot continuation through which a command delivers its outcome.
pub struct Reply {
    callback: Callback,
}

impl Reply {
    /// Wraps a callback invoked with the outcome.
    pub fn new<F>(callback: F) -> Self
    where
        F: FnOnce(Outcome) + Send + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Creates a reply whose outcome is delivered through a channel.
    ///
    /// Useful when the caller wants to block on, or poll for, the outcome.
    #[must_use]
    pub fn channel() -> (Self, mpsc::Receiver<Outcome>) {
        let (sender, receiver) = mpsc::channel();
        let reply = Self::new(move |outcome| {
            if sender.send(outcome).is_err() {
                debug!(
                    target: DISPATCH_TARGET,
                    "reply receiver dropped before the outcome arrived"
                );
            }
        });
        (reply, receiver)
    }

    /// Resolves the reply.
    pub fn send(self, outcome: Outcome) {
        (self.callback)(outcome);
    }

    /// Resolves the reply with a success value.
    pub fn success(self, value: impl Into<Value>) {
        self.send(Outcome::success(value));
    }

    /// Resolves the reply with a labeled error.
    pub fn error(self, code: ErrorCode, message: impl Into<String>) {
        self.send(Outcome::error(code, message));
    }

    /// Resolves the reply as not implemented.
    pub fn not_implemented(self) {
        self.send(Outcome::NotImplemented);
    }

    /// Resolves the reply from a handler result.
    ///
    /// Failures are logged and reported under `code` with `context` prefixed
    /// to the error text.
    pub fn settle(self, code: ErrorCode, context: &str, result: Result<Value, DispatchError>) {
        match result {
            Ok(value) => self.success(value),
            Err(error) => {
                warn!(
                    target: DISPATCH_TARGET,
                    code = %code,
                    error = %error,
                    "{context}"
                );
                self.error(code, format!("{context}: {error}"));
            }
        }
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Reply").finish_non_exhaustive()
    }
}
