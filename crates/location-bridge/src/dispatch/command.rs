//! Inbound command representation.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::arguments::Fields;

/// A named command with loosely typed arguments.
///
/// Commands deserialise from `{"method": "...", "arguments": {...}}`; the
/// argument map may be omitted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Command {
    method: String,
    #[serde(default)]
    arguments: Map<String, Value>,
}

impl Command {
    /// Creates a command without arguments.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: Map::new(),
        }
    }

    /// Adds an argument, replacing any previous value under `key`.
    #[must_use]
    pub fn with_argument(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Returns the command name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.method.as_str()
    }

    /// Returns a typed view over the arguments.
    #[must_use]
    pub const fn fields(&self) -> Fields<'_> {
        Fields::new(&self.arguments)
    }
}
