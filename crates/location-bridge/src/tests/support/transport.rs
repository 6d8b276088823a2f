//! Transport binding double.

use std::sync::{Arc, Mutex};

use crate::lifecycle::TransportBinding;

/// Binding that counts how often it was released.
#[derive(Clone)]
pub struct RecordingTransport {
    name: String,
    releases: Arc<Mutex<usize>>,
}

impl RecordingTransport {
    /// Creates a binding described as `name`.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            releases: Arc::new(Mutex::new(0)),
        }
    }

    /// Number of releases so far.
    #[must_use]
    pub fn releases(&self) -> usize {
        *self.releases.lock().expect("transport mutex poisoned")
    }
}

impl TransportBinding for RecordingTransport {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn release(&mut self) {
        *self.releases.lock().expect("transport mutex poisoned") += 1;
    }
}
