//! Log capture for assertions on emitted events.

use std::io;
use std::sync::{Arc, Mutex};

use location_bridge_config::{Config, LogFormat};
use tracing_subscriber::fmt::MakeWriter;

use crate::telemetry::build_subscriber;

/// In-memory writer shared between a subscriber and the test.
#[derive(Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Everything written so far.
    #[must_use]
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().expect("log buffer mutex poisoned");
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .expect("log buffer mutex poisoned")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'writer> MakeWriter<'writer> for SharedBuffer {
    type Writer = Self;

    fn make_writer(&'writer self) -> Self::Writer {
        self.clone()
    }
}

/// Runs `action` with a compact debug-level subscriber and returns its
/// result together with the captured output.
pub fn capture_logs<R>(action: impl FnOnce() -> R) -> (R, String) {
    let buffer = SharedBuffer::default();
    let config = Config {
        log_filter: "debug".to_owned(),
        log_format: LogFormat::Compact,
        ..Config::default()
    };
    let subscriber = build_subscriber(&config, buffer.clone(), false).expect("test subscriber");
    let result = tracing::subscriber::with_default(subscriber, action);
    (result, buffer.contents())
}
