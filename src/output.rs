// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Normal, quiet (CI), and JSON modes over an injectable sink.

use parking_lot::Mutex;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Arc;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode. The sink is injected
/// so tests can observe exactly what was written.
pub struct Output {
    mode: OutputMode,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl Output {
    /// Output to stdout.
    pub fn stdout(mode: OutputMode) -> Self {
        Self::to_sink(mode, Box::new(io::stdout()))
    }

    /// Output into an arbitrary sink.
    pub fn to_sink(mode: OutputMode, sink: Box<dyn Write + Send>) -> Self {
        Self {
            mode,
            sink: Mutex::new(sink),
        }
    }

    /// Output into an in-memory buffer, returning a handle to read it back.
    pub fn memory(mode: OutputMode) -> (Self, MemorySink) {
        let buffer = MemorySink::default();
        (Self::to_sink(mode, Box::new(buffer.clone())), buffer)
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            self.write_line(message);
        }
    }

    /// Print the final result message.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => self.write_line(message),
            OutputMode::Json => self.write_event("success", message),
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                self.write_line(&format!("Error: {message}"));
            }
            OutputMode::Json => self.write_event("error", message),
        }
    }

    fn write_line(&self, line: &str) {
        let mut sink = self.sink.lock();
        let _ = writeln!(sink, "{line}");
    }

    fn write_event(&self, event: &str, message: &str) {
        let payload = JsonEvent { event, message };
        if let Ok(json) = serde_json::to_string(&payload) {
            self.write_line(&json);
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
}

/// Shared in-memory sink for capturing output in tests.
#[derive(Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }
}

impl Write for MemorySink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
