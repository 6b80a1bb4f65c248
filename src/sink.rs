use std::{
    io::{self, Write},
    sync::{Arc, Mutex, PoisonError},
};

use thiserror::Error;

/// Error from flushing a buffer to the console's sink.
#[derive(Debug, Error)]
pub enum FlushError {
    #[error("console write failed: {0}")]
    Io(#[from] io::Error),
    /// The write failed again after ascii fallback was activated. There is
    /// no further retry.
    #[error("console write failed after ascii fallback: {0}")]
    AsciiRetry(#[source] io::Error),
}

/// Destination for flushed buffers. Each flush arrives as one
/// `write_block` call; a sink that cannot encode the text for its target
/// must report [`io::ErrorKind::InvalidData`] so the console can retry
/// once in ascii mode.
pub trait ConsoleSink: Send {
    fn write_block(&mut self, text: &str) -> io::Result<()>;
}

/// The default sink: locked standard output, flushed after every block.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl ConsoleSink for StdoutSink {
    fn write_block(&mut self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()
    }
}

/// In-memory sink for tests and embedding. Clones share the same storage,
/// so a test can keep one handle and give the other to the console.
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    captured: Arc<Mutex<String>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.captured
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ConsoleSink for CaptureSink {
    fn write_block(&mut self, text: &str) -> io::Result<()> {
        self.captured
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_str(text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_sink_clones_share_storage() {
        let sink = CaptureSink::new();
        let mut writer = sink.clone();
        writer.write_block("one\n").unwrap();
        writer.write_block("two\n").unwrap();
        assert_eq!(sink.contents(), "one\ntwo\n");
    }
}
