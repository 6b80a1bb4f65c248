use std::sync::Arc;

use log::{Log, Metadata, Record, SetLoggerError};

use crate::{buffer::ErrorOpts, console::Console, format::Style, level::Level};

/// Adapter that routes `log` facade records into a [`Console`].
///
/// Records are emitted one-shot (buffered and flushed per record), so
/// records from different threads never interleave mid-line. `log::Log`
/// has no error channel, so a failed console write is dropped here.
pub struct ConsoleLogger {
    console: Arc<Console>,
}

impl ConsoleLogger {
    /// Installs the adapter as the global logger. Fails if another logger
    /// was installed first.
    pub fn init(console: Arc<Console>) -> Result<(), SetLoggerError> {
        log::set_max_level(console.threshold().to_level_filter());
        log::set_boxed_logger(Box::new(Self { console }))
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.console.threshold().allows(Level::from(metadata.level()))
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = record.args().to_string();
        let _ = match Level::from(record.level()) {
            Level::Error => self.console.error(&message, ErrorOpts::default()),
            Level::Warning => self.console.warning(&message, Style::default()),
            Level::Info => self.console.info(&message, Style::default()),
            Level::Verbose => self.console.verbose(&message, Style::default()),
            Level::Debug => self.console.debug(&message, Style::default()),
            Level::None => Ok(()),
        };
    }

    fn flush(&self) {}
}
