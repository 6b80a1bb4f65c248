use std::{
    io,
    sync::{
        Arc, LazyLock, Mutex, PoisonError, RwLock,
        atomic::{AtomicBool, Ordering},
    },
};

use crate::{
    buffer::{Buffer, ErrorOpts},
    config::Config,
    format::{Style, ascii_lossy},
    level::Level,
    sink::{ConsoleSink, FlushError, StdoutSink},
};

type ExitHook = Box<dyn Fn(i32) + Send + Sync>;

/// Shared console context: formatting configuration, the mutable
/// verbosity threshold, the sticky ascii-fallback flag, and the single
/// lock-guarded sink that every buffer flushes through.
///
/// One `Console` is meant to exist per output stream. Buffers created
/// from it can be filled from independent threads; their flushes are
/// serialized so each buffer's lines land as one contiguous block.
pub struct Console {
    config: Config,
    threshold: RwLock<Level>,
    ascii: AtomicBool,
    sink: Mutex<Box<dyn ConsoleSink>>,
    exit_hook: ExitHook,
}

impl Console {
    pub fn builder() -> ConsoleBuilder {
        ConsoleBuilder::default()
    }

    pub fn threshold(&self) -> Level {
        *self.threshold.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Changes the verbosity threshold for every buffer of this console.
    pub fn set_threshold(&self, level: Level) {
        *self
            .threshold
            .write()
            .unwrap_or_else(PoisonError::into_inner) = level;
    }

    /// Whether ascii fallback has been activated. Sticky for the lifetime
    /// of the console.
    pub fn ascii_active(&self) -> bool {
        self.ascii.load(Ordering::Relaxed)
    }

    /// Activates ascii fallback. Idempotent and never reversed.
    pub fn force_ascii(&self) {
        self.ascii.store(true, Ordering::Relaxed);
    }

    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn exit(&self, code: i32) {
        (self.exit_hook)(code);
    }

    /// Writes one drained buffer snapshot to the sink as a single block.
    ///
    /// An empty snapshot is a no-op, so flushing an untouched or fully
    /// filtered buffer produces no blank line. On an encoding failure the
    /// snapshot is transliterated to ascii and retried exactly once while
    /// the lock is still held; a second failure propagates.
    pub(crate) fn write_block(&self, text: &str) -> Result<(), FlushError> {
        if text.is_empty() {
            return Ok(());
        }
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        match sink.write_block(text) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                self.force_ascii();
                sink.write_block(&ascii_lossy(text))
                    .map_err(FlushError::AsciiRetry)
            }
            Err(err) => Err(FlushError::Io(err)),
        }
    }

    /// Creates an empty buffer bound to this console.
    pub fn buffer(self: &Arc<Self>) -> Buffer {
        Buffer::new(Arc::clone(self))
    }

    /// Prints an error message immediately. See [`Buffer::error`] for the
    /// extra options; with `exit: true` the process terminates after the
    /// flush.
    pub fn error(self: &Arc<Self>, message: &str, opts: ErrorOpts<'_>) -> Result<(), FlushError> {
        let mut buffer = self.buffer();
        buffer.error(message, opts)?;
        buffer.flush()
    }

    /// Prints a warning immediately, in the configured warning color
    /// unless the style carries its own.
    pub fn warning(self: &Arc<Self>, message: &str, style: Style) -> Result<(), FlushError> {
        let mut buffer = self.buffer();
        buffer.warning(message, style);
        buffer.flush()
    }

    /// Prints a message immediately if the threshold is info or lower.
    pub fn info(self: &Arc<Self>, message: &str, style: Style) -> Result<(), FlushError> {
        let mut buffer = self.buffer();
        buffer.info(message, style);
        buffer.flush()
    }

    /// Prints a message immediately if the threshold is verbose or debug.
    pub fn verbose(self: &Arc<Self>, message: &str, style: Style) -> Result<(), FlushError> {
        let mut buffer = self.buffer();
        buffer.verbose(message, style);
        buffer.flush()
    }

    /// Prints a message immediately if the threshold is debug.
    pub fn debug(self: &Arc<Self>, message: &str, style: Style) -> Result<(), FlushError> {
        let mut buffer = self.buffer();
        buffer.debug(message, style);
        buffer.flush()
    }
}

/// Builder for a [`Console`].
#[derive(Default)]
pub struct ConsoleBuilder {
    config: Config,
    sink: Option<Box<dyn ConsoleSink>>,
    exit_hook: Option<ExitHook>,
}

impl ConsoleBuilder {
    pub fn with_config(self, config: Config) -> Self {
        Self { config, ..self }
    }

    pub fn with_threshold(self, threshold: Level) -> Self {
        Self {
            config: Config {
                threshold,
                ..self.config
            },
            ..self
        }
    }

    /// Replaces the default stdout sink.
    pub fn with_sink<S: ConsoleSink + 'static>(self, sink: S) -> Self {
        Self {
            sink: Some(Box::new(sink)),
            ..self
        }
    }

    /// Replaces the process-termination call used by the error-with-exit
    /// path. Tests substitute a counting hook here.
    pub fn with_exit_hook<F: Fn(i32) + Send + Sync + 'static>(self, hook: F) -> Self {
        Self {
            exit_hook: Some(Box::new(hook)),
            ..self
        }
    }

    pub fn build(self) -> Arc<Console> {
        let Self {
            config,
            sink,
            exit_hook,
        } = self;
        let threshold = RwLock::new(config.threshold);
        Arc::new(Console {
            config,
            threshold,
            ascii: AtomicBool::new(false),
            sink: Mutex::new(sink.unwrap_or_else(|| Box::new(StdoutSink))),
            exit_hook: exit_hook.unwrap_or_else(|| Box::new(|code| std::process::exit(code))),
        })
    }
}

static GLOBAL_CONSOLE: LazyLock<Arc<Console>> =
    LazyLock::new(|| Console::builder().with_config(Config::from_env()).build());

/// The process-wide console writing to stdout, configured from
/// `INKLINE_*` environment variables on first use.
pub fn console() -> Arc<Console> {
    Arc::clone(&GLOBAL_CONSOLE)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::sink::CaptureSink;

    struct AsciiOnlySink {
        inner: CaptureSink,
    }

    impl ConsoleSink for AsciiOnlySink {
        fn write_block(&mut self, text: &str) -> io::Result<()> {
            if !text.is_ascii() {
                return Err(io::Error::new(io::ErrorKind::InvalidData, "unencodable"));
            }
            self.inner.write_block(text)
        }
    }

    struct FailingSink;

    impl ConsoleSink for FailingSink {
        fn write_block(&mut self, _text: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::InvalidData, "unencodable"))
        }
    }

    #[test]
    fn empty_buffer_flush_writes_nothing() {
        let sink = CaptureSink::new();
        let console = Console::builder().with_sink(sink.clone()).build();
        let mut buffer = console.buffer();
        buffer.flush().unwrap();
        assert_eq!(sink.contents(), "");
    }

    #[test]
    fn threshold_is_mutable_at_runtime() {
        let sink = CaptureSink::new();
        let console = Console::builder()
            .with_threshold(Level::Warning)
            .with_sink(sink.clone())
            .build();
        console.info("dropped", Style::default()).unwrap();
        console.set_threshold(Level::Info);
        console.info("kept", Style::default()).unwrap();
        assert_eq!(sink.contents(), "kept\n");
    }

    #[test]
    fn encoding_failure_activates_sticky_ascii_fallback() {
        let sink = CaptureSink::new();
        let console = Console::builder()
            .with_sink(AsciiOnlySink {
                inner: sink.clone(),
            })
            .build();

        // First write fails, is transliterated and retried once.
        console.info("héllo", Style::default()).unwrap();
        assert!(console.ascii_active());
        assert_eq!(sink.contents(), "hllo\n");

        // Later unrelated messages are formatted ascii-safe up front.
        console.info("wörld", Style::default()).unwrap();
        assert_eq!(sink.contents(), "hllo\nwrld\n");
    }

    #[test]
    fn second_failure_after_fallback_is_fatal() {
        let console = Console::builder().with_sink(FailingSink).build();
        let err = console.info("héllo", Style::default()).unwrap_err();
        assert!(matches!(err, FlushError::AsciiRetry(_)));
        assert!(console.ascii_active());
    }

    #[test]
    fn exit_hook_runs_once_after_flush() {
        let sink = CaptureSink::new();
        let exits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&exits);
        let console = Console::builder()
            .with_sink(sink.clone())
            .with_exit_hook(move |code| {
                assert_ne!(code, 0);
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build();

        console
            .error("boom", ErrorOpts::default().with_exit(true))
            .unwrap();

        assert_eq!(exits.load(Ordering::SeqCst), 1);
        assert!(sink.contents().contains("boom"));
    }

    #[test]
    fn exit_happens_even_when_message_is_filtered() {
        let sink = CaptureSink::new();
        let exits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&exits);
        let console = Console::builder()
            .with_threshold(Level::None)
            .with_sink(sink.clone())
            .with_exit_hook(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build();

        console
            .error("boom", ErrorOpts::default().with_exit(true))
            .unwrap();

        assert_eq!(exits.load(Ordering::SeqCst), 1);
        assert_eq!(sink.contents(), "");
    }
}
