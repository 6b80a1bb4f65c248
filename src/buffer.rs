use std::{error::Error, sync::Arc};

use crate::{
    console::Console,
    format::{Style, format_line},
    level::Level,
    sink::FlushError,
};

const REPORT_THIS: &str = "!!! Please report this and paste the above message !!!";

/// Single-owner accumulator of formatted lines.
///
/// Severity calls filter against the console threshold, format, and
/// append; nothing is written until [`flush`](Buffer::flush). One buffer
/// belongs to one logical unit of work (typically one thread); the
/// console serializes flushes so each buffer's lines stay contiguous in
/// the output.
pub struct Buffer {
    console: Arc<Console>,
    lines: String,
}

impl Buffer {
    pub(crate) fn new(console: Arc<Console>) -> Self {
        Self {
            console,
            lines: String::new(),
        }
    }

    /// Appends an already formatted line plus a trailing newline. No
    /// filtering happens here.
    pub fn append(&mut self, line: &str) {
        self.lines.push_str(line);
        self.lines.push('\n');
    }

    /// Returns the accumulated text and resets the buffer to empty.
    pub fn drain(&mut self) -> String {
        std::mem::take(&mut self.lines)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Filter, format, append. Returns whether the message passed the
    /// threshold.
    fn push(&mut self, level: Level, message: &str, style: &Style) -> bool {
        if !self.console.threshold().allows(level) {
            return false;
        }
        self.push_formatted(message, style);
        true
    }

    fn push_formatted(&mut self, message: &str, style: &Style) {
        let line = format_line(
            self.console.config(),
            message,
            style,
            self.console.ascii_active(),
        );
        self.append(&line);
    }

    /// Buffers an error message in the configured error color.
    ///
    /// The exception chain and the "please report this" trailer from
    /// `opts` are appended whenever the base line passed the filter; they
    /// are never filtered individually. With `opts.exit` the buffer is
    /// flushed and the console's termination hook is invoked with a
    /// non-zero status, whether or not the message was filtered.
    pub fn error(&mut self, message: &str, opts: ErrorOpts<'_>) -> Result<(), FlushError> {
        let color = self.console.config().colors.error;
        let style = Style::default().with_indent(opts.indent).with_color(color);
        if self.push(Level::Error, message, &style) {
            let plain = Style::default().with_color(color);
            if let Some(err) = opts.exception {
                self.push_formatted(&render_chain(err), &plain);
            }
            if opts.report_this {
                self.push_formatted(REPORT_THIS, &plain);
            }
        }
        if opts.exit {
            let flushed = self.flush();
            self.console.exit(1);
            return flushed;
        }
        Ok(())
    }

    /// Buffers a warning if the threshold allows it, in the configured
    /// warning color unless the style carries its own.
    pub fn warning(&mut self, message: &str, style: Style) {
        let style = Style {
            color: style.color.or(Some(self.console.config().colors.warning)),
            ..style
        };
        self.push(Level::Warning, message, &style);
    }

    /// Buffers a message if the threshold is info or lower.
    pub fn info(&mut self, message: &str, style: Style) {
        self.push(Level::Info, message, &style);
    }

    /// Buffers a message if the threshold is verbose or debug.
    pub fn verbose(&mut self, message: &str, style: Style) {
        self.push(Level::Verbose, message, &style);
    }

    /// Buffers a message if the threshold is debug.
    pub fn debug(&mut self, message: &str, style: Style) {
        self.push(Level::Debug, message, &style);
    }

    /// Drains the buffer and writes the snapshot to the console sink as
    /// one atomic block. Empty buffers write nothing.
    pub fn flush(&mut self) -> Result<(), FlushError> {
        let snapshot = self.drain();
        self.console.write_block(&snapshot)
    }
}

fn render_chain(err: &dyn Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str("\ncaused by: ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

/// Options for [`Buffer::error`].
#[derive(Default)]
pub struct ErrorOpts<'a> {
    /// Indent level for the base message.
    pub indent: usize,
    /// Flush and terminate the process after buffering.
    pub exit: bool,
    /// Error whose chain is appended below the message.
    pub exception: Option<&'a (dyn Error + 'static)>,
    /// Append the "please report this" trailer.
    pub report_this: bool,
}

impl<'a> ErrorOpts<'a> {
    pub fn with_indent(self, indent: usize) -> Self {
        Self { indent, ..self }
    }

    pub fn with_exit(self, exit: bool) -> Self {
        Self { exit, ..self }
    }

    pub fn with_exception(self, exception: &'a (dyn Error + 'static)) -> Self {
        Self {
            exception: Some(exception),
            ..self
        }
    }

    pub fn with_report_this(self, report_this: bool) -> Self {
        Self {
            report_this,
            ..self
        }
    }
}
