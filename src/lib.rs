//! # inkline
//! Leveled, colorized console printer with atomic buffered flushes.
//!
//! Messages carry one of five severities (error, warning, info, verbose,
//! debug) and are filtered against a console-wide threshold, indented,
//! colorized, and written to stdout. Buffers let a thread accumulate a
//! block of lines and flush it atomically: concurrent flushes never
//! interleave each other's lines.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! inkline = "0.1"
//! ```
//!
//! ```rust
//! use inkline::{Console, Level, Style, CaptureSink};
//!
//! let sink = CaptureSink::new();
//! let console = Console::builder()
//!     .with_threshold(Level::Verbose)
//!     .with_sink(sink.clone())
//!     .build();
//!
//! let mut buffer = console.buffer();
//! buffer.info("fetching manifest", Style::default());
//! buffer.verbose("cache miss", Style::default().with_indent(1));
//! buffer.debug("raw headers", Style::default()); // below the threshold
//! buffer.flush().unwrap();
//!
//! assert_eq!(sink.contents(), "fetching manifest\n    cache miss\n");
//! ```
//!
//! ## One-shot printing
//! The console itself exposes the five severity calls for callers that
//! do not need buffering; each call flushes immediately. The process-wide
//! console from [`console()`] writes to stdout and reads its defaults
//! from `INKLINE_LEVEL` and `INKLINE_INDENT_WIDTH`.
//!
//! ```rust
//! use inkline::{console, Style};
//!
//! console().info("starting up", Style::default()).unwrap();
//! ```
//!
//! ## `log` facade
//! ```rust
//! use inkline::{Console, ConsoleLogger, Level, CaptureSink};
//!
//! let sink = CaptureSink::new();
//! let console = Console::builder()
//!     .with_threshold(Level::Info)
//!     .with_sink(sink.clone())
//!     .build();
//! ConsoleLogger::init(console).unwrap();
//!
//! log::info!("ready");
//! log::debug!("hidden");
//! assert_eq!(sink.contents(), "ready\n");
//! ```

mod bridge;
mod buffer;
mod config;
mod console;
mod format;
mod level;
mod sink;

pub use colored::Color;

pub use bridge::ConsoleLogger;
pub use buffer::{Buffer, ErrorOpts};
pub use config::{Colors, Config};
pub use console::{Console, ConsoleBuilder, console};
pub use format::Style;
pub use level::{Level, ParseLevelError};
pub use sink::{CaptureSink, ConsoleSink, FlushError, StdoutSink};
