//! Console Logger
//!
//! A `tracing` subscriber for browser apps. Formatted lines go to the
//! browser console (`console.error` / `console.warn` / `console.log` by
//! level) and the most recent ones are kept in a circular buffer so the UI
//! can show them without opening devtools.

use std::collections::VecDeque;
use std::io;
use std::sync::{Mutex, OnceLock};

use chrono::{DateTime, Utc};
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

/// Number of lines kept in the buffer
pub const DEFAULT_CAPACITY: usize = 500;

/// One formatted log line
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub at: DateTime<Utc>,
    pub level: Level,
    pub message: String,
}

/// Fixed-size buffer that drops the oldest line when full
#[derive(Debug)]
pub struct RingBuffer {
    capacity: usize,
    lines: VecDeque<LogLine>,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            lines: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    pub fn push(&mut self, line: LogLine) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn lines(&self) -> Vec<LogLine> {
        self.lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

static BUFFER: OnceLock<Mutex<RingBuffer>> = OnceLock::new();

fn buffer() -> &'static Mutex<RingBuffer> {
    BUFFER.get_or_init(|| Mutex::new(RingBuffer::new(DEFAULT_CAPACITY)))
}

/// Snapshot of the buffered lines, oldest first
pub fn recent_lines() -> Vec<LogLine> {
    buffer().lock().map(|b| b.lines()).unwrap_or_default()
}

/// Drop everything buffered so far
pub fn clear_recent() {
    if let Ok(mut b) = buffer().lock() {
        b.clear();
    }
}

/// Install the global subscriber.
///
/// `level` is a tracing level name ("info", "debug", ...). Unknown names
/// fall back to INFO. Returns false when a subscriber was already set.
pub fn init(level: &str) -> bool {
    let max_level = level.parse::<Level>().unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .without_time()
        .with_ansi(false)
        .with_target(true)
        .with_writer(MakeConsoleWriter)
        .try_init()
        .is_ok()
}

/// Writer factory handed to the fmt layer
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeConsoleWriter;

impl<'a> MakeWriter<'a> for MakeConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Collects one formatted event and emits it on drop
pub struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self { level, buf: Vec::new() }
    }

    fn emit(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(&self.buf).trim_end().to_string();
        self.buf.clear();
        if text.is_empty() {
            return;
        }

        write_console(self.level, &text);

        if let Ok(mut b) = buffer().lock() {
            b.push(LogLine {
                at: Utc::now(),
                level: self.level,
                message: text,
            });
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.emit();
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        self.emit();
    }
}

#[cfg(target_arch = "wasm32")]
fn write_console(level: Level, text: &str) {
    let value = wasm_bindgen::JsValue::from_str(text);
    match level {
        Level::ERROR => web_sys::console::error_1(&value),
        Level::WARN => web_sys::console::warn_1(&value),
        Level::INFO => web_sys::console::info_1(&value),
        _ => web_sys::console::log_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_console(_level: Level, text: &str) {
    eprintln!("{}", text);
}
