//! Browser Logging
//!
//! `tracing` events from the UI and the client crate, formatted by
//! tracing-subscriber and written to the browser console at the matching
//! console level.

use std::io;

use tracing::{Level, Metadata};
use wasm_bindgen::JsValue;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info,taskboard_client=debug";

/// Hands out one [`ConsoleWriter`] per event, tagged with the event level.
#[derive(Clone, Copy, Default)]
struct ConsoleMakeWriter;

struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buffer);
        let line = line.trim_end();
        if line.is_empty() {
            return;
        }
        let value = JsValue::from_str(line);
        match self.level {
            Level::ERROR => web_sys::console::error_1(&value),
            Level::WARN => web_sys::console::warn_1(&value),
            Level::INFO => web_sys::console::info_1(&value),
            _ => web_sys::console::debug_1(&value),
        }
    }
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: Level::INFO,
            buffer: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
            buffer: Vec::new(),
        }
    }
}

/// Install the global subscriber. Safe to call more than once.
pub fn init() {
    let filter = option_env!("TASKBOARD_LOG")
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(ConsoleMakeWriter)
                .without_time()
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .try_init();

    if result.is_err() {
        tracing::debug!("subscriber already installed");
    }
}
