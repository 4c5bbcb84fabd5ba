//! `WriterSink<W>` — bridges `EventSink` to an `EventWriter`.

use fleet_core::{EventSink, TrafficEvent};

use crate::writer::EventWriter;
use crate::OutputError;

/// Events buffered before a batch write is forced.
const BATCH_SIZE: usize = 256;

/// An [`EventSink`] that batches events into any [`EventWriter`] backend
/// (CSV, SQLite, …).
///
/// Errors from the writer are stored internally because `EventSink::record`
/// has no return value.  After the run, call [`finish`][Self::finish] to
/// flush the tail of the buffer, then check [`take_error`][Self::take_error].
pub struct WriterSink<W: EventWriter> {
    writer:     W,
    buffer:     Vec<TrafficEvent>,
    last_error: Option<OutputError>,
}

impl<W: EventWriter> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buffer:     Vec::with_capacity(BATCH_SIZE),
            last_error: None,
        }
    }

    /// Write out any buffered events.
    pub fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let result = self.writer.write_events(&self.buffer);
        self.buffer.clear();
        self.store_err(result);
    }

    /// Flush the buffer and close the backend.  Idempotent.
    pub fn finish(&mut self) {
        self.flush();
        let result = self.writer.finish();
        self.store_err(result);
    }

    /// Take the stored write error (if any) after the run.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: EventWriter> EventSink for WriterSink<W> {
    fn record(&mut self, event: &TrafficEvent) {
        self.buffer.push(*event);
        if self.buffer.len() >= BATCH_SIZE {
            self.flush();
        }
    }
}
