//! Conversion driver: SSE text in, consolidated JSON document out.
//!
//! [`DeltaMerger`] owns the document and a [`SseFramer`]; lines go in one at
//! a time, `delta` events are decoded and applied in stream order, and the
//! document comes out once the stream ends or a `[DONE]` event is seen.
//!
//! By default every failure is local: a malformed payload drops its event, a
//! failing operation drops only itself. Failures are logged at `debug` and
//! recorded in the [`ConvertReport`]. With [`ConvertOptions::strict`] the
//! first failure aborts the conversion instead.

use std::io::BufRead;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::delta::{apply_raw, ApplyLimits, DeltaError, Envelope};
use crate::sse::{self, EventKind, SseEvent, SseFramer};

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("strict mode: {0}")]
    Strict(Diagnostic),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ── Options ───────────────────────────────────────────────────────────────

/// Options for [`convert`] and [`DeltaMerger`].
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Abort on the first dropped event or operation.
    pub strict: bool,
    /// Dispatch an event left pending at end of input (no trailing blank line).
    pub flush_trailing_event: bool,
    pub limits: ApplyLimits,
    /// Diagnostics kept in the report; later ones are only counted.
    pub max_diagnostics: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            strict: false,
            flush_trailing_event: false,
            limits: ApplyLimits::default(),
            max_diagnostics: 256,
        }
    }
}

// ── Report ────────────────────────────────────────────────────────────────

/// A dropped event or operation.
#[derive(Debug, Error)]
#[error("event {event}{}: {error}", op_suffix(.op))]
pub struct Diagnostic {
    /// Zero-based ordinal of the dispatched event.
    pub event: usize,
    /// Zero-based position of the operation within the event, if the failure
    /// was per-operation.
    pub op: Option<usize>,
    pub error: DeltaError,
}

fn op_suffix(op: &Option<usize>) -> String {
    op.map(|i| format!(" op {i}")).unwrap_or_default()
}

/// Counters collected during a conversion.
#[derive(Debug, Default)]
pub struct ConvertReport {
    /// Events dispatched by the framer, `[DONE]` included.
    pub events: usize,
    pub delta_events: usize,
    pub ops_applied: usize,
    pub ops_skipped: usize,
    /// Whether the stream ended with `[DONE]`.
    pub done: bool,
    pub diagnostics: Vec<Diagnostic>,
    pub diagnostics_dropped: usize,
}

/// Result of a conversion.
#[derive(Debug)]
pub struct Conversion {
    pub document: Value,
    pub report: ConvertReport,
}

// ── Merger ────────────────────────────────────────────────────────────────

/// Whether the merger wants more input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Done,
}

/// Incremental delta merger.
pub struct DeltaMerger {
    options: ConvertOptions,
    framer: SseFramer,
    document: Value,
    report: ConvertReport,
}

impl DeltaMerger {
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            framer: SseFramer::new(),
            document: Value::Object(Map::new()),
            report: ConvertReport::default(),
        }
    }

    /// The document as merged so far.
    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn report(&self) -> &ConvertReport {
        &self.report
    }

    /// Feed one line of SSE text.
    pub fn feed_line(&mut self, line: &str) -> Result<Flow, ConvertError> {
        if self.report.done {
            return Ok(Flow::Done);
        }
        if let Some(event) = self.framer.push_line(line) {
            self.dispatch(event)?;
        }
        Ok(if self.report.done { Flow::Done } else { Flow::Continue })
    }

    /// Feed a chunk of text containing any number of complete lines.
    ///
    /// Lines may end in `\r\n`, `\n` or a lone `\r`.
    pub fn feed_str(&mut self, text: &str) -> Result<Flow, ConvertError> {
        for line in sse::lines(text) {
            if self.feed_line(line)? == Flow::Done {
                return Ok(Flow::Done);
            }
        }
        Ok(if self.report.done { Flow::Done } else { Flow::Continue })
    }

    /// Read lines from `reader` until end of input or `[DONE]`.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD, so a bad
    /// line only spoils the event it belongs to.
    pub fn feed_reader<R: BufRead>(&mut self, mut reader: R) -> Result<Flow, ConvertError> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                return Ok(Flow::Continue);
            }
            if self.feed_str(&String::from_utf8_lossy(&buf))? == Flow::Done {
                return Ok(Flow::Done);
            }
        }
    }

    /// End the stream and hand out the document.
    pub fn finish(mut self) -> Result<Conversion, ConvertError> {
        let framer = std::mem::take(&mut self.framer);
        if let Some(event) = framer.finish(self.options.flush_trailing_event) {
            self.dispatch(event)?;
        }
        tracing::debug!(
            events = self.report.events,
            applied = self.report.ops_applied,
            skipped = self.report.ops_skipped,
            done = self.report.done,
            "conversion finished"
        );
        Ok(Conversion {
            document: self.document,
            report: self.report,
        })
    }

    fn dispatch(&mut self, event: SseEvent) -> Result<(), ConvertError> {
        let ordinal = self.report.events;
        self.report.events += 1;
        match event.kind() {
            EventKind::Done => {
                tracing::debug!(event = ordinal, "stream done");
                self.report.done = true;
            }
            EventKind::DeltaEncoding => {
                tracing::trace!(event = ordinal, encoding = %event.data, "delta encoding");
            }
            EventKind::Delta => {
                self.report.delta_events += 1;
                self.apply_delta(ordinal, &event.data)?;
            }
            EventKind::Other => {
                tracing::trace!(event = ordinal, name = event.name.as_deref().unwrap_or(""), "ignoring event");
            }
        }
        Ok(())
    }

    fn apply_delta(&mut self, ordinal: usize, payload: &str) -> Result<(), ConvertError> {
        let envelope = match Envelope::parse(payload) {
            Ok(envelope) => envelope,
            Err(error) => {
                tracing::debug!(event = ordinal, %error, "dropping delta event");
                return self.record(Diagnostic { event: ordinal, op: None, error });
            }
        };
        let ops = envelope.into_ops();
        for (i, raw) in ops.iter().enumerate() {
            match apply_raw(&mut self.document, raw, &self.options.limits) {
                Ok(()) => {
                    tracing::trace!(event = ordinal, op = i, "applied");
                    self.report.ops_applied += 1;
                }
                Err(error) => {
                    tracing::debug!(event = ordinal, op = i, %error, "skipping operation");
                    self.report.ops_skipped += 1;
                    self.record(Diagnostic { event: ordinal, op: Some(i), error })?;
                }
            }
        }
        Ok(())
    }

    fn record(&mut self, diagnostic: Diagnostic) -> Result<(), ConvertError> {
        if self.options.strict {
            return Err(ConvertError::Strict(diagnostic));
        }
        if self.report.diagnostics.len() < self.options.max_diagnostics {
            self.report.diagnostics.push(diagnostic);
        } else {
            self.report.diagnostics_dropped += 1;
        }
        Ok(())
    }
}

// ── One-shot API ──────────────────────────────────────────────────────────

/// Convert a complete SSE text blob.
///
/// Only fails in strict mode.
pub fn convert(input: &str, options: &ConvertOptions) -> Result<Conversion, ConvertError> {
    let mut merger = DeltaMerger::new(options.clone());
    merger.feed_str(input)?;
    merger.finish()
}

/// Convert a complete SSE text blob with default, tolerant options.
pub fn sse_to_json(input: &str) -> Value {
    // Tolerant mode records failures instead of returning them.
    convert(input, &ConvertOptions::default())
        .map(|conversion| conversion.document)
        .unwrap_or_else(|_| Value::Object(Map::new()))
}
