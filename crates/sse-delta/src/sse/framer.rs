//! SSE framer.
//!
//! Line-driven state machine. Lines are trimmed before classification; a
//! blank line dispatches the pending event. Once a `[DONE]` payload has been
//! dispatched the framer is terminal and ignores all further input.

use super::lines::{lines, SseLines};

/// Payload that ends a stream.
pub const DONE_SENTINEL: &str = "[DONE]";

const DELTA_EVENT: &str = "delta";
const DELTA_ENCODING_EVENT: &str = "delta_encoding";

/// A dispatched SSE event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// The `event:` name, if one was given.
    pub name: Option<String>,
    /// All `data:` payloads of the event, concatenated.
    pub data: String,
}

/// How the merge loop treats an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Protocol version negotiation; no document effect.
    DeltaEncoding,
    /// A delta envelope to apply.
    Delta,
    /// The `[DONE]` sentinel, whatever the event name.
    Done,
    /// Anything else; ignored.
    Other,
}

impl SseEvent {
    pub fn kind(&self) -> EventKind {
        if self.data == DONE_SENTINEL {
            return EventKind::Done;
        }
        match self.name.as_deref() {
            Some(DELTA_EVENT) => EventKind::Delta,
            Some(DELTA_ENCODING_EVENT) => EventKind::DeltaEncoding,
            _ => EventKind::Other,
        }
    }

    pub fn is_done(&self) -> bool {
        self.kind() == EventKind::Done
    }
}

/// Incremental SSE framer.
#[derive(Debug, Default)]
pub struct SseFramer {
    name: Option<String>,
    data: Vec<String>,
    done: bool,
}

impl SseFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line (with or without its line terminator).
    ///
    /// Returns the event completed by this line, if any. An event is only
    /// dispatched when it has at least one `data:` line; a name alone is
    /// discarded at the blank line.
    pub fn push_line(&mut self, line: &str) -> Option<SseEvent> {
        if self.done {
            return None;
        }
        let line = line.trim();
        if line.is_empty() {
            return self.flush();
        }
        if let Some(name) = line.strip_prefix("event:") {
            self.name = Some(name.trim().to_string());
        } else if let Some(data) = line.strip_prefix("data:") {
            self.data.push(data.trim().to_string());
        }
        None
    }

    /// End of input.
    ///
    /// An event still pending (no terminating blank line) is dispatched only
    /// when `flush_pending` is set; otherwise it is dropped.
    pub fn finish(mut self, flush_pending: bool) -> Option<SseEvent> {
        if !flush_pending {
            if self.has_pending() {
                tracing::debug!(
                    event = self.name.as_deref().unwrap_or(""),
                    "dropping unterminated trailing event"
                );
            }
            return None;
        }
        self.flush()
    }

    /// Whether a `[DONE]` event has been dispatched.
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn has_pending(&self) -> bool {
        !self.done && (self.name.is_some() || !self.data.is_empty())
    }

    fn flush(&mut self) -> Option<SseEvent> {
        let name = self.name.take();
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).concat();
        let event = SseEvent { name, data };
        if event.is_done() {
            self.done = true;
        }
        Some(event)
    }
}

/// Iterator over the events of a complete SSE text blob.
pub struct Events<'a> {
    lines: SseLines<'a>,
    framer: SseFramer,
    flush_pending: bool,
    finished: bool,
}

impl<'a> Iterator for Events<'a> {
    type Item = SseEvent;

    fn next(&mut self) -> Option<SseEvent> {
        if self.finished {
            return None;
        }
        for line in self.lines.by_ref() {
            if let Some(event) = self.framer.push_line(line) {
                if event.is_done() {
                    self.finished = true;
                }
                return Some(event);
            }
        }
        self.finished = true;
        std::mem::take(&mut self.framer).finish(self.flush_pending)
    }
}

/// Split `input` into SSE events. Iteration stops after a `[DONE]` event.
pub fn frame_events(input: &str, flush_pending: bool) -> Events<'_> {
    Events {
        lines: lines(input),
        framer: SseFramer::new(),
        flush_pending,
        finished: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(input: &str) -> Vec<SseEvent> {
        frame_events(input, false).collect()
    }

    fn named(name: &str, data: &str) -> SseEvent {
        SseEvent {
            name: Some(name.to_string()),
            data: data.to_string(),
        }
    }

    #[test]
    fn frames_named_events() {
        let input = "event: delta_encoding\ndata: \"v1\"\n\nevent: delta\ndata: {\"v\": []}\n\n";
        assert_eq!(
            events(input),
            vec![named("delta_encoding", "\"v1\""), named("delta", "{\"v\": []}")]
        );
    }

    #[test]
    fn joins_multi_line_data_without_separator() {
        let input = "event: delta\ndata: {\"p\": \"/a\",\ndata:  \"o\": \"add\", \"v\": 1}\n\n";
        assert_eq!(
            events(input),
            vec![named("delta", "{\"p\": \"/a\",\"o\": \"add\", \"v\": 1}")]
        );
    }

    #[test]
    fn trims_lines_and_handles_crlf() {
        let input = "  event: delta  \r\n\tdata: 1\r\n   \r\n";
        assert_eq!(events(input), vec![named("delta", "1")]);
    }

    #[test]
    fn bare_carriage_returns_end_lines() {
        let input = "event: delta\rdata: 1\r\revent: delta\rdata: 2\r\r";
        assert_eq!(events(input), vec![named("delta", "1"), named("delta", "2")]);
    }

    #[test]
    fn later_event_line_overrides_name() {
        let input = "event: one\nevent: two\ndata: x\n\n";
        assert_eq!(events(input), vec![named("two", "x")]);
    }

    #[test]
    fn name_without_data_is_discarded() {
        let input = "event: delta\n\nevent: delta\ndata: 2\n\n";
        assert_eq!(events(input), vec![named("delta", "2")]);
    }

    #[test]
    fn unnamed_events_are_dispatched() {
        let input = "data: hello\n\n";
        assert_eq!(
            events(input),
            vec![SseEvent { name: None, data: "hello".into() }]
        );
    }

    #[test]
    fn ignores_unknown_lines() {
        let input = ": comment\nid: 7\nretry: 100\nevent: delta\ndata: 1\n\n";
        assert_eq!(events(input), vec![named("delta", "1")]);
    }

    #[test]
    fn stops_after_done() {
        let input = "event: delta\ndata: 1\n\ndata: [DONE]\n\nevent: delta\ndata: 2\n\n";
        let got = events(input);
        assert_eq!(got.len(), 2);
        assert!(got[1].is_done());
    }

    #[test]
    fn framer_is_terminal_after_done() {
        let mut framer = SseFramer::new();
        assert!(framer.push_line("event: delta").is_none());
        assert!(framer.push_line("data: [DONE]").is_none());
        assert!(framer.push_line("").unwrap().is_done());
        assert!(framer.is_done());
        assert!(framer.push_line("event: delta").is_none());
        assert!(framer.push_line("data: 1").is_none());
        assert!(framer.push_line("").is_none());
        assert!(!framer.has_pending());
    }

    #[test]
    fn trailing_event_dropped_by_default() {
        let input = "event: delta\ndata: 1\n\nevent: delta\ndata: 2";
        assert_eq!(events(input), vec![named("delta", "1")]);
        let flushed: Vec<_> = frame_events(input, true).collect();
        assert_eq!(flushed, vec![named("delta", "1"), named("delta", "2")]);
    }

    #[test]
    fn done_as_last_line_without_blank() {
        let input = "event: delta\ndata: 1\n\ndata: [DONE]";
        let got: Vec<_> = frame_events(input, true).collect();
        assert_eq!(got.len(), 2);
        assert!(got[1].is_done());
    }

    #[test]
    fn event_kinds() {
        assert_eq!(named("delta", "{}").kind(), EventKind::Delta);
        assert_eq!(named("delta_encoding", "\"v1\"").kind(), EventKind::DeltaEncoding);
        assert_eq!(named("message", "{}").kind(), EventKind::Other);
        assert_eq!(named("delta", "[DONE]").kind(), EventKind::Done);
        assert_eq!(SseEvent { name: None, data: "[DONE]".into() }.kind(), EventKind::Done);
    }
}
