//! Minimal Server-Sent-Events framing.
//!
//! Only what delta streams need: `event:` names, `data:` lines (joined
//! without a separator), blank-line dispatch, and the `[DONE]` sentinel.
//! Lines may end in `\r\n`, `\n` or a lone `\r`.
//! `id:`, `retry:`, and comment lines are ignored.

mod framer;
mod lines;

pub use framer::{frame_events, EventKind, Events, SseEvent, SseFramer, DONE_SENTINEL};
pub use lines::{lines, SseLines};
