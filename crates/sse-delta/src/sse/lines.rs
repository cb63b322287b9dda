//! Line splitting for event streams.
//!
//! A line ends at `\r\n`, `\n` or a lone `\r`. A terminator at the very end
//! of the input does not produce an extra empty line.

/// Iterator over the lines of an event stream, terminators removed.
#[derive(Debug, Clone)]
pub struct SseLines<'a> {
    rest: &'a str,
}

/// Split `input` on every SSE line terminator.
pub fn lines(input: &str) -> SseLines<'_> {
    SseLines { rest: input }
}

impl<'a> Iterator for SseLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let Some(end) = self.rest.find(|c: char| c == '\r' || c == '\n') else {
            let line = self.rest;
            self.rest = "";
            return Some(line);
        };
        let line = &self.rest[..end];
        let after = &self.rest[end..];
        let skip = if after.starts_with("\r\n") { 2 } else { 1 };
        self.rest = &after[skip..];
        Some(line)
    }
}
