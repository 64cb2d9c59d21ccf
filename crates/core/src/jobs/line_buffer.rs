//! Line assembly over arbitrary read boundaries.

/// Longest line kept, in bytes. Longer lines keep only their tail.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Accumulates bytes from one pipe and yields complete lines.
///
/// Invariant: after every [`push`](Self::push) at most one unterminated
/// fragment is pending, and it never holds more than `2 * MAX_LINE_BYTES`.
/// Each byte is scanned for a terminator once. Bytes are decoded lossily,
/// so a script printing invalid UTF-8 still produces events.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
    /// Whether the pending fragment already lost its head.
    clipped: bool,
    clipped_lines: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `chunk` and return every line it completed, without the
    /// terminator. A `\r` before the `\n` is stripped as well.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        let mut rest = chunk;
        while let Some(pos) = rest.iter().position(|b| *b == b'\n') {
            self.append(&rest[..pos]);
            lines.push(self.take_line());
            rest = &rest[pos + 1..];
        }
        self.append(rest);
        lines
    }

    /// Lines that were cut down to their last `MAX_LINE_BYTES` so far.
    pub fn clipped_lines(&self) -> usize {
        self.clipped_lines
    }

    /// Force-flush at end of stream.
    ///
    /// With `keep_partial` the trailing fragment is returned as a final
    /// line; otherwise it is dropped. Either way the buffer is left empty.
    pub fn finish(&mut self, keep_partial: bool) -> Option<String> {
        if keep_partial && !self.pending.is_empty() {
            Some(self.take_line())
        } else {
            self.pending.clear();
            self.clipped = false;
            None
        }
    }

    fn append(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
        // Clip only past twice the limit so draining stays amortized.
        if self.pending.len() > 2 * MAX_LINE_BYTES {
            self.clip();
        }
    }

    fn clip(&mut self) {
        let excess = self.pending.len() - MAX_LINE_BYTES;
        self.pending.drain(..excess);
        self.clipped = true;
    }

    fn take_line(&mut self) -> String {
        if self.pending.len() > MAX_LINE_BYTES {
            self.clip();
        }
        if std::mem::take(&mut self.clipped) {
            self.clipped_lines += 1;
        }
        let line = decode_line(&self.pending);
        self.pending.clear();
        line
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
