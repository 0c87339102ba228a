// FrameReader - blocking line source for the frame decoder

use std::io::{self, BufRead};

use crate::protocol::{FrameDecoder, FrameEvent, ReaderState};

/// Pulls newline-terminated lines from the device and yields capture events
///
/// Bytes outside ASCII are dropped, lines are trimmed, and blank lines are
/// skipped before the decoder ever sees them.
pub struct FrameReader<R> {
    source: R,
    decoder: FrameDecoder,
    buf: Vec<u8>,
    lines_read: u64,
}

impl<R: BufRead> FrameReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            decoder: FrameDecoder::new(),
            buf: Vec::with_capacity(128),
            lines_read: 0,
        }
    }

    pub fn state(&self) -> &ReaderState {
        self.decoder.state()
    }

    /// Number of non-blank lines consumed so far
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Block until the next complete capture
    ///
    /// # Returns
    /// * `Ok(Some(FrameEvent))` - A baseline or sample completed
    /// * `Ok(None)` - Stream ended; a capture still in progress is abandoned
    /// * `Err(io::Error)` - The underlying stream failed
    pub fn next_event(&mut self) -> io::Result<Option<FrameEvent>> {
        loop {
            let Some(line) = self.read_line()? else {
                if *self.decoder.state() != ReaderState::Idle {
                    log::warn!(
                        "[Protocol] Stream ended mid-capture ({:?}); capture dropped",
                        self.decoder.state()
                    );
                }
                return Ok(None);
            };
            if let Some(event) = self.decoder.feed(&line) {
                return Ok(Some(event));
            }
        }
    }

    /// Next non-blank ASCII line, or `None` at end of stream
    ///
    /// `buf` is only cleared once a line is complete. A read timeout leaves
    /// the bytes collected so far in place and the next read appends to them.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        loop {
            match self.source.read_until(b'\n', &mut self.buf) {
                Ok(_) => {}
                // Serial drivers report an idle read timeout; keep listening
                Err(err) if err.kind() == io::ErrorKind::TimedOut => continue,
                Err(err) => return Err(err),
            }
            if self.buf.is_empty() {
                return Ok(None);
            }

            let line: String = self
                .buf
                .iter()
                .filter(|b| b.is_ascii())
                .map(|&b| b as char)
                .collect();
            self.buf.clear();
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            self.lines_read += 1;
            log::debug!("[Device] {}", line);
            return Ok(Some(line.to_string()));
        }
    }
}
