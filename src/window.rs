//! Rolling three-line window over a TLE catalogue.
//!
//! The window holds the most recent title, line-1 and line-2 candidates and
//! advances one line at a time, so every consecutive pair of lines is offered
//! exactly once, together with the line preceding it as a possible title.

use std::io::{BufRead, Read};

use log::warn;
use thiserror::Error;

/// Longest accepted line, excluding its terminator.
pub const MAX_LINE_LEN: usize = 98;

#[derive(Error, Debug)]
pub enum FramerError {
    #[error("line {line} is longer than {limit} bytes")]
    LineTooLong { line: usize, limit: usize },
}

/// One view of the window: a candidate line-1/line-2 pair and the line before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    /// `None` for the very first pair of the input.
    pub title: Option<&'a [u8]>,
    pub line1: &'a [u8],
    pub line2: &'a [u8],
}

/// Ring of three line buffers fed from a reader.
///
/// Lines are kept as raw bytes without their `\n` / `\r\n` terminator.
pub struct LineWindow<R> {
    reader: R,
    slots: [Vec<u8>; 3],
    incoming: Vec<u8>,
    filled: usize,
    lines_read: usize,
    read_failed: bool,
}

impl<R: BufRead> LineWindow<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            slots: Default::default(),
            incoming: Vec::with_capacity(MAX_LINE_LEN + 2),
            filled: 0,
            lines_read: 0,
            read_failed: false,
        }
    }

    /// Read the next line, shifting the window by one.
    ///
    /// Returns `Ok(false)` at end of input. A failing reader also ends the
    /// input; see [`LineWindow::read_failed`].
    pub fn advance(&mut self) -> Result<bool, FramerError> {
        if !self.read_line()? {
            return Ok(false);
        }
        if self.filled == self.slots.len() {
            self.slots.rotate_left(1);
            std::mem::swap(&mut self.slots[2], &mut self.incoming);
        } else {
            std::mem::swap(&mut self.slots[self.filled], &mut self.incoming);
            self.filled += 1;
        }
        Ok(true)
    }

    /// Current pair, once at least two lines have been read.
    pub fn frame(&self) -> Option<Frame<'_>> {
        match self.filled {
            3 => Some(Frame {
                title: Some(&self.slots[0]),
                line1: &self.slots[1],
                line2: &self.slots[2],
            }),
            2 => Some(Frame {
                title: None,
                line1: &self.slots[0],
                line2: &self.slots[1],
            }),
            _ => None,
        }
    }

    /// True if the input ended on a read error rather than end of stream.
    pub fn read_failed(&self) -> bool {
        self.read_failed
    }

    /// Number of lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    fn read_line(&mut self) -> Result<bool, FramerError> {
        if self.read_failed {
            return Ok(false);
        }
        self.incoming.clear();
        // Room for a maximal line plus "\r\n"; anything past that is too long anyway
        let limit = (MAX_LINE_LEN + 2) as u64;
        let n = match (&mut self.reader).take(limit).read_until(b'\n', &mut self.incoming) {
            Ok(n) => n,
            Err(e) => {
                warn!("read failed after line {}, treating as end of input: {e}", self.lines_read);
                self.read_failed = true;
                return Ok(false);
            }
        };
        if n == 0 {
            return Ok(false);
        }
        self.lines_read += 1;

        if self.incoming.last() == Some(&b'\n') {
            self.incoming.pop();
        }
        if self.incoming.last() == Some(&b'\r') {
            self.incoming.pop();
        }
        if self.incoming.len() > MAX_LINE_LEN {
            return Err(FramerError::LineTooLong {
                line: self.lines_read,
                limit: MAX_LINE_LEN,
            });
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn frames(input: &[u8]) -> Vec<(Option<Vec<u8>>, Vec<u8>, Vec<u8>)> {
        let mut window = LineWindow::new(Cursor::new(input));
        let mut out = Vec::new();
        while window.advance().unwrap() {
            if let Some(f) = window.frame() {
                out.push((f.title.map(<[u8]>::to_vec), f.line1.to_vec(), f.line2.to_vec()));
            }
        }
        out
    }

    #[test]
    fn test_slides_one_line_at_a_time() {
        let got = frames(b"a\nb\nc\nd\n");
        assert_eq!(
            got,
            vec![
                (None, b"a".to_vec(), b"b".to_vec()),
                (Some(b"a".to_vec()), b"b".to_vec(), b"c".to_vec()),
                (Some(b"b".to_vec()), b"c".to_vec(), b"d".to_vec()),
            ]
        );
    }

    #[test]
    fn test_strips_crlf_and_handles_missing_final_newline() {
        let got = frames(b"NAME\r\n1 x\r\n2 y");
        assert_eq!(got.last().unwrap(), &(Some(b"NAME".to_vec()), b"1 x".to_vec(), b"2 y".to_vec()));
    }

    #[test]
    fn test_short_inputs_yield_no_frame() {
        assert!(frames(b"").is_empty());
        assert!(frames(b"only one line\n").is_empty());

        let mut window = LineWindow::new(Cursor::new(&b"only one line\n"[..]));
        while window.advance().unwrap() {}
        assert_eq!(window.lines_read(), 1);
    }

    #[test]
    fn test_keeps_non_utf8_bytes() {
        let got = frames(b"SAT \xe9\n1\n2\n");
        assert_eq!(got[1].0.as_deref(), Some(&b"SAT \xe9"[..]));
    }

    #[test]
    fn test_max_length_line_is_accepted() {
        let mut input = vec![b'x'; MAX_LINE_LEN];
        input.extend_from_slice(b"\r\n");
        input.extend_from_slice(b"next\n");
        let got = frames(&input);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].1.len(), MAX_LINE_LEN);
    }

    /// Yields `data`, then fails every further read.
    struct FailingReader {
        data: Vec<u8>,
        pos: usize,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.data.len() {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "device unavailable"));
            }
            let n = buf.len().min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn test_read_error_ends_input() {
        let reader = FailingReader { data: b"a\nb\nc\n".to_vec(), pos: 0 };
        let mut window = LineWindow::new(std::io::BufReader::new(reader));
        let mut pairs = 0;
        while window.advance().unwrap() {
            pairs += usize::from(window.frame().is_some());
        }
        assert_eq!(pairs, 2);
        assert_eq!(window.lines_read(), 3);
        assert!(window.read_failed());
        assert!(!window.advance().unwrap());
    }

    #[test]
    fn test_clean_eof_is_not_a_read_failure() {
        let mut window = LineWindow::new(Cursor::new(&b"a\nb\n"[..]));
        while window.advance().unwrap() {}
        assert!(!window.read_failed());
    }

    #[test]
    fn test_over_long_line_fails() {
        let mut input = b"title\n".to_vec();
        input.extend(std::iter::repeat(b'x').take(MAX_LINE_LEN + 1));
        input.push(b'\n');
        let mut window = LineWindow::new(Cursor::new(input));
        assert!(window.advance().unwrap());
        assert!(matches!(
            window.advance(),
            Err(FramerError::LineTooLong { line: 2, limit: MAX_LINE_LEN })
        ));
    }
}
