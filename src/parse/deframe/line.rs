use std::io::BufRead;

use crate::parse::deframe::deframe::{fill_buf, Deframe};
use crate::parse::error::{ParsingError, Section};

/// Terminator of the status line.
pub const STATUS_LINE_DELIMITER: Delimiter = Delimiter::Byte(b'\n');

/// Terminator of a header block: the end of the last header line followed by the blank line.
pub const HEADER_BLOCK_DELIMITER: Delimiter = Delimiter::Tail(b"\n\r\n");

/// The condition that ends a line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Delimiter {
    /// A single terminating byte.
    Byte(u8),
    /// A byte sequence the accumulated data must end with.
    /// An accumulator holding nothing but a line ending also terminates, so that a block with no
    /// lines in it ends at its blank line.
    Tail(&'static [u8]),
}

impl Delimiter {
    fn len(&self) -> usize {
        match self {
            Delimiter::Byte(_) => 1,
            Delimiter::Tail(tail) => tail.len(),
        }
    }
}

/// A deframed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// The line with its delimiter stripped.
    pub content: Vec<u8>,
    /// False if the stream ended before the delimiter was found.
    pub terminated: bool,
    /// Number of bytes taken off the stream, delimiter included.
    pub consumed: usize,
}

impl Line {
    /// The content as a string. Invalid UTF-8 is replaced rather than rejected.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

/// Deframer for a delimited line with a cap on its size.
/// Never holds more than `limit + delimiter length` bytes, however much the peer sends.
pub struct LineDeframer {
    delimiter: Delimiter,
    limit: usize,
    section: Section,
    line: Vec<u8>,
}

impl LineDeframer {
    /// Creates a deframer for a line of at most `limit` bytes, excluding the delimiter.
    pub fn new(delimiter: Delimiter, limit: usize, section: Section) -> LineDeframer {
        LineDeframer { delimiter, limit, section, line: Vec::new() }
    }

    fn is_terminated(&self) -> bool {
        match self.delimiter {
            Delimiter::Byte(byte) => self.line.last() == Some(&byte),
            Delimiter::Tail(tail) =>
                self.line.ends_with(tail) || self.line == b"\r\n" || self.line == b"\n",
        }
    }

    fn finish(mut self, terminated: bool) -> Line {
        let consumed = self.line.len();
        if terminated {
            let keep = self.line.len().saturating_sub(self.delimiter.len());
            self.line.truncate(keep);
        }
        Line { content: self.line, terminated, consumed }
    }
}

impl Deframe<Line> for LineDeframer {
    fn read(mut self, reader: &mut impl BufRead) -> Result<Line, ParsingError> {
        // the longest an unterminated accumulator may get while still able to end within the limit
        let max_pending = self.limit.saturating_add(self.delimiter.len() - 1);

        loop {
            let buf = fill_buf(reader, self.section)?;
            if buf.is_empty() {
                return Ok(self.finish(false));
            }

            let mut used = 0;
            let mut terminated = false;
            for &byte in buf {
                used += 1;
                self.line.push(byte);
                if self.is_terminated() {
                    terminated = true;
                    break;
                }
                if self.line.len() > max_pending {
                    return Err(ParsingError::limit(self.section, self.limit as u64));
                }
            }
            reader.consume(used);

            if terminated {
                return Ok(self.finish(true));
            }
        }
    }
}
