use std::io::BufRead;

use crate::parse::deframe::deframe::{fill_buf, Deframe};
use crate::parse::error::{ParsingError, Section};

/// Deframer for a specified number of bytes.
/// If the stream ends early, whatever arrived is returned.
pub struct BytesDeframer {
    data: Vec<u8>,
    size: usize,
    section: Section,
}

impl BytesDeframer {
    /// Creates a new deframer for deframing the specified number of bytes.
    pub fn new(size: usize, section: Section) -> BytesDeframer {
        BytesDeframer { data: Vec::new(), size, section }
    }
}

impl Deframe<Vec<u8>> for BytesDeframer {
    fn read(mut self, reader: &mut impl BufRead) -> Result<Vec<u8>, ParsingError> {
        while self.data.len() < self.size {
            let buf = fill_buf(reader, self.section)?;
            if buf.is_empty() {
                break;
            }

            let amt = buf.len().min(self.size - self.data.len());
            self.data.extend_from_slice(&buf[..amt]);
            reader.consume(amt);
        }

        Ok(self.data)
    }
}
