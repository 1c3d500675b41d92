use std::io::{BufRead, Error, ErrorKind, Read};
use std::time::{Duration, Instant};

use log::debug;

use crate::parse::error::{ParsingError, Section};

/// Trait for blocking reads of one framed value off a stream. The deframer is consumed by the read.
pub trait Deframe<T>: Sized {
    /// Reads from the reader until a value can be constructed, the stream ends, or a limit is hit.
    fn read(self, reader: &mut impl BufRead) -> Result<T, ParsingError>;
}

/// Fills the reader's buffer, mapping IO failures to how the parser treats them.
/// Interrupted reads are retried. A timed out read is fatal to the request.
/// Any other failure (reset, aborted, broken pipe, ...) is treated as the end of the stream,
/// which is signalled by an empty slice.
pub fn fill_buf<R: BufRead>(reader: &mut R, section: Section) -> Result<&[u8], ParsingError> {
    loop {
        match reader.fill_buf() {
            Ok(_) => break,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return read_failure(err, section),
        }
    }
    // the buffer is filled, so this does no IO
    reader.fill_buf().or_else(|err| read_failure(err, section))
}

fn read_failure<'a>(err: Error, section: Section) -> Result<&'a [u8], ParsingError> {
    match err.kind() {
        ErrorKind::WouldBlock | ErrorKind::TimedOut => Err(ParsingError::Timeout(section)),
        _ => {
            debug!("treating read error as end of stream while reading {}: {}", section, err);
            Ok(&[])
        }
    }
}

/// A reader that fails with `TimedOut` once its deadline has passed, however steadily data is
/// still arriving.
pub struct DeadlineReader<R> {
    inner: R,
    deadline: Option<Instant>,
}

impl<R> DeadlineReader<R> {
    /// Wraps the reader with a deadline the given time from now. None never expires.
    pub fn new(inner: R, timeout: Option<Duration>) -> DeadlineReader<R> {
        DeadlineReader { inner, deadline: timeout.map(|timeout| Instant::now() + timeout) }
    }

    fn check(&self) -> std::io::Result<()> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline =>
                Err(Error::new(ErrorKind::TimedOut, "request deadline passed")),
            _ => Ok(()),
        }
    }
}

impl<R: Read> Read for DeadlineReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.check()?;
        self.inner.read(buf)
    }
}

impl<R: BufRead> BufRead for DeadlineReader<R> {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        self.check()?;
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt)
    }
}
