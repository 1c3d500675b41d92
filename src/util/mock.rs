use std::cell::RefCell;
use std::cmp::min;
use std::io::{Error, ErrorKind, Read, Write};
use std::rc::Rc;
use std::thread::sleep;
use std::time::Duration;

/// A reader handing out the given fragments one read at a time.
pub struct MockReader {
    /// Return WouldBlock instead of EOF once the data runs out, like a socket whose read timeout elapsed.
    pub return_would_block_when_empty: bool,
    /// Return an error of this kind instead of EOF once the data runs out.
    pub error_when_empty: Option<ErrorKind>,
    pub data: Vec<Vec<u8>>,
}

impl MockReader {
    pub fn from_strs(data: Vec<&str>) -> MockReader {
        MockReader::from_bytes(data.into_iter().map(|s| s.as_bytes()).collect())
    }

    pub fn from_bytes(data: Vec<&[u8]>) -> MockReader {
        MockReader {
            data: data.into_iter().map(|s| s.to_vec()).collect(),
            return_would_block_when_empty: false,
            error_when_empty: None,
        }
    }
}

impl Read for MockReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.data.is_empty() {
            if self.return_would_block_when_empty {
                return Err(Error::from(ErrorKind::WouldBlock));
            }
            return match self.error_when_empty {
                Some(kind) => Err(Error::from(kind)),
                None => Ok(0),
            };
        }

        let next = &mut self.data[0];

        let amount = min(buf.len(), next.len());
        buf[..amount].copy_from_slice(&next[..amount]);
        next.drain(..amount);

        if next.is_empty() {
            self.data.remove(0);
        }

        Ok(amount)
    }
}

/// A reader that, after the given fragments, repeats a sequence forever.
pub struct EndlessMockReader {
    finite_reader: MockReader,
    sequence: Vec<u8>,
    current: usize,
}

impl EndlessMockReader {
    pub fn from_strs(finite_data: Vec<&str>, sequence: &str) -> EndlessMockReader {
        EndlessMockReader { finite_reader: MockReader::from_strs(finite_data), sequence: sequence.as_bytes().to_vec(), current: 0 }
    }

    pub fn from_bytes(finite_data: Vec<&[u8]>, sequence: &[u8]) -> EndlessMockReader {
        EndlessMockReader { finite_reader: MockReader::from_bytes(finite_data), sequence: sequence.to_vec(), current: 0 }
    }
}

impl Read for EndlessMockReader {
    fn read(&mut self, mut buf: &mut [u8]) -> std::io::Result<usize> {
        let size = self.finite_reader.read(buf)?;
        if size > 0 {
            Ok(size)
        } else {
            let start = self.current;
            let range = min(self.sequence.len() - start, buf.len());
            buf.write_all(&self.sequence[start..(start + range)])?;
            self.current = (start + range) % self.sequence.len();
            Ok(range)
        }
    }
}

/// A reader that waits before every read and then hands out a single byte, like a peer sending
/// just fast enough to never hit a read timeout.
pub struct TrickleReader<R: Read> {
    inner: R,
    pause: Duration,
}

impl<R: Read> TrickleReader<R> {
    pub fn new(inner: R, pause: Duration) -> TrickleReader<R> {
        TrickleReader { inner, pause }
    }
}

impl<R: Read> Read for TrickleReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        sleep(self.pause);
        self.inner.read(&mut buf[..1])
    }
}

/// A writer recording everything written to it.
pub struct MockWriter {
    pub written: Rc<RefCell<Vec<u8>>>,
}

impl MockWriter {
    pub fn new() -> MockWriter {
        MockWriter { written: Rc::new(RefCell::new(vec![])) }
    }
}

impl Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.written.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{ErrorKind, Read};

    use crate::util::mock::{EndlessMockReader, MockReader};

    fn test_read(reader: &mut impl Read, expected: &str, buf_size: usize) {
        let mut buf = vec![0u8; buf_size];
        let len = reader.read(&mut buf).unwrap();
        assert_eq!(expected, String::from_utf8_lossy(&buf[..len]));
    }

    #[test]
    fn mock_reader_fragments() {
        let mut reader = MockReader::from_strs(vec!["hello", "world"]);

        test_read(&mut reader, "hel", 3);
        test_read(&mut reader, "lo", 10);
        test_read(&mut reader, "world", 10);
        test_read(&mut reader, "", 10);
    }

    #[test]
    fn mock_reader_error_when_empty() {
        let mut reader = MockReader::from_strs(vec!["hi"]);
        reader.error_when_empty = Some(ErrorKind::ConnectionReset);

        test_read(&mut reader, "hi", 10);
        let mut buf = [0u8; 4];
        assert_eq!(reader.read(&mut buf).unwrap_err().kind(), ErrorKind::ConnectionReset);
    }

    #[test]
    fn endless_mock_reader() {
        let mut reader = EndlessMockReader::from_strs(vec!["hello", "world", "ok bye"], "blah");

        test_read(&mut reader, "hello", 5);
        test_read(&mut reader, "w", 1);
        test_read(&mut reader, "orl", 3);
        test_read(&mut reader, "d", 3);
        test_read(&mut reader, "ok b", 4);
        test_read(&mut reader, "ye", 10);
        test_read(&mut reader, "blah", 10);
        test_read(&mut reader, "bla", 3);
        test_read(&mut reader, "h", 3);
        test_read(&mut reader, "bl", 2);
        test_read(&mut reader, "ah", 10);

        for _ in 0..100 {
            test_read(&mut reader, "blah", 10);
        }
    }
}
