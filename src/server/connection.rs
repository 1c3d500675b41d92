use std::io::{BufRead, Write};
use std::net::SocketAddr;

use log::debug;

use crate::common::request::Request;
use crate::parse::error::ParsingError;
use crate::parse::request::RequestParser;
use crate::server::connection::ReadRequestResult::{Closed, Error, Ready};

/// The result of attempting to read a request.
#[derive(Debug)]
pub enum ReadRequestResult {
    /// A new request has been parsed.
    Ready(Request),
    /// An error occurred while trying to read a request. The connection can't be used any more.
    Error(ParsingError),
    /// The connection was closed.
    Closed,
}

/// A connection to a client, read from and written to by one thread.
pub struct Connection<R: BufRead, W: Write> {
    /// The address of the client.
    pub addr: Option<SocketAddr>,
    /// Number of requests read so far.
    requests: usize,
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Connection<R, W> {
    /// Creates a new connection out of the given address and the two halves of its stream.
    pub fn new(addr: Option<SocketAddr>, reader: R, writer: W) -> Connection<R, W> {
        Connection { addr, requests: 0, reader, writer }
    }

    /// Reads the next request off the connection.
    /// A kept-alive connection going quiet before its next request counts as closed.
    pub fn read_request(&mut self, parser: &RequestParser) -> ReadRequestResult {
        match parser.parse(&mut self.reader, self.addr) {
            Ok(request) => {
                self.requests += 1;
                Ready(request)
            }
            Err(ParsingError::ConnectionClosed) => Closed,
            Err(ParsingError::Idle) if self.requests > 0 => {
                debug!("{:?} sent nothing after {} requests", self.addr, self.requests);
                Closed
            }
            Err(err) => Error(err),
        }
    }
}

impl<R: BufRead, W: Write> Write for Connection<R, W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}
