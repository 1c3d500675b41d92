use std::io::BufRead;
use std::net::SocketAddr;

use log::debug;

use crate::common::cookie::LazyCookies;
use crate::common::header::HeaderMap;
use crate::common::request::Request;
use crate::parse::body::BodyStrategy;
use crate::parse::deframe::deframe::{fill_buf, DeadlineReader, Deframe};
use crate::parse::deframe::line::{LineDeframer, HEADER_BLOCK_DELIMITER, STATUS_LINE_DELIMITER};
use crate::parse::error::{ParsingError, Section};
use crate::parse::headers::parse_header_block;
use crate::parse::limits::Limits;
use crate::parse::status_line::parse_status_line;
use crate::stats::Statistics;
use crate::storage::TempStorage;

/// Parser for requests.
pub struct RequestParser<'a> {
    limits: &'a Limits,
    storage: &'a dyn TempStorage,
    stats: &'a dyn Statistics,
}

impl<'a> RequestParser<'a> {
    /// Creates a new request parser. Uploaded files go into the given storage, and the size of
    /// every request is reported to the given statistics.
    pub fn new(limits: &'a Limits, storage: &'a dyn TempStorage, stats: &'a dyn Statistics) -> RequestParser<'a> {
        RequestParser { limits, storage, stats }
    }

    /// Reads one request from the reader, which is left at the start of the next request.
    /// The whole request must arrive within the request timeout, counted from this call.
    pub fn parse(&self, reader: &mut impl BufRead, remote_addr: Option<SocketAddr>) -> Result<Request, ParsingError> {
        let mut reader = DeadlineReader::new(reader, self.limits.request_timeout);

        match fill_buf(&mut reader, Section::StatusLine) {
            Ok(buf) if buf.is_empty() => return Err(ParsingError::ConnectionClosed),
            Ok(_) => {}
            Err(ParsingError::Timeout(_)) => return Err(ParsingError::Idle),
            Err(err) => return Err(err),
        }

        let line = LineDeframer::new(STATUS_LINE_DELIMITER, self.limits.max_status_line_size, Section::StatusLine).read(&mut reader)?;
        self.stats.add_bytes_received(line.consumed as u64);
        let status_line = parse_status_line(&line.to_string_lossy());

        let headers = self.read_headers(&mut reader)?;

        let strategy = BodyStrategy::new(&status_line.method, &headers, self.limits)?;
        let multipart = strategy.is_multipart();
        let body = strategy.read(&mut reader, self.limits, self.storage)?;
        if body.consumed > 0 {
            self.stats.add_bytes_received(body.consumed);
        }

        debug!("read {} {} with {} headers, {} body params and {} files",
            status_line.method_token, status_line.path, headers.len(), body.post_params.len(), body.uploaded_files.len());
        self.stats.add_request();

        Ok(Request {
            method: status_line.method,
            method_token: status_line.method_token,
            path: status_line.path,
            protocol: status_line.protocol,
            query_params: status_line.query,
            headers,
            post_params: body.post_params,
            body: body.data,
            uploaded_files: body.uploaded_files,
            cookies: LazyCookies::new(),
            keep_alive: false,
            multipart,
            remote_addr,
        })
    }

    fn read_headers(&self, reader: &mut impl BufRead) -> Result<HeaderMap, ParsingError> {
        let block = LineDeframer::new(HEADER_BLOCK_DELIMITER, self.limits.max_header_block_size, Section::HeaderBlock).read(reader)?;
        if block.consumed > 0 {
            self.stats.add_bytes_received(block.consumed as u64);
        }
        if !block.terminated {
            debug!("stream ended inside the header block");
        }
        Ok(parse_header_block(&block.to_string_lossy()))
    }
}
