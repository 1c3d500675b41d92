use std::collections::HashMap;
use std::io::{BufRead, Read};

use log::{debug, warn};

use crate::common::header::{self, HeaderMap};
use crate::common::method::Method;
use crate::common::upload::UploadedFile;
use crate::parse::body::BodyStrategy::{Discard, Multipart, Plain, Skip};
use crate::parse::deframe::bytes::BytesDeframer;
use crate::parse::deframe::deframe::{fill_buf, Deframe};
use crate::parse::error::{ParsingError, Section};
use crate::parse::form::parse_form;
use crate::parse::limits::Limits;
use crate::parse::multipart::{extract_boundary, MultipartDecoder};
use crate::storage::TempStorage;

/// The value of a request's Content-Length header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentLength {
    Absent,
    /// The header is there, but isn't a non-negative integer.
    Invalid(String),
    Length(u64),
}

/// Gets the content length from the given header map.
pub fn content_length(headers: &HeaderMap) -> ContentLength {
    match headers.get(&header::CONTENT_LENGTH) {
        None => ContentLength::Absent,
        Some(value) => match value.trim().parse() {
            Ok(length) => ContentLength::Length(length),
            Err(_) => ContentLength::Invalid(value.to_string()),
        }
    }
}

/// How the body of a request is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyStrategy {
    /// There is no body to read.
    Skip,
    /// A body of the given length, decoded as a urlencoded form.
    Plain(u64),
    /// A multipart/form-data body of the given length.
    Multipart { boundary: String, length: u64 },
    /// A multipart body without a usable boundary. Its bytes are read and dropped.
    Discard(u64),
}

/// A request body after reading.
#[derive(Debug, Default)]
pub struct Body {
    /// The raw bytes of a plain body. Empty for multipart bodies.
    pub data: Vec<u8>,
    pub post_params: HashMap<String, String>,
    pub uploaded_files: Vec<UploadedFile>,
    /// Number of bytes taken off the stream.
    pub consumed: u64,
}

impl BodyStrategy {
    /// Picks how to read the body of a request with the given method and headers.
    /// Only POST bodies are read. A declared length over the body limit is an error, before any of
    /// the body is read.
    pub fn new(method: &Method, headers: &HeaderMap, limits: &Limits) -> Result<BodyStrategy, ParsingError> {
        if *method != Method::POST {
            return Ok(Skip);
        }

        let length = match content_length(headers) {
            ContentLength::Absent => 0,
            ContentLength::Invalid(value) => {
                debug!("ignoring invalid content length {:?}", value);
                0
            }
            ContentLength::Length(length) => length,
        };

        if length == 0 {
            return Ok(Skip);
        }
        if length > limits.max_body_size {
            return Err(ParsingError::limit(Section::Body, limits.max_body_size));
        }

        let content_type = headers.get(&header::CONTENT_TYPE).unwrap_or("");
        if !is_multipart_form(content_type) {
            return Ok(Plain(length));
        }

        Ok(match extract_boundary(content_type) {
            Ok(boundary) => Multipart { boundary: boundary.to_string(), length },
            Err(err) => {
                warn!("not decoding multipart body: {}", err);
                Discard(length)
            }
        })
    }

    /// Whether this is the body of a multipart/form-data request.
    pub fn is_multipart(&self) -> bool {
        matches!(self, Multipart { .. } | Discard(_))
    }

    /// Reads the body from the reader, which is left at the end of the body.
    pub fn read(self, reader: &mut impl BufRead, limits: &Limits, storage: &dyn TempStorage) -> Result<Body, ParsingError> {
        match self {
            Skip => Ok(Body::default()),
            Plain(length) => {
                let data = BytesDeframer::new(length as usize, Section::Body).read(reader)?;
                Ok(Body {
                    post_params: parse_form(&data),
                    consumed: data.len() as u64,
                    data,
                    ..Body::default()
                })
            }
            Multipart { boundary, length } => {
                let mut body = reader.take(length);
                let decoded = MultipartDecoder::new(&boundary, limits.max_part_headers_size, storage).decode(&mut body)?;
                // whatever follows the closing boundary
                drain(&mut body)?;

                Ok(Body {
                    post_params: decoded.fields,
                    uploaded_files: decoded.files,
                    consumed: length - body.limit(),
                    ..Body::default()
                })
            }
            Discard(length) => {
                let consumed = drain(&mut reader.take(length))?;
                Ok(Body { consumed, ..Body::default() })
            }
        }
    }
}

/// Checks if the content type is multipart/form-data.
fn is_multipart_form(content_type: &str) -> bool {
    content_type.trim_start().to_ascii_lowercase().starts_with("multipart/form-data")
}

/// Reads and drops everything left in the reader. Returns the number of bytes dropped.
fn drain(reader: &mut impl BufRead) -> Result<u64, ParsingError> {
    let mut drained = 0;
    loop {
        let amt = fill_buf(reader, Section::Body)?.len();
        if amt == 0 {
            return Ok(drained);
        }
        reader.consume(amt);
        drained += amt as u64;
    }
}
