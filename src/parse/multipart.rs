use std::collections::{HashMap, VecDeque};
use std::io::{BufRead, Write};

use log::{debug, warn};
use thiserror::Error;

use crate::common::header::{HeaderMap, CONTENT_DISPOSITION, CONTENT_TYPE};
use crate::common::upload::UploadedFile;
use crate::parse::deframe::deframe::{fill_buf, Deframe};
use crate::parse::deframe::line::{LineDeframer, HEADER_BLOCK_DELIMITER, STATUS_LINE_DELIMITER};
use crate::parse::error::{ParsingError, Section};
use crate::parse::headers::parse_header_block;
use crate::storage::{discard, TempFile, TempStorage};

/// Part bodies are handed to their sink in chunks of about this size.
const COPY_BUF_SIZE: usize = 8 * 1024;

/// A multipart body that can't be decoded any further. Never fatal to the request: whatever was
/// decoded before it is kept.
#[derive(Debug, Error)]
pub enum MultipartError {
    #[error("content type has no boundary parameter")]
    MissingBoundary,
    #[error("boundary parameter is empty")]
    EmptyBoundary,
    #[error("body has no opening boundary")]
    MissingOpeningBoundary,
    #[error("part has no content-disposition name")]
    MissingName,
    #[error("body ended inside a part")]
    Truncated,
    #[error("could not store uploaded file: {0}")]
    Storage(std::io::Error),
}

/// Gets the boundary token from a multipart Content-Type value,
/// e.g. `multipart/form-data; boundary=----abc` gives `----abc`.
pub fn extract_boundary(content_type: &str) -> Result<&str, MultipartError> {
    const PARAM: &str = "boundary=";

    let start = content_type.to_ascii_lowercase().find(PARAM).ok_or(MultipartError::MissingBoundary)?;
    let value = &content_type[start + PARAM.len()..];
    let boundary = value.split(';').next().unwrap_or("").trim().trim_matches('"');

    if boundary.is_empty() {
        return Err(MultipartError::EmptyBoundary);
    }
    Ok(boundary)
}

/// The fields and files of a multipart body.
#[derive(Debug, Default)]
pub struct MultipartBody {
    pub fields: HashMap<String, String>,
    pub files: Vec<UploadedFile>,
}

/// Why decoding stopped early.
enum DecodeError {
    Fatal(ParsingError),
    Malformed(MultipartError),
}

impl From<ParsingError> for DecodeError {
    fn from(err: ParsingError) -> Self {
        DecodeError::Fatal(err)
    }
}

impl From<MultipartError> for DecodeError {
    fn from(err: MultipartError) -> Self {
        DecodeError::Malformed(err)
    }
}

/// Decoder for a multipart/form-data body.
pub struct MultipartDecoder<'a> {
    /// "--" followed by the boundary token.
    dash_boundary: String,
    /// What ends a part body: CRLF, then the dash boundary.
    delimiter: Vec<u8>,
    max_part_headers_size: usize,
    storage: &'a dyn TempStorage,
}

impl<'a> MultipartDecoder<'a> {
    /// Creates a decoder for parts separated by the given boundary token. File parts are written
    /// into the given storage.
    pub fn new(boundary: &str, max_part_headers_size: usize, storage: &'a dyn TempStorage) -> MultipartDecoder<'a> {
        let dash_boundary = format!("--{}", boundary);
        let delimiter = format!("\r\n{}", dash_boundary).into_bytes();
        MultipartDecoder { dash_boundary, delimiter, max_part_headers_size, storage }
    }

    /// Decodes parts from the reader until the closing boundary or the end of the reader, which
    /// should be limited to the body's length. A malformed body stops decoding without an error.
    pub fn decode(&self, reader: &mut impl BufRead) -> Result<MultipartBody, ParsingError> {
        let mut body = MultipartBody::default();

        match self.decode_parts(reader, &mut body) {
            Ok(()) => {}
            Err(DecodeError::Fatal(err)) => {
                // nobody gets to see the files of a failed request
                for file in &body.files {
                    discard(file.path());
                }
                return Err(err);
            }
            Err(DecodeError::Malformed(err)) =>
                warn!("abandoning multipart body after {} fields and {} files: {}", body.fields.len(), body.files.len(), err),
        }

        Ok(body)
    }

    fn decode_parts(&self, reader: &mut impl BufRead, body: &mut MultipartBody) -> Result<(), DecodeError> {
        if self.skip_preamble(reader)? {
            return Ok(());
        }

        loop {
            let headers = self.read_part_headers(reader)?;
            let disposition = headers.get(&CONTENT_DISPOSITION).unwrap_or("");
            let name = disposition_param(disposition, "name").ok_or(MultipartError::MissingName)?;

            match disposition_param(disposition, "filename") {
                Some(filename) => self.decode_file(reader, &headers, name, filename, body)?,
                None => self.decode_field(reader, name, body)?,
            }

            if self.read_boundary_end(reader)? {
                return Ok(());
            }
        }
    }

    /// Skips everything up to and including the opening boundary line.
    /// Returns true if the body is already over, because the closing boundary came first.
    fn skip_preamble(&self, reader: &mut impl BufRead) -> Result<bool, DecodeError> {
        let closing = format!("{}--", self.dash_boundary);

        loop {
            let line = LineDeframer::new(STATUS_LINE_DELIMITER, self.max_part_headers_size, Section::PartHeaders).read(reader)?;
            let text = line.to_string_lossy();
            let text = text.trim_end();

            if text == self.dash_boundary {
                return Ok(false);
            }
            if text == closing {
                return Ok(true);
            }
            if !line.terminated {
                return Err(MultipartError::MissingOpeningBoundary.into());
            }
            debug!("skipping multipart preamble line");
        }
    }

    fn read_part_headers(&self, reader: &mut impl BufRead) -> Result<HeaderMap, DecodeError> {
        let block = LineDeframer::new(HEADER_BLOCK_DELIMITER, self.max_part_headers_size, Section::PartHeaders).read(reader)?;
        if !block.terminated {
            return Err(MultipartError::Truncated.into());
        }
        Ok(parse_header_block(&block.to_string_lossy()))
    }

    fn decode_field(&self, reader: &mut impl BufRead, name: String, body: &mut MultipartBody) -> Result<(), DecodeError> {
        let mut value = Vec::new();
        if self.copy_part_body(reader, &mut value)?.is_none() {
            return Err(MultipartError::Truncated.into());
        }

        body.fields.insert(name, String::from_utf8_lossy(&value).into_owned());
        Ok(())
    }

    fn decode_file(&self, reader: &mut impl BufRead, headers: &HeaderMap, name: String, filename: String, body: &mut MultipartBody) -> Result<(), DecodeError> {
        let TempFile { mut writer, path } = self.storage.create(&name, &filename).map_err(MultipartError::Storage)?;

        let copied = self.copy_part_body(reader, &mut *writer)
            .and_then(|size| match writer.flush() {
                Ok(()) => Ok(size),
                Err(err) => Err(MultipartError::Storage(err).into()),
            });
        drop(writer);

        match copied {
            Ok(Some(size)) => {
                debug!("stored upload {:?} of field {:?} ({} bytes) at {}", filename, name, size, path.display());
                let content_type = headers.get(&CONTENT_TYPE).map(str::to_string);
                body.files.push(UploadedFile::new(name, filename, content_type, size, path));
                Ok(())
            }
            Ok(None) => {
                discard(&path);
                Err(MultipartError::Truncated.into())
            }
            Err(err) => {
                discard(&path);
                Err(err)
            }
        }
    }

    /// Copies a part body into the sink, up to the delimiter that ends it.
    /// The delimiter is consumed but not copied. Returns the number of bytes copied, or None if
    /// the reader ended first.
    fn copy_part_body(&self, reader: &mut impl BufRead, sink: &mut dyn Write) -> Result<Option<u64>, DecodeError> {
        let delimiter = self.delimiter.as_slice();
        let last = delimiter[delimiter.len() - 1];

        // the most recent bytes, which may turn out to be the delimiter
        let mut window: VecDeque<u8> = VecDeque::with_capacity(delimiter.len());
        let mut pending: Vec<u8> = Vec::with_capacity(COPY_BUF_SIZE);
        let mut copied = 0u64;

        loop {
            let buf = fill_buf(reader, Section::PartBody)?;
            if buf.is_empty() {
                return Ok(None);
            }

            let mut used = 0;
            let mut found = false;
            for &byte in buf {
                used += 1;
                window.push_back(byte);
                if window.len() < delimiter.len() {
                    continue;
                }
                if byte == last && window.iter().eq(delimiter.iter()) {
                    found = true;
                    break;
                }
                if let Some(front) = window.pop_front() {
                    pending.push(front);
                }
            }
            reader.consume(used);

            if found || pending.len() >= COPY_BUF_SIZE {
                sink.write_all(&pending).map_err(MultipartError::Storage)?;
                copied += pending.len() as u64;
                pending.clear();
            }
            if found {
                return Ok(Some(copied));
            }
        }
    }

    /// Reads the rest of a boundary line after a delimiter.
    /// Returns true if it was the closing boundary, or the body ended.
    fn read_boundary_end(&self, reader: &mut impl BufRead) -> Result<bool, DecodeError> {
        let line = LineDeframer::new(STATUS_LINE_DELIMITER, self.max_part_headers_size, Section::PartHeaders).read(reader)?;
        let closing = line.content.starts_with(b"--");
        Ok(closing || !line.terminated)
    }
}

/// Gets a parameter of a Content-Disposition value, with any quotes removed.
fn disposition_param(disposition: &str, key: &str) -> Option<String> {
    split_params(disposition).into_iter()
        .skip(1)
        .find_map(|param| {
            let (name, value) = param.split_once('=')?;
            if name.trim().eq_ignore_ascii_case(key) {
                Some(unquote(value.trim()))
            } else {
                None
            }
        })
}

/// Splits a header value on the semicolons that are outside of quoted strings.
fn split_params(value: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = 0;
    let mut quoted = false;

    for (i, c) in value.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ';' if !quoted => {
                params.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(&value[start..]);

    params
}

fn unquote(value: &str) -> String {
    value.strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .map(|v| v.replace("\\\"", "\""))
        .unwrap_or_else(|| value.to_string())
}
