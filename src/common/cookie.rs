use std::cell::OnceCell;
use std::collections::HashMap;

use log::warn;
use percent_encoding::percent_decode_str;
use thiserror::Error;

/// Error for a Cookie header that can't be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CookieError {
    /// A segment had no '='. One bad segment discards the whole header.
    #[error("cookie segment {0:?} has no '='")]
    MalformedSegment(String),
}

/// Decodes a Cookie header value into a map of names to values.
/// Segments are split on ';' and then on the first '='. Names are trimmed and values URL decoded.
/// Blank segments (e.g. after a trailing ';') are skipped.
pub fn parse_cookies(header: &str) -> Result<HashMap<String, String>, CookieError> {
    let mut cookies = HashMap::new();

    for segment in header.split(';').filter(|segment| !segment.trim().is_empty()) {
        let (name, value) = segment.split_once('=')
            .ok_or_else(|| CookieError::MalformedSegment(segment.to_string()))?;
        cookies.insert(name.trim().to_string(), url_decode(value));
    }

    Ok(cookies)
}

/// Decodes %XX escapes, with '+' standing for a space.
fn url_decode(value: &str) -> String {
    percent_decode_str(&value.replace('+', " ")).decode_utf8_lossy().into_owned()
}

/// Cookies of one request, decoded on first use and kept for the life of the request.
#[derive(Debug, Default)]
pub struct LazyCookies {
    cell: OnceCell<Result<HashMap<String, String>, CookieError>>,
}

impl LazyCookies {
    pub fn new() -> LazyCookies {
        LazyCookies { cell: OnceCell::new() }
    }

    /// Returns the decoded cookies, decoding the given header if this is the first call.
    /// A missing header decodes to no cookies.
    pub fn get_or_decode(&self, header: Option<&str>) -> &Result<HashMap<String, String>, CookieError> {
        self.cell.get_or_init(|| {
            let cookies = header.map(parse_cookies).unwrap_or_else(|| Ok(HashMap::new()));
            if let Err(err) = &cookies {
                warn!("ignoring all cookies of request: {}", err);
            }
            cookies
        })
    }

    /// Returns true once the header has been decoded.
    pub fn is_decoded(&self) -> bool {
        self.cell.get().is_some()
    }
}
