use std::fmt::{Display, Formatter};

use crate::common::header::Header::{Custom, Standard};

/// A header name, always lower case. Is either a "Standard" header with a static string, or a
/// "Custom" header with a uniquely allocated String.
/// The "Standard" variant is to reuse memory for frequently seen headers.
#[derive(PartialEq, Eq, Hash, Debug, Clone)]
pub enum Header {
    Standard(&'static str),
    Custom(String),
}

impl Header {
    pub fn as_str(&self) -> &str {
        match self {
            Standard(str) => str,
            Custom(str) => str.as_str()
        }
    }
}

impl Display for Header {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! standard_headers {
    (
        $(
            $(#[$docs:meta])*
            ($name:ident, $value:expr);
        )+
    ) => {
        $(
            $(#[$docs])*
            pub const $name: Header = Header::Standard($value);
        )+

        impl From<String> for Header {
            /// Gets a header from the given string representing the header name.
            fn from(mut value: String) -> Header {
                value.make_ascii_lowercase();
                match value.as_str() {
                    $(
                    $value => $name,
                    )+
                    _ => Header::Custom(value)
                }
            }
        }
    }
}

impl From<&str> for Header {
    /// Gets a header from the given string representing the header name.
    fn from(value: &str) -> Header {
        Header::from(value.to_string())
    }
}

standard_headers! {
    (ACCEPT, "accept");
    (ACCEPT_CHARSET, "accept-charset");
    (ACCEPT_ENCODING, "accept-encoding");
    (ACCEPT_LANGUAGE, "accept-language");
    (AUTHORIZATION, "authorization");
    (CACHE_CONTROL, "cache-control");
    (CONNECTION, "connection");
    (CONTENT_DISPOSITION, "content-disposition");
    (CONTENT_ENCODING, "content-encoding");
    (CONTENT_LENGTH, "content-length");
    (CONTENT_TYPE, "content-type");
    (COOKIE, "cookie");
    (DNT, "dnt");
    (EXPECT, "expect");
    (FORWARDED, "forwarded");
    (HOST, "host");
    (IF_MODIFIED_SINCE, "if-modified-since");
    (IF_NONE_MATCH, "if-none-match");
    (ORIGIN, "origin");
    (PRAGMA, "pragma");
    (RANGE, "range");
    (REFERER, "referer");
    (TRANSFER_ENCODING, "transfer-encoding");
    (USER_AGENT, "user-agent");
    (UPGRADE, "upgrade");
    (UPGRADE_INSECURE_REQUESTS, "upgrade-insecure-requests");
}

/// Creates a map of headers.
/// ```
/// use littleserver::common::header::{CONNECTION, CONTENT_TYPE, CONTENT_LENGTH, Header};
/// use littleserver::header_map;
///
/// let headers = header_map![
///    (CONNECTION, "keep-alive"),
///    (CONTENT_LENGTH, "5"),
///    ("custom-header", "hello"),
///    ("coNtEnt-TyPE", "something"),
/// ];
///
/// assert!(headers.contains_header_value(&CONNECTION, "keep-alive"));
/// assert_eq!(headers.get(&CONTENT_LENGTH), Some("5"));
/// assert_eq!(headers.get(&CONTENT_TYPE), Some("something"));
/// assert_eq!(headers.get(&Header::Custom("custom-header".into())), Some("hello"));
/// ```
#[macro_export]
macro_rules! header_map {
    () => { $crate::common::header::HeaderMap::new() };
    ($(($header:expr, $value:expr)),+ $(,)?) => {
        $crate::common::header::HeaderMap::from_pairs(vec![
            $(($header.into(), $value.into()),)+
        ])
    }
}

/// Headers of a request, in the order their names were first seen.
/// Every value is kept; single value lookups see the last one received for a name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(Header, Vec<String>)>,
}

impl HeaderMap {
    pub fn new() -> HeaderMap {
        HeaderMap { entries: Vec::new() }
    }

    /// Gets a header map from the given header and value pairs.
    pub fn from_pairs(header_values: Vec<(Header, String)>) -> HeaderMap {
        header_values.into_iter().fold(HeaderMap::new(), |mut m, (header, value)| {
            m.add_header(header, value);
            m
        })
    }

    /// Adds a value for the header. A name seen before keeps its original position.
    pub fn add_header(&mut self, k: Header, v: String) {
        match self.entries.iter_mut().find(|(header, _)| *header == k) {
            Some((_, values)) => values.push(v),
            None => self.entries.push((k, vec![v])),
        }
    }

    /// Gets the last value received for the header.
    pub fn get(&self, k: &Header) -> Option<&str> {
        self.get_all(k).last().map(String::as_str)
    }

    /// Gets every value received for the header, in arrival order.
    pub fn get_all(&self, k: &Header) -> &[String] {
        self.entries.iter()
            .find(|(header, _)| header == k)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, k: &Header) -> bool {
        self.entries.iter().any(|(header, _)| header == k)
    }

    /// Checks if any value of the header equals the given value, ignoring ASCII case.
    pub fn contains_header_value(&self, k: &Header, v: &str) -> bool {
        self.get_all(k).iter().any(|value| value.eq_ignore_ascii_case(v))
    }

    /// Iterates header names with their effective (last) value, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item=(&Header, &str)> {
        self.entries.iter()
            .filter_map(|(header, values)| values.last().map(|value| (header, value.as_str())))
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
