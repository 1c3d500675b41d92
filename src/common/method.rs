use std::fmt::{Display, Formatter};

/// An HTTP method. Tokens outside the known set are kept as `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
    OPTIONS,
    PATCH,
    CONNECT,
    TRACE,
    PURGE,
    /// An unrecognized method token, stored as given.
    Other(String),
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Other(token) => f.write_str(token),
            known => write!(f, "{:?}", known),
        }
    }
}

impl Method {
    /// Converts the given token to a method. Matching ignores case; unknown tokens become `Other`.
    pub fn from_token(token: &str) -> Method {
        match token.to_ascii_uppercase().as_str() {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "OPTIONS" => Method::OPTIONS,
            "PATCH" => Method::PATCH,
            "CONNECT" => Method::CONNECT,
            "TRACE" => Method::TRACE,
            "PURGE" => Method::PURGE,
            _ => Method::Other(token.to_string())
        }
    }
}
