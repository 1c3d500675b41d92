use std::collections::HashMap;
use std::net::SocketAddr;

use crate::common::cookie::{CookieError, LazyCookies};
use crate::common::header::{Header, HeaderMap, COOKIE};
use crate::common::method::Method;
use crate::common::upload::UploadedFile;

/// An HTTP request, as read off a connection.
/// Only the keep-alive flag can change once the request is built.
#[derive(Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) method_token: String,
    pub(crate) path: String,
    pub(crate) protocol: Option<String>,
    pub(crate) query_params: HashMap<String, String>,
    pub(crate) headers: HeaderMap,
    pub(crate) post_params: HashMap<String, String>,
    pub(crate) body: Vec<u8>,
    pub(crate) uploaded_files: Vec<UploadedFile>,
    pub(crate) cookies: LazyCookies,
    pub(crate) keep_alive: bool,
    pub(crate) multipart: bool,
    pub(crate) remote_addr: Option<SocketAddr>,
}

impl Request {
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The method token exactly as the client sent it.
    pub fn method_str(&self) -> &str {
        &self.method_token
    }

    /// The request target without its query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The protocol version, e.g. "HTTP/1.1". None for a status line without one.
    pub fn protocol(&self) -> Option<&str> {
        self.protocol.as_deref()
    }

    /// Gets a query string parameter.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }

    /// Gets a query string parameter, or the default if there is no such parameter.
    /// An empty value is still a value.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    pub fn query_params(&self) -> &HashMap<String, String> {
        &self.query_params
    }

    /// Gets a parameter of a urlencoded body, or a field of a multipart body.
    pub fn post(&self, name: &str) -> Option<&str> {
        self.post_params.get(name).map(String::as_str)
    }

    /// Gets a body parameter, or the default if there is no such parameter.
    pub fn post_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.post(name).unwrap_or(default)
    }

    pub fn post_params(&self) -> &HashMap<String, String> {
        &self.post_params
    }

    /// The raw bytes of a urlencoded body. Empty for any other body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Gets the last value of the header with the given (case-insensitive) name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&Header::from(name))
    }

    /// Gets a cookie. No cookie is found if any part of the Cookie header is malformed.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies().ok()?.get(name).map(String::as_str)
    }

    /// All cookies of the request. The Cookie header is decoded on the first call.
    pub fn cookies(&self) -> Result<&HashMap<String, String>, &CookieError> {
        self.cookies.get_or_decode(self.headers.get(&COOKIE)).as_ref()
    }

    pub fn uploaded_files(&self) -> &[UploadedFile] {
        &self.uploaded_files
    }

    /// Whether the body was declared as multipart/form-data.
    pub fn is_multipart(&self) -> bool {
        self.multipart
    }

    pub fn is_keep_alive(&self) -> bool {
        self.keep_alive
    }

    /// Sets whether the connection should stay open after this request.
    pub fn set_keep_alive(&mut self, keep_alive: bool) {
        self.keep_alive = keep_alive;
    }

    /// The address of the client, if the request came off a socket.
    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }
}
