use std::collections::HashMap;

use crate::common::method::Method;
use crate::parse::form::parse_form;

/// The parts of a request's status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub method: Method,
    /// The method token exactly as sent.
    pub method_token: String,
    /// The request target up to the first '?'.
    pub path: String,
    /// The decoded query string.
    pub query: HashMap<String, String>,
    /// The protocol version token, if one was sent.
    pub protocol: Option<String>,
}

/// Parses the given line as the first line of a request.
/// Tokens are separated by any whitespace, so a trailing '\r' is dropped here. Missing tokens are
/// left empty rather than rejected.
pub fn parse_status_line(line: &str) -> StatusLine {
    let mut split = line.split_whitespace();

    let method_token = split.next().unwrap_or("");
    let target = split.next().unwrap_or("");
    let protocol = split.next().map(str::to_string);

    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, parse_form(query.as_bytes())),
        None => (target, HashMap::new())
    };

    StatusLine {
        method: Method::from_token(method_token),
        method_token: method_token.to_string(),
        path: path.to_string(),
        query,
        protocol,
    }
}

#[cfg(test)]
mod tests {
    use crate::common::method::Method;
    use crate::parse::status_line::parse_status_line;

    #[test]
    fn simple() {
        let line = parse_status_line("GET /index.html HTTP/1.1\r");
        assert_eq!(line.method, Method::GET);
        assert_eq!(line.method_token, "GET");
        assert_eq!(line.path, "/index.html");
        assert!(line.query.is_empty());
        assert_eq!(line.protocol.as_deref(), Some("HTTP/1.1"));
    }

    #[test]
    fn query_string() {
        let line = parse_status_line("GET /search?a=1&b=2 HTTP/1.1");
        assert_eq!(line.path, "/search");
        assert_eq!(line.query["a"], "1");
        assert_eq!(line.query["b"], "2");
        assert_eq!(line.query.len(), 2);
    }

    #[test]
    fn query_split_at_first_question_mark() {
        let line = parse_status_line("GET /a?x=what?&y HTTP/1.0");
        assert_eq!(line.path, "/a");
        assert_eq!(line.query["x"], "what?");
        assert_eq!(line.query["y"], "");
    }

    #[test]
    fn empty_query() {
        let line = parse_status_line("GET /a? HTTP/1.1");
        assert_eq!(line.path, "/a");
        assert!(line.query.is_empty());
    }

    #[test]
    fn method_kept_as_given() {
        let line = parse_status_line("post / HTTP/1.1");
        assert_eq!(line.method, Method::POST);
        assert_eq!(line.method_token, "post");
    }

    #[test]
    fn unknown_method() {
        let line = parse_status_line("BREW /pot HTTP/1.1");
        assert_eq!(line.method, Method::Other("BREW".to_string()));
    }

    #[test]
    fn no_protocol() {
        let line = parse_status_line("GET /old-school");
        assert_eq!(line.path, "/old-school");
        assert_eq!(line.protocol, None);
    }

    #[test]
    fn extra_whitespace() {
        let line = parse_status_line("  GET \t /x   HTTP/1.1  ");
        assert_eq!(line.method, Method::GET);
        assert_eq!(line.path, "/x");
        assert_eq!(line.protocol.as_deref(), Some("HTTP/1.1"));
    }

    #[test]
    fn garbage() {
        let line = parse_status_line("");
        assert_eq!(line.method, Method::Other(String::new()));
        assert_eq!(line.path, "");
        assert!(line.query.is_empty());
    }
}
