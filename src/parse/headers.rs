use crate::common::header::{Header, HeaderMap};

/// Parses a header block (lines joined by CRLF, blank line already stripped) into a header map.
/// Lines without a ':' are skipped.
pub fn parse_header_block(block: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    for line in block.split('\n') {
        if let Some((header, value)) = parse_header(line.strip_suffix('\r').unwrap_or(line)) {
            headers.add_header(header, value);
        }
    }

    headers
}

/// Parses the given line as a header. Splits the line at the first ':'; the name is trimmed and
/// the value loses its leading whitespace.
fn parse_header(line: &str) -> Option<(Header, String)> {
    let (name, value) = line.split_once(':')?;
    Some((Header::from(name.trim()), value.trim_start().to_string()))
}
