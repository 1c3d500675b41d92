use std::time::Duration;

/// Size and time limits applied while reading a request. Exceeding any of them fails the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Max size in bytes of the status line.
    pub max_status_line_size: usize,
    /// Max size in bytes of the header block.
    pub max_header_block_size: usize,
    /// Max size in bytes of the header block of one multipart part.
    pub max_part_headers_size: usize,
    /// Max declared Content-Length of a body.
    pub max_body_size: u64,
    /// How long a single read may wait on the peer. None waits forever.
    pub read_timeout: Option<Duration>,
    /// How long reading a whole request may take, however steadily the peer is sending.
    /// None allows any time.
    pub request_timeout: Option<Duration>,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_status_line_size: 8 * 1024,
            max_header_block_size: 16 * 1024,
            max_part_headers_size: 8 * 1024,
            max_body_size: 16 * 1024 * 1024, // 16 megabytes
            read_timeout: Some(Duration::from_secs(30)),
            request_timeout: Some(Duration::from_secs(60)),
        }
    }
}
