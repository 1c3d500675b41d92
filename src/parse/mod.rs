pub use limits::Limits;

/// Parsing errors.
pub mod error;
/// Limits on the size of requests.
pub mod limits;
/// Request parsing entry point.
pub mod request;
/// Multipart/form-data decoding.
pub mod multipart;
/// Content-Length handling and body reading.
pub mod body;

/// Parser for the status line.
mod status_line;
/// Parser for headers.
mod headers;
/// Parser for urlencoded forms.
mod form;
/// Deframing components (or, in other words, bounded IO reading).
mod deframe;

/// Utility for testing parsers.
#[cfg(test)]
mod test_util;
