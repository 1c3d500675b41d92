use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Error for when a request can't be parsed. Every variant is fatal to the request; recoverable
/// conditions degrade to absent fields instead of surfacing here.
#[derive(Debug, Error)]
pub enum ParsingError {
    /// A line, header block or body grew past its configured limit.
    #[error("{section} exceeds the limit of {limit} bytes")]
    LimitExceeded { section: Section, limit: u64 },
    /// The read deadline elapsed while waiting on the peer.
    #[error("timed out reading the {0}")]
    Timeout(Section),
    /// The read deadline elapsed before a single byte of the status line arrived.
    #[error("no request arrived in time")]
    Idle,
    /// The stream ended before a single byte of the status line arrived.
    #[error("connection closed before a request was sent")]
    ConnectionClosed,
}

/// The part of a request being read when an error occurred.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Section {
    StatusLine,
    HeaderBlock,
    Body,
    PartHeaders,
    PartBody,
}

impl Display for Section {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Section::StatusLine => "status line",
            Section::HeaderBlock => "header block",
            Section::Body => "body",
            Section::PartHeaders => "multipart part headers",
            Section::PartBody => "multipart part body",
        })
    }
}

impl ParsingError {
    /// Shorthand for a LimitExceeded error.
    pub fn limit(section: Section, limit: u64) -> ParsingError {
        ParsingError::LimitExceeded { section, limit }
    }
}
