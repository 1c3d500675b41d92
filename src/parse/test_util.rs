use std::io::{BufRead, BufReader};

use crate::common::request::Request;
use crate::parse::error::ParsingError;
use crate::parse::limits::Limits;
use crate::parse::request::RequestParser;
use crate::stats::Counters;
use crate::storage::DirectoryStorage;
use crate::util::mock::{EndlessMockReader, MockReader};
use crate::util::test_dir;

/// Collaborators for parsing requests in tests: limits, an upload directory of its own, and
/// counters.
pub struct TestParser {
    pub limits: Limits,
    pub storage: DirectoryStorage,
    pub stats: Counters,
}

impl TestParser {
    /// Creates a parser with default limits and an empty upload directory for the named test.
    pub fn new(name: &str) -> TestParser {
        TestParser::with_limits(name, Limits::default())
    }

    pub fn with_limits(name: &str, limits: Limits) -> TestParser {
        TestParser {
            limits,
            storage: DirectoryStorage::new(test_dir(name)),
            stats: Counters::new(),
        }
    }

    pub fn parse(&self, reader: &mut impl BufRead) -> Result<Request, ParsingError> {
        RequestParser::new(&self.limits, &self.storage, &self.stats).parse(reader, None)
    }

    /// Parses a request from the given reads, followed by EOF.
    pub fn parse_strs(&self, data: Vec<&str>) -> Result<Request, ParsingError> {
        self.parse(&mut BufReader::new(MockReader::from_strs(data)))
    }

    /// Parses a request from the given reads, with no end to the stream.
    pub fn parse_endless(&self, data: Vec<&str>, sequence: &str) -> Result<Request, ParsingError> {
        self.parse(&mut BufReader::new(EndlessMockReader::from_strs(data, sequence)))
    }
}
