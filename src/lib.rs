/// Command-line argument parser
pub mod args;
/// HTTP data types.
pub mod common;
/// Components for parsing HTTP requests.
pub mod parse;
/// Components for running an HTTP server and handling requests.
pub mod server;
/// Traffic counters.
pub mod stats;
/// Where uploaded files are written.
pub mod storage;

/// Utility components.
pub mod util;
