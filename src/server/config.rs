use std::path::PathBuf;

use crate::parse::Limits;

/// The config for an HTTP server.
#[derive(Debug, Clone)]
pub struct Config {
    /// The address to bind the server listener to.
    pub addr: String,
    /// The number of threads to spawn for handling connections. Each thread is used for one
    /// connection at a time.
    pub threads: usize,
    /// Where uploaded files are stored. Created if missing.
    pub temp_dir: PathBuf,
    /// Limits applied to every request.
    pub limits: Limits,
}
