pub use config::*;
pub use server::*;

/// Entry point for starting a server.
mod server;
/// Config for a server.
mod config;
/// Connection for reading requests from a client.
mod connection;
