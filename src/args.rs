use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;

use crate::parse::Limits;
use crate::server::Config;

const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

/// A small HTTP server that answers every request with what it understood of it.
#[derive(Parser, Debug)]
#[command(author = AUTHORS, version, about)]
pub struct Args {
    /// (Optional) Host name or IP address to serve from.
    #[arg(long, default_value_t = String::from("127.0.0.1"))]
    pub host: String,
    #[arg(short, long, default_value_t = 4000)]
    /// (Optional) Port number to open on host.
    pub port: u16,
    /// (Optional) Number of connections handled at once.
    #[arg(short, long, default_value_t = 8)]
    pub threads: usize,
    /// (Optional) Directory to store uploaded files in. Defaults to a directory under the system
    /// temp directory.
    #[arg(long)]
    pub temp_dir: Option<PathBuf>,
    /// (Optional) Max size in bytes of a request's header block.
    #[arg(long, default_value_t = Limits::default().max_header_block_size)]
    pub max_header_size: usize,
    /// (Optional) Max size in bytes of a request body.
    #[arg(long, default_value_t = Limits::default().max_body_size)]
    pub max_body_size: u64,
    /// (Optional) Seconds to wait on a silent client before dropping it. 0 waits forever.
    #[arg(long, default_value_t = 30)]
    pub read_timeout: u64,
    /// (Optional) Seconds a client gets to send a whole request. 0 allows any time.
    #[arg(long, default_value_t = 60)]
    pub request_timeout: u64,
    /// (Optional) One of off, error, warn, info, debug, trace.
    #[arg(long, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,
}

impl Args {
    /// The request limits asked for.
    pub fn limits(&self) -> Limits {
        Limits {
            max_header_block_size: self.max_header_size,
            max_body_size: self.max_body_size,
            read_timeout: seconds(self.read_timeout),
            request_timeout: seconds(self.request_timeout),
            ..Limits::default()
        }
    }

    /// The server config asked for.
    pub fn config(&self) -> Config {
        Config {
            addr: format!("{}:{}", self.host, self.port),
            threads: self.threads,
            temp_dir: self.temp_dir.clone().unwrap_or_else(|| std::env::temp_dir().join("littleserver")),
            limits: self.limits(),
        }
    }
}

/// A timeout in seconds, with 0 for none.
fn seconds(secs: u64) -> Option<Duration> {
    match secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use clap::Parser;
    use log::LevelFilter;

    use crate::args::Args;
    use crate::parse::Limits;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["littleserver"]).unwrap();
        let config = args.config();
        assert_eq!(config.addr, "127.0.0.1:4000");
        assert_eq!(config.threads, 8);
        assert_eq!(config.limits, Limits::default());
        assert_eq!(args.log_level, LevelFilter::Info);
    }

    #[test]
    fn everything() {
        let args = Args::try_parse_from([
            "littleserver", "--host", "0.0.0.0", "-p", "8080", "-t", "2", "--temp-dir", "/tmp/up",
            "--max-header-size", "100", "--max-body-size", "200", "--read-timeout", "0", "--request-timeout", "0", "--log-level", "debug",
        ]).unwrap();
        let config = args.config();

        assert_eq!(config.addr, "0.0.0.0:8080");
        assert_eq!(config.threads, 2);
        assert_eq!(config.temp_dir, PathBuf::from("/tmp/up"));
        assert_eq!(config.limits.max_header_block_size, 100);
        assert_eq!(config.limits.max_body_size, 200);
        assert_eq!(config.limits.read_timeout, None);
        assert_eq!(config.limits.request_timeout, None);
        assert_eq!(args.log_level, LevelFilter::Debug);
    }

    #[test]
    fn read_timeout() {
        let args = Args::try_parse_from(["littleserver", "--read-timeout", "5"]).unwrap();
        assert_eq!(args.limits().read_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn request_timeout() {
        let args = Args::try_parse_from(["littleserver", "--request-timeout", "7"]).unwrap();
        assert_eq!(args.limits().request_timeout, Some(Duration::from_secs(7)));
        assert_eq!(args.limits().read_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn bad_port() {
        assert!(Args::try_parse_from(["littleserver", "--port", "70000"]).is_err());
    }
}
