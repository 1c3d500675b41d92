use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::thread::spawn;

use littleserver::common::request::Request;
use littleserver::common::response::Response;
use littleserver::parse::Limits;
use littleserver::server::{Config, Server};
use littleserver::stats::Counters;

/// A server running on its own thread.
pub struct TestServer {
    pub addr: SocketAddr,
    pub stats: Arc<Counters>,
    pub temp_dir: PathBuf,
}

/// Starts a server on a free port, answering every request with a summary of it.
pub fn start_server(name: &str, limits: Limits) -> TestServer {
    let temp_dir = std::env::temp_dir()
        .join("littleserver-it")
        .join(format!("{}-{}", name, process::id()));
    let _ = fs::remove_dir_all(&temp_dir);

    let config = Config {
        addr: String::from("127.0.0.1:0"),
        threads: 4,
        temp_dir: temp_dir.clone(),
        limits,
    };
    let server = Server::bind(config, |request| Response::from(summary(request))).unwrap();
    let addr = server.local_addr().unwrap();
    let stats = server.stats();

    spawn(move || server.run().unwrap());

    TestServer { addr, stats, temp_dir }
}

/// One line per thing the server understood of the request, sorted within each kind.
pub fn summary(request: &Request) -> String {
    let mut lines = vec![format!("{} {}", request.method_str(), request.path())];

    let mut query: Vec<String> = request.query_params().iter().map(|(k, v)| format!("query {}={}", k, v)).collect();
    let mut post: Vec<String> = request.post_params().iter().map(|(k, v)| format!("post {}={}", k, v)).collect();
    let mut cookies: Vec<String> = match request.cookies() {
        Ok(cookies) => cookies.iter().map(|(k, v)| format!("cookie {}={}", k, v)).collect(),
        Err(_) => vec![String::from("cookies malformed")],
    };
    query.sort();
    post.sort();
    cookies.sort();
    lines.extend(query);
    lines.extend(post);
    lines.extend(cookies);

    for file in request.uploaded_files() {
        let content = fs::read_to_string(file.path()).unwrap_or_default();
        lines.push(format!("file {}={} {}", file.field_name(), file.filename(), content));
    }
    if request.is_multipart() {
        lines.push(String::from("multipart"));
    }

    let mut summary = lines.join("\n");
    summary.push('\n');
    summary
}
