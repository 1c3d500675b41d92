use std::fmt::Write;

use clap::Parser;
use log::error;
use simplelog::{ColorChoice, Config as LogConfig, TermLogger, TerminalMode};

use littleserver::args::Args;
use littleserver::common::request::Request;
use littleserver::common::response::Response;
use littleserver::server;

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    TermLogger::init(args.log_level, LogConfig::default(), TerminalMode::Mixed, ColorChoice::Auto)
        .unwrap_or_else(|err| eprintln!("could not set up logging: {}", err));

    server::listen_http(args.config(), |request| Response::from(echo(request)))
        .map_err(|err| {
            error!("server stopped: {}", err);
            err
        })
}

/// Describes the request in plain text.
fn echo(request: &Request) -> String {
    let mut out = String::new();

    // writing to a String can't fail
    let _ = writeln!(out, "{} {} {}", request.method_str(), request.path(), request.protocol().unwrap_or("-"));
    if let Some(addr) = request.remote_addr() {
        let _ = writeln!(out, "from {}", addr);
    }

    let _ = writeln!(out, "\nheaders:");
    for (name, value) in request.headers().iter() {
        let _ = writeln!(out, "  {}: {}", name, value);
    }

    let _ = writeln!(out, "\nquery:");
    for (name, value) in sorted(request.query_params().iter()) {
        let _ = writeln!(out, "  {} = {}", name, value);
    }

    let _ = writeln!(out, "\npost:");
    for (name, value) in sorted(request.post_params().iter()) {
        let _ = writeln!(out, "  {} = {}", name, value);
    }

    let _ = writeln!(out, "\ncookies:");
    match request.cookies() {
        Ok(cookies) => for (name, value) in sorted(cookies.iter()) {
            let _ = writeln!(out, "  {} = {}", name, value);
        },
        Err(err) => {
            let _ = writeln!(out, "  ({})", err);
        }
    }

    let _ = writeln!(out, "\nfiles:");
    for file in request.uploaded_files() {
        let _ = writeln!(out, "  {} = {} ({}, {} bytes) at {}",
            file.field_name(), file.filename(), file.content_type().unwrap_or("no type"), file.size(), file.path().display());
    }

    out
}

fn sorted<'a>(pairs: impl Iterator<Item=(&'a String, &'a String)>) -> Vec<(&'a String, &'a String)> {
    let mut pairs: Vec<_> = pairs.collect();
    pairs.sort();
    pairs
}
