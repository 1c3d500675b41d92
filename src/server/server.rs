use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::common::header::CONNECTION;
use crate::common::request::Request;
use crate::common::response::Response;
use crate::common::status;
use crate::common::status::Status;
use crate::common::version::{keeps_alive_by_default, HTTP_VERSION_1_1};
use crate::parse::error::ParsingError;
use crate::parse::request::RequestParser;
use crate::server::config::Config;
use crate::server::connection::Connection;
use crate::server::connection::ReadRequestResult::{Closed, Error, Ready};
use crate::stats::Counters;
use crate::storage::{discard, DirectoryStorage};
use crate::util::thread_pool::ThreadPool;

/// Size of connection read buffers.
const READ_BUF_SIZE: usize = 4096;

/// Size of connection write buffers.
const WRITE_BUF_SIZE: usize = 4096;

/// Function giving the response to a request.
pub type Handler = dyn Fn(&Request) -> Response + Send + Sync;

/// An HTTP server bound to its address but not yet accepting connections.
pub struct Server {
    listener: TcpListener,
    shared: Arc<Shared>,
}

/// What every connection thread gets to see.
struct Shared {
    config: Config,
    storage: DirectoryStorage,
    stats: Arc<Counters>,
    handler: Box<Handler>,
}

/// Starts an HTTP server. This function blocks.
pub fn listen_http(config: Config, handler: impl Fn(&Request) -> Response + Send + Sync + 'static) -> std::io::Result<()> {
    Server::bind(config, handler)?.run()
}

impl Server {
    /// Binds a server to the configured address, creating its upload directory.
    pub fn bind(config: Config, handler: impl Fn(&Request) -> Response + Send + Sync + 'static) -> std::io::Result<Server> {
        fs::create_dir_all(&config.temp_dir)?;
        let listener = TcpListener::bind(&config.addr)?;

        let shared = Shared {
            storage: DirectoryStorage::new(&config.temp_dir),
            stats: Arc::new(Counters::new()),
            handler: Box::new(handler),
            config,
        };
        Ok(Server { listener, shared: Arc::new(shared) })
    }

    /// The address the server is listening on.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Traffic counters over all connections.
    pub fn stats(&self) -> Arc<Counters> {
        Arc::clone(&self.shared.stats)
    }

    /// Accepts connections until the listener fails. This function blocks.
    pub fn run(self) -> std::io::Result<()> {
        let thread_pool = ThreadPool::new(self.shared.config.threads);
        info!("listening on {} with {} threads", self.local_addr()?, self.shared.config.threads);

        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    let shared = Arc::clone(&self.shared);
                    thread_pool.execute(move || handle_connection(&shared, stream));
                }
                Err(err) => warn!("failed to accept connection: {}", err),
            }
        }

        Ok(())
    }
}

/// Reads requests and writes responses on the given stream until either side is done.
fn handle_connection(shared: &Shared, stream: TcpStream) {
    let addr = stream.peer_addr().ok();

    if let Err(err) = stream.set_read_timeout(shared.config.limits.read_timeout) {
        warn!("could not set read timeout for {:?}: {}", addr, err);
        return;
    }
    let reader = match stream.try_clone() {
        Ok(reader) => BufReader::with_capacity(READ_BUF_SIZE, reader),
        Err(err) => {
            warn!("could not split stream of {:?}: {}", addr, err);
            return;
        }
    };
    let writer = BufWriter::with_capacity(WRITE_BUF_SIZE, stream);

    debug!("connection from {:?}", addr);
    let mut connection = Connection::new(addr, reader, writer);
    let parser = RequestParser::new(&shared.config.limits, &shared.storage, shared.stats.as_ref());
    respond_to_requests(&mut connection, &parser, shared.handler.as_ref());
    debug!("closing connection from {:?}", addr);
}

/// Responds to requests in the given connection using the given handler, until the connection
/// should be closed.
fn respond_to_requests<R: BufRead, W: Write>(connection: &mut Connection<R, W>, parser: &RequestParser, handler: &dyn Fn(&Request) -> Response) {
    loop {
        match connection.read_request(parser) {
            Ready(mut request) => {
                request.set_keep_alive(wants_keep_alive(&request));

                let mut response = handler(&request);
                remove_uploads(&request);
                if !request.is_keep_alive() {
                    response = response.with_header(CONNECTION, "close");
                }

                if let Err(err) = write_response(connection, &response) {
                    debug!("could not write response to {:?}: {}", connection.addr, err);
                    return;
                }
                if !request.is_keep_alive() {
                    return;
                }
            }
            Closed => return,
            Error(err) => {
                error!("bad request from {:?}: {}", connection.addr, err);
                let response = Response::from(error_status(&err)).with_header(CONNECTION, "close");
                if let Err(err) = write_response(connection, &response) {
                    debug!("could not write error response to {:?}: {}", connection.addr, err);
                }
                return;
            }
        }
    }
}

/// Checks if the client wants the connection kept open after the given request.
fn wants_keep_alive(request: &Request) -> bool {
    let headers = request.headers();
    if headers.contains_header_value(&CONNECTION, "close") {
        return false;
    }
    request.protocol().map(keeps_alive_by_default).unwrap_or(false)
        || headers.contains_header_value(&CONNECTION, "keep-alive")
}

/// Deletes the files uploaded with a request the handler is done with.
fn remove_uploads(request: &Request) {
    for file in request.uploaded_files() {
        discard(file.path());
    }
}

/// Gets the status to answer a request that couldn't be read with.
fn error_status(error: &ParsingError) -> Status {
    match error {
        ParsingError::LimitExceeded { .. } => status::PAYLOAD_TOO_LARGE,
        ParsingError::Timeout(_) | ParsingError::Idle => status::REQUEST_TIMEOUT,
        ParsingError::ConnectionClosed => status::BAD_REQUEST,
    }
}

/// Writes the response as bytes to the given writer.
pub fn write_response(writer: &mut impl Write, response: &Response) -> std::io::Result<()> {
    // write! will call write multiple times and does not flush
    write!(writer, "{} {} {}\r\n", HTTP_VERSION_1_1, response.status.code, response.status.reason)?;
    for (header, value) in response.headers.iter() {
        write!(writer, "{}: {}\r\n", header, value)?;
    }
    writer.write_all(b"\r\n")?;
    writer.write_all(&response.body)?;
    writer.flush()?;
    Ok(())
}
