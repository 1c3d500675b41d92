use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

/// Sends the given bytes as they are and ends the write side, then reads until the server closes
/// the connection.
pub fn send(addr: SocketAddr, data: &[u8]) -> String {
    send_parts(addr, &[data], Duration::ZERO)
}

/// Sends each part in its own write, pausing between them, and ends the write side. Then reads
/// until the server closes the connection.
pub fn send_parts(addr: SocketAddr, parts: &[&[u8]], pause: Duration) -> String {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(10))).unwrap();

    for part in parts {
        stream.write_all(part).unwrap();
        stream.flush().unwrap();
        if !pause.is_zero() {
            std::thread::sleep(pause);
        }
    }
    // the server may already have hung up on a bad request
    let _ = stream.shutdown(Shutdown::Write);

    read_to_close(&mut stream)
}

/// Sends the given bytes without ending the write side, so the server has to give up on its own.
pub fn send_and_stall(addr: SocketAddr, data: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
    stream.write_all(data).unwrap();
    read_to_close(&mut stream)
}

fn read_to_close(stream: &mut TcpStream) -> String {
    let mut response = vec![];
    // a reset after the server's last response still leaves what was read
    let _ = stream.read_to_end(&mut response);
    String::from_utf8_lossy(&response).into_owned()
}

/// Splits a response into its status line and its body.
pub fn status_and_body(response: &str) -> (&str, &str) {
    let (head, body) = response.split_once("\r\n\r\n").unwrap_or((response, ""));
    (head.lines().next().unwrap_or(""), body)
}
