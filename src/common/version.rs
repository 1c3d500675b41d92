/// HTTP version "HTTP/1.0"
pub const HTTP_VERSION_1_0: &str = "HTTP/1.0";
/// HTTP version "HTTP/1.1"
pub const HTTP_VERSION_1_1: &str = "HTTP/1.1";

/// Checks if connections under the given version stay open unless the client asks otherwise.
pub fn keeps_alive_by_default(version: &str) -> bool {
    HTTP_VERSION_1_1.eq_ignore_ascii_case(version)
}
