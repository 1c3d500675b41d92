/// Cookie header decoding.
pub mod cookie;
/// HTTP header data types and functions.
pub mod header;
/// HTTP method data type and functions.
pub mod method;
/// HTTP request data type.
pub mod request;
/// HTTP response data type and functions
pub mod response;
/// HTTP status data type and functions.
pub mod status;
/// Files uploaded in multipart bodies.
pub mod upload;
/// HTTP version constants and functions.
pub mod version;
