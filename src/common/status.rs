/// An HTTP status.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct Status {
    /// The status code.
    pub code: u16,
    /// The reason for the status.
    pub reason: &'static str,
}

macro_rules! status_codes {
    (
        $(
            $(#[$docs:meta])*
            ($name:ident, $num:expr, $phrase:expr);
        )+
    ) => {
        $(
            $(#[$docs])*
            pub const $name: Status = Status { code: $num, reason: $phrase };
        )+
    }
}

status_codes! {
    (OK, 200, "OK");
    /// The request could not be read.
    (BAD_REQUEST, 400, "Bad Request");
    /// The client took too long to send its request.
    (REQUEST_TIMEOUT, 408, "Request Timeout");
    /// Part of the request was larger than the server accepts.
    (PAYLOAD_TOO_LARGE, 413, "Payload Too Large");
}
