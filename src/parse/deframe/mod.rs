/// General deframe components.
pub mod deframe;
/// Deframer for delimited, size-capped lines.
pub mod line;
/// Deframers for bytes.
pub mod bytes;
