//! Error definitions shared across library modules.
//! Everything here is a configuration-time failure; the decode path itself
//! never escalates an error (malformed traffic is dropped, not propagated).
use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Errors raised while assembling a message registry.
pub enum RegistryError {
    /// Two definitions share the same (identifier, extended) key. The
    /// deployment mixed message sets from incompatible schema revisions.
    #[error("Duplicate message key: id {id:#010x}, extended: {extended}")]
    DuplicateKey { id: u32, extended: bool },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Errors raised while constructing a [`Frame`](crate::bus::frame::Frame).
pub enum FrameError {
    /// Payload exceeds the classic CAN limit of eight bytes.
    #[error("Payload length {len} exceeds the 8-byte CAN payload limit")]
    PayloadTooLong { len: usize },
}
