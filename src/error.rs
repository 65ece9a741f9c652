//! Error types for the RFB client core.

use std::io;
use thiserror::Error;

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, VncError>;

/// Result codes published on the host event contract (spec §6).
///
/// Mirrors the `VNC_Result` enum of the original SDL2_vnc source, preserved
/// here so the host application can switch on a stable, small surface
/// instead of matching on [`VncError`] variants directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Ok = 0,
    OutOfMemory = 1,
    CouldNotCreateSocket = 2,
    CouldNotConnect = 3,
    ServerDisconnect = 4,
    UnsupportedSecurityProtocols = 5,
    SecurityHandshakeFailed = 6,
    Unimplemented = 7,
}

/// Errors that can occur while driving an RFB connection.
#[derive(Debug, Error)]
pub enum VncError {
    /// The underlying transport failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The peer closed the connection (clean EOF, possibly mid-message).
    #[error("server disconnected")]
    Disconnected,

    /// A server reported a negotiation failure, carrying its reason string.
    #[error("server error: {0}")]
    Server(String),

    /// A value read from the wire did not match any known protocol variant.
    #[error("unexpected value: {0}")]
    UnexpectedValue(&'static str),

    /// No security type offered by the server is supported by this client.
    #[error("unsupported security protocols")]
    UnsupportedSecurityProtocols,

    /// The security handshake completed but the server reported failure.
    #[error("security handshake failed: {0}")]
    SecurityHandshakeFailed(String),

    /// A feature this client does not implement (e.g. password auth, an
    /// unknown encoding, or an unknown message type).
    #[error("unimplemented: {0}")]
    Unimplemented(&'static str),

    /// The connection is no longer usable (a sender was called after the
    /// receive task already shut down).
    #[error("connection is no longer running")]
    NotRunning,
}

impl VncError {
    /// Maps this error onto the small §6 result-code surface for host event
    /// publication.
    pub fn code(&self) -> ResultCode {
        match self {
            VncError::Io(_) | VncError::Disconnected | VncError::NotRunning => {
                ResultCode::ServerDisconnect
            }
            VncError::Server(_) => ResultCode::ServerDisconnect,
            VncError::UnexpectedValue(_) => ResultCode::Unimplemented,
            VncError::UnsupportedSecurityProtocols => ResultCode::UnsupportedSecurityProtocols,
            VncError::SecurityHandshakeFailed(_) => ResultCode::SecurityHandshakeFailed,
            VncError::Unimplemented(_) => ResultCode::Unimplemented,
        }
    }
}
