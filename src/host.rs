//! Trait contracts the embedding application implements. The core is
//! generic over these: it never creates a socket, a window, or an event
//! loop itself.

use std::io::{self, Read, Write};

use crate::error::ResultCode;

/// A full-duplex byte stream to the server. The receive task and the host
/// task each need their own handle to it, so a `Transport` must support
/// being cloned into two independently usable halves (mirroring
/// `TcpStream::try_clone`).
pub trait Transport: Read + Write + Send {
    fn try_clone(&self) -> io::Result<Self>
    where
        Self: Sized;
}

/// The host's drawable surface. The receive task calls `resize` when a
/// `DesktopSize` rectangle changes the framebuffer's dimensions; it never
/// blits pixels itself — the host reads the shared framebuffer to do that on
/// its own schedule.
pub trait Surface: Send {
    fn resize(&mut self, width: u16, height: u16);
}

/// Receives the single shutdown notification the receive task publishes
/// when the connection ends, successfully or not.
pub trait EventSink: Send {
    fn shutdown(&self, code: ResultCode);
}
