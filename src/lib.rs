//! Core of an RFB ("VNC") client: wire framing, the handshake state
//! machine, a background receive loop with per-rectangle decoding, and a
//! keyboard translation subsystem.
//!
//! This crate is generic over the transport (see [`host::Transport`]) and
//! the host's graphics/event-loop integration (see [`host::Surface`] and
//! [`host::EventSink`]); it owns none of those itself.

mod codec;
mod connection;
mod encodings;
mod error;
mod handshake;
mod host;
mod input;
mod keyboard;
mod pixel;
mod protocol;
mod recv;

pub use connection::{Client, ClientBuilder};
pub use encodings::Framebuffer;
pub use error::{Result, ResultCode, VncError};
pub use host::{EventSink, Surface, Transport};
pub use input::MouseButtons;
pub use keyboard::{HostKeyEvent, KeyFrame};
pub use pixel::{ColorMapEntry, PixelFormat};
pub use protocol::{Encoding, Version};
