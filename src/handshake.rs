//! The initial RFB handshake: version negotiation, security negotiation,
//! and the `ClientInit`/`ServerInit` exchange.
//!
//! Runs once, synchronously, before the receive loop starts. Everything
//! here blocks on the transport directly rather than going through the
//! staging buffer the steady-state receive path uses.

use std::io::{Read, Write};

use crate::error::{Result, VncError};
use crate::pixel::PixelFormat;
use crate::protocol::{
    ClientInit, Message, SecurityResult, SecurityType, SecurityTypes, ServerInit, Version,
};

/// Everything learned during the handshake that the rest of the connection
/// needs: the negotiated framebuffer geometry, initial pixel format, and
/// server name.
#[derive(Debug)]
pub struct ServerDetails {
    pub framebuffer_width: u16,
    pub framebuffer_height: u16,
    pub pixel_format: PixelFormat,
    pub name: String,
}

/// Runs the full handshake over an already-connected stream and returns the
/// negotiated server details.
///
/// `shared` controls the `ClientInit` shared-flag; it does not affect
/// security negotiation.
pub fn perform<S: Read + Write>(stream: &mut S, shared: bool) -> Result<ServerDetails> {
    let server_version = negotiate_version(stream)?;
    negotiate_security(stream, server_version)?;

    ClientInit { shared }.write_to(stream)?;

    let server_init = ServerInit::read_from(stream)?;
    Ok(ServerDetails {
        framebuffer_width: server_init.framebuffer_width,
        framebuffer_height: server_init.framebuffer_height,
        pixel_format: server_init.pixel_format,
        name: server_init.name,
    })
}

fn negotiate_version<S: Read + Write>(stream: &mut S) -> Result<Version> {
    let server_version = Version::read_from(stream)?;
    // Echo the server's own version back; we don't negotiate down to an
    // older dialect we understand but the server didn't announce.
    server_version.write_to(stream)?;
    Ok(server_version)
}

fn negotiate_security<S: Read + Write>(stream: &mut S, server_version: Version) -> Result<()> {
    if server_version == Version::Rfb33 {
        // 3.3 security negotiation is a bare 4-byte type chosen unilaterally
        // by the server, with no client choice and no SecurityResult; we
        // don't implement this dialect.
        use byteorder::{BigEndian, ReadBytesExt};
        let _ = stream.read_u32::<BigEndian>()?;
        return Err(VncError::Unimplemented("RFB 3.3 security negotiation"));
    }

    // 3.7/3.8 negotiation offers a list the client picks from; 3.8 adds a
    // trailing SecurityResult the client must check even on success.
    let security_types = SecurityTypes::read_from(stream)?;
    if security_types.0.is_empty() {
        return Err(VncError::Disconnected);
    }
    if !security_types.0.contains(&SecurityType::None) {
        return Err(VncError::UnsupportedSecurityProtocols);
    }
    SecurityType::None.write_to(stream)?;

    if server_version == Version::Rfb37 {
        // 3.7 has no SecurityResult message; a chosen security type is
        // implicitly accepted.
        return Ok(());
    }

    match SecurityResult::read_from(stream) {
        Ok(SecurityResult::Succeeded) => Ok(()),
        Ok(SecurityResult::Failed) => {
            let reason = String::read_from(stream).unwrap_or_default();
            Err(VncError::SecurityHandshakeFailed(reason))
        }
        Err(e) => Err(e),
    }
}
