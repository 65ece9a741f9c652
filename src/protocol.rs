//! Wire message shapes for the handshake and the steady-state protocol.
//!
//! Everything here is a thin, allocation-light mapping of RFC 6143 byte
//! layouts onto Rust types; no behavior lives here beyond read/write.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use crate::error::{Result, VncError};
use crate::pixel::PixelFormat;

pub trait Message: Sized {
    fn read_from<R: Read>(reader: &mut R) -> Result<Self>;
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()>;
}

impl Message for String {
    /// VNC strings are length-prefixed and either ASCII or Latin-1, both of
    /// which embed directly into Unicode scalar values.
    fn read_from<R: Read>(reader: &mut R) -> Result<String> {
        let length = reader.read_u32::<BigEndian>()?;
        let mut bytes = vec![0u8; length as usize];
        reader.read_exact(&mut bytes)?;
        Ok(bytes.iter().map(|&b| b as char).collect())
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<BigEndian>(self.len() as u32)?;
        writer.write_all(&self.chars().map(|c| c as u8).collect::<Vec<u8>>())?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    Rfb33,
    Rfb37,
    Rfb38,
}

impl Message for Version {
    fn read_from<R: Read>(reader: &mut R) -> Result<Version> {
        let mut buf = [0u8; 12];
        reader.read_exact(&mut buf)?;
        match &buf {
            b"RFB 003.003\n" => Ok(Version::Rfb33),
            b"RFB 003.007\n" => Ok(Version::Rfb37),
            b"RFB 003.008\n" => Ok(Version::Rfb38),
            // Unrecognized version strings, including future ones, are
            // treated as 3.3 per spec.
            _ => Ok(Version::Rfb33),
        }
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let bytes: &[u8; 12] = match self {
            Version::Rfb33 => b"RFB 003.003\n",
            Version::Rfb37 => b"RFB 003.007\n",
            Version::Rfb38 => b"RFB 003.008\n",
        };
        writer.write_all(bytes)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityType {
    Invalid,
    None,
    VncAuthentication,
    Unknown(u8),
}

impl SecurityType {
    fn from_u8(value: u8) -> SecurityType {
        match value {
            0 => SecurityType::Invalid,
            1 => SecurityType::None,
            2 => SecurityType::VncAuthentication,
            n => SecurityType::Unknown(n),
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            SecurityType::Invalid => 0,
            SecurityType::None => 1,
            SecurityType::VncAuthentication => 2,
            SecurityType::Unknown(n) => n,
        }
    }
}

impl Message for SecurityType {
    fn read_from<R: Read>(reader: &mut R) -> Result<SecurityType> {
        Ok(SecurityType::from_u8(reader.read_u8()?))
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8((*self).to_u8())?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct SecurityTypes(pub Vec<SecurityType>);

impl Message for SecurityTypes {
    fn read_from<R: Read>(reader: &mut R) -> Result<SecurityTypes> {
        let count = reader.read_u8()?;
        let mut types = Vec::with_capacity(count as usize);
        for _ in 0..count {
            types.push(SecurityType::read_from(reader)?);
        }
        Ok(SecurityTypes(types))
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(self.0.len() as u8)?;
        for ty in &self.0 {
            ty.write_to(writer)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityResult {
    Succeeded,
    Failed,
}

impl Message for SecurityResult {
    fn read_from<R: Read>(reader: &mut R) -> Result<SecurityResult> {
        match reader.read_u32::<BigEndian>()? {
            0 => Ok(SecurityResult::Succeeded),
            _ => Ok(SecurityResult::Failed),
        }
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<BigEndian>(match self {
            SecurityResult::Succeeded => 0,
            SecurityResult::Failed => 1,
        })?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct ClientInit {
    pub shared: bool,
}

impl Message for ClientInit {
    fn read_from<R: Read>(reader: &mut R) -> Result<ClientInit> {
        Ok(ClientInit {
            shared: reader.read_u8()? != 0,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(self.shared as u8)?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct ServerInit {
    pub framebuffer_width: u16,
    pub framebuffer_height: u16,
    pub pixel_format: PixelFormat,
    pub name: String,
}

impl Message for ServerInit {
    fn read_from<R: Read>(reader: &mut R) -> Result<ServerInit> {
        Ok(ServerInit {
            framebuffer_width: reader.read_u16::<BigEndian>()?,
            framebuffer_height: reader.read_u16::<BigEndian>()?,
            pixel_format: PixelFormat::read_from(reader)?,
            name: String::read_from(reader)?,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u16::<BigEndian>(self.framebuffer_width)?;
        writer.write_u16::<BigEndian>(self.framebuffer_height)?;
        self.pixel_format.write_to(writer)?;
        self.name.write_to(writer)?;
        Ok(())
    }
}

/// A rectangle encoding tag. Negative values denote pseudo-encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Raw,
    CopyRect,
    DesktopSize,
    ContinuousUpdates,
    QemuExtendedKeyEvent,
    Unknown(i32),
}

impl Encoding {
    pub fn id(self) -> i32 {
        match self {
            Encoding::Raw => 0,
            Encoding::CopyRect => 1,
            Encoding::DesktopSize => -223,
            Encoding::ContinuousUpdates => -313,
            Encoding::QemuExtendedKeyEvent => -258,
            Encoding::Unknown(n) => n,
        }
    }

    fn from_id(id: i32) -> Encoding {
        match id {
            0 => Encoding::Raw,
            1 => Encoding::CopyRect,
            -223 => Encoding::DesktopSize,
            -313 => Encoding::ContinuousUpdates,
            -258 => Encoding::QemuExtendedKeyEvent,
            n => Encoding::Unknown(n),
        }
    }

    /// Encodings advertised by `SetEncodings`, in server preference order.
    pub fn supported_in_preference_order() -> [Encoding; 5] {
        [
            Encoding::CopyRect,
            Encoding::Raw,
            Encoding::DesktopSize,
            Encoding::ContinuousUpdates,
            Encoding::QemuExtendedKeyEvent,
        ]
    }
}

impl Message for Encoding {
    fn read_from<R: Read>(reader: &mut R) -> Result<Encoding> {
        Ok(Encoding::from_id(reader.read_i32::<BigEndian>()?))
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_i32::<BigEndian>(self.id())?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct RectangleHeader {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub encoding: Encoding,
}

impl Message for RectangleHeader {
    fn read_from<R: Read>(reader: &mut R) -> Result<RectangleHeader> {
        Ok(RectangleHeader {
            x: reader.read_u16::<BigEndian>()?,
            y: reader.read_u16::<BigEndian>()?,
            width: reader.read_u16::<BigEndian>()?,
            height: reader.read_u16::<BigEndian>()?,
            encoding: Encoding::read_from(reader)?,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u16::<BigEndian>(self.x)?;
        writer.write_u16::<BigEndian>(self.y)?;
        writer.write_u16::<BigEndian>(self.width)?;
        writer.write_u16::<BigEndian>(self.height)?;
        self.encoding.write_to(writer)?;
        Ok(())
    }
}

/// `CopyRect`'s payload beyond the common rectangle header: the source
/// position within the framebuffer the destination rect is copied from.
#[derive(Debug)]
pub struct CopyRectSource {
    pub src_x: u16,
    pub src_y: u16,
}

impl Message for CopyRectSource {
    fn read_from<R: Read>(reader: &mut R) -> Result<CopyRectSource> {
        Ok(CopyRectSource {
            src_x: reader.read_u16::<BigEndian>()?,
            src_y: reader.read_u16::<BigEndian>()?,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u16::<BigEndian>(self.src_x)?;
        writer.write_u16::<BigEndian>(self.src_y)?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct SetEncodings(pub Vec<Encoding>);

impl Message for SetEncodings {
    fn read_from<R: Read>(_reader: &mut R) -> Result<SetEncodings> {
        Err(VncError::Unimplemented("SetEncodings is client-to-server only"))
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(2)?; // message-type
        writer.write_u8(0)?; // padding
        writer.write_u16::<BigEndian>(self.0.len() as u16)?;
        for encoding in &self.0 {
            encoding.write_to(writer)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct FramebufferUpdateRequest {
    pub incremental: bool,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Message for FramebufferUpdateRequest {
    fn read_from<R: Read>(_reader: &mut R) -> Result<FramebufferUpdateRequest> {
        Err(VncError::Unimplemented(
            "FramebufferUpdateRequest is client-to-server only",
        ))
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(3)?;
        writer.write_u8(self.incremental as u8)?;
        writer.write_u16::<BigEndian>(self.x)?;
        writer.write_u16::<BigEndian>(self.y)?;
        writer.write_u16::<BigEndian>(self.width)?;
        writer.write_u16::<BigEndian>(self.height)?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct KeyEvent {
    pub down: bool,
    pub keysym: u32,
}

impl Message for KeyEvent {
    fn read_from<R: Read>(_reader: &mut R) -> Result<KeyEvent> {
        Err(VncError::Unimplemented("KeyEvent is client-to-server only"))
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(4)?;
        writer.write_u8(self.down as u8)?;
        writer.write_all(&[0u8; 2])?;
        writer.write_u32::<BigEndian>(self.keysym)?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct PointerEvent {
    pub button_mask: u8,
    pub x: u16,
    pub y: u16,
}

impl Message for PointerEvent {
    fn read_from<R: Read>(_reader: &mut R) -> Result<PointerEvent> {
        Err(VncError::Unimplemented("PointerEvent is client-to-server only"))
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(5)?;
        writer.write_u8(self.button_mask)?;
        writer.write_u16::<BigEndian>(self.x)?;
        writer.write_u16::<BigEndian>(self.y)?;
        Ok(())
    }
}

/// QEMU's extended key event client message: carries both the classic X11
/// keysym and the XT/qnum scancode, so the guest can disambiguate keys that
/// share a keysym.
#[derive(Debug)]
pub struct QemuExtendedKeyEvent {
    pub down: bool,
    pub keysym: u32,
    pub keycode: u32,
}

impl Message for QemuExtendedKeyEvent {
    fn read_from<R: Read>(_reader: &mut R) -> Result<QemuExtendedKeyEvent> {
        Err(VncError::Unimplemented(
            "QemuExtendedKeyEvent is client-to-server only",
        ))
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(255)?; // message-type (QEMU client message)
        writer.write_u8(0)?; // submessage-type (extended key event)
        writer.write_u16::<BigEndian>(self.down as u16)?;
        writer.write_u32::<BigEndian>(self.keysym)?;
        writer.write_u32::<BigEndian>(self.keycode)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_round_trips() {
        for version in [Version::Rfb33, Version::Rfb37, Version::Rfb38] {
            let mut buf = Vec::new();
            version.write_to(&mut buf).unwrap();
            assert_eq!(buf.len(), 12);
            let parsed = Version::read_from(&mut &buf[..]).unwrap();
            assert_eq!(parsed, version);
        }
    }

    #[test]
    fn unknown_version_string_is_treated_as_33() {
        let parsed = Version::read_from(&mut &b"RFB 003.009\n"[..]).unwrap();
        assert_eq!(parsed, Version::Rfb33);
    }

    #[test]
    fn set_encodings_framing_is_4_plus_4n_bytes() {
        let encodings = Encoding::supported_in_preference_order().to_vec();
        let n = encodings.len();
        let mut buf = Vec::new();
        SetEncodings(encodings).write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), 4 + 4 * n);
        assert_eq!(buf[0], 2);
        assert_eq!(u16::from_be_bytes([buf[2], buf[3]]) as usize, n);
    }

    #[test]
    fn framebuffer_update_request_is_big_endian() {
        let req = FramebufferUpdateRequest {
            incremental: false,
            x: 0,
            y: 0,
            width: 0x0280,
            height: 0x01e0,
        };
        let mut buf = Vec::new();
        req.write_to(&mut buf).unwrap();
        assert_eq!(
            buf,
            vec![3, 0, 0, 0, 0, 0, 0x02, 0x80, 0x01, 0xe0]
        );
    }

    #[test]
    fn encoding_round_trips_through_id() {
        for encoding in Encoding::supported_in_preference_order() {
            assert_eq!(Encoding::from_id(encoding.id()), encoding);
        }
        assert_eq!(Encoding::from_id(5), Encoding::Unknown(5));
    }
}
