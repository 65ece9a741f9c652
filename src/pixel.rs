//! Pixel format model: server pixel layout, channel mask derivation, and the
//! color map used when the server is not in true-color mode.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use crate::error::Result;

/// Describes the server's pixel layout, as sent in `ServerInit` and
/// `SetPixelFormat`.
///
/// Invariant: if `true_color` is `false`, decoding must consult the color
/// map; if `true`, each `*_max` is `2^k - 1` and `*_shift` is the
/// least-significant-bit position of that channel within a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    pub bits_per_pixel: u8,
    pub depth: u8,
    pub big_endian: bool,
    pub true_color: bool,
    pub red_max: u16,
    pub green_max: u16,
    pub blue_max: u16,
    pub red_shift: u8,
    pub green_shift: u8,
    pub blue_shift: u8,
}

impl PixelFormat {
    /// 32bpp true-color RGB with 8 bits per channel, matching what most
    /// modern RFB servers actually advertise.
    pub fn new_rgb888() -> Self {
        PixelFormat {
            bits_per_pixel: 32,
            depth: 24,
            big_endian: false,
            true_color: true,
            red_max: 255,
            green_max: 255,
            blue_max: 255,
            red_shift: 16,
            green_shift: 8,
            blue_shift: 0,
        }
    }

    /// Channel mask as used by the host graphics contract's
    /// `create_surface`: `max << shift`.
    pub fn red_mask(&self) -> u32 {
        channel_mask(self.red_max, self.red_shift)
    }

    pub fn green_mask(&self) -> u32 {
        channel_mask(self.green_max, self.green_shift)
    }

    pub fn blue_mask(&self) -> u32 {
        channel_mask(self.blue_max, self.blue_shift)
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.bits_per_pixel as usize / 8
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<PixelFormat> {
        let bits_per_pixel = reader.read_u8()?;
        let depth = reader.read_u8()?;
        let big_endian = reader.read_u8()? != 0;
        let true_color = reader.read_u8()? != 0;
        let red_max = reader.read_u16::<BigEndian>()?;
        let green_max = reader.read_u16::<BigEndian>()?;
        let blue_max = reader.read_u16::<BigEndian>()?;
        let red_shift = reader.read_u8()?;
        let green_shift = reader.read_u8()?;
        let blue_shift = reader.read_u8()?;
        let mut padding = [0u8; 3];
        reader.read_exact(&mut padding)?;
        Ok(PixelFormat {
            bits_per_pixel,
            depth,
            big_endian,
            true_color,
            red_max,
            green_max,
            blue_max,
            red_shift,
            green_shift,
            blue_shift,
        })
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(self.bits_per_pixel)?;
        writer.write_u8(self.depth)?;
        writer.write_u8(self.big_endian as u8)?;
        writer.write_u8(self.true_color as u8)?;
        writer.write_u16::<BigEndian>(self.red_max)?;
        writer.write_u16::<BigEndian>(self.green_max)?;
        writer.write_u16::<BigEndian>(self.blue_max)?;
        writer.write_u8(self.red_shift)?;
        writer.write_u8(self.green_shift)?;
        writer.write_u8(self.blue_shift)?;
        writer.write_all(&[0u8; 3])?;
        Ok(())
    }
}

fn channel_mask(max: u16, shift: u8) -> u32 {
    (max as u32) << shift
}

/// A single entry in a connection's color map, used when `true_color` is
/// `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorMapEntry {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl ColorMapEntry {
    pub fn read_from<R: Read>(reader: &mut R) -> Result<ColorMapEntry> {
        Ok(ColorMapEntry {
            red: reader.read_u16::<BigEndian>()?,
            green: reader.read_u16::<BigEndian>()?,
            blue: reader.read_u16::<BigEndian>()?,
        })
    }
}

/// Composes a pixel value from channel intensities using true-color masks.
pub fn compose_pixel(format: &PixelFormat, r: u16, g: u16, b: u16) -> u32 {
    ((r as u32) << format.red_shift)
        | ((g as u32) << format.green_shift)
        | ((b as u32) << format.blue_shift)
}

/// Decomposes a pixel value into channel intensities using true-color masks.
pub fn decompose_pixel(format: &PixelFormat, pixel: u32) -> (u16, u16, u16) {
    let r = ((pixel >> format.red_shift) & format.red_max as u32) as u16;
    let g = ((pixel >> format.green_shift) & format.green_max as u32) as u16;
    let b = ((pixel >> format.blue_shift) & format.blue_max as u32) as u16;
    (r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_mask_round_trips_for_disjoint_channels() {
        let format = PixelFormat {
            bits_per_pixel: 32,
            depth: 24,
            big_endian: false,
            true_color: true,
            red_max: 255,
            green_max: 255,
            blue_max: 255,
            red_shift: 16,
            green_shift: 8,
            blue_shift: 0,
        };
        for &(r, g, b) in &[(0u16, 0u16, 0u16), (255, 0, 0), (0, 255, 128), (42, 99, 200)] {
            let pixel = compose_pixel(&format, r, g, b);
            assert_eq!(decompose_pixel(&format, pixel), (r, g, b));
        }
    }

    #[test]
    fn pixel_mask_round_trips_for_565() {
        let format = PixelFormat {
            bits_per_pixel: 16,
            depth: 16,
            big_endian: false,
            true_color: true,
            red_max: 31,
            green_max: 63,
            blue_max: 31,
            red_shift: 11,
            green_shift: 5,
            blue_shift: 0,
        };
        for &(r, g, b) in &[(31u16, 63u16, 31u16), (0, 0, 0), (15, 20, 5)] {
            let pixel = compose_pixel(&format, r, g, b);
            assert_eq!(decompose_pixel(&format, pixel), (r, g, b));
        }
    }

    #[test]
    fn wire_round_trip() {
        let format = PixelFormat::new_rgb888();
        let mut buf = Vec::new();
        format.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), 16);
        let parsed = PixelFormat::read_from(&mut &buf[..]).unwrap();
        assert_eq!(parsed, format);
    }
}
