//! Per-rectangle decoding: Raw, CopyRect, and the DesktopSize /
//! QEMUExtendedKeyEvent pseudo-encodings.
//!
//! Each decoder reads exactly the bytes its encoding defines (pseudo
//! encodings read none — their payload is entirely the rectangle header)
//! and applies the result to the shared [`Framebuffer`].

use std::io::Read;

use crate::codec::{read_full, StagingBuffer};
use crate::error::{Result, VncError};
use crate::pixel::PixelFormat;
use crate::protocol::{CopyRectSource, Encoding, Message, RectangleHeader};

/// The client-visible surface: server pixel data plus the format it's
/// encoded in. Lives behind `Arc<Mutex<_>>` in the connection façade so the
/// host can read it concurrently with the receive task.
#[derive(Debug)]
pub struct Framebuffer {
    pub width: u16,
    pub height: u16,
    pub pixel_format: PixelFormat,
    pub pixels: Vec<u8>,
}

impl Framebuffer {
    pub fn new(width: u16, height: u16, pixel_format: PixelFormat) -> Self {
        let size = width as usize * height as usize * pixel_format.bytes_per_pixel();
        Framebuffer {
            width,
            height,
            pixel_format,
            pixels: vec![0; size],
        }
    }

    /// Replaces the backing store to match a new size, discarding contents
    /// (used by the `DesktopSize` pseudo-encoding). A no-op when `width`
    /// and `height` already match, so a server re-announcing the same
    /// geometry doesn't wipe pending framebuffer contents.
    pub fn resize(&mut self, width: u16, height: u16) {
        if width == self.width && height == self.height {
            return;
        }
        let size = width as usize * height as usize * self.pixel_format.bytes_per_pixel();
        self.width = width;
        self.height = height;
        self.pixels = vec![0; size];
    }

    fn stride(&self) -> usize {
        self.width as usize * self.pixel_format.bytes_per_pixel()
    }

    /// Copies `src` bytes into the rectangle `(x, y, w, h)`, row by row.
    fn blit(&mut self, x: u16, y: u16, width: u16, height: u16, src: &[u8]) {
        let bpp = self.pixel_format.bytes_per_pixel();
        let row_bytes = width as usize * bpp;
        let stride = self.stride();
        for row in 0..height as usize {
            let dst_start = (y as usize + row) * stride + x as usize * bpp;
            let src_start = row * row_bytes;
            self.pixels[dst_start..dst_start + row_bytes]
                .copy_from_slice(&src[src_start..src_start + row_bytes]);
        }
    }

    /// Reads a `(w, h)` rectangle at `(x, y)` out into a freshly allocated
    /// buffer, top-down left-right per RFC 6143 §7.6.2 scanline order.
    fn snapshot(&self, x: u16, y: u16, width: u16, height: u16) -> Vec<u8> {
        let bpp = self.pixel_format.bytes_per_pixel();
        let row_bytes = width as usize * bpp;
        let stride = self.stride();
        let mut out = vec![0u8; row_bytes * height as usize];
        for row in 0..height as usize {
            let src_start = (y as usize + row) * stride + x as usize * bpp;
            let dst_start = row * row_bytes;
            out[dst_start..dst_start + row_bytes]
                .copy_from_slice(&self.pixels[src_start..src_start + row_bytes]);
        }
        out
    }
}

/// Outcome of applying one rectangle, surfaced to the receive loop so it can
/// propagate a resize to the host's window contract.
pub enum RectangleEffect {
    None,
    Resized { width: u16, height: u16 },
}

/// Applies one rectangle described by `header`, reading its payload (if
/// any) from `reader` through `scratch`.
pub fn apply_rectangle<R: Read>(
    reader: &mut R,
    scratch: &mut StagingBuffer,
    framebuffer: &mut Framebuffer,
    header: &RectangleHeader,
) -> Result<RectangleEffect> {
    match header.encoding {
        Encoding::Raw => {
            let bpp = framebuffer.pixel_format.bytes_per_pixel();
            let n = header.width as usize * header.height as usize * bpp;
            let buf = scratch.as_mut_slice(n);
            read_full(reader, buf)?;
            framebuffer.blit(header.x, header.y, header.width, header.height, buf);
            Ok(RectangleEffect::None)
        }
        Encoding::CopyRect => {
            let source = CopyRectSource::read_from(reader)?;
            let snapshot =
                framebuffer.snapshot(source.src_x, source.src_y, header.width, header.height);
            framebuffer.blit(header.x, header.y, header.width, header.height, &snapshot);
            Ok(RectangleEffect::None)
        }
        Encoding::DesktopSize => {
            let unchanged =
                header.width == framebuffer.width && header.height == framebuffer.height;
            framebuffer.resize(header.width, header.height);
            if unchanged {
                Ok(RectangleEffect::None)
            } else {
                Ok(RectangleEffect::Resized {
                    width: header.width,
                    height: header.height,
                })
            }
        }
        Encoding::ContinuousUpdates | Encoding::QemuExtendedKeyEvent => {
            // Pure capability advertisements: no rectangle payload, no
            // framebuffer effect. The server sends one at connect time iff
            // we advertised support for it in `SetEncodings`.
            Ok(RectangleEffect::None)
        }
        Encoding::Unknown(id) => Err(VncError::UnexpectedValue(unknown_encoding_message(id))),
    }
}

fn unknown_encoding_message(_id: i32) -> &'static str {
    "unsupported rectangle encoding"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_format() -> PixelFormat {
        PixelFormat::new_rgb888()
    }

    #[test]
    fn raw_rectangle_blits_into_framebuffer() {
        let mut fb = Framebuffer::new(4, 4, test_format());
        let mut scratch = StagingBuffer::new();
        let header = RectangleHeader {
            x: 1,
            y: 1,
            width: 2,
            height: 2,
            encoding: Encoding::Raw,
        };
        let pixels: Vec<u8> = (0u8..16).collect(); // 2x2 rect, 4 bytes/pixel
        let mut reader = &pixels[..];
        apply_rectangle(&mut reader, &mut scratch, &mut fb, &header).unwrap();

        assert_eq!(&fb.pixels[(1 * 4 + 1) * 4..(1 * 4 + 1) * 4 + 4], &pixels[0..4]);
        assert_eq!(&fb.pixels[(2 * 4 + 1) * 4..(2 * 4 + 1) * 4 + 4], &pixels[8..12]);
    }

    #[test]
    fn copy_rect_reads_source_before_writing_destination() {
        let mut fb = Framebuffer::new(4, 1, test_format());
        // seed distinct pixel values in columns 0..2
        fb.pixels[0..4].copy_from_slice(&[1, 1, 1, 1]);
        fb.pixels[4..8].copy_from_slice(&[2, 2, 2, 2]);

        let header = RectangleHeader {
            x: 1,
            y: 0,
            width: 2,
            height: 1,
            encoding: Encoding::CopyRect,
        };
        // src_x=0, src_y=0: overlapping copy shifted right by one pixel.
        let payload = [0u8, 0, 0, 0];
        let mut reader = &payload[..];
        let mut scratch = StagingBuffer::new();
        apply_rectangle(&mut reader, &mut scratch, &mut fb, &header).unwrap();

        assert_eq!(&fb.pixels[0..4], &[1, 1, 1, 1]);
        assert_eq!(&fb.pixels[4..8], &[1, 1, 1, 1]);
        assert_eq!(&fb.pixels[8..12], &[2, 2, 2, 2]);
    }

    #[test]
    fn desktop_size_resizes_and_reports_effect() {
        let mut fb = Framebuffer::new(4, 4, test_format());
        let header = RectangleHeader {
            x: 0,
            y: 0,
            width: 8,
            height: 6,
            encoding: Encoding::DesktopSize,
        };
        let mut scratch = StagingBuffer::new();
        let effect = apply_rectangle(&mut &[][..], &mut scratch, &mut fb, &header).unwrap();
        assert_eq!(fb.width, 8);
        assert_eq!(fb.height, 6);
        match effect {
            RectangleEffect::Resized { width, height } => {
                assert_eq!((width, height), (8, 6));
            }
            RectangleEffect::None => panic!("expected a resize effect"),
        }
    }

    #[test]
    fn desktop_size_with_unchanged_dimensions_preserves_pixels() {
        let mut fb = Framebuffer::new(4, 4, test_format());
        fb.pixels[0..4].copy_from_slice(&[9, 9, 9, 9]);
        let header = RectangleHeader {
            x: 0,
            y: 0,
            width: 4,
            height: 4,
            encoding: Encoding::DesktopSize,
        };
        let mut scratch = StagingBuffer::new();
        let effect = apply_rectangle(&mut &[][..], &mut scratch, &mut fb, &header).unwrap();
        assert_eq!(&fb.pixels[0..4], &[9, 9, 9, 9]);
        assert!(matches!(effect, RectangleEffect::None));
    }

    #[test]
    fn unknown_encoding_is_unimplemented_not_fatal() {
        let mut fb = Framebuffer::new(2, 2, test_format());
        let header = RectangleHeader {
            x: 0,
            y: 0,
            width: 1,
            height: 1,
            encoding: Encoding::Unknown(16), // ZRLE, a dropped non-goal
        };
        let mut scratch = StagingBuffer::new();
        let err = apply_rectangle(&mut &[][..], &mut scratch, &mut fb, &header).unwrap_err();
        assert!(matches!(err, VncError::UnexpectedValue(_)));
    }
}
