//! The background receive loop: demultiplexes server message types, drives
//! rectangle decoding, and publishes exactly one shutdown notification when
//! the connection ends.

use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use byteorder::{BigEndian, ReadBytesExt};
use log::{debug, trace, warn};

use crate::codec::{read_full, StagingBuffer};
use crate::encodings::{apply_rectangle, Framebuffer, RectangleEffect};
use crate::error::{ResultCode, VncError};
use crate::host::{EventSink, Surface};
use crate::pixel::ColorMapEntry;
use crate::protocol::{FramebufferUpdateRequest, Message, RectangleHeader};

const MSG_FRAMEBUFFER_UPDATE: u8 = 0;
const MSG_SET_COLOR_MAP_ENTRIES: u8 = 1;
const MSG_BELL: u8 = 2;
const MSG_SERVER_CUT_TEXT: u8 = 3;

/// State the receive loop owns and mutates; everything else (staging
/// buffer, color map) is local to the loop's stack frame since nothing else
/// reads it.
pub struct RecvContext<R> {
    pub reader: R,
    pub framebuffer: Arc<Mutex<Framebuffer>>,
    pub window: Arc<Mutex<Option<Box<dyn Surface>>>>,
    pub qemu_keyevents_supported: Arc<AtomicBool>,
    pub running: Arc<AtomicBool>,
    pub event_sink: Arc<dyn EventSink>,
    pub fps: u32,
}

/// Sends the full-screen `FramebufferUpdateRequest` the receive loop issues
/// once at startup and after every processed update.
fn request_update<W: std::io::Write>(writer: &mut W, width: u16, height: u16, incremental: bool) -> crate::error::Result<()> {
    FramebufferUpdateRequest {
        incremental,
        x: 0,
        y: 0,
        width,
        height,
    }
    .write_to(writer)
}

/// Runs the receive loop to completion. Intended to be the body of the
/// dedicated receive thread; returns once the connection ends, after
/// publishing the shutdown notification.
pub fn run<R, W>(mut ctx: RecvContext<R>, mut writer: W)
where
    R: Read,
    W: std::io::Write,
{
    let mut staging = StagingBuffer::new();
    let mut color_map: Vec<ColorMapEntry> = Vec::new();

    let code = loop {
        match run_one_message(&mut ctx, &mut writer, &mut staging, &mut color_map) {
            Ok(()) => continue,
            Err(err) => break err.code(),
        }
    };

    ctx.running.store(false, Ordering::SeqCst);
    ctx.event_sink.shutdown(code);
}

fn run_one_message<R, W>(
    ctx: &mut RecvContext<R>,
    writer: &mut W,
    staging: &mut StagingBuffer,
    color_map: &mut Vec<ColorMapEntry>,
) -> crate::error::Result<()>
where
    R: Read,
    W: std::io::Write,
{
    let message_type = {
        let mut buf = [0u8; 1];
        read_full(&mut ctx.reader, &mut buf)?;
        buf[0]
    };

    match message_type {
        MSG_FRAMEBUFFER_UPDATE => {
            handle_framebuffer_update(ctx, writer, staging)?;
            let (width, height) = {
                let fb = ctx.framebuffer.lock().unwrap();
                (fb.width, fb.height)
            };
            request_update(writer, width, height, true)?;
            thread::sleep(Duration::from_millis(1000 / ctx.fps.max(1) as u64));
            Ok(())
        }
        MSG_SET_COLOR_MAP_ENTRIES => handle_set_color_map_entries(&mut ctx.reader, color_map),
        MSG_BELL => {
            debug!("server bell (not actuated; out of scope)");
            Ok(())
        }
        MSG_SERVER_CUT_TEXT => handle_server_cut_text(&mut ctx.reader),
        other => {
            warn!("unknown server message type {other}");
            Err(VncError::UnexpectedValue("unknown server message type"))
        }
    }
}

fn handle_framebuffer_update<R: Read, W>(
    ctx: &mut RecvContext<R>,
    _writer: &mut W,
    staging: &mut StagingBuffer,
) -> crate::error::Result<()> {
    let mut padding = [0u8; 1];
    read_full(&mut ctx.reader, &mut padding)?;
    let rect_count = ctx.reader.read_u16::<BigEndian>()?;

    for _ in 0..rect_count {
        let header = RectangleHeader::read_from(&mut ctx.reader)?;
        trace!(
            "rectangle {}x{} at ({}, {}), encoding {:?}",
            header.width, header.height, header.x, header.y, header.encoding
        );

        match header.encoding {
            crate::protocol::Encoding::ContinuousUpdates => {}
            crate::protocol::Encoding::QemuExtendedKeyEvent => {
                ctx.qemu_keyevents_supported.store(true, Ordering::SeqCst);
            }
            _ => {}
        }

        let mut fb = ctx.framebuffer.lock().unwrap();
        let effect = apply_rectangle(&mut ctx.reader, staging, &mut fb, &header)?;
        if let RectangleEffect::Resized { width, height } = effect {
            if let Some(window) = ctx.window.lock().unwrap().as_mut() {
                window.resize(width, height);
            }
        }
    }
    Ok(())
}

fn handle_set_color_map_entries<R: Read>(
    reader: &mut R,
    color_map: &mut Vec<ColorMapEntry>,
) -> crate::error::Result<()> {
    let mut padding = [0u8; 1];
    read_full(reader, &mut padding)?;
    let first_index = reader.read_u16::<BigEndian>()?;
    let count = reader.read_u16::<BigEndian>()?;

    let needed = first_index as usize + count as usize;
    if color_map.len() < needed {
        color_map.resize(needed, ColorMapEntry::default());
    }
    for i in 0..count as usize {
        color_map[first_index as usize + i] = ColorMapEntry::read_from(reader)?;
    }
    Ok(())
}

fn handle_server_cut_text<R: Read>(reader: &mut R) -> crate::error::Result<()> {
    let mut padding = [0u8; 3];
    read_full(reader, &mut padding)?;
    let length = reader.read_u32::<BigEndian>()?;
    let mut discard = vec![0u8; length as usize];
    read_full(reader, &mut discard)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::PixelFormat;
    use std::sync::mpsc;

    struct ChannelSink(mpsc::Sender<ResultCode>);

    impl EventSink for ChannelSink {
        fn shutdown(&self, code: ResultCode) {
            let _ = self.0.send(code);
        }
    }

    #[test]
    fn unknown_message_type_shuts_down_with_unimplemented_code() {
        let (tx, rx) = mpsc::channel();
        let framebuffer = Arc::new(Mutex::new(Framebuffer::new(4, 4, PixelFormat::new_rgb888())));
        let ctx = RecvContext {
            reader: &[0xffu8][..],
            framebuffer,
            window: Arc::new(Mutex::new(None)),
            qemu_keyevents_supported: Arc::new(AtomicBool::new(false)),
            running: Arc::new(AtomicBool::new(true)),
            event_sink: Arc::new(ChannelSink(tx)),
            fps: 30,
        };
        let mut output = Vec::new();
        run(ctx, &mut output);
        assert_eq!(rx.recv().unwrap(), ResultCode::Unimplemented);
    }

    #[test]
    fn clean_disconnect_shuts_down_with_server_disconnect_code() {
        let (tx, rx) = mpsc::channel();
        let framebuffer = Arc::new(Mutex::new(Framebuffer::new(4, 4, PixelFormat::new_rgb888())));
        let ctx = RecvContext {
            reader: &[][..],
            framebuffer,
            window: Arc::new(Mutex::new(None)),
            qemu_keyevents_supported: Arc::new(AtomicBool::new(false)),
            running: Arc::new(AtomicBool::new(true)),
            event_sink: Arc::new(ChannelSink(tx)),
            fps: 30,
        };
        let mut output = Vec::new();
        run(ctx, &mut output);
        assert_eq!(rx.recv().unwrap(), ResultCode::ServerDisconnect);
    }

    #[test]
    fn server_cut_text_is_discarded_without_erroring() {
        let mut script = vec![MSG_SERVER_CUT_TEXT, 0, 0, 0];
        script.extend_from_slice(&[0, 0, 0, 3]);
        script.extend_from_slice(b"hi!");
        script.push(0xff); // trailing unknown message type to end the loop

        let (tx, rx) = mpsc::channel();
        let framebuffer = Arc::new(Mutex::new(Framebuffer::new(4, 4, PixelFormat::new_rgb888())));
        let ctx = RecvContext {
            reader: &script[..],
            framebuffer,
            window: Arc::new(Mutex::new(None)),
            qemu_keyevents_supported: Arc::new(AtomicBool::new(false)),
            running: Arc::new(AtomicBool::new(true)),
            event_sink: Arc::new(ChannelSink(tx)),
            fps: 30,
        };
        let mut output = Vec::new();
        run(ctx, &mut output);
        assert_eq!(rx.recv().unwrap(), ResultCode::Unimplemented);
    }
}
