//! The connection façade: `ClientBuilder::connect`, `Client`, and the
//! sender methods the host event loop drives.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use log::debug;

use crate::encodings::Framebuffer;
use crate::error::Result;
use crate::handshake;
use crate::host::{EventSink, Surface, Transport};
use crate::input::{self, MouseButtons};
use crate::keyboard::HostKeyEvent;
use crate::protocol::{Encoding, Message, SetEncodings};
use crate::recv::{self, RecvContext};

/// Encodings advertised at connect time, in the preference order the
/// server is expected to honor.
fn advertised_encodings() -> Vec<Encoding> {
    Encoding::supported_in_preference_order().to_vec()
}

pub struct ClientBuilder {
    shared: bool,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    pub fn new() -> ClientBuilder {
        ClientBuilder { shared: false }
    }

    /// Requests shared (non-exclusive) access in `ClientInit`. Defaults to
    /// `false`, matching exclusive access.
    pub fn shared(mut self, value: bool) -> ClientBuilder {
        self.shared = value;
        self
    }

    /// Runs the handshake, advertises encodings, requests the first
    /// framebuffer update, and spawns the background receive task.
    pub fn connect<T>(self, mut transport: T, fps: u32, event_sink: Arc<dyn EventSink>) -> Result<Client<T>>
    where
        T: Transport + 'static,
    {
        let details = handshake::perform(&mut transport, self.shared)?;
        debug!(
            "connected to {:?} ({}x{})",
            details.name, details.framebuffer_width, details.framebuffer_height
        );

        SetEncodings(advertised_encodings()).write_to(&mut transport)?;

        let framebuffer = Arc::new(Mutex::new(Framebuffer::new(
            details.framebuffer_width,
            details.framebuffer_height,
            details.pixel_format,
        )));
        let window: Arc<Mutex<Option<Box<dyn Surface>>>> = Arc::new(Mutex::new(None));
        let qemu_keyevents_supported = Arc::new(AtomicBool::new(false));
        let running = Arc::new(AtomicBool::new(true));

        crate::protocol::FramebufferUpdateRequest {
            incremental: false,
            x: 0,
            y: 0,
            width: details.framebuffer_width,
            height: details.framebuffer_height,
        }
        .write_to(&mut transport)?;

        let recv_reader = transport.try_clone()?;
        let send_transport = transport.try_clone()?;

        let recv_handle = {
            let ctx = RecvContext {
                reader: recv_reader,
                framebuffer: Arc::clone(&framebuffer),
                window: Arc::clone(&window),
                qemu_keyevents_supported: Arc::clone(&qemu_keyevents_supported),
                running: Arc::clone(&running),
                event_sink,
                fps,
            };
            let writer = transport.try_clone()?;
            thread::spawn(move || recv::run(ctx, writer))
        };

        Ok(Client {
            transport: send_transport,
            framebuffer,
            window,
            qemu_keyevents_supported,
            running,
            recv_handle: Some(recv_handle),
            name: details.name,
        })
    }
}

/// A live RFB connection. Owns the write half of the transport and the
/// shared state the receive task publishes into.
pub struct Client<T> {
    transport: T,
    framebuffer: Arc<Mutex<Framebuffer>>,
    window: Arc<Mutex<Option<Box<dyn Surface>>>>,
    qemu_keyevents_supported: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
    recv_handle: Option<JoinHandle<()>>,
    name: String,
}

impl<T: Transport> Client<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn framebuffer(&self) -> &Arc<Mutex<Framebuffer>> {
        &self.framebuffer
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Records the host window the receive task should resize on
    /// `DesktopSize` rectangles. Can be called at any point in the
    /// connection's lifetime, including before any resize occurs.
    pub fn attach_window(&mut self, surface: Box<dyn Surface>) {
        *self.window.lock().unwrap() = Some(surface);
    }

    pub fn send_key(&mut self, down: bool, event: HostKeyEvent) -> Result<()> {
        input::send_key(
            &mut self.transport,
            down,
            event,
            self.qemu_keyevents_supported.load(Ordering::SeqCst),
        )
    }

    pub fn send_pointer(
        &mut self,
        buttons: MouseButtons,
        x: u16,
        y: u16,
        wheel_x: i32,
        wheel_y: i32,
    ) -> Result<()> {
        input::send_pointer(&mut self.transport, buttons, x, y, wheel_x, wheel_y)
    }

    /// Blocks until the receive task publishes its shutdown notification
    /// and exits.
    pub fn wait(mut self) {
        if let Some(handle) = self.recv_handle.take() {
            let _ = handle.join();
        }
    }
}
