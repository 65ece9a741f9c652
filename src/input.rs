//! Outgoing input events: pointer motion/buttons/wheel and keyboard.
//!
//! Button mask bit layout (RFC 6143 §7.5.5, extended by the wheel-button
//! convention several servers including TigerVNC/RealVNC implement):
//! bit 0 = left, bit 1 = middle, bit 2 = right, bit 3 = wheel up,
//! bit 4 = wheel down, bit 5 = wheel left, bit 6 = wheel right.

use std::io::Write;

use crate::error::Result;
use crate::keyboard::{select_frame, HostKeyEvent, KeyFrame};
use crate::protocol::{KeyEvent, Message, PointerEvent, QemuExtendedKeyEvent};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseButtons {
    pub left: bool,
    pub middle: bool,
    pub right: bool,
}

impl MouseButtons {
    fn mask(self) -> u8 {
        let mut mask = 0u8;
        if self.left {
            mask |= 1 << 0;
        }
        if self.middle {
            mask |= 1 << 1;
        }
        if self.right {
            mask |= 1 << 2;
        }
        mask
    }
}

const WHEEL_UP: u8 = 1 << 3;
const WHEEL_DOWN: u8 = 1 << 4;
const WHEEL_LEFT: u8 = 1 << 5;
const WHEEL_RIGHT: u8 = 1 << 6;

/// Sends a pointer state update, and if `wheel_x`/`wheel_y` are non-zero,
/// follows it with the press-then-release pair each wheel "tick" requires
/// (RFB has no wheel-delta field; a tick is modeled as momentarily setting
/// the corresponding wheel bit).
pub fn send_pointer<W: Write>(
    writer: &mut W,
    buttons: MouseButtons,
    x: u16,
    y: u16,
    wheel_x: i32,
    wheel_y: i32,
) -> Result<()> {
    let base_mask = buttons.mask();
    PointerEvent {
        button_mask: base_mask,
        x,
        y,
    }
    .write_to(writer)?;

    let mut wheel_mask = 0u8;
    if wheel_y > 0 {
        wheel_mask |= WHEEL_UP;
    } else if wheel_y < 0 {
        wheel_mask |= WHEEL_DOWN;
    }
    if wheel_x > 0 {
        wheel_mask |= WHEEL_RIGHT;
    } else if wheel_x < 0 {
        wheel_mask |= WHEEL_LEFT;
    }

    if wheel_mask != 0 {
        PointerEvent {
            button_mask: base_mask | wheel_mask,
            x,
            y,
        }
        .write_to(writer)?;
        PointerEvent {
            button_mask: base_mask,
            x,
            y,
        }
        .write_to(writer)?;
    }

    Ok(())
}

/// Sends a key event, choosing between the classic and QEMU extended frames
/// per the keyboard module's selection rule. A dropped (unmapped) key is
/// not an error — it simply sends nothing.
pub fn send_key<W: Write>(
    writer: &mut W,
    down: bool,
    event: HostKeyEvent,
    qemu_keyevents_supported: bool,
) -> Result<()> {
    match select_frame(event, qemu_keyevents_supported) {
        KeyFrame::Classic { keysym } => KeyEvent { down, keysym }.write_to(writer),
        KeyFrame::Extended { keysym, qnum } => QemuExtendedKeyEvent {
            down,
            keysym,
            keycode: qnum,
        }
        .write_to(writer),
        KeyFrame::Drop => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::x11::host;

    #[test]
    fn pointer_event_without_wheel_is_a_single_frame() {
        let mut buf = Vec::new();
        send_pointer(
            &mut buf,
            MouseButtons {
                left: true,
                ..Default::default()
            },
            10,
            20,
            0,
            0,
        )
        .unwrap();
        assert_eq!(buf.len(), 6);
        assert_eq!(buf[0], 5);
        assert_eq!(buf[1], 0b0000_0001);
    }

    #[test]
    fn scroll_tick_sends_press_then_release() {
        let mut buf = Vec::new();
        send_pointer(&mut buf, MouseButtons::default(), 0, 0, 0, 1).unwrap();
        assert_eq!(buf.len(), 12);
        assert_eq!(buf[1], WHEEL_UP);
        assert_eq!(buf[7], 0);
    }

    #[test]
    fn key_event_drops_unmapped_keys_silently() {
        let mut buf = Vec::new();
        let event = HostKeyEvent {
            keysym: 0xdead,
            scancode: 0xffff,
            shift: false,
        };
        send_key(&mut buf, true, event, false).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn key_event_sends_classic_frame_when_unsupported() {
        let mut buf = Vec::new();
        let event = HostKeyEvent {
            keysym: host::RETURN,
            scancode: 40,
            shift: false,
        };
        send_key(&mut buf, true, event, false).unwrap();
        assert_eq!(buf.len(), 8);
        assert_eq!(buf[0], 4);
    }

    #[test]
    fn key_event_sends_extended_frame_when_supported_and_mapped() {
        let mut buf = Vec::new();
        let event = HostKeyEvent {
            keysym: host::RETURN,
            scancode: 40,
            shift: false,
        };
        send_key(&mut buf, true, event, true).unwrap();
        assert_eq!(buf.len(), 12);
        assert_eq!(buf[0], 255);
    }
}
