//! Host key event translation: host keysym → X11 keysym, and host scancode
//! → QEMU's XT/qnum scancode domain.
//!
//! Both tables are pure data. The X11 keysym table is a hand-written
//! `match` (it's small and the pairs are easier to audit inline); the
//! 512-entry scancode table is generated by `build.rs` from
//! `keyboard-data/scancode_to_qnum.txt` rather than hand-written, per the
//! USB-HID derivation it's built from.

pub(crate) mod x11;

pub use x11::VOID_SYMBOL;

include!(concat!(env!("OUT_DIR"), "/scancode_to_qnum.rs"));

/// A key event as reported by the host toolkit: its keysym in the host's
/// own keysym space, the physical scancode that produced it, and whether a
/// shift-like modifier was held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostKeyEvent {
    pub keysym: u32,
    pub scancode: u16,
    pub shift: bool,
}

/// Which wire frame to send for a key event, per the selection rule: prefer
/// the QEMU extended frame when the server advertised support for it and the
/// scancode has a known qnum mapping; otherwise fall back to the classic
/// frame unless the keysym is unmapped, in which case the event is dropped.
pub enum KeyFrame {
    Classic { keysym: u32 },
    Extended { keysym: u32, qnum: u32 },
    Drop,
}

pub fn select_frame(event: HostKeyEvent, qemu_keyevents_supported: bool) -> KeyFrame {
    let keysym = host_keysym_to_x11(event.keysym, event.shift);
    if qemu_keyevents_supported {
        let qnum = host_scancode_to_qnum(event.scancode);
        if qnum != 0 {
            return KeyFrame::Extended { keysym, qnum };
        }
    }
    if keysym == VOID_SYMBOL {
        KeyFrame::Drop
    } else {
        KeyFrame::Classic { keysym }
    }
}

/// Translates a host keysym into the corresponding X11 keysym.
///
/// Printable ASCII and Latin-1 pass through unchanged; shifted letters are
/// upper-cased by subtracting `0x20`; everything else goes through the
/// explicit table in [`x11`], falling back to `VOID_SYMBOL`.
pub fn host_keysym_to_x11(keysym: u32, shift: bool) -> u32 {
    if (0x20..=0x7e).contains(&keysym) || (0xa0..=0xff).contains(&keysym) {
        if shift && ((0x61..=0x7a).contains(&keysym) || (0xe0..=0xfe).contains(&keysym)) {
            return keysym - 0x20;
        }
        return keysym;
    }
    x11::translate_special(keysym).unwrap_or(VOID_SYMBOL)
}

/// Translates a host scancode into its QEMU XT/qnum scancode, or `0` if
/// unmapped.
pub fn host_scancode_to_qnum(scancode: u16) -> u32 {
    SCANCODE_TO_QNUM
        .get(scancode as usize)
        .copied()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printable_ascii_passes_through() {
        assert_eq!(host_keysym_to_x11('a' as u32, false), 'a' as u32);
        assert_eq!(host_keysym_to_x11('~' as u32, false), '~' as u32);
    }

    #[test]
    fn shifted_letter_uppercases() {
        assert_eq!(host_keysym_to_x11('a' as u32, true), 'A' as u32);
        assert_eq!(host_keysym_to_x11('z' as u32, true), 'Z' as u32);
    }

    #[test]
    fn shifted_latin1_uppercases() {
        assert_eq!(host_keysym_to_x11(0xe0, true), 0xc0);
    }

    #[test]
    fn unmapped_keysym_is_void_symbol() {
        assert_eq!(host_keysym_to_x11(0x9000, false), VOID_SYMBOL);
    }

    #[test]
    fn special_key_maps_through_explicit_table() {
        assert_eq!(host_keysym_to_x11(x11::host::RETURN, false), x11::XK_RETURN);
    }

    #[test]
    fn scancode_table_is_total_and_never_panics() {
        for scancode in 0..=u16::MAX {
            let _ = host_scancode_to_qnum(scancode);
        }
    }

    #[test]
    fn scancode_table_has_512_entries_with_known_values() {
        assert_eq!(SCANCODE_TO_QNUM.len(), 512);
        // scancode 4 ("a" on a USB HID keyboard) maps to qnum 0x1e.
        assert_eq!(host_scancode_to_qnum(4), 0x1e);
    }

    #[test]
    fn selection_prefers_extended_frame_when_supported_and_mapped() {
        let event = HostKeyEvent {
            keysym: x11::host::RETURN,
            scancode: 40, // USB HID "Enter"
            shift: false,
        };
        match select_frame(event, true) {
            KeyFrame::Extended { keysym, qnum } => {
                assert_eq!(keysym, x11::XK_RETURN);
                assert_ne!(qnum, 0);
            }
            _ => panic!("expected an extended frame"),
        }
    }

    #[test]
    fn selection_falls_back_to_classic_when_qemu_not_supported() {
        let event = HostKeyEvent {
            keysym: x11::host::RETURN,
            scancode: 40,
            shift: false,
        };
        match select_frame(event, false) {
            KeyFrame::Classic { keysym } => assert_eq!(keysym, x11::XK_RETURN),
            _ => panic!("expected a classic frame"),
        }
    }

    #[test]
    fn selection_drops_unmapped_unsupported_keys() {
        let event = HostKeyEvent {
            keysym: 0x9000,
            scancode: 0xffff,
            shift: false,
        };
        assert!(matches!(select_frame(event, true), KeyFrame::Drop));
    }
}
