//! X11 keysym constants (from the public `keysymdef.h` numbering) and the
//! explicit translation table for non-printable host keys.

/// `XK_VoidSymbol`: returned for any host keysym this crate does not map.
pub const VOID_SYMBOL: u32 = 0x00ff_ffff;

pub const XK_BACKSPACE: u32 = 0xff08;
pub const XK_TAB: u32 = 0xff09;
pub const XK_RETURN: u32 = 0xff0d;
pub const XK_ESCAPE: u32 = 0xff1b;
pub const XK_DELETE: u32 = 0xffff;

pub const XK_HOME: u32 = 0xff50;
pub const XK_LEFT: u32 = 0xff51;
pub const XK_UP: u32 = 0xff52;
pub const XK_RIGHT: u32 = 0xff53;
pub const XK_DOWN: u32 = 0xff54;
pub const XK_PAGE_UP: u32 = 0xff55;
pub const XK_PAGE_DOWN: u32 = 0xff56;
pub const XK_END: u32 = 0xff57;

pub const XK_PRINT: u32 = 0xff61;
pub const XK_INSERT: u32 = 0xff63;
pub const XK_MENU: u32 = 0xff67;

pub const XK_PAUSE: u32 = 0xff13;
pub const XK_SCROLL_LOCK: u32 = 0xff14;

pub const XK_NUM_LOCK: u32 = 0xff7f;
pub const XK_KP_ENTER: u32 = 0xff8d;
pub const XK_KP_MULTIPLY: u32 = 0xffaa;
pub const XK_KP_ADD: u32 = 0xffab;
pub const XK_KP_SEPARATOR: u32 = 0xffac;
pub const XK_KP_SUBTRACT: u32 = 0xffad;
pub const XK_KP_DIVIDE: u32 = 0xffaf;
pub const XK_KP_0: u32 = 0xffb0;
pub const XK_KP_1: u32 = 0xffb1;
pub const XK_KP_2: u32 = 0xffb2;
pub const XK_KP_3: u32 = 0xffb3;
pub const XK_KP_4: u32 = 0xffb4;
pub const XK_KP_5: u32 = 0xffb5;
pub const XK_KP_6: u32 = 0xffb6;
pub const XK_KP_7: u32 = 0xffb7;
pub const XK_KP_8: u32 = 0xffb8;
pub const XK_KP_9: u32 = 0xffb9;

pub const XK_F1: u32 = 0xffbe;
pub const XK_F2: u32 = 0xffbf;
pub const XK_F3: u32 = 0xffc0;
pub const XK_F4: u32 = 0xffc1;
pub const XK_F5: u32 = 0xffc2;
pub const XK_F6: u32 = 0xffc3;
pub const XK_F7: u32 = 0xffc4;
pub const XK_F8: u32 = 0xffc5;
pub const XK_F9: u32 = 0xffc6;
pub const XK_F10: u32 = 0xffc7;
pub const XK_F11: u32 = 0xffc8;
pub const XK_F12: u32 = 0xffc9;

pub const XK_SHIFT_L: u32 = 0xffe1;
pub const XK_SHIFT_R: u32 = 0xffe2;
pub const XK_CONTROL_L: u32 = 0xffe3;
pub const XK_CONTROL_R: u32 = 0xffe4;
pub const XK_CAPS_LOCK: u32 = 0xffe5;
pub const XK_ALT_L: u32 = 0xffe9;
pub const XK_ALT_R: u32 = 0xffea;
pub const XK_SUPER_L: u32 = 0xffeb;
pub const XK_SUPER_R: u32 = 0xffec;

/// Host keysym constants. The host keyboard toolkit is an external
/// collaborator (out of scope for this crate), so these are this crate's
/// own stable identifiers for the non-printable keys it knows how to
/// translate — not tied to any particular toolkit's numbering.
pub mod host {
    pub const UNKNOWN: u32 = 0x1000;
    pub const RETURN: u32 = 0x1001;
    pub const ESCAPE: u32 = 0x1002;
    pub const BACKSPACE: u32 = 0x1003;
    pub const TAB: u32 = 0x1004;
    pub const CAPS_LOCK: u32 = 0x1005;

    pub const F1: u32 = 0x1010;
    pub const F2: u32 = 0x1011;
    pub const F3: u32 = 0x1012;
    pub const F4: u32 = 0x1013;
    pub const F5: u32 = 0x1014;
    pub const F6: u32 = 0x1015;
    pub const F7: u32 = 0x1016;
    pub const F8: u32 = 0x1017;
    pub const F9: u32 = 0x1018;
    pub const F10: u32 = 0x1019;
    pub const F11: u32 = 0x101a;
    pub const F12: u32 = 0x101b;

    pub const PRINT_SCREEN: u32 = 0x1020;
    pub const SCROLL_LOCK: u32 = 0x1021;
    pub const PAUSE: u32 = 0x1022;
    pub const INSERT: u32 = 0x1023;
    pub const HOME: u32 = 0x1024;
    pub const PAGE_UP: u32 = 0x1025;
    pub const DELETE: u32 = 0x1026;
    pub const END: u32 = 0x1027;
    pub const PAGE_DOWN: u32 = 0x1028;
    pub const RIGHT: u32 = 0x1029;
    pub const LEFT: u32 = 0x102a;
    pub const DOWN: u32 = 0x102b;
    pub const UP: u32 = 0x102c;

    pub const NUM_LOCK: u32 = 0x1030;
    pub const KP_DIVIDE: u32 = 0x1031;
    pub const KP_MULTIPLY: u32 = 0x1032;
    pub const KP_MINUS: u32 = 0x1033;
    pub const KP_PLUS: u32 = 0x1034;
    pub const KP_ENTER: u32 = 0x1035;
    pub const KP_0: u32 = 0x1036;
    pub const KP_1: u32 = 0x1037;
    pub const KP_2: u32 = 0x1038;
    pub const KP_3: u32 = 0x1039;
    pub const KP_4: u32 = 0x103a;
    pub const KP_5: u32 = 0x103b;
    pub const KP_6: u32 = 0x103c;
    pub const KP_7: u32 = 0x103d;
    pub const KP_8: u32 = 0x103e;
    pub const KP_9: u32 = 0x103f;
    pub const KP_COMMA: u32 = 0x1040;

    pub const APPLICATION_MENU: u32 = 0x1050;

    pub const SHIFT_LEFT: u32 = 0x1060;
    pub const SHIFT_RIGHT: u32 = 0x1061;
    pub const CONTROL_LEFT: u32 = 0x1062;
    pub const CONTROL_RIGHT: u32 = 0x1063;
    pub const ALT_LEFT: u32 = 0x1064;
    pub const ALT_RIGHT: u32 = 0x1065;
    pub const SUPER_LEFT: u32 = 0x1066;
    pub const SUPER_RIGHT: u32 = 0x1067;
}

/// Maps a non-printable host keysym to its X11 equivalent, or `None` if it
/// isn't one of the keys this crate knows about.
pub fn translate_special(keysym: u32) -> Option<u32> {
    use host::*;
    Some(match keysym {
        UNKNOWN => VOID_SYMBOL,

        RETURN => XK_RETURN,
        ESCAPE => XK_ESCAPE,
        BACKSPACE => XK_BACKSPACE,
        TAB => XK_TAB,
        CAPS_LOCK => XK_CAPS_LOCK,

        F1 => XK_F1,
        F2 => XK_F2,
        F3 => XK_F3,
        F4 => XK_F4,
        F5 => XK_F5,
        F6 => XK_F6,
        F7 => XK_F7,
        F8 => XK_F8,
        F9 => XK_F9,
        F10 => XK_F10,
        F11 => XK_F11,
        F12 => XK_F12,

        PRINT_SCREEN => XK_PRINT,
        SCROLL_LOCK => XK_SCROLL_LOCK,
        PAUSE => XK_PAUSE,
        INSERT => XK_INSERT,
        HOME => XK_HOME,
        PAGE_UP => XK_PAGE_UP,
        DELETE => XK_DELETE,
        END => XK_END,
        PAGE_DOWN => XK_PAGE_DOWN,
        RIGHT => XK_RIGHT,
        LEFT => XK_LEFT,
        DOWN => XK_DOWN,
        UP => XK_UP,

        NUM_LOCK => XK_NUM_LOCK,
        KP_DIVIDE => XK_KP_DIVIDE,
        KP_MULTIPLY => XK_KP_MULTIPLY,
        KP_MINUS => XK_KP_SUBTRACT,
        KP_PLUS => XK_KP_ADD,
        KP_ENTER => XK_KP_ENTER,
        KP_0 => XK_KP_0,
        KP_1 => XK_KP_1,
        KP_2 => XK_KP_2,
        KP_3 => XK_KP_3,
        KP_4 => XK_KP_4,
        KP_5 => XK_KP_5,
        KP_6 => XK_KP_6,
        KP_7 => XK_KP_7,
        KP_8 => XK_KP_8,
        KP_9 => XK_KP_9,
        KP_COMMA => XK_KP_SEPARATOR,

        APPLICATION_MENU => XK_MENU,

        SHIFT_LEFT => XK_SHIFT_L,
        SHIFT_RIGHT => XK_SHIFT_R,
        CONTROL_LEFT => XK_CONTROL_L,
        CONTROL_RIGHT => XK_CONTROL_R,
        ALT_LEFT => XK_ALT_L,
        ALT_RIGHT => XK_ALT_R,
        SUPER_LEFT => XK_SUPER_L,
        SUPER_RIGHT => XK_SUPER_R,

        _ => return None,
    })
}
