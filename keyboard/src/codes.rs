//! Canonical, layout-independent key identities.
//!
//! 0x20-0x7E aliases printable ASCII; 0x80-0xBF enumerates function,
//! keypad, special and editing keys. 0 means "no key".

pub const F1: u8 = 0x80;
pub const F2: u8 = 0x81;
pub const F3: u8 = 0x82;
pub const F4: u8 = 0x83;
pub const F5: u8 = 0x84;
pub const F6: u8 = 0x85;
pub const F7: u8 = 0x86;
pub const F8: u8 = 0x87;
pub const F9: u8 = 0x88;
pub const F10: u8 = 0x89;
pub const F11: u8 = 0x8A;
pub const F12: u8 = 0x8B;
pub const F13: u8 = 0x8C;
pub const F14: u8 = 0x8D;
pub const F15: u8 = 0x8E;
pub const F16: u8 = 0x8F;

pub const KP_0: u8 = 0x90;
pub const KP_1: u8 = 0x91;
pub const KP_2: u8 = 0x92;
pub const KP_3: u8 = 0x93;
pub const KP_4: u8 = 0x94;
pub const KP_5: u8 = 0x95;
pub const KP_6: u8 = 0x96;
pub const KP_7: u8 = 0x97;
pub const KP_8: u8 = 0x98;
pub const KP_9: u8 = 0x99;
pub const KP_DOT: u8 = 0x9A;
pub const KP_PLUS: u8 = 0x9B;
pub const KP_DASH: u8 = 0x9C;
pub const KP_STAR: u8 = 0x9D;
pub const KP_SLASH: u8 = 0x9E;
pub const KP_ENTER: u8 = 0x9F;

pub const SCROLL_LOCK: u8 = 0xA0;
pub const BREAK: u8 = 0xA1;
pub const PRINT_SCREEN: u8 = 0xA2;
pub const PAUSE: u8 = 0xA3;
pub const SYSRQ: u8 = 0xA4;
pub const ENTER: u8 = 0xA8;
pub const BACKSPACE: u8 = 0xA9;
pub const TAB: u8 = 0xAA;
pub const ESC: u8 = 0xAB;

//Editing block, reached through the E0 prefix (or the keypad with num
//lock off)
pub const INSERT: u8 = 0xB0;
pub const END: u8 = 0xB1;
pub const DOWN: u8 = 0xB2;
pub const PAGE_DOWN: u8 = 0xB3;
pub const LEFT: u8 = 0xB4;
pub const RIGHT: u8 = 0xB6;
pub const HOME: u8 = 0xB7;
pub const UP: u8 = 0xB8;
pub const PAGE_UP: u8 = 0xB9;
pub const DELETE: u8 = 0xBA;

//With num lock off, keypad digits and dot shift by this into the
//editing block (KP_0 -> INSERT and so on)
pub const NUM_LOCK_OFFSET: u8 = INSERT - KP_0;
