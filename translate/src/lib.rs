/*
 * TeleVideo Code Translation
 *
 * Pure mapping from a key identity plus the modifier snapshot to the
 * two-byte code the terminal's keyboard input expects. Layered table
 * lookups in a fixed order; no state, no side effects.
 */

#![cfg_attr(not(test), no_std)]

mod tables;

use bitflags::bitflags;
use keyboard::Modifiers;
use tracing::trace;

bitflags! {
    //Flag byte of the terminal's two-byte keyboard code
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OutputFlags: u8 {
        const ALPHA_LOCK = 0x10;
        const SHIFT = 0x20;
        const CTRL = 0x40;
        const FUNCT = 0x80;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputCode {
    pub flags: OutputFlags,
    pub data: u8,
}

impl OutputCode {
    //Wire order: flag byte first, then the data byte
    pub fn to_bytes(self) -> [u8; 2] {
        [self.flags.bits(), self.data]
    }
}

/*
 * translate - Map one key-down to its terminal code
 *
 * Shift and alpha-lock relayer the identity through their tables (in
 * that order; both may apply), alt becomes the FUNCT flag, ctrl folds
 * 0x40-0x7F into control characters, and keys whose shift polarity
 * differs between the PS/2 layout and the TVI keyboard get their
 * SHIFT flag inverted before the final terminal lookup.
 */
pub fn translate(key: u8, modifiers: Modifiers) -> OutputCode {
    let mut flags = OutputFlags::empty();
    let mut data = key;

    if modifiers.shift() {
        flags |= OutputFlags::SHIFT;
        data = tables::SHIFT_MAP[data as usize];
    }
    if modifiers.contains(Modifiers::CAPS_LOCK) {
        flags |= OutputFlags::ALPHA_LOCK;
        data = tables::ALPHA_LOCK_MAP[data as usize];
    }
    if modifiers.alt() {
        flags |= OutputFlags::FUNCT;
    }
    if modifiers.ctrl() {
        flags |= OutputFlags::CTRL;
        if (0x40..=0x7F).contains(&data) {
            data &= 0x1F;
        }
    }
    if tables::REVERSE_SHIFT.contains(&data) {
        //The TVI keyboard wants the opposite shift state here
        flags ^= OutputFlags::SHIFT;
    }
    data = tables::TERMINAL_MAP[data as usize];

    trace!(flags = flags.bits(), data, "tvi code");
    OutputCode { flags, data }
}
