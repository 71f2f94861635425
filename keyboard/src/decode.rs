use bitflags::bitflags;
use tracing::trace;

use crate::{codes, scan};

bitflags! {
    //Prefix bytes seen since the last resolved action
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Prefix: u8 {
        const BREAK = 1;
        const EXTENDED = 2;
        const PAUSE = 4;
    }
}

bitflags! {
    //Chord bits follow make/break; CAPS_LOCK and NUM_LOCK are toggles
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const LSHIFT = 0x01;
        const RSHIFT = 0x02;
        const LCTRL = 0x04;
        const RCTRL = 0x08;
        const LALT = 0x10;
        const RALT = 0x20;
        const CAPS_LOCK = 0x40;
        const NUM_LOCK = 0x80;
    }
}

impl Modifiers {
    pub fn shift(self) -> bool {
        self.intersects(Modifiers::LSHIFT | Modifiers::RSHIFT)
    }

    pub fn ctrl(self) -> bool {
        self.intersects(Modifiers::LCTRL | Modifiers::RCTRL)
    }

    pub fn alt(self) -> bool {
        self.intersects(Modifiers::LALT | Modifiers::RALT)
    }
}

//A resolved key-down, with the modifier state it was struck under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: u8,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    //Sequence still accumulating, or the byte resolved to nothing
    None,
    //A key went down (or repeated)
    Key(KeyPress),
    //The system-reset key was struck; the embedder pulses the line
    ResetRequest,
}

/*
 * struct Decoder - Scan stream state machine
 * @prefix: Prefix bytes accumulated for the pending action
 * @modifiers: Persistent modifier state
 * @last_key: Identity remembered for matching the following break
 */
pub struct Decoder {
    prefix: Prefix,
    modifiers: Modifiers,
    last_key: u8,
}

impl Decoder {
    pub fn new() -> Self {
        Decoder {
            prefix: Prefix::empty(),
            //Keyboards power up with num lock engaged
            modifiers: Modifiers::NUM_LOCK,
            last_key: 0,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /*
     * feed - Consume one raw scan byte
     *
     * Prefix bytes accumulate and produce nothing. Any other byte
     * updates modifiers, resolves the pending action, and clears the
     * prefixes. Emits at most one key-down per byte; break codes and
     * unmapped positions are suppressed, never errors.
     */
    pub fn feed(&mut self, code: u8) -> Action {
        match code {
            scan::EXTENDED_PREFIX => {
                trace!("prefix e0");
                self.prefix |= Prefix::EXTENDED;
                return Action::None;
            }
            scan::BREAK_PREFIX => {
                trace!("prefix f0");
                self.prefix |= Prefix::BREAK;
                return Action::None;
            }
            scan::PAUSE_PREFIX => {
                trace!("prefix e1");
                self.prefix |= Prefix::PAUSE;
                return Action::None;
            }
            _ => {}
        }

        self.update_modifiers(code);

        let mut key = 0u8;
        if self.prefix.contains(Prefix::EXTENDED) {
            let mapped = scan::extended_key(code);
            if self.prefix.contains(Prefix::BREAK) {
                if mapped != 0 && mapped == self.last_key {
                    self.last_key = 0;
                }
            } else {
                key = mapped;
                self.last_key = mapped;
            }
        } else if self.prefix.contains(Prefix::PAUSE) {
            //The pause sequence embeds a ctrl make; swallow it without
            //resolving, so the prefixes stay armed
            if code == scan::CTRL {
                return Action::None;
            }
            if code == scan::NUM_LOCK {
                if !self.prefix.contains(Prefix::BREAK) {
                    key = codes::PAUSE;
                }
                self.last_key = 0;
            }
        } else if code == scan::RESET && self.prefix.is_empty() {
            //Side effect only, never a key event; the break form falls
            //out of the plain table and is suppressed there
            trace!("reset request");
            return Action::ResetRequest;
        } else {
            let mut mapped = scan::PLAIN_MAP.get(code as usize).copied().unwrap_or(0);
            if !self.modifiers.contains(Modifiers::NUM_LOCK)
                && (codes::KP_0..=codes::KP_DOT).contains(&mapped)
            {
                mapped += codes::NUM_LOCK_OFFSET;
            }
            if self.prefix.contains(Prefix::BREAK) {
                if mapped == self.last_key {
                    self.last_key = 0;
                }
            } else {
                self.last_key = mapped;
                key = mapped;
            }
        }
        self.prefix = Prefix::empty();

        if key == 0 {
            return Action::None;
        }
        trace!(key, "key down");
        Action::Key(KeyPress {
            key,
            modifiers: self.modifiers,
        })
    }

    fn update_modifiers(&mut self, code: u8) {
        let extended = self.prefix.contains(Prefix::EXTENDED);
        match code {
            scan::LEFT_SHIFT if !extended => self.chord(Modifiers::LSHIFT),
            scan::RIGHT_SHIFT if !extended => self.chord(Modifiers::RSHIFT),
            //Skipped inside the pause sequence, which embeds its own
            //ctrl bytes
            scan::CTRL if !self.prefix.contains(Prefix::PAUSE) => {
                self.chord(if extended {
                    Modifiers::RCTRL
                } else {
                    Modifiers::LCTRL
                });
            }
            scan::ALT => {
                self.chord(if extended {
                    Modifiers::RALT
                } else {
                    Modifiers::LALT
                });
            }
            scan::CAPS_LOCK if self.prefix.is_empty() => {
                self.modifiers.toggle(Modifiers::CAPS_LOCK);
            }
            scan::NUM_LOCK if self.prefix.is_empty() => {
                self.modifiers.toggle(Modifiers::NUM_LOCK);
            }
            _ => {}
        }
    }

    fn chord(&mut self, bit: Modifiers) {
        self.modifiers
            .set(bit, !self.prefix.contains(Prefix::BREAK));
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder::new()
    }
}
