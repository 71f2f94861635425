//! Set-2 scan code values and the plain-code identity table.

use crate::codes;

//Prefix bytes
pub const BREAK_PREFIX: u8 = 0xF0;
pub const EXTENDED_PREFIX: u8 = 0xE0;
pub const PAUSE_PREFIX: u8 = 0xE1;

//Modifier keys
pub const ALT: u8 = 0x11;
pub const LEFT_SHIFT: u8 = 0x12;
pub const CTRL: u8 = 0x14;
pub const CAPS_LOCK: u8 = 0x58;
pub const RIGHT_SHIFT: u8 = 0x59;
pub const NUM_LOCK: u8 = 0x77;

//SysRq position, wired to the external reset line
pub const RESET: u8 = 0x84;

//Plain (unprefixed) scan code to key identity.
//Modifier positions map to 0; they never resolve to a key.
pub const PLAIN_MAP: [u8; 132] = [
    0,               // 00h = err
    codes::F9,       // 01h = F9
    0,               // 02h =
    codes::F5,       // 03h = F5
    codes::F3,       // 04h = F3
    codes::F1,       // 05h = F1
    codes::F2,       // 06h = F2
    codes::F12,      // 07h = F12
    0,               // 08h =
    codes::F10,      // 09h = F10
    codes::F8,       // 0Ah = F8
    codes::F6,       // 0Bh = F6
    codes::F4,       // 0Ch = F4
    codes::TAB,      // 0Dh = TAB
    b'`',            // 0Eh = ` (back quote)
    0,               // 0Fh =
    0,               // 10h =
    0,               // 11h = LALT
    0,               // 12h = LSHIFT
    0,               // 13h =
    0,               // 14h = LCTRL
    b'q',            // 15h = Q
    b'1',            // 16h = 1
    0,               // 17h =
    0,               // 18h =
    0,               // 19h =
    b'z',            // 1Ah = Z
    b's',            // 1Bh = S
    b'a',            // 1Ch = A
    b'w',            // 1Dh = W
    b'2',            // 1Eh = 2
    0,               // 1Fh =
    0,               // 20h =
    b'c',            // 21h = C
    b'x',            // 22h = X
    b'd',            // 23h = D
    b'e',            // 24h = E
    b'4',            // 25h = 4
    b'3',            // 26h = 3
    0,               // 27h =
    0,               // 28h =
    b' ',            // 29h = SPACE
    b'v',            // 2Ah = V
    b'f',            // 2Bh = F
    b't',            // 2Ch = T
    b'r',            // 2Dh = R
    b'5',            // 2Eh = 5
    0,               // 2Fh =
    0,               // 30h =
    b'n',            // 31h = N
    b'b',            // 32h = B
    b'h',            // 33h = H
    b'g',            // 34h = G
    b'y',            // 35h = Y
    b'6',            // 36h = 6
    0,               // 37h =
    0,               // 38h =
    0,               // 39h =
    b'm',            // 3Ah = M
    b'j',            // 3Bh = J
    b'u',            // 3Ch = U
    b'7',            // 3Dh = 7
    b'8',            // 3Eh = 8
    0,               // 3Fh =
    0,               // 40h =
    b',',            // 41h = , comma
    b'k',            // 42h = K
    b'i',            // 43h = I
    b'o',            // 44h = O
    b'0',            // 45h = 0 (zero)
    b'9',            // 46h = 9
    0,               // 47h =
    0,               // 48h =
    b'.',            // 49h = . dot
    b'/',            // 4Ah = /
    b'l',            // 4Bh = L
    b';',            // 4Ch = ;
    b'p',            // 4Dh = P
    b'-',            // 4Eh = -
    0,               // 4Fh =
    0,               // 50h =
    0,               // 51h =
    0x27,            // 52h = ' (quote)
    0,               // 53h =
    b'[',            // 54h = [
    b'=',            // 55h = =
    0,               // 56h =
    0,               // 57h =
    0,               // 58h = CAPS LOCK
    0,               // 59h = RSHIFT
    codes::ENTER,    // 5Ah = ENTER
    b']',            // 5Bh = ]
    0,               // 5Ch =
    0x5C,            // 5Dh = BKSLASH
    0,               // 5Eh =
    0,               // 5Fh =
    0,               // 60h =
    0,               // 61h =
    0,               // 62h =
    0,               // 63h =
    0,               // 64h =
    0,               // 65h =
    codes::BACKSPACE, // 66h = BKSP
    0,               // 67h =
    0,               // 68h =
    codes::KP_1,     // 69h = KP1
    0,               // 6Ah =
    codes::KP_4,     // 6Bh = KP4
    codes::KP_7,     // 6Ch = KP7
    0,               // 6Dh =
    0,               // 6Eh =
    0,               // 6Fh =
    codes::KP_0,     // 70h = KP 0
    codes::KP_DOT,   // 71h = KP .
    codes::KP_2,     // 72h = KP 2
    codes::KP_5,     // 73h = KP 5
    codes::KP_6,     // 74h = KP 6
    codes::KP_8,     // 75h = KP 8
    codes::ESC,      // 76h = ESC
    0,               // 77h = NUM LOCK
    codes::F11,      // 78h = F11
    codes::KP_PLUS,  // 79h = KP +
    codes::KP_3,     // 7Ah = KP 3
    codes::KP_DASH,  // 7Bh = KP -
    codes::KP_STAR,  // 7Ch = KP *
    codes::KP_9,     // 7Dh = KP 9
    codes::SCROLL_LOCK, // 7Eh = SCROLL LOCK
    0,               // 7Fh
    0,               // 80h
    0,               // 81h
    0,               // 82h
    codes::F7,       // 83h = F7
];

//Scan codes that only appear behind the E0 prefix
pub fn extended_key(scan: u8) -> u8 {
    match scan {
        0x4A => codes::KP_SLASH,
        0x5A => codes::KP_ENTER,
        0x69 => codes::END,
        0x6B => codes::LEFT,
        0x6C => codes::HOME,
        0x70 => codes::INSERT,
        0x71 => codes::DELETE,
        0x72 => codes::DOWN,
        0x74 => codes::RIGHT,
        0x75 => codes::UP,
        0x7A => codes::PAGE_DOWN,
        0x7C => codes::PRINT_SCREEN,
        0x7D => codes::PAGE_UP,
        0x7E => codes::BREAK,
        _ => 0,
    }
}
