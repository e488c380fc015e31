//! Character → key encoder.
//!
//! The table holds one `u16` per ASCII character: the low 8 bits are the HID
//! usage ID, bit 8 marks characters that need Shift on a US layout. Letters
//! are case-folded and never shifted.

use crate::hid::keyboard::modifier;
use crate::hid::keycodes::*;

/// Shift flag in a table entry.
const SHIFT: u16 = 0x100;

/// Unshifted key.
const fn n(key: u8) -> u16 {
    key as u16
}

/// Shifted key.
const fn s(key: u8) -> u16 {
    SHIFT | key as u16
}

/// A key to press for one script character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Key {
    /// HID usage ID, `KEY_NONE` for unsupported characters.
    pub keycode: u8,
    /// Modifier bits the character needs (Shift or nothing).
    pub modifier: u8,
}

impl Key {
    pub const NONE: Key = Key {
        keycode: KEY_NONE,
        modifier: 0,
    };

    /// `true` if this character types nothing.
    pub const fn is_none(&self) -> bool {
        self.keycode == KEY_NONE
    }
}

static KEY_TABLE: [u16; 128] = build_table();

const fn build_table() -> [u16; 128] {
    let mut t = [n(KEY_NONE); 128];

    let mut i = 0;
    while i < 26 {
        t[b'A' as usize + i] = n(KEY_A + i as u8);
        t[b'a' as usize + i] = n(KEY_A + i as u8);
        i += 1;
    }
    let mut d = 0;
    while d < 9 {
        t[b'1' as usize + d] = n(KEY_1 + d as u8);
        d += 1;
    }
    t[b'0' as usize] = n(KEY_0);

    t[b'\n' as usize] = n(KEY_ENTER);
    t[b'\r' as usize] = n(KEY_ENTER);
    t[b' ' as usize] = n(KEY_SPACE);
    t[b'/' as usize] = n(KEY_SLASH);
    t[b'\\' as usize] = n(KEY_BACKSLASH);
    t[b'-' as usize] = n(KEY_MINUS);
    t[b'.' as usize] = n(KEY_PERIOD);
    t[b'\'' as usize] = n(KEY_APOSTROPHE);

    t[b'|' as usize] = s(KEY_BACKSLASH);
    t[b'$' as usize] = s(KEY_4);
    t[b'"' as usize] = s(KEY_APOSTROPHE);
    t[b'&' as usize] = s(KEY_7);
    t[b'^' as usize] = s(KEY_6);
    t[b'>' as usize] = s(KEY_PERIOD);
    t[b':' as usize] = s(KEY_SEMICOLON);
    t[b'(' as usize] = s(KEY_9);
    t[b')' as usize] = s(KEY_0);

    t
}

/// Encode one script byte.
pub fn encode(ch: u8) -> Key {
    let Some(&entry) = KEY_TABLE.get(ch as usize) else {
        return Key::NONE;
    };
    Key {
        keycode: (entry & 0xFF) as u8,
        modifier: if entry & SHIFT != 0 {
            modifier::LEFT_SHIFT
        } else {
            0
        },
    }
}

/// `true` for the symbols that are typed with Shift held.
pub fn needs_shift(ch: u8) -> bool {
    encode(ch).modifier & modifier::LEFT_SHIFT != 0
}
