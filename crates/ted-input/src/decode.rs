//! Terminal byte-run decoder.
//!
//! One `read` from a raw-mode terminal yields one of:
//! * a single control byte (`0x00`–`0x1F`, `0x7F`),
//! * a printable ASCII byte,
//! * a multibyte UTF-8 run, or
//! * `ESC` followed by either nothing, a printable byte (Meta chords), a
//!   control byte (Ctrl-Meta chords), or `[` and a CSI sequence.
//!
//! CSI sequences carry `n[;m]<final>`; `m - 1` is a modifier bitmask
//! (bit0 shift, bit1 meta, bit2 ctrl, bit3 super) and `n` selects the key
//! for the `~`-terminated family (Del=3, PgUp=5, PgDn=6, F1–F12).
//!
//! Runs with no keyboard meaning decode to `None`; the command loop reports
//! them as undefined rather than guessing.

use ted_text::utf8_len;
use tracing::trace;

use crate::{Key, ModMask, NamedKey};

/// Decode one byte run into a logical key.
pub fn decode(burst: &[u8]) -> Option<Key> {
    let key = match *burst.first()? {
        0x00 => Some(Key::chr(' ').with_mods(ModMask::CTRL)),
        0x07 => Some(Key::named(NamedKey::Bel)),
        0x08 => Some(Key::named(NamedKey::Backspace)),
        0x09 => Some(Key::named(NamedKey::Tab)),
        0x0a => Some(Key::named(NamedKey::LineFeed)),
        0x0c => Some(Key::named(NamedKey::FormFeed)),
        0x0d => Some(Key::named(NamedKey::Return)),
        0x1b => decode_escape(&burst[1..]),
        b @ 0x01..=0x1a => Some(Key::chr((0x60 + b) as char).with_mods(ModMask::CTRL)),
        0x7f => Some(Key::named(NamedKey::Backspace).with_mods(ModMask::CTRL)),
        b @ 0x20..=0x7e => Some(Key::chr(b as char)),
        b => decode_utf8(burst, b),
    };
    trace!(target: "input.key", bytes = ?burst, key = ?key, "decode");
    key
}

fn decode_utf8(burst: &[u8], leading: u8) -> Option<Key> {
    let n = utf8_len(leading);
    let run = burst.get(..n)?;
    let s = std::str::from_utf8(run).ok()?;
    s.chars().next().map(Key::chr)
}

fn decode_escape(rest: &[u8]) -> Option<Key> {
    let Some(&b0) = rest.first() else {
        return Some(Key::named(NamedKey::Esc));
    };
    match b0 {
        // Ctrl-Meta chords arrive as ESC + the bare control byte.
        0x01..=0x19 => {
            Some(Key::chr((b'a' + b0 - 1) as char).with_mods(ModMask::CTRL | ModMask::META))
        }
        b'[' => {
            if rest.len() > 1 {
                decode_csi(&rest[1..])
            } else {
                Some(Key::chr('[').with_mods(ModMask::META))
            }
        }
        0x20..=0x5a | 0x5c..=0x7e => {
            if rest.len() == 1 {
                Some(Key::chr(b0 as char).with_mods(ModMask::META))
            } else {
                None
            }
        }
        0x7f => Some(Key::named(NamedKey::Backspace).with_mods(ModMask::META)),
        _ => None,
    }
}

fn decode_csi(seq: &[u8]) -> Option<Key> {
    let mut i = 0;
    let mut n: u32 = 0;
    let mut found_n = false;
    while let Some(&b @ b'0'..=b'9') = seq.get(i) {
        n = n * 10 + u32::from(b - b'0');
        found_n = true;
        i += 1;
    }
    if !found_n {
        n = 1;
    }

    let mut m: u32 = 0;
    let mut found_m = false;
    if seq.get(i) == Some(&b';') {
        i += 1;
        while let Some(&b @ b'0'..=b'9') = seq.get(i) {
            m = m * 10 + u32::from(b - b'0');
            found_m = true;
            i += 1;
        }
    }
    if !found_m {
        m = 1;
    }

    let named = match *seq.get(i)? {
        b'~' => match n {
            3 => NamedKey::Delete,
            5 => NamedKey::PageUp,
            6 => NamedKey::PageDown,
            11..=15 => NamedKey::F((n - 10) as u8),
            17..=21 => NamedKey::F((n - 11) as u8),
            23 => NamedKey::F(11),
            24 => NamedKey::F(12),
            _ => return None,
        },
        // Some terminals report Meta-Enter as a CSI-wrapped CR.
        0x0d => return Some(Key::named(NamedKey::Return).with_mods(ModMask::META)),
        b'A' => NamedKey::Up,
        b'B' => NamedKey::Down,
        b'C' => NamedKey::Right,
        b'D' => NamedKey::Left,
        b'F' => NamedKey::End,
        b'H' => NamedKey::Home,
        b'Z' => return Some(Key::named(NamedKey::Tab).with_mods(ModMask::SHIFT)),
        _ => return None,
    };

    Some(Key::named(named).with_mods(ModMask::from_bits_truncate((m - 1) as u8)))
}
