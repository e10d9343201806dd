//! Key model, terminal byte-run decoder, and key-literal parser.
//!
//! A raw-mode terminal delivers each keypress as a short byte run: a single
//! control or printable byte, a UTF-8 sequence, or an ESC-introduced escape
//! sequence. [`decode`] turns one such run into a logical [`Key`];
//! [`kbd`] turns a human-readable literal (`"C-x"`, `"C-S-<left>"`,
//! `"M-<"`) into the same structure so keymaps can be written as strings
//! and compared against decoded input by plain equality.

use smallvec::SmallVec;

mod decode;
mod literal;

pub use decode::decode;
pub use literal::{LiteralError, kbd};

/// A freshly-read burst of terminal bytes. Sixteen bytes covers every
/// escape sequence and UTF-8 run a keypress can produce.
pub type ByteBurst = SmallVec<[u8; 16]>;

bitflags::bitflags! {
    /// Key modifiers. The bit layout matches the CSI `m-1` encoding so the
    /// decoder can mask the parameter straight into place.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ModMask: u8 {
        const SHIFT = 1 << 0;
        const META  = 1 << 1;
        const CTRL  = 1 << 2;
        const SUPER = 1 << 3;
    }
}

/// Keys that are not a plain text character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedKey {
    Bel,
    Backspace,
    Tab,
    /// `0x0A`; also what the `<return>` literal names.
    LineFeed,
    FormFeed,
    /// `0x0D`, the byte the Enter key sends in raw mode.
    Return,
    Esc,
    Up,
    Down,
    Right,
    Left,
    Home,
    End,
    Delete,
    PageUp,
    PageDown,
    F(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Named(NamedKey),
}

/// One logical keypress: a character or named key plus modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    pub mods: ModMask,
    pub code: KeyCode,
}

impl Key {
    pub fn chr(c: char) -> Self {
        Self {
            mods: ModMask::empty(),
            code: KeyCode::Char(c),
        }
    }

    pub fn named(n: NamedKey) -> Self {
        Self {
            mods: ModMask::empty(),
            code: KeyCode::Named(n),
        }
    }

    pub fn with_mods(mut self, mods: ModMask) -> Self {
        self.mods = mods;
        self
    }

    /// True for keys that insert themselves: `<cr>`, `<tab>`, or an
    /// unmodified character that is printable ASCII or any non-ASCII scalar.
    pub fn is_text(&self) -> bool {
        match self.code {
            KeyCode::Named(NamedKey::Return) | KeyCode::Named(NamedKey::Tab) => {
                self.mods.is_empty()
            }
            KeyCode::Named(_) => false,
            KeyCode::Char(c) => {
                self.mods.is_empty() && (!c.is_ascii() || (' '..='~').contains(&c))
            }
        }
    }

    /// True for the digit keys `0`–`9` with no modifiers.
    pub fn as_digit(&self) -> Option<u32> {
        if !self.mods.is_empty() {
            return None;
        }
        match self.code {
            KeyCode::Char(c) => c.to_digit(10),
            KeyCode::Named(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_keys() {
        assert!(Key::chr('a').is_text());
        assert!(Key::chr('é').is_text());
        assert!(Key::named(NamedKey::Return).is_text());
        assert!(Key::named(NamedKey::Tab).is_text());
        assert!(!Key::chr('a').with_mods(ModMask::CTRL).is_text());
        assert!(!Key::named(NamedKey::Left).is_text());
        assert!(!Key::named(NamedKey::Tab).with_mods(ModMask::SHIFT).is_text());
    }

    #[test]
    fn digits() {
        assert_eq!(Key::chr('7').as_digit(), Some(7));
        assert_eq!(Key::chr('a').as_digit(), None);
        assert_eq!(Key::chr('7').with_mods(ModMask::META).as_digit(), None);
    }
}
