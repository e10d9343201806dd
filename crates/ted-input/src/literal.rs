//! Key-literal parser.
//!
//! Keymaps name their bindings with compact literals in the Emacs
//! tradition: modifier prefixes `C-` (ctrl), `M-` (meta), `S-` (shift),
//! `s-` (super), then either a `<named>` key or a single printable
//! character. `kbd` produces the same [`Key`] the decoder would, so a
//! binding matches by equality.
//!
//! One deliberate quirk carried from the terminal itself: `C-g` is the BEL
//! byte on the wire, so `kbd("C-g")` yields the unmodified BEL key.

use thiserror::Error;

use crate::{Key, KeyCode, ModMask, NamedKey};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LiteralError {
    #[error("unknown named key <{0}>")]
    UnknownNamed(String),
    #[error("unterminated named key in {0:?}")]
    Unterminated(String),
    #[error("bad key literal {0:?}")]
    Malformed(String),
}

/// Parse a key literal such as `"C-x"`, `"M-<"`, or `"C-S-<left>"`.
pub fn kbd(literal: &str) -> Result<Key, LiteralError> {
    let mut mods = ModMask::empty();
    let mut rest = literal;
    loop {
        rest = match rest.split_at_checked(2) {
            Some(("C-", tail)) => {
                mods |= ModMask::CTRL;
                tail
            }
            Some(("M-", tail)) => {
                mods |= ModMask::META;
                tail
            }
            Some(("S-", tail)) => {
                mods |= ModMask::SHIFT;
                tail
            }
            Some(("s-", tail)) => {
                mods |= ModMask::SUPER;
                tail
            }
            _ => break,
        };
    }

    if let Some(name) = rest.strip_prefix('<') {
        let Some(name) = name.strip_suffix('>') else {
            return Err(LiteralError::Unterminated(literal.to_string()));
        };
        let code = match name {
            "up" => KeyCode::Named(NamedKey::Up),
            "down" => KeyCode::Named(NamedKey::Down),
            "left" => KeyCode::Named(NamedKey::Left),
            "right" => KeyCode::Named(NamedKey::Right),
            "return" => KeyCode::Named(NamedKey::LineFeed),
            "home" => KeyCode::Named(NamedKey::Home),
            "end" => KeyCode::Named(NamedKey::End),
            "tab" => KeyCode::Named(NamedKey::Tab),
            "backspace" => KeyCode::Named(NamedKey::Backspace),
            "delete" => KeyCode::Named(NamedKey::Delete),
            "prior" => KeyCode::Named(NamedKey::PageUp),
            "next" => KeyCode::Named(NamedKey::PageDown),
            "cr" => KeyCode::Named(NamedKey::Return),
            "space" => KeyCode::Char(' '),
            other => return Err(LiteralError::UnknownNamed(other.to_string())),
        };
        return Ok(Key { mods, code });
    }

    // C-g never reaches the decoder as a modified 'g': the terminal sends
    // BEL. Encode the literal the way the wire does.
    if mods == ModMask::CTRL && rest == "g" {
        return Ok(Key::named(NamedKey::Bel));
    }

    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if (' '..='~').contains(&c) => Ok(Key { mods, code: KeyCode::Char(c) }),
        _ => Err(LiteralError::Malformed(literal.to_string())),
    }
}
