//! Echo-line formatting.
//!
//! The echo area is the single reserved line below the viewport.
//! Informational messages render yellow, errors red and bold; both end
//! with a reset and erase-to-end so a shorter message fully replaces a
//! longer one.

use ted_state::EchoKind;

const INFO_PRE: &str = "\x1b[33m";
const ERROR_PRE: &str = "\x1b[31m\x1b[1m";
const RESET_AND_ERASE: &str = "\x1b[m\x1b[K";

/// Render one echo message into the byte form the terminal writes.
pub fn echo_line(kind: EchoKind, text: &str) -> String {
    let pre = match kind {
        EchoKind::Info => INFO_PRE,
        EchoKind::Error => ERROR_PRE,
    };
    format!("{pre}{text}{RESET_AND_ERASE}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn info_is_yellow() {
        assert_eq!(
            echo_line(EchoKind::Info, "Wrote 'f'"),
            "\x1b[33mWrote 'f'\x1b[m\x1b[K"
        );
    }

    #[test]
    fn error_is_red_bold() {
        assert_eq!(
            echo_line(EchoKind::Error, "Key is undefined."),
            "\x1b[31m\x1b[1mKey is undefined.\x1b[m\x1b[K"
        );
    }
}
