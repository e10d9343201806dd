//! Two-level keymap: key literals bound to commands or nested tables.
//!
//! Bindings are stored as literals (`"C-x"`, `"S-<left>"`) and decoded
//! lazily at lookup time, so the tables read like documentation and stay
//! trivially diffable. A nested table entry starts a chord: the loop echoes
//! the prefix, reads another key, and descends.
//!
//! An unmatched key is not an error here; the loop decides whether it
//! self-inserts (plain text, no chord pending) or echoes "Key is
//! undefined.".

use ted_input::{Key, kbd};
use tracing::{trace, warn};

/// Every editor command reachable from the keymap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    // Character / word / paragraph motion
    ForwardChar,
    BackwardChar,
    ForwardWord,
    BackwardWord,
    ForwardParagraph,
    BackwardParagraph,
    // Row and line motion
    NextRow,
    PreviousRow,
    BeginningOfRow,
    EndOfRow,
    BeginningOfLine,
    EndOfLine,
    // Buffer-wide motion
    BeginningOfBuffer,
    EndOfBuffer,
    GotoLine,
    GotoPercent,
    PageDown,
    PageUp,
    ScrollUp,
    ScrollDown,
    SetGoalColumn,
    // Editing
    SelfInsert,
    OpenLine,
    OpenNextLine,
    OpenPreviousLine,
    DeleteChar,
    DeleteBackwardChar,
    DeleteForwardChar,
    // Mark and region
    SetMark,
    ExchangePointAndMark,
    SetMarkForwardChar,
    SetMarkBackwardChar,
    SetMarkNextRow,
    SetMarkPreviousRow,
    SetMarkForwardWord,
    SetMarkBackwardWord,
    SetMarkForwardParagraph,
    SetMarkBackwardParagraph,
    KillRegion,
    KillRegionSave,
    Yank,
    // Files and search
    SaveBuffer,
    SearchBuffer,
    SearchNext,
    SearchPrevious,
    SearchQuit,
    // Session
    ShowLineColumn,
    ToggleReadOnly,
    Suspend,
    Quit,
    KillTed,
    Cancel,
}

/// What a key resolves to inside a table.
#[derive(Debug, Clone, Copy)]
pub enum Binding {
    Command(Command),
    Prefix(&'static [Entry]),
}

#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub chord: &'static str,
    pub binding: Binding,
}

const fn cmd(chord: &'static str, command: Command) -> Entry {
    Entry {
        chord,
        binding: Binding::Command(command),
    }
}

const fn map(chord: &'static str, table: &'static [Entry]) -> Entry {
    Entry {
        chord,
        binding: Binding::Prefix(table),
    }
}

/// The `C-x` table.
pub static EXTENDED_KEYMAP: &[Entry] = &[
    cmd("=", Command::ShowLineColumn),
    cmd("C-c", Command::Quit),
    cmd("C-n", Command::SetGoalColumn),
    cmd("C-q", Command::ToggleReadOnly),
    cmd("C-s", Command::SaveBuffer),
    cmd("C-x", Command::ExchangePointAndMark),
    cmd("M-c", Command::KillTed),
];

/// The top-level table.
pub static GLOBAL_KEYMAP: &[Entry] = &[
    cmd("C-<space>", Command::SetMark),
    cmd("C-a", Command::BeginningOfRow),
    cmd("C-b", Command::BackwardChar),
    cmd("C-d", Command::DeleteChar),
    cmd("C-e", Command::EndOfRow),
    cmd("C-f", Command::ForwardChar),
    cmd("C-n", Command::NextRow),
    cmd("C-o", Command::OpenLine),
    cmd("C-p", Command::PreviousRow),
    cmd("C-q", Command::SearchQuit),
    cmd("C-r", Command::SearchPrevious),
    cmd("C-s", Command::SearchBuffer),
    cmd("C-v", Command::ScrollUp),
    cmd("C-w", Command::KillRegion),
    map("C-x", EXTENDED_KEYMAP),
    cmd("C-y", Command::Yank),
    cmd("C-z", Command::Suspend),
    cmd("C-<down>", Command::ForwardParagraph),
    cmd("C-<left>", Command::BackwardWord),
    cmd("C-<right>", Command::ForwardWord),
    cmd("C-<up>", Command::BackwardParagraph),
    cmd("M-O", Command::OpenPreviousLine),
    cmd("M-a", Command::BeginningOfLine),
    cmd("M-b", Command::BackwardWord),
    cmd("M-e", Command::EndOfLine),
    cmd("M-f", Command::ForwardWord),
    cmd("M-g", Command::GotoLine),
    cmd("M-o", Command::OpenNextLine),
    cmd("M-v", Command::ScrollDown),
    cmd("M-w", Command::KillRegionSave),
    cmd("M-%", Command::GotoPercent),
    cmd("M-<", Command::BeginningOfBuffer),
    cmd("M->", Command::EndOfBuffer),
    cmd("S-<down>", Command::SetMarkNextRow),
    cmd("S-<left>", Command::SetMarkBackwardChar),
    cmd("S-<right>", Command::SetMarkForwardChar),
    cmd("S-<up>", Command::SetMarkPreviousRow),
    cmd("C-M-b", Command::BackwardParagraph),
    cmd("C-M-f", Command::ForwardParagraph),
    cmd("C-S-<down>", Command::SetMarkForwardParagraph),
    cmd("C-S-<left>", Command::SetMarkBackwardWord),
    cmd("C-S-<right>", Command::SetMarkForwardWord),
    cmd("C-S-<up>", Command::SetMarkBackwardParagraph),
    cmd("<backspace>", Command::DeleteBackwardChar),
    cmd("<delete>", Command::DeleteForwardChar),
    cmd("<down>", Command::NextRow),
    cmd("<end>", Command::EndOfRow),
    cmd("<home>", Command::BeginningOfRow),
    cmd("<left>", Command::BackwardChar),
    cmd("<next>", Command::PageDown),
    cmd("<prior>", Command::PageUp),
    cmd("<right>", Command::ForwardChar),
    cmd("<up>", Command::PreviousRow),
];

/// Find the entry a key matches in `table`, decoding each stored literal
/// and comparing by key equality.
pub fn lookup(table: &'static [Entry], key: &Key) -> Option<&'static Entry> {
    for entry in table {
        match kbd(entry.chord) {
            Ok(bound) => {
                if bound == *key {
                    trace!(target: "keymap", chord = entry.chord, "match");
                    return Some(entry);
                }
            }
            Err(err) => {
                // A table typo should be loud in development but must not
                // take the editor down.
                debug_assert!(false, "bad chord literal {:?}: {err}", entry.chord);
                warn!(target: "keymap", chord = entry.chord, %err, "bad_chord_literal");
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use ted_input::decode;

    #[test]
    fn every_literal_in_both_tables_parses() {
        for entry in GLOBAL_KEYMAP.iter().chain(EXTENDED_KEYMAP) {
            assert!(kbd(entry.chord).is_ok(), "chord {:?}", entry.chord);
        }
    }

    #[test]
    fn global_lookup_finds_commands() {
        let key = decode(b"\x06").unwrap(); // C-f
        let entry = lookup(GLOBAL_KEYMAP, &key).expect("C-f bound");
        assert!(matches!(entry.binding, Binding::Command(Command::ForwardChar)));

        let key = decode(b"\x1b[1;6D").unwrap(); // C-S-<left>
        let entry = lookup(GLOBAL_KEYMAP, &key).expect("C-S-<left> bound");
        assert!(matches!(
            entry.binding,
            Binding::Command(Command::SetMarkBackwardWord)
        ));
    }

    #[test]
    fn ctrl_x_is_a_prefix() {
        let key = decode(b"\x18").unwrap(); // C-x
        let entry = lookup(GLOBAL_KEYMAP, &key).expect("C-x bound");
        let Binding::Prefix(table) = entry.binding else {
            panic!("C-x should be a prefix")
        };
        let inner = lookup(table, &decode(b"\x13").unwrap()).expect("C-x C-s bound");
        assert!(matches!(inner.binding, Binding::Command(Command::SaveBuffer)));
        let inner = lookup(table, &decode(b"=").unwrap()).expect("C-x = bound");
        assert!(matches!(
            inner.binding,
            Binding::Command(Command::ShowLineColumn)
        ));
    }

    #[test]
    fn unbound_keys_miss() {
        assert!(lookup(GLOBAL_KEYMAP, &decode(b"q").unwrap()).is_none());
        assert!(lookup(EXTENDED_KEYMAP, &decode(b"\x1b[A").unwrap()).is_none());
    }
}
