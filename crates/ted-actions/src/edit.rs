//! Editing commands. Every mutating command declines (with an echo) in
//! read-only mode, and the region-aware deletions prefer an active region
//! over their single-character behavior.

use ted_input::{Key, KeyCode, NamedKey};
use ted_model::Editor;
use ted_text::TedChar;

/// Echo and report when the buffer cannot be modified.
pub(crate) fn read_only_guard(ed: &mut Editor) -> bool {
    if ed.state.is_read_only {
        ed.state.echo.error("Buffer is read-only.");
        return true;
    }
    false
}

/// Insert the last key's character. An active region is deleted first (the
/// typed character replaces the selection).
pub fn insert_char(ed: &mut Editor, key: &Key) {
    if read_only_guard(ed) {
        return;
    }
    if ed.state.marks.is_active {
        delete_region_inner(ed);
        ed.state.marks.deactivate();
    }
    let ch = match key.code {
        KeyCode::Named(NamedKey::Return) => TedChar::Newline,
        KeyCode::Named(NamedKey::Tab) => TedChar::glyph('\t'),
        KeyCode::Char(c) => TedChar::glyph(c),
        KeyCode::Named(_) => return,
    };
    for _ in 0..ed.state.prefix.take_repeat() {
        ed.insert_char(ch);
    }
}

/// `C-o`: insert a newline, leaving the point before it.
pub fn open_line(ed: &mut Editor) {
    if read_only_guard(ed) {
        return;
    }
    for _ in 0..ed.state.prefix.take_repeat() {
        ed.insert_char(TedChar::Newline);
        ed.backward_char();
    }
}

/// `M-o`: open a fresh line below the current logical line.
pub fn open_next_line(ed: &mut Editor) {
    if read_only_guard(ed) {
        return;
    }
    for _ in 0..ed.state.prefix.take_repeat() {
        ed.end_of_line();
        ed.insert_char(TedChar::Newline);
    }
}

/// `M-O`: open a fresh line above the current logical line.
pub fn open_previous_line(ed: &mut Editor) {
    if read_only_guard(ed) {
        return;
    }
    for _ in 0..ed.state.prefix.take_repeat() {
        ed.beginning_of_line();
        ed.insert_char(TedChar::Newline);
        ed.backward_char();
    }
}

/// `C-d`: delete at the point.
pub fn delete_char(ed: &mut Editor) {
    if read_only_guard(ed) {
        return;
    }
    for _ in 0..ed.state.prefix.take_repeat() {
        ed.delete_char();
    }
}

fn delete_region_inner(ed: &mut Editor) {
    let Some((low, high)) = ed.region() else {
        return;
    };
    if low >= ed.buffer.len() || low == high {
        return;
    }
    ed.move_to(low);
    for _ in 0..high - low {
        ed.delete_char();
    }
}

/// Delete the characters between point and mark.
pub fn delete_region(ed: &mut Editor) {
    if read_only_guard(ed) {
        return;
    }
    delete_region_inner(ed);
}

/// `<backspace>`: delete the active region, else one character back.
pub fn delete_backward_char(ed: &mut Editor) {
    if read_only_guard(ed) {
        return;
    }
    if ed.state.marks.is_active {
        delete_region_inner(ed);
        ed.state.marks.deactivate();
        return;
    }
    for _ in 0..ed.state.prefix.take_repeat() {
        if ed.buffer.is_empty() || ed.buffer.point_at_start() {
            return;
        }
        ed.backward_char();
        ed.delete_char();
    }
}

/// `<delete>`: delete the active region, else forward like `C-d`.
pub fn delete_forward_char(ed: &mut Editor) {
    if read_only_guard(ed) {
        return;
    }
    if ed.state.marks.is_active {
        delete_region_inner(ed);
        ed.state.marks.deactivate();
        return;
    }
    for _ in 0..ed.state.prefix.take_repeat() {
        ed.delete_char();
    }
}
