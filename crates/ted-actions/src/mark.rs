//! Mark-ring commands and the shifted-motion helpers that extend a region.

use ted_model::Editor;

/// `C-<space>`: push the point and activate the region. With a prefix,
/// swap point and mark instead, then rotate to the next-older mark, so
/// repeated prefixed invocations walk the ring backwards.
pub fn set_mark(ed: &mut Editor) {
    if ed.state.prefix.is_set() {
        if ed.state.marks.is_empty() {
            return;
        }
        exchange_point_and_mark(ed);
        ed.state.marks.rotate_back();
        return;
    }
    let point = ed.point();
    ed.state.marks.push(point);
    ed.state.marks.is_active = true;
}

/// `C-x C-x`: swap the point with the current mark.
pub fn exchange_point_and_mark(ed: &mut Editor) {
    if ed.buffer.is_empty() || ed.state.marks.is_empty() {
        return;
    }
    let Some(saved) = ed.state.marks.current() else {
        return;
    };
    let point = ed.point();
    ed.state.marks.set_current(point);
    ed.move_to(saved);
}

pub fn set_mark_forward_char(ed: &mut Editor) {
    set_mark(ed);
    crate::motion::forward_char(ed);
}

pub fn set_mark_backward_char(ed: &mut Editor) {
    set_mark(ed);
    crate::motion::backward_char(ed);
}

pub fn set_mark_next_row(ed: &mut Editor) {
    set_mark(ed);
    crate::motion::next_row(ed);
}

pub fn set_mark_previous_row(ed: &mut Editor) {
    set_mark(ed);
    crate::motion::previous_row(ed);
}

pub fn set_mark_forward_word(ed: &mut Editor) {
    set_mark(ed);
    crate::motion::forward_word(ed);
}

pub fn set_mark_backward_word(ed: &mut Editor) {
    set_mark(ed);
    crate::motion::backward_word(ed);
}

pub fn set_mark_forward_paragraph(ed: &mut Editor) {
    set_mark(ed);
    crate::motion::forward_paragraph(ed);
}

pub fn set_mark_backward_paragraph(ed: &mut Editor) {
    set_mark(ed);
    crate::motion::backward_paragraph(ed);
}
