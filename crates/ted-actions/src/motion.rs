//! Motion commands: the single-step primitives of `ted-model` repeated
//! under the prefix argument.
//!
//! The prefix is consumed exactly once per command, before the repeat
//! loop, so primitives that call each other internally never multiply the
//! count.

use ted_model::Editor;

pub fn forward_char(ed: &mut Editor) {
    for _ in 0..ed.state.prefix.take_repeat() {
        ed.forward_char();
    }
}

pub fn backward_char(ed: &mut Editor) {
    for _ in 0..ed.state.prefix.take_repeat() {
        ed.backward_char();
    }
}

pub fn forward_word(ed: &mut Editor) {
    for _ in 0..ed.state.prefix.take_repeat() {
        ed.forward_word();
    }
}

pub fn backward_word(ed: &mut Editor) {
    for _ in 0..ed.state.prefix.take_repeat() {
        ed.backward_word();
    }
}

pub fn forward_paragraph(ed: &mut Editor) {
    for _ in 0..ed.state.prefix.take_repeat() {
        ed.forward_paragraph();
    }
}

pub fn backward_paragraph(ed: &mut Editor) {
    for _ in 0..ed.state.prefix.take_repeat() {
        ed.backward_paragraph();
    }
}

pub fn next_row(ed: &mut Editor) {
    for _ in 0..ed.state.prefix.take_repeat() {
        ed.next_row();
    }
}

pub fn previous_row(ed: &mut Editor) {
    for _ in 0..ed.state.prefix.take_repeat() {
        ed.previous_row();
    }
}

pub fn scroll_up(ed: &mut Editor) {
    for _ in 0..ed.state.prefix.take_repeat() {
        ed.scroll_up();
    }
}

pub fn scroll_down(ed: &mut Editor) {
    for _ in 0..ed.state.prefix.take_repeat() {
        ed.scroll_down();
    }
}

pub fn beginning_of_row(ed: &mut Editor) {
    ed.beginning_of_row();
}

pub fn end_of_row(ed: &mut Editor) {
    ed.end_of_row();
}

pub fn beginning_of_line(ed: &mut Editor) {
    ed.beginning_of_line();
}

pub fn end_of_line(ed: &mut Editor) {
    ed.end_of_line();
}

pub fn beginning_of_buffer(ed: &mut Editor) {
    ed.beginning_of_buffer();
}

pub fn end_of_buffer(ed: &mut Editor) {
    ed.end_of_buffer();
}

/// Scroll half a viewport and carry the cursor the same distance.
pub fn page_down(ed: &mut Editor) {
    for _ in 0..ed.state.prefix.take_repeat() {
        for _ in 0..(ed.geom.nlines + 2) / 2 {
            ed.scroll_up();
            ed.next_row();
        }
    }
}

pub fn page_up(ed: &mut Editor) {
    for _ in 0..ed.state.prefix.take_repeat() {
        for _ in 0..(ed.geom.nlines + 2) / 2 {
            ed.scroll_down();
            ed.previous_row();
        }
    }
}

/// `M-g`: go to the prefix-numbered logical line, counting from 1.
pub fn goto_line(ed: &mut Editor) {
    let line_no = match ed.state.prefix.take() {
        Some(n) if n >= 1 => n,
        _ => 1,
    };
    ed.beginning_of_buffer();
    for _ in 1..line_no {
        ed.end_of_line();
        ed.forward_char();
    }
}

/// `M-%`: move to prefix percent of the buffer, clamped to 0–100.
pub fn goto_percent(ed: &mut Editor) {
    let percent = ed.state.prefix.take().unwrap_or(0).min(100);
    let target = ed.buffer.len() * percent / 100;
    ed.move_to(target);
}

/// `C-x C-n`: pin the goal column; with a prefix, release it.
pub fn set_goal_column(ed: &mut Editor) {
    if ed.state.prefix.take().is_some() {
        ed.view.force_goal_col = false;
    } else {
        ed.view.force_goal_col = true;
        ed.view.goal_col = ed.view.cursor_col;
    }
}
