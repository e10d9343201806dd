//! Kill and yank: the region clipboard.
//!
//! The kill buffer is overwritten by every kill or copy; yank re-inserts
//! it at the point, repeated under the prefix argument.

use ted_model::Editor;
use tracing::debug;

use crate::edit::read_only_guard;

/// `M-w`: copy the region into the kill buffer, leaving the text intact.
pub fn kill_region_save(ed: &mut Editor) {
    if !ed.state.marks.is_active {
        ed.state.echo.error("Mark is not active.");
        return;
    }
    let Some((low, high)) = ed.region() else {
        return;
    };
    let end = high.min(ed.buffer.len());
    let copied: Vec<_> = ed.buffer.iter_from(low).take(end.saturating_sub(low)).collect();
    debug!(target: "actions.kill", chars = copied.len(), "region_copied");
    ed.state.kill_buffer = copied;
    ed.state.marks.deactivate();
}

/// `C-w`: copy then delete the region.
pub fn kill_region(ed: &mut Editor) {
    if read_only_guard(ed) {
        return;
    }
    if !ed.state.marks.is_active {
        ed.state.echo.error("Mark is not active.");
        return;
    }
    kill_region_save(ed);
    let Some((low, high)) = ed.region() else {
        return;
    };
    ed.move_to(low);
    for _ in 0..high - low {
        ed.delete_char();
    }
    ed.state.marks.deactivate();
}

/// `C-y`: insert the kill buffer at the point, prefix-arg times.
pub fn yank(ed: &mut Editor) {
    if read_only_guard(ed) {
        return;
    }
    let repeat = ed.state.prefix.take_repeat();
    for _ in 0..repeat {
        for i in 0..ed.state.kill_buffer.len() {
            let ch = ed.state.kill_buffer[i];
            ed.insert_char(ch);
        }
    }
}
