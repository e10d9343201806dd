//! Session commands: position report, read-only toggle, quit, suspend.

use anyhow::Result;
use ted_model::Editor;
use ted_terminal::Terminal;
use tracing::info;

use crate::{Flow, io_ops};

/// `C-x =`: report the 1-based logical line and column of the point.
pub fn show_line_column(ed: &mut Editor) {
    let mut line = 1usize;
    let mut col = 1usize;
    for i in 0..ed.point() {
        if ed.buffer.char_at(i).is_some_and(|c| c.is_newline()) {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    ed.state.echo.info_preserved(format!("L{line}C{col}"));
}

/// `C-x C-q`: flip read-only mode.
pub fn toggle_read_only(ed: &mut Editor) {
    ed.state.is_read_only = !ed.state.is_read_only;
    let which = if ed.state.is_read_only {
        "enabled"
    } else {
        "disabled"
    };
    ed.state.echo.info_preserved(format!("Read-Only mode {which}."));
}

/// `C-x C-c`: refuse while dirty unless prefixed, in which case save
/// first and only exit when the save went through.
pub fn quit(ed: &mut Editor) -> Flow {
    if ed.state.is_dirty {
        if ed.state.prefix.take().is_some() {
            io_ops::save_buffer(ed);
            if !ed.state.is_dirty {
                info!(target: "runtime", "quit_after_save");
                return Flow::Quit { code: 0 };
            }
        }
        ed.state
            .echo
            .error("Save and quit: C-u C-x C-c. Quit without saving: C-x M-c.");
        return Flow::Continue;
    }
    info!(target: "runtime", "quit");
    Flow::Quit { code: 0 }
}

/// `C-x M-c`: exit unconditionally, dirty or not.
pub fn kill_ted() -> Flow {
    info!(target: "runtime", "kill_ted");
    Flow::Quit { code: 1 }
}

/// `C-g`: drop the selection and the echo line.
pub fn cancel(ed: &mut Editor) {
    ed.state.marks.deactivate();
    ed.state.echo.clear();
}

/// `C-z`: hand the terminal back and stop until resumed.
pub fn suspend(ed: &mut Editor, term: &mut Terminal) -> Result<()> {
    term.suspend(ed.geom.nlines as u16)
}
