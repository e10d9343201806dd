//! External-search integration.
//!
//! The editor does not search its own buffer. `C-s` writes the buffer to a
//! scratch temp file, hands the terminal back to the shell, and runs a
//! helper (`$TED_SEARCH <path> <rows>` when set, otherwise a prompt-and-
//! grep pipeline) that prints byte offsets, one per line, on stdout. The
//! offsets become the result set; repeated `C-s` cycles forward and `C-r`
//! backward, both wrapping with a note in the echo area.

use std::process::{Command, Stdio};

use anyhow::Result;
use ted_model::Editor;
use ted_terminal::Terminal;
use tracing::{debug, warn};

use crate::io_ops::write_chars;

/// `C-s`: run the helper on first press, cycle forward afterwards.
pub fn search_buffer(ed: &mut Editor, term: &mut Terminal) -> Result<()> {
    if ed.state.search.has_results() {
        search_next(ed);
        return Ok(());
    }

    let mut tmp = match tempfile::Builder::new().prefix("ted-search-").tempfile() {
        Ok(t) => t,
        Err(e) => {
            warn!(target: "actions.search", %e, "scratch_create_failed");
            ed.state.echo.error("Failed to start search");
            return Ok(());
        }
    };
    let line_ending = ed.state.file.line_ending;
    if write_chars(ed.buffer.iter(), line_ending, tmp.as_file_mut()).is_err() {
        ed.state.echo.error("Failed to start search");
        return Ok(());
    }

    let cmd = match std::env::var("TED_SEARCH") {
        Ok(helper) => format!(
            "{helper} '{}' {}",
            tmp.path().display(),
            ed.geom.nlines + 1
        ),
        Err(_) => format!(
            "printf '\\e[s' > /dev/tty; \
             read -p 'Query: ' query; \
             printf '\\e[u\\e[J' > /dev/tty; \
             grep -bo -F \"$query\" '{}' | cut -d: -f1 ",
            tmp.path().display()
        ),
    };
    debug!(target: "actions.search", cmd = %cmd, "search_spawn");

    let output = term.with_cooked(ed.geom.nlines as u16, || {
        Command::new("sh")
            .arg("-c")
            .arg(&cmd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
    })?;
    drop(tmp);

    let Ok(output) = output else {
        ed.state.echo.info_preserved("Search failed");
        return Ok(());
    };

    ed.state.search.clear();
    ed.state.search.results = String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter_map(|l| l.trim().parse::<usize>().ok())
        .collect();
    debug!(
        target: "actions.search",
        results = ed.state.search.results.len(),
        status = ?output.status.code(),
        "search_done"
    );

    if !output.status.success() {
        ed.state.echo.info_preserved("Search failed");
    } else if !ed.state.search.has_results() {
        ed.state.echo.info_preserved("No results");
    } else {
        let point = ed.point();
        ed.state.marks.push(point);
        ed.state.search.current = 0;
        let target = ed.state.search.results[0];
        ed.move_to(target);
    }
    Ok(())
}

/// Cycle to the next result, wrapping to the first with a note.
pub fn search_next(ed: &mut Editor) {
    if !ed.state.search.has_results() {
        return;
    }
    ed.state.search.current += 1;
    if ed.state.search.current == ed.state.search.results.len() {
        ed.state.echo.info_preserved("Wrapped search");
        ed.state.search.current = 0;
    }
    let target = ed.state.search.results[ed.state.search.current];
    ed.move_to(target);
}

/// `C-r`: cycle to the previous result, wrapping to the last.
pub fn search_previous(ed: &mut Editor) {
    if !ed.state.search.has_results() {
        return;
    }
    if ed.state.search.current == 0 {
        ed.state.echo.info_preserved("Wrapped backward search");
        ed.state.search.current = ed.state.search.results.len() - 1;
    } else {
        ed.state.search.current -= 1;
    }
    let target = ed.state.search.results[ed.state.search.current];
    ed.move_to(target);
}

/// `C-q`: drop the result set; the next `C-s` starts a fresh search.
pub fn search_quit(ed: &mut Editor) {
    ed.state.search.clear();
}
