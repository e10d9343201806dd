//! Screen composition.
//!
//! Each refresh composes the whole viewport (characters, selection
//! highlight toggles, wrap markers, tab padding, per-line erase) into one
//! scratch string, which the terminal layer then writes in a single
//! burst. Composing off-screen keeps flicker out and makes the renderer a
//! pure function of the editor, which is what the tests lean on.
//!
//! Every emitted line ends with erase-to-end, CR, LF, so stale content
//! from the previous frame can never survive a redraw.

pub mod status;

use ted_model::Editor;
use tracing::trace;

/// Red backslash marking a hard-wrapped visual line.
const CONTINUATION_LINE_STR: &str = "\x1b[31m\\\x1b[m";
/// Blue tilde gutter for rows past the end of the buffer.
const EMPTY_LINE_STR: &str = "\x1b[34m~\x1b[m";
const HIGHLIGHT_ON: &str = "\x1b[7m";
const HIGHLIGHT_OFF: &str = "\x1b[m";
const ERASE_LINE: &str = "\x1b[K";

/// Compose the viewport contents starting at the anchor.
///
/// The scratch is cursor-position free: the terminal layer decides where
/// it lands and where the cursor goes afterwards.
pub fn compose(ed: &Editor) -> String {
    let geom = ed.geom;
    let mut out = String::with_capacity(geom.nlines * (geom.ncols + 16));

    let selection = if ed.state.marks.is_active {
        ed.region()
    } else {
        None
    };
    let mut highlight = false;
    let mut current = ed.view.tl;

    for _ in 0..geom.nlines {
        let mut col = 0usize;
        let mut wrote = false;
        let mut saw_newline = false;

        while let Some(i) = current {
            let Some(ch) = ed.buffer.char_at(i) else {
                current = None;
                break;
            };

            if let Some((low, high)) = selection {
                if !highlight && i >= low && i < high {
                    out.push_str(HIGHLIGHT_ON);
                    highlight = true;
                }
                if highlight && i == high {
                    out.push_str(HIGHLIGHT_OFF);
                    highlight = false;
                }
            }

            wrote = true;
            debug_assert!(col <= geom.ncols);

            if col == geom.ncols {
                // The previous step filled the last column: break the
                // visual line before placing this character.
                wrap_break(&mut out, highlight);
                break;
            } else if ch.is_newline() {
                saw_newline = true;
                out.push(' ');
                end_line(&mut out);
                current = advance(ed, i);
                break;
            } else if ch.is_tab() {
                let next = geom.next_col(ch, col);
                current = advance(ed, i);
                if next == 0 {
                    while col < geom.ncols {
                        out.push(' ');
                        col += 1;
                    }
                    out.push_str(CONTINUATION_LINE_STR);
                    end_line(&mut out);
                    break;
                }
                while col < next {
                    out.push(' ');
                    col += 1;
                }
            } else {
                if let ted_text::TedChar::Glyph(g) = ch {
                    out.push(g);
                }
                let next = geom.next_col(ch, col);
                current = advance(ed, i);
                if next == 0 {
                    wrap_break(&mut out, highlight);
                    break;
                }
                col = next;
            }
        }

        if !wrote {
            if highlight {
                out.push_str(HIGHLIGHT_OFF);
            }
            out.push_str(EMPTY_LINE_STR);
            end_line(&mut out);
            if highlight {
                out.push_str(HIGHLIGHT_ON);
            }
        } else if !saw_newline && current.is_none() {
            end_line(&mut out);
        }
    }

    if highlight {
        out.push_str(HIGHLIGHT_OFF);
    }

    trace!(target: "render", bytes = out.len(), "compose");
    out
}

fn advance(ed: &Editor, i: usize) -> Option<usize> {
    if i + 1 < ed.buffer.len() {
        Some(i + 1)
    } else {
        None
    }
}

fn end_line(out: &mut String) {
    out.push_str(ERASE_LINE);
    out.push_str("\r\n");
}

fn wrap_break(out: &mut String, highlight: bool) {
    if highlight {
        out.push_str(HIGHLIGHT_OFF);
    }
    out.push_str(CONTINUATION_LINE_STR);
    end_line(out);
    if highlight {
        out.push_str(HIGHLIGHT_ON);
    }
}
