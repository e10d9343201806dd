//! Viewport model and the editor value.
//!
//! The hard part of a bounded-viewport editor is that four pieces of state
//! must stay mutually consistent after every motion and every edit: the gap
//! buffer's point, the anchor character drawn at the viewport's top-left
//! (`tl`), the cursor's row/column within the viewport, and the goal
//! column vertical motions aim for. [`Editor`] owns all of them and exposes
//! single-step primitives (`motion` module) that preserve the invariant:
//!
//! > starting from `tl` and walking `cursor_row` visual-line breaks then
//! > `cursor_col` columns yields the character at the point.
//!
//! The primitives move one step at a time; prefix-argument repetition and
//! read-only guards belong to the command layer above.

pub mod layout;
pub mod motion;

use ted_state::EditorState;
use ted_text::{GapBuffer, TedChar};

/// Fixed screen geometry: viewport rows and columns, plus the tabstop.
#[derive(Debug, Clone, Copy)]
pub struct Geometry {
    pub nlines: usize,
    pub ncols: usize,
    pub tabstop: usize,
}

impl Geometry {
    /// Column after placing `ch` at `col`, or 0 to signal a visual line
    /// break: an explicit newline, a hard wrap at the column limit, or a
    /// tab whose expansion would cross it.
    pub fn next_col(&self, ch: TedChar, col: usize) -> usize {
        debug_assert!(col < self.ncols);
        match ch {
            TedChar::Newline => 0,
            TedChar::Glyph('\t') => {
                let next = col + self.tabstop - col % self.tabstop;
                if next >= self.ncols { 0 } else { next }
            }
            TedChar::Glyph(_) => {
                if col + 1 >= self.ncols {
                    0
                } else {
                    col + 1
                }
            }
        }
    }
}

/// Where the buffer meets the screen.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    /// Logical index of the character at visible row 0, column 0.
    /// `None` only while the buffer is empty (or the last visible
    /// character was just deleted).
    pub tl: Option<usize>,
    pub cursor_row: usize,
    pub cursor_col: usize,
    /// Column vertical motions try to regain.
    pub goal_col: usize,
    /// When set, horizontal motions leave `goal_col` alone.
    pub force_goal_col: bool,
}

impl Viewport {
    fn new(tl: Option<usize>) -> Self {
        Self {
            tl,
            cursor_row: 0,
            cursor_col: 0,
            goal_col: 0,
            force_goal_col: false,
        }
    }

    pub fn at_origin(&self) -> bool {
        self.cursor_row == 0 && self.cursor_col == 0
    }
}

/// The single editor value owned by `main` and threaded through commands.
#[derive(Debug)]
pub struct Editor {
    pub buffer: GapBuffer,
    pub view: Viewport,
    pub geom: Geometry,
    pub state: EditorState,
}

impl Editor {
    pub fn new(buffer: GapBuffer, geom: Geometry, state: EditorState) -> Self {
        let tl = if buffer.is_empty() { None } else { Some(0) };
        Self {
            buffer,
            view: Viewport::new(tl),
            geom,
            state,
        }
    }

    /// Logical index of the point.
    pub fn point(&self) -> usize {
        self.buffer.point()
    }

    /// The region bounds: `(low, high)` over point and the current mark.
    /// `None` when no mark has ever been pushed.
    pub fn region(&self) -> Option<(usize, usize)> {
        let m = self.state.marks.current()?;
        let p = self.point();
        Some((p.min(m), p.max(m)))
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use super::*;
    use std::time::SystemTime;
    use ted_state::FileMeta;
    use ted_text::LineEnding;

    pub fn chars_of(s: &str) -> Vec<TedChar> {
        s.chars()
            .map(|c| {
                if c == '\n' {
                    TedChar::Newline
                } else {
                    TedChar::glyph(c)
                }
            })
            .collect()
    }

    pub fn text_of(ed: &Editor) -> String {
        ed.buffer
            .iter()
            .map(|c| match c {
                TedChar::Newline => '\n',
                TedChar::Glyph(g) => g,
            })
            .collect()
    }

    pub fn editor_with(content: &str, nlines: usize, ncols: usize, tabstop: usize) -> Editor {
        let meta = FileMeta {
            path: "/tmp/scratch".into(),
            dir: "/tmp".into(),
            base: "scratch".into(),
            mode: 0o644,
            mtime: SystemTime::now(),
            line_ending: LineEnding::Unix,
            ensure_trailing_newline: true,
        };
        Editor::new(
            GapBuffer::from_chars(chars_of(content)),
            Geometry {
                nlines,
                ncols,
                tabstop,
            },
            EditorState::new(meta),
        )
    }

    /// Check invariant 3: walking from `tl` by `cursor_row` breaks and
    /// `cursor_col` columns must land on the point.
    pub fn assert_cursor_consistent(ed: &Editor) {
        if ed.buffer.is_empty() {
            return;
        }
        let Some(tl) = ed.view.tl else {
            // Permitted transiently after deleting the last visible char.
            return;
        };
        let mut row = 0;
        let mut col = 0;
        let mut i = tl;
        while i < ed.point() {
            let ch = ed.buffer.char_at(i).expect("walk within buffer");
            let next = ed.geom.next_col(ch, col);
            if next == 0 {
                row += 1;
            }
            col = next;
            i += 1;
        }
        assert_eq!(
            (row, col),
            (ed.view.cursor_row, ed.view.cursor_col),
            "cursor row/col out of sync with point walk from tl={tl}"
        );
    }
}
