//! Single-step motion and edit primitives.
//!
//! Every primitive here moves or mutates by exactly one unit and leaves the
//! viewport consistent with the point. Scrolling is folded into the steps
//! themselves: stepping off the bottom row advances the anchor first,
//! stepping off the top retreats it, and the cursor is counter-moved so
//! the point stays visible.
//!
//! The command layer repeats these under the prefix argument; repetition
//! never lives here, so primitives can call each other freely without
//! multiplying counts.

use crate::Editor;
use ted_text::TedChar;
use tracing::trace;

impl Editor {
    /// Retreat the anchor by one visual line, keeping the point on screen
    /// by hopping the cursor up a row first when it sits on the last row.
    pub fn scroll_down(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        if self.view.cursor_row == self.geom.nlines - 1 {
            self.previous_row();
        }
        let Some(tl) = self.view.tl else {
            return;
        };
        if tl == 0 {
            return;
        }
        self.view.tl = Some(self.first_of_visual_line(tl - 1));
        self.view.cursor_row += 1;
    }

    /// Advance the anchor by one visual line; the cursor hops down a row
    /// first when it sits on the top row.
    pub fn scroll_up(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        if self.view.cursor_row == 0 {
            self.next_row();
        }
        let Some(mut p) = self.view.tl else {
            return;
        };
        let mut col = 0;
        loop {
            let Some(ch) = self.buffer.char_at(p) else {
                return;
            };
            col = self.geom.next_col(ch, col);
            p += 1;
            if p >= self.buffer.len() {
                return;
            }
            if col == 0 {
                break;
            }
        }
        self.view.tl = Some(p);
        self.view.cursor_row = self.view.cursor_row.saturating_sub(1);
    }

    /// Step the point forward over one character.
    pub fn forward_char(&mut self) {
        if self.buffer.is_empty() || self.buffer.point_at_end() {
            return;
        }
        let Some(mut ch) = self.buffer.char_at_point() else {
            return;
        };
        if self.view.cursor_row == self.geom.nlines - 1
            && self.geom.next_col(ch, self.view.cursor_col) == 0
        {
            self.scroll_up();
            if let Some(c) = self.buffer.char_at_point() {
                ch = c;
            }
        }
        if self.view.at_origin() {
            self.view.tl = Some(self.point());
        }
        self.buffer.point_forward();
        let next = self.geom.next_col(ch, self.view.cursor_col);
        if next == 0 {
            self.view.cursor_row += 1;
        }
        self.view.cursor_col = next;
        if !self.view.force_goal_col {
            self.view.goal_col = self.view.cursor_col;
        }
    }

    /// Step the point backward over one character.
    pub fn backward_char(&mut self) {
        if self.buffer.is_empty() || self.buffer.point_at_start() {
            return;
        }
        if self.view.at_origin() {
            self.scroll_down();
        }
        if let Some(ch) = self.buffer.point_backward() {
            if ch.is_newline() || self.view.cursor_col == 0 {
                self.view.cursor_row = self.view.cursor_row.saturating_sub(1);
            }
            self.view.cursor_col = self.col_of(self.point());
        }
        if self.view.at_origin() {
            self.view.tl = Some(self.point());
        }
        if !self.view.force_goal_col {
            self.view.goal_col = self.view.cursor_col;
        }
    }

    /// Skip whitespace forward, then a run of non-whitespace.
    pub fn forward_word(&mut self) {
        if self.buffer.is_empty() || self.buffer.point_at_end() {
            return;
        }
        while self.point_char_is(TedChar::is_whitespace) {
            self.forward_char();
        }
        while self.point_char_is(|c| !c.is_whitespace()) {
            self.forward_char();
        }
    }

    fn at_beginning_of_word(&self) -> bool {
        if self.buffer.is_empty() || self.buffer.point_at_end() {
            return false;
        }
        let here = self.buffer.char_at_point().is_some_and(|c| !c.is_whitespace());
        if self.buffer.point_at_start() {
            return here;
        }
        let before = self
            .buffer
            .char_at(self.point() - 1)
            .is_some_and(|c| c.is_whitespace());
        here && before
    }

    /// Mirror of [`Editor::forward_word`]: back over whitespace, then over
    /// the word, landing on its first character.
    pub fn backward_word(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        if self.at_beginning_of_word() || self.buffer.point_at_end() {
            self.backward_char();
        }
        while self.point_char_is(TedChar::is_whitespace) {
            self.backward_char();
            if self.buffer.point_at_start() {
                return;
            }
        }
        while self.point_char_is(|c| !c.is_whitespace()) {
            self.backward_char();
            if self.buffer.point_at_start() {
                return;
            }
        }
        self.forward_char();
    }

    /// Advance past leading whitespace, then stop on the second of two
    /// consecutive newlines.
    pub fn forward_paragraph(&mut self) {
        if self.buffer.is_empty() || self.buffer.point_at_end() {
            return;
        }
        while !self.buffer.point_at_end() && self.point_char_is(TedChar::is_whitespace) {
            self.forward_char();
        }
        let mut newline_run = 0;
        while !self.buffer.point_at_end() {
            if self.point_char_is(TedChar::is_newline) {
                newline_run += 1;
                if newline_run == 2 {
                    return;
                }
            } else {
                newline_run = 0;
            }
            self.forward_char();
        }
    }

    pub fn backward_paragraph(&mut self) {
        if self.buffer.is_empty() || self.buffer.point_at_start() {
            return;
        }
        self.backward_char();
        while !self.buffer.point_at_start() && self.point_char_is(TedChar::is_whitespace) {
            self.backward_char();
        }
        let mut newline_run = 0;
        while !self.buffer.point_at_start() {
            if self.point_char_is(TedChar::is_newline) {
                newline_run += 1;
                if newline_run == 2 {
                    while !self.buffer.point_at_end() && self.point_char_is(TedChar::is_whitespace)
                    {
                        self.forward_char();
                    }
                    return;
                }
            } else {
                newline_run = 0;
            }
            self.backward_char();
        }
    }

    /// Move to the next visual line, aiming for the goal column.
    pub fn next_row(&mut self) {
        if self.view.cursor_row == self.geom.nlines - 1 {
            self.scroll_up();
        }
        let save_goal = self.view.goal_col;
        self.end_of_row();
        self.forward_char();
        self.beginning_of_row();
        loop {
            let at_stop = match self.buffer.char_at_point() {
                None => true,
                Some(ch) => ch.is_newline() || self.view.cursor_col >= save_goal,
            };
            if at_stop {
                self.view.goal_col = save_goal;
                return;
            }
            self.forward_char();
        }
    }

    /// Move to the previous visual line, aiming for the goal column.
    pub fn previous_row(&mut self) {
        if self.view.cursor_row == 0 {
            self.scroll_down();
        }
        let save_goal = self.view.goal_col;
        self.beginning_of_row();
        self.backward_char();
        self.beginning_of_row();
        loop {
            let at_stop = match self.buffer.char_at_point() {
                None => true,
                Some(ch) => ch.is_newline() || self.view.cursor_col >= save_goal,
            };
            if at_stop {
                self.view.goal_col = save_goal;
                return;
            }
            self.forward_char();
        }
    }

    /// Start of the current visual line (respects wrapping).
    pub fn beginning_of_row(&mut self) {
        while self.view.cursor_col > 0 {
            self.backward_char();
        }
        if !self.view.force_goal_col {
            self.view.goal_col = 0;
        }
    }

    /// End of the current visual line: the position whose character would
    /// break the line (newline, wrap, or tab overflow).
    pub fn end_of_row(&mut self) {
        while let Some(ch) = self.buffer.char_at_point() {
            if self.geom.next_col(ch, self.view.cursor_col) == 0 {
                break;
            }
            self.forward_char();
        }
    }

    /// Start of the current logical line (ignores wrapping).
    pub fn beginning_of_line(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        if self.point_char_is(TedChar::is_newline) {
            self.backward_char();
        }
        loop {
            if self.buffer.point_at_start() {
                return;
            }
            if self.point_char_is(TedChar::is_newline) {
                self.forward_char();
                return;
            }
            self.backward_char();
        }
    }

    /// End of the current logical line: the point lands on the newline.
    pub fn end_of_line(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        while !self.buffer.point_at_end() && self.point_char_is(|c| !c.is_newline()) {
            self.forward_char();
        }
    }

    pub fn beginning_of_buffer(&mut self) {
        while !self.buffer.point_at_start() {
            self.backward_char();
        }
    }

    pub fn end_of_buffer(&mut self) {
        while self.buffer.char_at_point().is_some() {
            self.forward_char();
        }
    }

    /// Walk the point to logical index `n` from the top, clamped to the
    /// buffer length, carrying the viewport along.
    pub fn move_to(&mut self, n: usize) {
        trace!(target: "model.motion", to = n, from = self.point(), "move_to");
        self.beginning_of_buffer();
        for _ in 0..n {
            if self.buffer.point_at_end() {
                break;
            }
            self.forward_char();
        }
    }

    /// Insert one character at the point, marking the buffer dirty and
    /// scrolling when the insertion breaks past the bottom row.
    pub fn insert_char(&mut self, ch: TedChar) {
        self.state.is_dirty = true;
        if self.view.at_origin() {
            self.view.tl = Some(self.point());
        }
        self.buffer.insert(ch);
        let next = self.geom.next_col(ch, self.view.cursor_col);
        if next == 0 {
            if self.view.cursor_row == self.geom.nlines - 1 {
                self.scroll_up();
            }
            self.view.cursor_row += 1;
        }
        self.view.cursor_col = next;
        if !self.view.force_goal_col {
            self.view.goal_col = self.view.cursor_col;
        }
    }

    /// Delete the character at the point. The cursor does not move; the
    /// anchor is dropped when the deleted character was the last one
    /// visible.
    pub fn delete_char(&mut self) {
        if self.buffer.is_empty() || self.buffer.point_at_end() {
            return;
        }
        self.state.is_dirty = true;
        if self.view.cursor_row == self.geom.nlines - 1
            && self
                .buffer
                .char_at_point()
                .is_some_and(|c| self.geom.next_col(c, self.view.cursor_col) == 0)
        {
            self.scroll_up();
        }
        if self.view.tl == Some(self.point()) && self.point() + 1 >= self.buffer.len() {
            self.view.tl = None;
        }
        self.buffer.delete_forward();
    }

    fn point_char_is(&self, pred: impl Fn(TedChar) -> bool) -> bool {
        self.buffer.char_at_point().is_some_and(pred)
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_support::{assert_cursor_consistent, editor_with, text_of};
    use pretty_assertions::assert_eq;

    #[test]
    fn fresh_load_cursor_at_origin() {
        let ed = editor_with("abc\ndef\n", 4, 10, 8);
        assert_eq!(ed.view.tl, Some(0));
        assert_eq!((ed.view.cursor_row, ed.view.cursor_col), (0, 0));
        assert_eq!(ed.point(), 0);
    }

    #[test]
    fn forward_char_crosses_newline() {
        let mut ed = editor_with("abc\ndef\n", 4, 10, 8);
        for _ in 0..4 {
            ed.forward_char();
            assert_cursor_consistent(&ed);
        }
        assert_eq!(ed.point(), 4);
        assert_eq!((ed.view.cursor_row, ed.view.cursor_col), (1, 0));
    }

    #[test]
    fn forward_then_backward_is_identity() {
        let mut ed = editor_with("ab\tc\ndef\n", 6, 10, 4);
        for start in 0..8 {
            ed.move_to(start);
            let point = ed.point();
            let pos = (ed.view.cursor_row, ed.view.cursor_col);
            let goal = ed.view.goal_col;
            ed.forward_char();
            ed.backward_char();
            assert_eq!(ed.point(), point, "point after fwd/back from {start}");
            assert_eq!((ed.view.cursor_row, ed.view.cursor_col), pos);
            assert_eq!(ed.view.goal_col, goal);
            assert_cursor_consistent(&ed);
        }
    }

    #[test]
    fn motion_is_clamped_at_both_ends() {
        let mut ed = editor_with("ab", 4, 10, 8);
        ed.backward_char();
        assert_eq!(ed.point(), 0);
        ed.move_to(2);
        ed.forward_char();
        assert_eq!(ed.point(), 2);
        assert_cursor_consistent(&ed);
    }

    #[test]
    fn forward_char_wraps_at_column_bound() {
        let mut ed = editor_with("abcdefghijkl", 4, 10, 8);
        for _ in 0..10 {
            ed.forward_char();
        }
        assert_eq!(ed.point(), 10);
        assert_eq!((ed.view.cursor_row, ed.view.cursor_col), (1, 0));
        assert_cursor_consistent(&ed);
    }

    #[test]
    fn tab_overflow_wraps() {
        // Tab at column 8 with ncols 10 cannot fit its expansion.
        let mut ed = editor_with("abcdefgh\tz", 4, 10, 8);
        for _ in 0..9 {
            ed.forward_char();
        }
        assert_eq!((ed.view.cursor_row, ed.view.cursor_col), (1, 0));
        assert_cursor_consistent(&ed);
    }

    #[test]
    fn word_motion() {
        let mut ed = editor_with("one two  three\nfour", 6, 40, 8);
        ed.forward_word();
        assert_eq!(ed.point(), 3);
        ed.forward_word();
        assert_eq!(ed.point(), 7);
        ed.forward_word();
        assert_eq!(ed.point(), 14);
        ed.forward_word();
        assert_eq!(ed.point(), 19);

        ed.backward_word();
        assert_eq!(ed.point(), 15);
        ed.backward_word();
        assert_eq!(ed.point(), 9);
        ed.backward_word();
        assert_eq!(ed.point(), 4);
        ed.backward_word();
        assert_eq!(ed.point(), 0);
        ed.backward_word();
        assert_eq!(ed.point(), 0);
    }

    #[test]
    fn paragraph_motion_stops_on_second_newline() {
        let mut ed = editor_with("aa bb\ncc\n\ndd\n", 8, 40, 8);
        ed.forward_paragraph();
        assert_eq!(ed.point(), 9);
        // Backward returns to the start of the following text after the gap.
        ed.end_of_buffer();
        ed.backward_paragraph();
        assert_eq!(ed.point(), 10);
        assert_cursor_consistent(&ed);
    }

    #[test]
    fn next_row_respects_goal_column() {
        let mut ed = editor_with("abcdef\nxy\nlongline\n", 8, 40, 8);
        ed.move_to(4); // col 4 on first line
        ed.next_row();
        // Second line is short: cursor stops at the newline.
        assert_eq!((ed.view.cursor_row, ed.view.cursor_col), (1, 2));
        assert_eq!(ed.view.goal_col, 4);
        ed.next_row();
        // Third line is long enough to regain the goal.
        assert_eq!((ed.view.cursor_row, ed.view.cursor_col), (2, 4));
        assert_cursor_consistent(&ed);
    }

    #[test]
    fn previous_row_regains_goal() {
        let mut ed = editor_with("abcdef\nxy\n", 8, 40, 8);
        ed.move_to(9); // end of "xy"
        assert_eq!(ed.view.cursor_col, 2);
        ed.move_to(4);
        ed.next_row();
        ed.previous_row();
        assert_eq!((ed.view.cursor_row, ed.view.cursor_col), (0, 4));
        assert_cursor_consistent(&ed);
    }

    #[test]
    fn row_bounds_are_visual() {
        let mut ed = editor_with("abcdefghijkl\n", 4, 10, 8);
        ed.move_to(11); // on the wrapped tail, col 1
        assert_eq!((ed.view.cursor_row, ed.view.cursor_col), (1, 1));
        ed.beginning_of_row();
        assert_eq!(ed.point(), 10);
        ed.end_of_row();
        assert_eq!(ed.point(), 12); // the newline breaks the visual line
        assert_cursor_consistent(&ed);
    }

    #[test]
    fn line_bounds_are_logical() {
        let mut ed = editor_with("abcdefghijkl\nxy\n", 4, 10, 8);
        ed.move_to(11);
        ed.beginning_of_line();
        assert_eq!(ed.point(), 0);
        ed.move_to(11);
        ed.end_of_line();
        assert_eq!(ed.point(), 12);
        assert_cursor_consistent(&ed);
    }

    #[test]
    fn scrolling_keeps_point_visible() {
        let mut ed = editor_with("a\nb\nc\nd\ne\nf\ng\nh\n", 4, 10, 8);
        // Walk to the bottom row, then beyond: the viewport must follow.
        for _ in 0..3 {
            ed.next_row();
        }
        assert_eq!(ed.view.cursor_row, 3);
        assert_eq!(ed.view.tl, Some(0));
        ed.next_row();
        assert_eq!(ed.view.tl, Some(2));
        assert_eq!(ed.view.cursor_row, 3);
        assert_cursor_consistent(&ed);

        for _ in 0..4 {
            ed.previous_row();
        }
        assert_eq!(ed.view.cursor_row, 0);
        assert_cursor_consistent(&ed);
    }

    #[test]
    fn scroll_commands_counter_move_cursor() {
        let mut ed = editor_with("a\nb\nc\nd\ne\nf\n", 4, 10, 8);
        ed.next_row();
        ed.next_row(); // row 2
        ed.scroll_up();
        assert_eq!(ed.view.tl, Some(2));
        assert_eq!(ed.view.cursor_row, 1);
        assert_cursor_consistent(&ed);
        ed.scroll_down();
        assert_eq!(ed.view.tl, Some(0));
        assert_eq!(ed.view.cursor_row, 2);
        assert_cursor_consistent(&ed);
    }

    #[test]
    fn insert_updates_cursor_and_dirty() {
        let mut ed = editor_with("ab\n", 4, 10, 8);
        ed.forward_char();
        ed.insert_char(ted_text::TedChar::glyph('X'));
        assert_eq!(text_of(&ed), "aXb\n");
        assert_eq!(ed.point(), 2);
        assert_eq!((ed.view.cursor_row, ed.view.cursor_col), (0, 2));
        assert!(ed.state.is_dirty);
        assert_cursor_consistent(&ed);
    }

    #[test]
    fn insert_newline_at_bottom_row_scrolls() {
        let mut ed = editor_with("a\nb\nc\nd", 4, 10, 8);
        ed.end_of_buffer();
        assert_eq!(ed.view.cursor_row, 3);
        ed.insert_char(ted_text::TedChar::Newline);
        assert_eq!(ed.view.cursor_row, 3);
        assert_eq!(ed.view.tl, Some(2));
        assert_cursor_consistent(&ed);
    }

    #[test]
    fn delete_char_keeps_cursor() {
        let mut ed = editor_with("abc", 4, 10, 8);
        ed.forward_char();
        ed.delete_char();
        assert_eq!(text_of(&ed), "ac");
        assert_eq!(ed.point(), 1);
        assert_eq!((ed.view.cursor_row, ed.view.cursor_col), (0, 1));
        assert!(ed.state.is_dirty);
        assert_cursor_consistent(&ed);
    }

    #[test]
    fn delete_last_visible_char_drops_anchor() {
        let mut ed = editor_with("a", 4, 10, 8);
        ed.delete_char();
        assert_eq!(ed.view.tl, None);
        assert!(ed.buffer.is_empty());
    }

    #[test]
    fn empty_buffer_motions_are_noops() {
        let mut ed = editor_with("", 4, 10, 8);
        ed.forward_char();
        ed.backward_char();
        ed.forward_word();
        ed.backward_word();
        ed.end_of_line();
        ed.beginning_of_line();
        ed.scroll_up();
        ed.scroll_down();
        assert_eq!(ed.point(), 0);
        assert_eq!(ed.view.tl, None);
    }

    #[test]
    fn move_to_walks_and_clamps() {
        let mut ed = editor_with("abc\ndef\n", 4, 10, 8);
        ed.move_to(4);
        assert_eq!(ed.point(), 4);
        ed.move_to(100);
        assert_eq!(ed.point(), 8);
        ed.move_to(0);
        assert_eq!(ed.point(), 0);
        assert_cursor_consistent(&ed);
    }
}
