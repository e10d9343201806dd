//! Visual layout resolution.
//!
//! Columns cannot be read off an index directly: tabs expand relative to
//! the column they start at, and hard wrapping restarts the count at the
//! column limit. Both walkers therefore back up to the nearest logical
//! line start (a newline boundary, where the column is known to be zero)
//! and replay `next_col` forward.

use crate::Editor;

impl Editor {
    /// Column of the character at logical index `i`.
    pub fn col_of(&self, i: usize) -> usize {
        if i == 0 {
            return 0;
        }
        let mut q = i - 1;
        while q > 0 && !self.char_is_newline(q - 1) {
            q -= 1;
        }
        let mut col = 0;
        while q != i {
            if let Some(ch) = self.buffer.char_at(q) {
                col = self.geom.next_col(ch, col);
            }
            q += 1;
        }
        col
    }

    /// Index of the first character of the visual line containing `i`:
    /// the most recent zero-column transition at or before it.
    pub fn first_of_visual_line(&self, i: usize) -> usize {
        if i == 0 {
            return 0;
        }
        let mut q = i - 1;
        while q > 0 && !self.char_is_newline(q - 1) {
            q -= 1;
        }
        let mut col = 0;
        let mut line_start = q;
        while q != i {
            if let Some(ch) = self.buffer.char_at(q) {
                col = self.geom.next_col(ch, col);
            }
            q += 1;
            if col == 0 {
                line_start = q;
            }
        }
        line_start
    }

    fn char_is_newline(&self, i: usize) -> bool {
        self.buffer.char_at(i).is_some_and(|c| c.is_newline())
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_support::editor_with;
    use ted_text::TedChar;

    #[test]
    fn next_col_plain_chars() {
        let ed = editor_with("", 4, 10, 8);
        assert_eq!(ed.geom.next_col(TedChar::glyph('a'), 0), 1);
        assert_eq!(ed.geom.next_col(TedChar::glyph('a'), 8), 9);
        // Placing a character in the last column signals a break.
        assert_eq!(ed.geom.next_col(TedChar::glyph('a'), 9), 0);
        assert_eq!(ed.geom.next_col(TedChar::Newline, 5), 0);
    }

    #[test]
    fn next_col_tab_expansion() {
        let ed = editor_with("", 4, 20, 8);
        assert_eq!(ed.geom.next_col(TedChar::glyph('\t'), 0), 8);
        assert_eq!(ed.geom.next_col(TedChar::glyph('\t'), 3), 8);
        assert_eq!(ed.geom.next_col(TedChar::glyph('\t'), 8), 16);
        // Expansion that would reach the bound becomes a break.
        assert_eq!(ed.geom.next_col(TedChar::glyph('\t'), 15), 0);
    }

    #[test]
    fn col_of_within_logical_line() {
        let ed = editor_with("abc\ndef", 4, 10, 8);
        assert_eq!(ed.col_of(0), 0);
        assert_eq!(ed.col_of(2), 2);
        assert_eq!(ed.col_of(3), 3); // the newline itself
        assert_eq!(ed.col_of(4), 0); // first char of the next line
        assert_eq!(ed.col_of(6), 2);
    }

    #[test]
    fn col_of_wraps_at_ncols() {
        // 12 chars in a 10-column viewport: k is at col 0 of the wrap line.
        let ed = editor_with("abcdefghijkl", 4, 10, 8);
        assert_eq!(ed.col_of(9), 9);
        assert_eq!(ed.col_of(10), 0);
        assert_eq!(ed.col_of(11), 1);
    }

    #[test]
    fn first_of_visual_line_logical_and_wrapped() {
        let ed = editor_with("abcdefghijkl\nxy", 4, 10, 8);
        assert_eq!(ed.first_of_visual_line(5), 0);
        assert_eq!(ed.first_of_visual_line(10), 10);
        assert_eq!(ed.first_of_visual_line(11), 10);
        // After the newline a fresh logical line starts.
        assert_eq!(ed.first_of_visual_line(14), 13);
    }

    #[test]
    fn first_of_visual_line_tab_break() {
        // Tab at col 8 in 10 cols overflows: break, next char starts a line.
        let ed = editor_with("abcdefgh\tz", 4, 10, 8);
        assert_eq!(ed.first_of_visual_line(9), 9);
    }
}
