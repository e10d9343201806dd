//! Editor state that is not the text itself: file metadata, the mark ring,
//! search results, the kill buffer, the echo line, the prefix argument, and
//! the dirty / read-only flags.
//!
//! Marks and search results are stored as logical indices, never buffer
//! slots, so gap movement cannot invalidate them. Everything here is plain
//! data; the motion and command layers own the behavior.

use std::path::PathBuf;
use std::time::SystemTime;

use ted_text::{LineEnding, TedChar};
use tracing::debug;

/// Capacity of the mark ring.
pub const MARK_RING_SIZE: usize = 16;

/// Identity and on-disk facts about the file being edited.
#[derive(Debug, Clone)]
pub struct FileMeta {
    /// Resolved path used for the final rename.
    pub path: PathBuf,
    /// Directory that receives the save temp file.
    pub dir: PathBuf,
    /// File name without directory, used to derive temp names.
    pub base: String,
    /// Unix permission bits, applied to the temp file.
    pub mode: u32,
    /// Modification time recorded at load / last save; a newer on-disk
    /// value at save time means somebody else wrote the file.
    pub mtime: SystemTime,
    pub line_ending: LineEnding,
    pub ensure_trailing_newline: bool,
}

/// Circular ring of remembered point positions.
///
/// `first` is the oldest live slot, `last` the next write slot, `current`
/// the mark that bounds the region. Pushing when full evicts the oldest.
#[derive(Debug, Clone)]
pub struct MarkRing {
    slots: [usize; MARK_RING_SIZE],
    len: usize,
    first: usize,
    last: usize,
    current: usize,
    /// Whether the region between point and the current mark is selected.
    pub is_active: bool,
}

impl Default for MarkRing {
    fn default() -> Self {
        Self {
            slots: [0; MARK_RING_SIZE],
            len: 0,
            first: 0,
            last: 0,
            current: 0,
            is_active: false,
        }
    }
}

impl MarkRing {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The mark the region is measured against.
    pub fn current(&self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        Some(self.slots[self.current])
    }

    /// Overwrite the current mark in place (point/mark exchange).
    pub fn set_current(&mut self, index: usize) {
        debug_assert!(self.len > 0);
        self.slots[self.current] = index;
    }

    /// Push a new mark, evicting the oldest when the ring is full.
    pub fn push(&mut self, index: usize) {
        self.slots[self.last] = index;
        self.current = self.last;
        self.last = (self.last + 1) % MARK_RING_SIZE;
        if self.len == MARK_RING_SIZE {
            self.first = (self.first + 1) % MARK_RING_SIZE;
        } else {
            self.len += 1;
        }
        debug!(target: "state.marks", index, len = self.len, "mark_push");
    }

    /// Rotate `current` one step toward older marks, wrapping from the
    /// oldest back to the newest.
    pub fn rotate_back(&mut self) {
        if self.len <= 1 {
            return;
        }
        if self.current == self.first {
            self.current = if self.last > 0 {
                self.last - 1
            } else {
                MARK_RING_SIZE - 1
            };
        } else if self.current == 0 {
            self.current = MARK_RING_SIZE - 1;
        } else {
            self.current -= 1;
        }
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}

/// Byte offsets produced by the external search helper, plus the cursor
/// into them. Cycling wraps in both directions.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub results: Vec<usize>,
    pub current: usize,
}

impl SearchState {
    pub fn clear(&mut self) {
        self.results.clear();
        self.current = 0;
    }

    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }
}

/// Severity of the echo line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoKind {
    Info,
    Error,
}

/// The reserved message line below the viewport. `preserve` keeps the
/// message alive across exactly one redraw cycle.
#[derive(Debug, Clone, Default)]
pub struct EchoState {
    pub line: Option<(EchoKind, String)>,
    pub preserve: bool,
}

impl EchoState {
    pub fn info(&mut self, text: impl Into<String>) {
        self.line = Some((EchoKind::Info, text.into()));
    }

    pub fn info_preserved(&mut self, text: impl Into<String>) {
        self.info(text);
        self.preserve = true;
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.line = Some((EchoKind::Error, text.into()));
        self.preserve = true;
    }

    pub fn clear(&mut self) {
        self.line = None;
        self.preserve = false;
    }
}

/// The universal numeric argument (`C-u <digits>`).
///
/// Commands that repeat consume it with [`PrefixArg::take_repeat`];
/// commands that only branch on its presence use [`PrefixArg::take`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixArg {
    active: bool,
    value: usize,
}

impl PrefixArg {
    pub fn set(&mut self, value: usize) {
        self.active = true;
        self.value = value;
    }

    pub fn is_set(&self) -> bool {
        self.active
    }

    pub fn clear(&mut self) {
        self.active = false;
        self.value = 0;
    }

    /// Repeat count for the current command: the argument if one was
    /// given, otherwise 1. Consumes the argument.
    pub fn take_repeat(&mut self) -> usize {
        self.take().unwrap_or(1)
    }

    pub fn take(&mut self) -> Option<usize> {
        if !self.active {
            return None;
        }
        self.active = false;
        Some(self.value)
    }
}

/// Everything the commands mutate besides the buffer and viewport.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub file: FileMeta,
    pub marks: MarkRing,
    pub search: SearchState,
    pub kill_buffer: Vec<TedChar>,
    pub echo: EchoState,
    pub prefix: PrefixArg,
    pub is_dirty: bool,
    pub is_read_only: bool,
}

impl EditorState {
    pub fn new(file: FileMeta) -> Self {
        Self {
            file,
            marks: MarkRing::default(),
            search: SearchState::default(),
            kill_buffer: Vec::new(),
            echo: EchoState::default(),
            prefix: PrefixArg::default(),
            is_dirty: false,
            is_read_only: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mark_ring_push_sets_current() {
        let mut ring = MarkRing::default();
        assert_eq!(ring.current(), None);
        ring.push(5);
        assert_eq!(ring.current(), Some(5));
        ring.push(9);
        assert_eq!(ring.current(), Some(9));
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn mark_ring_evicts_oldest_when_full() {
        let mut ring = MarkRing::default();
        for i in 0..MARK_RING_SIZE + 3 {
            ring.push(i);
        }
        assert_eq!(ring.len(), MARK_RING_SIZE);
        assert_eq!(ring.current(), Some(MARK_RING_SIZE + 2));
        // Rotating all the way around stays within live marks.
        for _ in 0..MARK_RING_SIZE * 2 {
            ring.rotate_back();
            assert!(ring.current().is_some());
            let v = ring.current().unwrap();
            assert!(v >= 3, "evicted mark {v} resurfaced");
        }
    }

    #[test]
    fn mark_ring_rotation_walks_older_marks() {
        let mut ring = MarkRing::default();
        ring.push(10);
        ring.push(20);
        ring.push(30);
        assert_eq!(ring.current(), Some(30));
        ring.rotate_back();
        assert_eq!(ring.current(), Some(20));
        ring.rotate_back();
        assert_eq!(ring.current(), Some(10));
        // Oldest wraps back to newest.
        ring.rotate_back();
        assert_eq!(ring.current(), Some(30));
    }

    #[test]
    fn prefix_arg_take_semantics() {
        let mut p = PrefixArg::default();
        assert_eq!(p.take_repeat(), 1);
        p.set(4);
        assert!(p.is_set());
        assert_eq!(p.take_repeat(), 4);
        assert!(!p.is_set());
        assert_eq!(p.take(), None);
        p.set(0);
        assert_eq!(p.take(), Some(0));
    }

    #[test]
    fn echo_latch() {
        let mut echo = EchoState::default();
        echo.info("hello");
        assert!(!echo.preserve);
        echo.error("boom");
        assert!(echo.preserve);
        echo.clear();
        assert!(echo.line.is_none() && !echo.preserve);
        echo.info_preserved("kept");
        assert!(echo.preserve);
    }
}
