//! Shared scaffolding: build a real editor over a real file in a temp
//! directory, so command tests exercise the same load path the binary
//! uses.

use std::path::PathBuf;

use ted_actions::io_ops;
use ted_model::{Editor, Geometry};
use ted_state::EditorState;
use ted_text::{LineEnding, TedChar};

pub struct Fixture {
    pub ed: Editor,
    pub path: PathBuf,
    // Held for its Drop: removes the directory after the test.
    _dir: tempfile::TempDir,
}

pub fn fixture(content: &str, line_ending: LineEnding) -> Fixture {
    fixture_sized(content, line_ending, 10, 72, 8)
}

pub fn fixture_sized(
    content: &str,
    line_ending: LineEnding,
    nlines: usize,
    ncols: usize,
    tabstop: usize,
) -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("scratch.txt");
    std::fs::write(&path, content).expect("write fixture");
    let (buffer, meta) = io_ops::load_file(&path, line_ending).expect("load fixture");
    let ed = Editor::new(
        buffer,
        Geometry {
            nlines,
            ncols,
            tabstop,
        },
        EditorState::new(meta),
    );
    Fixture {
        ed,
        path,
        _dir: dir,
    }
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

pub fn kill_text(ed: &Editor) -> String {
    ed.state
        .kill_buffer
        .iter()
        .map(|c| match c {
            TedChar::Newline => '\n',
            TedChar::Glyph(g) => *g,
        })
        .collect()
}
