//! Option resolution: built-in defaults, an optional `ted.toml`, and the
//! command line, in increasing order of precedence.
//!
//! The config file may pre-set the viewport shape, tabstop, and newline
//! convention; explicit CLI flags always win. File values outside the
//! documented domains are logged and ignored rather than fatal; only the
//! command line is strict, because the user just typed it.

use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use ted_text::LineEnding;
use tracing::{debug, warn};

pub const DEFAULT_NLINES: u16 = 10;
pub const MIN_NLINES: u16 = 5;
pub const MAX_NLINES: u16 = 30;

pub const DEFAULT_NCOLS: u16 = 72;
pub const MIN_NCOLS: u16 = 30;
pub const MAX_NCOLS: u16 = 120;

pub const DEFAULT_TABSTOP: u16 = 8;
pub const MIN_TABSTOP: u16 = 2;
pub const MAX_TABSTOP: u16 = 8;

/// Where the point starts after load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartPosition {
    #[default]
    First,
    Last,
    Offset(usize),
}

impl FromStr for StartPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(StartPosition::First),
            "last" => Ok(StartPosition::Last),
            n => n
                .parse::<usize>()
                .map(StartPosition::Offset)
                .map_err(|_| format!("expected 'first', 'last', or a number, got {s:?}")),
        }
    }
}

/// Parser for the `-f unix|dos` flag.
pub fn parse_line_ending(s: &str) -> Result<LineEnding, String> {
    match s {
        "unix" => Ok(LineEnding::Unix),
        "dos" => Ok(LineEnding::Dos),
        other => Err(format!("expected 'unix' or 'dos', got {other:?}")),
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum LineEndingChoice {
    Unix,
    Dos,
}

impl From<LineEndingChoice> for LineEnding {
    fn from(c: LineEndingChoice) -> Self {
        match c {
            LineEndingChoice::Unix => LineEnding::Unix,
            LineEndingChoice::Dos => LineEnding::Dos,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ViewportSection {
    #[serde(default)]
    rows: Option<u16>,
    #[serde(default)]
    cols: Option<u16>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EditorSection {
    #[serde(default)]
    tabstop: Option<u16>,
    #[serde(default)]
    line_ending: Option<LineEndingChoice>,
}

/// Parsed `ted.toml`. Unknown fields are tolerated so the file can grow.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub viewport: ViewportSection,
    #[serde(default)]
    pub editor: EditorSection,
}

/// Config path following platform conventions: a local `ted.toml` first,
/// then the user config directory.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("ted.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("ted").join("ted.toml");
    }
    PathBuf::from("ted.toml")
}

/// Read and parse the config file. Absence is normal; a malformed file is
/// reported in the log and treated as absent.
pub fn load_file(path: Option<PathBuf>) -> ConfigFile {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = std::fs::read_to_string(&path) else {
        return ConfigFile::default();
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            debug!(target: "config", file = %path.display(), "config_loaded");
            file
        }
        Err(err) => {
            warn!(target: "config", file = %path.display(), %err, "config_parse_failed");
            ConfigFile::default()
        }
    }
}

/// CLI-provided overrides, already validated by the argument parser.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub rows: Option<u16>,
    pub cols: Option<u16>,
    pub tabstop: Option<u16>,
    pub line_ending: Option<LineEnding>,
    pub position: Option<StartPosition>,
}

/// Fully-resolved settings the rest of the editor consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub nlines: u16,
    pub ncols: u16,
    pub tabstop: u16,
    pub line_ending: LineEnding,
    pub position: StartPosition,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            nlines: DEFAULT_NLINES,
            ncols: DEFAULT_NCOLS,
            tabstop: DEFAULT_TABSTOP,
            line_ending: LineEnding::default(),
            position: StartPosition::default(),
        }
    }
}

impl Settings {
    /// Layer the config file and the command line over the defaults.
    pub fn resolve(cli: &CliOverrides, file: &ConfigFile) -> Settings {
        let mut s = Settings::default();

        if let Some(rows) = file.viewport.rows {
            apply_ranged("viewport.rows", rows, MIN_NLINES, MAX_NLINES, &mut s.nlines);
        }
        if let Some(cols) = file.viewport.cols {
            apply_ranged("viewport.cols", cols, MIN_NCOLS, MAX_NCOLS, &mut s.ncols);
        }
        if let Some(tabs) = file.editor.tabstop {
            apply_ranged("editor.tabstop", tabs, MIN_TABSTOP, MAX_TABSTOP, &mut s.tabstop);
        }
        if let Some(le) = file.editor.line_ending {
            s.line_ending = le.into();
        }

        if let Some(rows) = cli.rows {
            s.nlines = rows;
        }
        if let Some(cols) = cli.cols {
            s.ncols = cols;
        }
        if let Some(tabs) = cli.tabstop {
            s.tabstop = tabs;
        }
        if let Some(le) = cli.line_ending {
            s.line_ending = le;
        }
        if let Some(pos) = cli.position {
            s.position = pos;
        }

        debug!(target: "config", settings = ?s, "settings_resolved");
        s
    }
}

fn apply_ranged(name: &str, value: u16, min: u16, max: u16, slot: &mut u16) {
    if (min..=max).contains(&value) {
        *slot = value;
    } else {
        warn!(target: "config", option = name, value, min, max, "config_value_out_of_range");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_documented_values() {
        let s = Settings::default();
        assert_eq!((s.nlines, s.ncols, s.tabstop), (10, 72, 8));
        assert_eq!(s.line_ending, LineEnding::Unix);
        assert_eq!(s.position, StartPosition::First);
    }

    #[test]
    fn start_position_parses() {
        assert_eq!("first".parse(), Ok(StartPosition::First));
        assert_eq!("last".parse(), Ok(StartPosition::Last));
        assert_eq!("42".parse(), Ok(StartPosition::Offset(42)));
        assert!("nowhere".parse::<StartPosition>().is_err());
    }

    #[test]
    fn line_ending_flag_parses() {
        assert_eq!(parse_line_ending("unix"), Ok(LineEnding::Unix));
        assert_eq!(parse_line_ending("dos"), Ok(LineEnding::Dos));
        assert!(parse_line_ending("mac").is_err());
    }

    #[test]
    fn file_values_layer_under_cli() {
        let file: ConfigFile = toml::from_str(
            "[viewport]\nrows = 20\ncols = 100\n[editor]\ntabstop = 4\nline_ending = \"dos\"\n",
        )
        .unwrap();
        let cli = CliOverrides {
            rows: Some(12),
            ..CliOverrides::default()
        };
        let s = Settings::resolve(&cli, &file);
        assert_eq!(s.nlines, 12); // CLI wins
        assert_eq!(s.ncols, 100); // file applies
        assert_eq!(s.tabstop, 4);
        assert_eq!(s.line_ending, LineEnding::Dos);
    }

    #[test]
    fn out_of_range_file_values_are_ignored() {
        let file: ConfigFile =
            toml::from_str("[viewport]\nrows = 99\ncols = 10\n").unwrap();
        let s = Settings::resolve(&CliOverrides::default(), &file);
        assert_eq!(s.nlines, DEFAULT_NLINES);
        assert_eq!(s.ncols, DEFAULT_NCOLS);
    }

    #[test]
    fn malformed_file_is_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ted.toml");
        std::fs::write(&path, "viewport = not toml").unwrap();
        let file = load_file(Some(path));
        let s = Settings::resolve(&CliOverrides::default(), &file);
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let file = load_file(Some(dir.path().join("absent.toml")));
        let s = Settings::resolve(&CliOverrides::default(), &file);
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let file: ConfigFile =
            toml::from_str("[viewport]\nrows = 15\nfancy = true\n[future]\nx = 1\n").unwrap();
        let s = Settings::resolve(&CliOverrides::default(), &file);
        assert_eq!(s.nlines, 15);
    }
}
