//! ted entrypoint: startup, the synchronous command loop, teardown.
//!
//! Data flows one direction per cycle: a key is read and decoded, the
//! keymap resolves it (possibly through a chord and a prefix argument),
//! the command mutates the editor, and the renderer repaints the reserved
//! window. Everything blocks; the only subprocess is the external search.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Once;

use anyhow::Result;
use clap::Parser;
use ted_actions::{Flow, dispatch, session};
use ted_config::{
    CliOverrides, MAX_NCOLS, MAX_NLINES, MAX_TABSTOP, MIN_NCOLS, MIN_NLINES, MIN_TABSTOP,
    Settings, StartPosition, load_file as load_config, parse_line_ending,
};
use ted_input::{Key, ModMask, NamedKey, decode};
use ted_keymap::{Binding, Command, GLOBAL_KEYMAP, lookup};
use ted_model::{Editor, Geometry};
use ted_render::{compose, status};
use ted_state::EditorState;
use ted_terminal::Terminal;
use ted_text::LineEnding;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments. Domains follow the documented ranges; out-of-range
/// values are rejected before the terminal is touched.
#[derive(Parser, Debug)]
#[command(name = "ted", version, about = "Edit FILE on the terminal.")]
struct Args {
    /// File to edit; created when absent.
    file: PathBuf,

    /// Show ROWS lines at a time.
    #[arg(short = 'r', value_name = "ROWS",
          value_parser = clap::value_parser!(u16).range(MIN_NLINES as i64..=MAX_NLINES as i64))]
    rows: Option<u16>,

    /// Show COLS columns per screen line.
    #[arg(short = 'c', value_name = "COLS",
          value_parser = clap::value_parser!(u16).range(MIN_NCOLS as i64..=MAX_NCOLS as i64))]
    cols: Option<u16>,

    /// Use TABS columns for each tabstop.
    #[arg(short = 't', value_name = "TABS",
          value_parser = clap::value_parser!(u16).range(MIN_TABSTOP as i64..=MAX_TABSTOP as i64))]
    tabs: Option<u16>,

    /// Use unix or dos line-endings.
    #[arg(short = 'f', value_name = "unix|dos", value_parser = parse_line_ending)]
    format: Option<LineEnding>,

    /// Start with the point at the beginning, the end, or the Nth character.
    #[arg(short = 'g', value_name = "first|last|N")]
    goto: Option<StartPosition>,

    /// Configuration file path, overriding discovery of `ted.toml`.
    #[arg(long = "config")]
    config: Option<PathBuf>,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_path = Path::new("ted.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(log_path);
    }
    let appender = tracing_appender::rolling::never(".", "ted.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .try_init()
    {
        Ok(()) => Some(guard),
        // A subscriber is already installed (tests); drop the guard so the
        // writer thread shuts down.
        Err(_) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            error!(target: "runtime.panic", ?panic_info, "panic");
            default_panic(panic_info);
        }));
    });
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("ted: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    // The TTY requirement comes first: everything after it assumes a
    // terminal on both ends.
    let mut term = Terminal::new()?;

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // Help and version are successful exits; anything else is a
            // startup error and exits 1 per the CLI contract.
            use clap::error::ErrorKind;
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0u8,
                _ => 1u8,
            };
            let _ = err.print();
            return Ok(ExitCode::from(code));
        }
    };

    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", file = %args.file.display(), "startup");

    let overrides = CliOverrides {
        rows: args.rows,
        cols: args.cols,
        tabstop: args.tabs,
        line_ending: args.format,
        position: args.goto,
    };
    let settings = Settings::resolve(&overrides, &load_config(args.config.clone()));

    let (buffer, meta) = ted_actions::io_ops::load_file(&args.file, settings.line_ending)?;
    let geom = Geometry {
        nlines: settings.nlines as usize,
        ncols: settings.ncols as usize,
        tabstop: settings.tabstop as usize,
    };
    let mut ed = Editor::new(buffer, geom, EditorState::new(meta));

    term.enter()?;
    term.reserve_screen(geom.nlines as u16)?;
    refresh(&ed, &mut term)?;

    match settings.position {
        StartPosition::First => {}
        StartPosition::Last => ed.end_of_buffer(),
        StartPosition::Offset(n) => ed.move_to(n),
    }

    let code = main_loop(&mut ed, &mut term)?;

    term.clear_screen()?;
    term.leave()?;
    info!(target: "runtime", code, "shutdown");
    Ok(ExitCode::from(code as u8))
}

const CANCEL_KEY: Key = Key {
    mods: ModMask::empty(),
    code: ted_input::KeyCode::Named(NamedKey::Bel),
};

fn prefix_key() -> Key {
    Key::chr('u').with_mods(ModMask::CTRL)
}

fn refresh(ed: &Editor, term: &mut Terminal) -> Result<()> {
    let scratch = compose(ed);
    term.paint(
        &scratch,
        ed.view.cursor_row as u16,
        ed.view.cursor_col as u16,
    )
}

fn read_key(term: &mut Terminal) -> Result<Option<Key>> {
    let burst = term.read_burst()?;
    Ok(decode(&burst))
}

fn draw_chord(term: &mut Terminal, chord: &str) -> Result<()> {
    term.draw_echo(&status::echo_line(ted_state::EchoKind::Info, chord))
}

fn main_loop(ed: &mut Editor, term: &mut Terminal) -> Result<i32> {
    'cycle: loop {
        refresh(ed, term)?;
        ed.state.prefix.clear();
        let mut chord_echo = String::new();

        if !ed.state.echo.preserve {
            ed.state.echo.clear();
            term.clear_echo()?;
        } else {
            ed.state.echo.preserve = false;
        }

        // First key, possibly opening a numeric prefix.
        let Some(mut key) = read_key(term)? else {
            ed.state.echo.error("Key is undefined.");
            draw_pending_echo(ed, term)?;
            continue 'cycle;
        };
        if key == CANCEL_KEY {
            session::cancel(ed);
            continue 'cycle;
        }

        if key == prefix_key() {
            chord_echo.push_str("C-u ");
            draw_chord(term, &chord_echo)?;

            let mut value = 0usize;
            let mut scanned_num = false;
            loop {
                let Some(k) = read_key(term)? else {
                    ed.state.echo.error("Key is undefined.");
                    draw_pending_echo(ed, term)?;
                    continue 'cycle;
                };
                if k == CANCEL_KEY {
                    session::cancel(ed);
                    continue 'cycle;
                }
                if let Some(d) = k.as_digit() {
                    scanned_num = true;
                    value = value.saturating_mul(10).saturating_add(d as usize);
                    chord_echo.push_str(&format!("{d} "));
                    draw_chord(term, &chord_echo)?;
                } else {
                    key = k;
                    break;
                }
            }
            ed.state.prefix.set(if scanned_num { value } else { 1 });
        }

        // Walk the keymap, descending through chord tables.
        let mut table = GLOBAL_KEYMAP;
        let mut in_chord = false;
        let resolved = loop {
            match lookup(table, &key) {
                Some(entry) => match entry.binding {
                    Binding::Command(cmd) => break Some(cmd),
                    Binding::Prefix(next) => {
                        chord_echo.push_str(entry.chord);
                        chord_echo.push(' ');
                        draw_chord(term, &chord_echo)?;
                        table = next;
                        in_chord = true;
                        let Some(k) = read_key(term)? else {
                            ed.state.echo.error("Key is undefined.");
                            draw_pending_echo(ed, term)?;
                            continue 'cycle;
                        };
                        if k == CANCEL_KEY {
                            session::cancel(ed);
                            continue 'cycle;
                        }
                        key = k;
                    }
                },
                None => break None,
            }
        };

        match resolved {
            Some(cmd) => match dispatch(cmd, &key, ed, term)? {
                Flow::Continue => {}
                Flow::Quit { code } => return Ok(code),
            },
            None => {
                if key.is_text() && !in_chord {
                    match dispatch(Command::SelfInsert, &key, ed, term)? {
                        Flow::Continue => {}
                        Flow::Quit { code } => return Ok(code),
                    }
                } else {
                    ed.state.echo.error("Key is undefined.");
                }
            }
        }

        draw_pending_echo(ed, term)?;
    }
}

/// Write whatever message the last command left in the echo state.
fn draw_pending_echo(ed: &Editor, term: &mut Terminal) -> Result<()> {
    if let Some((kind, text)) = &ed.state.echo.line {
        term.draw_echo(&status::echo_line(*kind, text))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn args_accept_documented_domains() {
        let args =
            Args::try_parse_from(["ted", "-r", "12", "-c", "80", "-t", "4", "-f", "dos", "f.txt"])
                .unwrap();
        assert_eq!(args.rows, Some(12));
        assert_eq!(args.cols, Some(80));
        assert_eq!(args.tabs, Some(4));
        assert_eq!(args.format, Some(LineEnding::Dos));
    }

    #[test]
    fn args_reject_out_of_range_values() {
        assert!(Args::try_parse_from(["ted", "-r", "4", "f.txt"]).is_err());
        assert!(Args::try_parse_from(["ted", "-r", "31", "f.txt"]).is_err());
        assert!(Args::try_parse_from(["ted", "-c", "29", "f.txt"]).is_err());
        assert!(Args::try_parse_from(["ted", "-c", "121", "f.txt"]).is_err());
        assert!(Args::try_parse_from(["ted", "-t", "1", "f.txt"]).is_err());
        assert!(Args::try_parse_from(["ted", "-t", "9", "f.txt"]).is_err());
        assert!(Args::try_parse_from(["ted", "-f", "mac", "f.txt"]).is_err());
    }

    #[test]
    fn args_parse_goto_forms() {
        let args = Args::try_parse_from(["ted", "-g", "last", "f.txt"]).unwrap();
        assert_eq!(args.goto, Some(StartPosition::Last));
        let args = Args::try_parse_from(["ted", "-g", "128", "f.txt"]).unwrap();
        assert_eq!(args.goto, Some(StartPosition::Offset(128)));
        assert!(Args::try_parse_from(["ted", "-g", "middle", "f.txt"]).is_err());
    }

    #[test]
    fn args_require_a_file() {
        assert!(Args::try_parse_from(["ted"]).is_err());
    }

    #[test]
    fn cancel_key_matches_decoded_ctrl_g() {
        assert_eq!(Some(CANCEL_KEY), decode(b"\x07"));
        assert_eq!(Some(prefix_key()), decode(b"\x15"));
    }
}
