//! Command implementations and the dispatcher.
//!
//! The keymap resolves a key to a [`Command`]; [`dispatch`] routes it to
//! the function that implements it. Commands mutate the [`Editor`] and
//! set echo state; only search and suspend touch the terminal, and only
//! quit-family commands end the loop, by returning [`Flow::Quit`].

pub mod edit;
pub mod io_ops;
pub mod kill;
pub mod mark;
pub mod motion;
pub mod search;
pub mod session;

use anyhow::Result;
use ted_input::Key;
use ted_keymap::Command;
use ted_model::Editor;
use ted_terminal::Terminal;
use tracing::debug;

/// What the main loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit { code: i32 },
}

/// Execute one resolved command. `key` is the keypress that triggered it,
/// which self-insertion consumes.
pub fn dispatch(cmd: Command, key: &Key, ed: &mut Editor, term: &mut Terminal) -> Result<Flow> {
    debug!(target: "actions.dispatch", command = ?cmd, "dispatch");
    match cmd {
        Command::ForwardChar => motion::forward_char(ed),
        Command::BackwardChar => motion::backward_char(ed),
        Command::ForwardWord => motion::forward_word(ed),
        Command::BackwardWord => motion::backward_word(ed),
        Command::ForwardParagraph => motion::forward_paragraph(ed),
        Command::BackwardParagraph => motion::backward_paragraph(ed),
        Command::NextRow => motion::next_row(ed),
        Command::PreviousRow => motion::previous_row(ed),
        Command::BeginningOfRow => motion::beginning_of_row(ed),
        Command::EndOfRow => motion::end_of_row(ed),
        Command::BeginningOfLine => motion::beginning_of_line(ed),
        Command::EndOfLine => motion::end_of_line(ed),
        Command::BeginningOfBuffer => motion::beginning_of_buffer(ed),
        Command::EndOfBuffer => motion::end_of_buffer(ed),
        Command::GotoLine => motion::goto_line(ed),
        Command::GotoPercent => motion::goto_percent(ed),
        Command::PageDown => motion::page_down(ed),
        Command::PageUp => motion::page_up(ed),
        Command::ScrollUp => motion::scroll_up(ed),
        Command::ScrollDown => motion::scroll_down(ed),
        Command::SetGoalColumn => motion::set_goal_column(ed),

        Command::SelfInsert => edit::insert_char(ed, key),
        Command::OpenLine => edit::open_line(ed),
        Command::OpenNextLine => edit::open_next_line(ed),
        Command::OpenPreviousLine => edit::open_previous_line(ed),
        Command::DeleteChar => edit::delete_char(ed),
        Command::DeleteBackwardChar => edit::delete_backward_char(ed),
        Command::DeleteForwardChar => edit::delete_forward_char(ed),

        Command::SetMark => mark::set_mark(ed),
        Command::ExchangePointAndMark => mark::exchange_point_and_mark(ed),
        Command::SetMarkForwardChar => mark::set_mark_forward_char(ed),
        Command::SetMarkBackwardChar => mark::set_mark_backward_char(ed),
        Command::SetMarkNextRow => mark::set_mark_next_row(ed),
        Command::SetMarkPreviousRow => mark::set_mark_previous_row(ed),
        Command::SetMarkForwardWord => mark::set_mark_forward_word(ed),
        Command::SetMarkBackwardWord => mark::set_mark_backward_word(ed),
        Command::SetMarkForwardParagraph => mark::set_mark_forward_paragraph(ed),
        Command::SetMarkBackwardParagraph => mark::set_mark_backward_paragraph(ed),
        Command::KillRegion => kill::kill_region(ed),
        Command::KillRegionSave => kill::kill_region_save(ed),
        Command::Yank => kill::yank(ed),

        Command::SaveBuffer => io_ops::save_buffer(ed),
        Command::SearchBuffer => search::search_buffer(ed, term)?,
        Command::SearchNext => search::search_next(ed),
        Command::SearchPrevious => search::search_previous(ed),
        Command::SearchQuit => search::search_quit(ed),

        Command::ShowLineColumn => session::show_line_column(ed),
        Command::ToggleReadOnly => session::toggle_read_only(ed),
        Command::Suspend => session::suspend(ed, term)?,
        Command::Quit => return Ok(session::quit(ed)),
        Command::KillTed => return Ok(session::kill_ted()),
        Command::Cancel => session::cancel(ed),
    }
    Ok(Flow::Continue)
}
