//! Player input handling for the MetroLab client.
//!
//! Parses typed commands and applies them to the session. Rejected
//! transitions and measurements become toasts; nothing here panics on bad
//! input.

use std::str::FromStr;

use metrolab_logic::controller::SimulationController;
use metrolab_logic::measurement::{MeasurementKind, ParseKindError};
use metrolab_logic::source::MeasurementSource;
use metrolab_logic::stage::Stage;
use thiserror::Error;

use crate::state::UiState;

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Press the forward button of the current screen.
    Next,
    /// Run a check on the bench.
    Measure(MeasurementKind),
    /// Restart from the report screen.
    Reset,
    /// Redraw the current screen.
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}` (type `help`)")]
    Unknown(String),
    #[error("`measure` needs a kind: volume, ph or seal")]
    MissingKind,
    #[error(transparent)]
    Kind(#[from] ParseKindError),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let head = words.next().ok_or(CommandError::Empty)?;
        match head.to_ascii_lowercase().as_str() {
            "next" | "n" | "continue" => Ok(Self::Next),
            "measure" | "m" => {
                let kind = words.next().ok_or(CommandError::MissingKind)?;
                Ok(Self::Measure(kind.parse()?))
            }
            "reset" | "restart" => Ok(Self::Reset),
            "status" | "s" | "look" => Ok(Self::Status),
            "help" | "h" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

pub const HELP: &str = "\
Commands:
  next               press the forward button on this screen
  measure <kind>     run a check in the laboratory (volume, ph, seal)
  reset              start again from the report screen
  status             redraw the current screen
  help               show this list
  quit               leave the simulator";

/// Apply a command to the session, leaving feedback in `ui`.
pub fn apply<S: MeasurementSource>(
    command: Command,
    sim: &mut SimulationController<S>,
    ui: &mut UiState,
) {
    match command {
        Command::Next => match sim.advance_next() {
            Ok(Stage::Intro) => ui.toast("Session restarted"),
            Ok(stage) => tracing::debug!(%stage, "advanced"),
            Err(e) => ui.toast(e.to_string()),
        },
        Command::Measure(kind) => {
            if sim.stage() == Stage::Laboratory && !sim.is_unlocked(kind) {
                ui.toast("Finish the previous measurements first");
            } else if sim.state().measurements.is_recorded(kind) {
                ui.toast(format!("{} already measured", kind));
            } else {
                match sim.record(kind) {
                    Ok(reading) => ui.toast(format!("{}: {}", kind, reading)),
                    Err(e) => ui.toast(e.to_string()),
                }
            }
        }
        Command::Reset => match sim.reset() {
            Ok(()) => ui.toast("Session restarted"),
            Err(e) => ui.toast(e.to_string()),
        },
        Command::Status => {}
        Command::Help => ui.show_help = true,
        Command::Quit => ui.quit = true,
    }
}
