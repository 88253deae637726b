//! MetroLab Client - terminal front end for the metrology simulator
//!
//! Draws the current screen, reads one command per line, applies it to the
//! session and draws again. Commands come from the terminal or from a
//! `--script` file.
//!
//! Usage:
//!   cargo run -p metrolab-client
//!   cargo run -p metrolab-client -- --script crates/metrolab-client/demos/full_session.txt --dump-state

mod input;
mod state;
mod ui;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use anyhow::{Context, Result};
use clap::Parser;
use metrolab_logic::controller::SimulationController;
use tracing_subscriber::EnvFilter;

use crate::input::{Command, HELP};
use crate::state::{ClientConfig, UiState};

fn main() -> Result<()> {
    let config = ClientConfig::parse();
    init_logging(config.log.as_deref());

    let interactive = config.script.is_none();
    let reader: Box<dyn BufRead> = match &config.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening script {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut sim = SimulationController::new();
    let mut ui = UiState::default();
    tracing::info!(interactive, "session started");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", ui::render(&sim))?;

    let mut lines = reader.lines();
    while !ui.quit {
        if interactive {
            write!(out, "\n> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("reading command")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if !interactive {
            writeln!(out, "\n> {}", line)?;
        }

        match line.parse::<Command>() {
            Ok(command) => input::apply(command, &mut sim, &mut ui),
            Err(e) => {
                tracing::debug!(%line, "unparsed input");
                ui.toast(e.to_string());
            }
        }

        if let Some(toast) = ui.take_toast() {
            writeln!(out, ">> {}", toast)?;
        }
        if ui.show_help {
            writeln!(out, "{}", HELP)?;
            ui.show_help = false;
        } else if !ui.quit {
            writeln!(out, "{}", ui::render(&sim))?;
        }
    }

    tracing::info!(stage = %sim.stage(), "session ended");
    if config.dump_state {
        writeln!(out, "{}", serde_json::to_string_pretty(sim.state())?)?;
    }
    Ok(())
}

/// Install the fmt subscriber on stderr. The subscriber also picks up
/// `log` records from the logic crate.
fn init_logging(filter: Option<&str>) {
    let filter = match filter {
        Some(f) => EnvFilter::new(f),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
