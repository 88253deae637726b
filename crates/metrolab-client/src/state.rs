//! State management for the MetroLab client.
//!
//! Launch options and the small amount of UI state that lives outside the
//! simulation itself.

use std::path::PathBuf;

use clap::Parser;

/// Launch options.
#[derive(Debug, Clone, Parser)]
#[command(name = "metrolab", version, about = "MetroLab — metrology and quality simulator")]
pub struct ClientConfig {
    /// Read commands from this file instead of the terminal, one per line.
    #[arg(long, short = 's')]
    pub script: Option<PathBuf>,

    /// Log filter (overrides RUST_LOG), e.g. `debug` or `metrolab_logic=debug`.
    #[arg(long)]
    pub log: Option<String>,

    /// Print the final session state as JSON on exit.
    #[arg(long)]
    pub dump_state: bool,
}

/// Transient UI feedback between redraws.
#[derive(Debug, Default)]
pub struct UiState {
    toast: Option<String>,
    pub show_help: bool,
    pub quit: bool,
}

impl UiState {
    /// Queue a one-line notice for the next redraw. A newer notice replaces an older one.
    pub fn toast(&mut self, message: impl Into<String>) {
        self.toast = Some(message.into());
    }

    pub fn take_toast(&mut self) -> Option<String> {
        self.toast.take()
    }
}
