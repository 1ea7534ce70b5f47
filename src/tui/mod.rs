//! Alternate-screen front end for a [`LogsView`] over shell containers.

use std::io;
use std::path::Path;
use std::sync::Arc;

use crossterm::event::{self, Event, KeyEventKind};
use thiserror::Error;
use tracing::debug;

use crate::config::TailConfig;
use crate::logs::{LogPage, LogsView};
use crate::shell_source::ShellResource;

mod config;
mod diagnostics;
mod events;
mod host;
mod lifecycle;
mod render;
mod terminal_text;

use config::INPUT_POLL_WAIT;
use diagnostics::RuntimeDiagnostics;
use events::{handle_key, LoopControl};
use host::TuiHost;
use lifecycle::{init_terminal, restore_terminal, TuiTerminal};
use render::render_ui;

#[derive(Debug, Error)]
pub enum TailTuiError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("no containers configured")]
    NoContainers,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailTuiOutcome {
    pub last_source: Option<String>,
    pub buffered_lines: usize,
}

pub fn run_tail_tui(config: &TailConfig, cwd: &Path) -> Result<TailTuiOutcome, TailTuiError> {
    let (mut view, host) = build_view(config, cwd)?;
    let mut diagnostics = RuntimeDiagnostics::from_env();

    let mut terminal = init_terminal()?;
    let loaded = view.init().is_ok();
    if let Some(name) = view.sources().active_name() {
        diagnostics.record_load(name, loaded);
    }

    let result = event_loop(&mut terminal, &mut view, &host, &config.selection, &mut diagnostics);
    view.stop();
    restore_terminal(&mut terminal)?;
    result?;

    Ok(TailTuiOutcome {
        last_source: view.sources().active_name().map(str::to_owned),
        buffered_lines: view.buffer().length(),
    })
}

/// One page per configured container, in config order.
fn build_view(
    config: &TailConfig,
    cwd: &Path,
) -> Result<(LogsView<LogPage>, Arc<TuiHost>), TailTuiError> {
    if config.containers.is_empty() {
        return Err(TailTuiError::NoContainers);
    }
    let resource = Arc::new(ShellResource::from_specs(cwd, &config.containers));
    let host = Arc::new(TuiHost::new(config.selection.clone(), resource));
    let mut view = LogsView::new(host.clone(), Arc::new(config.clone()))
        .with_flush_policy(config.flush_policy());
    for container in &config.containers {
        view.add_container(container.name.clone(), LogPage::new(&container.name));
    }
    Ok((view, host))
}

fn event_loop(
    terminal: &mut TuiTerminal,
    view: &mut LogsView<LogPage>,
    host: &TuiHost,
    selection: &str,
    diagnostics: &mut RuntimeDiagnostics,
) -> Result<(), TailTuiError> {
    loop {
        if let Some(page) = host.switched_to() {
            debug!(page = %page, "leaving log view");
            return Ok(());
        }
        terminal.draw(|frame| render_ui(frame, view, host, selection, diagnostics))?;
        diagnostics.record_frame();

        if !event::poll(INPUT_POLL_WAIT)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if handle_key(view, key, diagnostics) == LoopControl::Quit {
            return Ok(());
        }
    }
}
