use std::time::Instant;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use crate::logs::{LogPage, LogsView};

use super::diagnostics::RuntimeDiagnostics;
use super::host::TuiHost;

mod footer;
mod header;
mod pane;

use footer::render_footer;
use header::render_tabs;
use pane::render_page;

pub(super) fn render_ui(
    frame: &mut Frame<'_>,
    view: &LogsView<LogPage>,
    host: &TuiHost,
    selection: &str,
    diagnostics: &RuntimeDiagnostics,
) {
    let footer_height = if diagnostics.enabled() { 2 } else { 1 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(footer_height),
        ])
        .split(frame.area());

    let names = view.sources().names().collect::<Vec<&str>>();
    render_tabs(frame, chunks[0], &names, view.active_index(), selection);
    render_page(frame, chunks[1], view.active_page().map(|page| page.as_ref()));
    render_footer(
        frame,
        chunks[2],
        &view.hints(),
        host.current_flash(Instant::now()),
        diagnostics,
    );
}
