use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::logs::{LogDisplay, LogPage, LogsView, SessionState};

use super::diagnostics::RuntimeDiagnostics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LoopControl {
    Continue,
    Quit,
}

pub(super) fn next_index(current: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (current + 1) % len
    }
}

pub(super) fn prev_index(current: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else if current == 0 {
        len - 1
    } else {
        current - 1
    }
}

/// Routes a key through the view first; whatever it passes back drives
/// line scrolling and arrow-key source cycling.
pub(super) fn handle_key(
    view: &mut LogsView<LogPage>,
    key: KeyEvent,
    diagnostics: &mut RuntimeDiagnostics,
) -> LoopControl {
    diagnostics.record_keypress(&key);
    if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c')) {
        return LoopControl::Quit;
    }

    let before = view.active_index();
    let digit = matches!(key.code, KeyCode::Char(c) if c.is_ascii_digit());
    let Some(key) = view.keyboard(key) else {
        // A consumed digit always reloads, even for the active source.
        if digit || view.active_index() != before {
            record_load(view, diagnostics);
        }
        return LoopControl::Continue;
    };

    let len = view.sources().len();
    match key.code {
        KeyCode::Right | KeyCode::Tab => {
            switch(view, next_index(before, len), diagnostics);
        }
        KeyCode::Left | KeyCode::BackTab => {
            switch(view, prev_index(before, len), diagnostics);
        }
        code => {
            if let Some(page) = view.active_page() {
                match code {
                    KeyCode::Up => page.scroll_up(1),
                    KeyCode::Down => page.scroll_down(1),
                    KeyCode::PageUp => page.page_up(),
                    KeyCode::PageDown => page.page_down(),
                    KeyCode::Home => page.scroll_to_beginning(),
                    KeyCode::End => page.scroll_to_end(),
                    _ => {}
                }
            }
        }
    }
    LoopControl::Continue
}

fn switch(view: &mut LogsView<LogPage>, index: usize, diagnostics: &mut RuntimeDiagnostics) {
    if view.sources().len() < 2 {
        return;
    }
    // Failures are already flashed by the view.
    let _ = view.switch_to(index);
    record_load(view, diagnostics);
}

fn record_load(view: &LogsView<LogPage>, diagnostics: &mut RuntimeDiagnostics) {
    let name = view.sources().active_name().unwrap_or_default().to_owned();
    diagnostics.record_load(&name, view.session_state() != SessionState::Idle);
}
