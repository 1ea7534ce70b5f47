use std::collections::VecDeque;
use std::time::Instant;

use crossterm::event::KeyEvent;

pub(super) const DIAGNOSTICS_ENV: &str = "TAILVIEW_TUI_DIAGNOSTICS";
const MAX_TRACE_LINES: usize = 48;

#[derive(Debug, Clone)]
pub(super) struct RuntimeDiagnostics {
    enabled: bool,
    started_at: Instant,
    frame_count: usize,
    keypress_count: usize,
    load_count: usize,
    load_failures: usize,
    traces: VecDeque<String>,
}

impl RuntimeDiagnostics {
    pub(super) fn from_env() -> Self {
        let enabled = std::env::var(DIAGNOSTICS_ENV)
            .ok()
            .is_some_and(|value| value == "1" || value.eq_ignore_ascii_case("true"));
        Self::new(enabled)
    }

    pub(super) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            started_at: Instant::now(),
            frame_count: 0,
            keypress_count: 0,
            load_count: 0,
            load_failures: 0,
            traces: VecDeque::new(),
        }
    }

    pub(super) fn enabled(&self) -> bool {
        self.enabled
    }

    pub(super) fn elapsed_ms(&self) -> u128 {
        self.started_at.elapsed().as_millis()
    }

    pub(super) fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub(super) fn keypress_count(&self) -> usize {
        self.keypress_count
    }

    pub(super) fn load_count(&self) -> usize {
        self.load_count
    }

    pub(super) fn load_failures(&self) -> usize {
        self.load_failures
    }

    pub(super) fn last_trace(&self) -> Option<&str> {
        self.traces.back().map(String::as_str)
    }

    #[cfg(test)]
    pub(super) fn traces(&self) -> Vec<String> {
        self.traces.iter().cloned().collect()
    }

    pub(super) fn record_frame(&mut self) {
        if !self.enabled {
            return;
        }
        self.frame_count = self.frame_count.saturating_add(1);
    }

    pub(super) fn record_keypress(&mut self, key: &KeyEvent) {
        if !self.enabled {
            return;
        }
        self.keypress_count = self.keypress_count.saturating_add(1);
        self.push_trace(format!(
            "key code={:?} modifiers={:?}",
            key.code, key.modifiers
        ));
    }

    pub(super) fn record_load(&mut self, container: &str, ok: bool) {
        if !self.enabled {
            return;
        }
        self.load_count = self.load_count.saturating_add(1);
        if !ok {
            self.load_failures = self.load_failures.saturating_add(1);
        }
        self.push_trace(format!(
            "load container={container} result={}",
            if ok { "ok" } else { "failed" }
        ));
    }

    fn push_trace(&mut self, line: String) {
        self.traces.push_back(line);
        while self.traces.len() > MAX_TRACE_LINES {
            self.traces.pop_front();
        }
    }
}
