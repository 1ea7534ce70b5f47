use parking_lot::Mutex;

use super::contract::LogDisplay;

const DEFAULT_VIEWPORT: usize = 20;

/// Persistent page of one log source.
///
/// Holds the last snapshot pushed by a session worker together with the
/// scroll position. The page starts detached from the tail; the first
/// `scroll_to_end` turns follow mode on so later snapshots stay pinned to
/// the bottom until the operator scrolls away.
#[derive(Debug)]
pub struct LogPage {
    name: String,
    state: Mutex<PageState>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub lines: Vec<String>,
    pub offset: usize,
    pub max_offset: usize,
    pub follow: bool,
}

#[derive(Debug)]
struct PageState {
    lines: Vec<String>,
    offset: usize,
    follow: bool,
    viewport: usize,
    renders: usize,
}

impl PageState {
    fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.viewport)
    }

    fn settle(&mut self) {
        let max = self.max_offset();
        self.offset = if self.follow { max } else { self.offset.min(max) };
    }
}

impl LogPage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(PageState {
                lines: Vec::new(),
                offset: 0,
                follow: false,
                viewport: DEFAULT_VIEWPORT,
                renders: 0,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Visible rows; page moves are one viewport long.
    pub fn set_viewport(&self, rows: usize) {
        let mut state = self.state.lock();
        state.viewport = rows.max(1);
        state.settle();
    }

    pub fn scroll_up(&self, rows: usize) {
        let mut state = self.state.lock();
        state.follow = false;
        state.offset = state.offset.saturating_sub(rows);
    }

    pub fn scroll_down(&self, rows: usize) {
        let mut state = self.state.lock();
        let max = state.max_offset();
        state.offset = state.offset.saturating_add(rows).min(max);
        state.follow = state.offset == max;
    }

    pub fn view(&self) -> PageView {
        let state = self.state.lock();
        PageView {
            lines: state.lines.clone(),
            offset: state.offset,
            max_offset: state.max_offset(),
            follow: state.follow,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.state.lock().lines.clone()
    }

    pub fn render_count(&self) -> usize {
        self.state.lock().renders
    }
}

impl LogDisplay for LogPage {
    fn render(&self, lines: &[String]) {
        let mut state = self.state.lock();
        state.lines = lines.to_vec();
        state.renders = state.renders.saturating_add(1);
        state.settle();
    }

    fn clear(&self) {
        let mut state = self.state.lock();
        state.lines.clear();
        state.offset = 0;
    }

    fn scroll_to_beginning(&self) {
        let mut state = self.state.lock();
        state.follow = false;
        state.offset = 0;
    }

    fn scroll_to_end(&self) {
        let mut state = self.state.lock();
        state.follow = true;
        state.settle();
    }

    fn page_up(&self) {
        let rows = self.state.lock().viewport;
        self.scroll_up(rows);
    }

    fn page_down(&self) {
        let rows = self.state.lock().viewport;
        self.scroll_down(rows);
    }
}
