use std::sync::Arc;

use crossterm::event::KeyEvent;
use tracing::{debug, warn};

use super::actions::{ActionDispatcher, Dispatch, Hint, LogAction};
use super::buffer::LineBuffer;
use super::contract::{
    namespaced, FlashLevel, LogDisplay, LogHost, LogRequest, LogSettings,
};
use super::error::LogsError;
use super::session::{FlushPolicy, SessionState, StreamSession};
use super::sources::SourceSet;

pub const NO_LOGS_PLACEHOLDER: &str =
    "😂 Doh! No logs are available at this time. Check again later on...";

/// Log pages of the selected resource, one per container.
///
/// All calls happen on the control thread. At most one session is live;
/// every load cancels the previous one before the buffer is reset.
pub struct LogsView<P> {
    host: Arc<dyn LogHost>,
    settings: Arc<dyn LogSettings>,
    sources: SourceSet<P>,
    dispatcher: ActionDispatcher,
    buffer: Arc<LineBuffer>,
    session: Option<StreamSession>,
    policy: FlushPolicy,
}

impl<P: LogDisplay + 'static> LogsView<P> {
    pub fn new(host: Arc<dyn LogHost>, settings: Arc<dyn LogSettings>) -> Self {
        let buffer = Arc::new(LineBuffer::new(settings.log_buffer_size()));
        Self {
            host,
            settings,
            sources: SourceSet::new(),
            dispatcher: ActionDispatcher::new(),
            buffer,
            session: None,
            policy: FlushPolicy::default(),
        }
    }

    pub fn with_flush_policy(mut self, policy: FlushPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn init(&mut self) -> Result<(), LogsError> {
        self.load(0)
    }

    /// Handles a key, returning it when the view has no use for it.
    pub fn keyboard(&mut self, key: KeyEvent) -> Option<KeyEvent> {
        match self.dispatcher.dispatch(&key) {
            Dispatch::Action(action) => {
                self.apply(action);
                None
            }
            Dispatch::Switch(index) => {
                if let Err(err) = self.switch_to(index) {
                    debug!(index, error = %err, "source switch failed");
                }
                None
            }
            Dispatch::PassThrough => Some(key),
        }
    }

    pub fn hints(&self) -> Vec<Hint> {
        self.dispatcher.hints()
    }

    pub fn add_container(&mut self, name: impl Into<String>, page: P) {
        self.sources.add_source(name, page);
        self.dispatcher.sync_sources(self.sources.names());
    }

    /// Drops every page. A live session would keep feeding a page that is
    /// gone, so it is stopped too.
    pub fn delete_all_pages(&mut self) {
        self.kill_log_if_any();
        self.sources.remove_all();
        self.dispatcher.sync_sources(std::iter::empty());
    }

    pub fn stop(&mut self) {
        self.kill_log_if_any();
    }

    pub fn switch_to(&mut self, index: usize) -> Result<(), LogsError> {
        self.load(index)
    }

    /// Attaches to the source at `index`. Out-of-range indexes are ignored.
    ///
    /// On failure the error is flashed and a placeholder line is shown on
    /// the page before it is returned.
    pub fn load(&mut self, index: usize) -> Result<(), LogsError> {
        let Some(page) = self.sources.switch_to(index).cloned() else {
            return Ok(());
        };
        let container = self.sources.name(index).unwrap_or_default().to_owned();

        self.kill_log_if_any();
        self.buffer.reset(self.settings.log_buffer_size());
        if let Err(err) = self.do_load(&container, page.clone()) {
            warn!(container = %container, error = %err, "log stream unavailable");
            self.host.flash(FlashLevel::Error, &err.to_string());
            self.buffer.add(NO_LOGS_PLACEHOLDER);
            page.render(&self.buffer.snapshot());
            return Err(err);
        }
        Ok(())
    }

    fn do_load(&mut self, container: &str, page: Arc<P>) -> Result<(), LogsError> {
        let resource = self.host.resource();
        let Some(tailable) = resource.tailable() else {
            return Err(LogsError::NotTailable {
                kind: resource.kind().to_owned(),
            });
        };
        let selection = self.host.selection();
        let (namespace, name) = namespaced(&selection);
        let request = LogRequest {
            namespace: namespace.to_owned(),
            name: name.to_owned(),
            container: container.to_owned(),
            tail_lines: self.buffer.capacity(),
            previous: false,
        };
        let display: Arc<dyn LogDisplay> = page;
        let session =
            StreamSession::start(tailable, request, self.buffer.clone(), display, self.policy)?;
        self.session = Some(session);
        Ok(())
    }

    fn kill_log_if_any(&mut self) {
        if let Some(session) = self.session.take() {
            session.cancel();
        }
    }

    pub fn apply(&mut self, action: LogAction) {
        match action {
            LogAction::Back => {
                self.stop();
                self.host.switch_page(&self.host.list_name());
            }
            LogAction::Clear => {
                if let Some(page) = self.sources.active_page() {
                    self.host.flash(FlashLevel::Info, "Clearing logs...");
                    self.buffer.clear();
                    page.clear();
                }
            }
            LogAction::Top => {
                if let Some(page) = self.sources.active_page() {
                    self.host.flash(FlashLevel::Info, "Top logs...");
                    page.scroll_to_beginning();
                }
            }
            LogAction::Bottom => {
                if let Some(page) = self.sources.active_page() {
                    self.host.flash(FlashLevel::Info, "Bottom logs...");
                    page.scroll_to_end();
                }
            }
            LogAction::PageUp => {
                if let Some(page) = self.sources.active_page() {
                    self.host.flash(FlashLevel::Info, "Page Up logs...");
                    page.page_up();
                }
            }
            LogAction::PageDown => {
                if let Some(page) = self.sources.active_page() {
                    self.host.flash(FlashLevel::Info, "Page Down logs...");
                    page.page_down();
                }
            }
        }
    }

    pub fn sources(&self) -> &SourceSet<P> {
        &self.sources
    }

    pub fn active_index(&self) -> usize {
        self.sources.active_index()
    }

    pub fn active_page(&self) -> Option<&Arc<P>> {
        self.sources.active_page()
    }

    pub fn buffer(&self) -> &Arc<LineBuffer> {
        &self.buffer
    }

    pub fn session_state(&self) -> SessionState {
        self.session
            .as_ref()
            .map_or(SessionState::Idle, StreamSession::state)
    }
}

#[cfg(test)]
#[path = "../tests/view_tests.rs"]
mod tests;
