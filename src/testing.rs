//! Test doubles for the logs view collaborators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Sender};
use parking_lot::Mutex;

use crate::logs::{
    CancelToken, FlashLevel, LogDisplay, LogHost, LogRequest, LogSettings, Resource, TailError,
    Tailable,
};

/// What a scripted container does once its stream is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Script {
    /// Emit the lines, then close the stream.
    Finite(Vec<String>),
    /// Emit the lines, then hold the stream open until cancelled.
    Follow(Vec<String>),
    /// Reject the open request.
    Reject(String),
}

impl Script {
    pub fn finite(lines: &[&str]) -> Self {
        Script::Finite(lines.iter().map(|line| (*line).to_owned()).collect())
    }

    pub fn follow(lines: &[&str]) -> Self {
        Script::Follow(lines.iter().map(|line| (*line).to_owned()).collect())
    }
}

/// A tailable resource whose containers replay fixed scripts.
#[derive(Default)]
pub struct ScriptedResource {
    scripts: HashMap<String, Script>,
    requests: Mutex<Vec<LogRequest>>,
    tokens: Mutex<Vec<CancelToken>>,
    teardowns: Arc<AtomicUsize>,
}

impl ScriptedResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(mut self, name: &str, script: Script) -> Self {
        self.scripts.insert(name.to_owned(), script);
        self
    }

    pub fn requests(&self) -> Vec<LogRequest> {
        self.requests.lock().clone()
    }

    pub fn tokens(&self) -> Vec<CancelToken> {
        self.tokens.lock().clone()
    }

    /// Number of streams whose cancel hook has run.
    pub fn teardowns(&self) -> usize {
        self.teardowns.load(Ordering::SeqCst)
    }
}

impl Resource for ScriptedResource {
    fn kind(&self) -> &str {
        "pod"
    }

    fn tailable(&self) -> Option<&dyn Tailable> {
        Some(self)
    }
}

impl Tailable for ScriptedResource {
    fn logs(
        &self,
        request: &LogRequest,
        sink: Sender<String>,
        cancel: &CancelToken,
    ) -> Result<(), TailError> {
        self.requests.lock().push(request.clone());
        self.tokens.lock().push(cancel.clone());
        let teardowns = self.teardowns.clone();
        cancel.on_cancel(move || {
            teardowns.fetch_add(1, Ordering::SeqCst);
        });

        let script = self
            .scripts
            .get(&request.container)
            .cloned()
            .ok_or_else(|| TailError::UnknownContainer {
                container: request.container.clone(),
            })?;
        let (lines, hold) = match script {
            Script::Finite(lines) => (lines, false),
            Script::Follow(lines) => (lines, true),
            Script::Reject(details) => return Err(TailError::Rejected { details }),
        };

        let (stop_tx, stop_rx) = bounded::<()>(1);
        cancel.on_cancel(move || {
            let _ = stop_tx.try_send(());
        });
        let token = cancel.clone();
        thread::spawn(move || {
            for line in lines {
                if token.is_cancelled() || sink.send(line).is_err() {
                    return;
                }
            }
            if hold {
                let _ = stop_rx.recv();
            }
            drop(sink);
        });
        Ok(())
    }
}

/// A resource without the tailable capability.
pub struct PlainResource {
    kind: String,
}

impl PlainResource {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_owned(),
        }
    }
}

impl Resource for PlainResource {
    fn kind(&self) -> &str {
        &self.kind
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DisplayLog {
    pub renders: Vec<Vec<String>>,
    pub clears: usize,
    pub tops: usize,
    pub ends: usize,
    pub page_ups: usize,
    pub page_downs: usize,
}

/// A display that records every command it receives.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    log: Mutex<DisplayLog>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> DisplayLog {
        self.log.lock().clone()
    }

    pub fn last_render(&self) -> Option<Vec<String>> {
        self.log.lock().renders.last().cloned()
    }
}

impl LogDisplay for RecordingDisplay {
    fn render(&self, lines: &[String]) {
        self.log.lock().renders.push(lines.to_vec());
    }

    fn clear(&self) {
        self.log.lock().clears += 1;
    }

    fn scroll_to_beginning(&self) {
        self.log.lock().tops += 1;
    }

    fn scroll_to_end(&self) {
        self.log.lock().ends += 1;
    }

    fn page_up(&self) {
        self.log.lock().page_ups += 1;
    }

    fn page_down(&self) {
        self.log.lock().page_downs += 1;
    }
}

/// Host recording flashes and page switches.
pub struct FakeHost {
    selection: String,
    resource: Arc<dyn Resource>,
    flashes: Mutex<Vec<(FlashLevel, String)>>,
    switched: Mutex<Vec<String>>,
}

impl FakeHost {
    pub fn new(selection: &str, resource: Arc<dyn Resource>) -> Self {
        Self {
            selection: selection.to_owned(),
            resource,
            flashes: Mutex::new(Vec::new()),
            switched: Mutex::new(Vec::new()),
        }
    }

    pub fn flashes(&self) -> Vec<(FlashLevel, String)> {
        self.flashes.lock().clone()
    }

    pub fn switched_pages(&self) -> Vec<String> {
        self.switched.lock().clone()
    }
}

impl LogHost for FakeHost {
    fn selection(&self) -> String {
        self.selection.clone()
    }

    fn resource(&self) -> Arc<dyn Resource> {
        self.resource.clone()
    }

    fn list_name(&self) -> String {
        "pods".to_owned()
    }

    fn switch_page(&self, name: &str) {
        self.switched.lock().push(name.to_owned());
    }

    fn flash(&self, level: FlashLevel, message: &str) {
        self.flashes.lock().push((level, message.to_owned()));
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedSettings(pub usize);

impl LogSettings for FixedSettings {
    fn log_buffer_size(&self) -> usize {
        self.0
    }
}

/// Polls `condition` until it holds or `timeout` elapses.
pub fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}
