use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, select, tick, Receiver};
use parking_lot::Mutex;
use tracing::debug;

use super::buffer::LineBuffer;
use super::cancel::CancelToken;
use super::contract::{LogDisplay, LogRequest, Tailable};
use super::error::TailError;

pub const REFRESH_RATE: Duration = Duration::from_millis(200);
pub const MAX_CLEANSE: usize = 100;
pub const NO_MORE_LOGS: &str = "--- No more logs ---";

const SINK_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
    Completed,
    Cancelled,
}

/// Flush cadence of a session worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushPolicy {
    pub refresh_rate: Duration,
    /// Ticks between two cleanse passes over the buffer.
    pub cleanse_every: usize,
}

impl Default for FlushPolicy {
    fn default() -> Self {
        Self {
            refresh_rate: REFRESH_RATE,
            cleanse_every: MAX_CLEANSE,
        }
    }
}

/// One attachment to a container log stream.
///
/// The worker thread is never joined by the controller: `cancel` only
/// signals the token and the worker exits at its next wake.
pub struct StreamSession {
    request: LogRequest,
    token: CancelToken,
    state: Arc<Mutex<SessionState>>,
    handle: Option<JoinHandle<()>>,
}

impl StreamSession {
    /// Asks `tailable` to open the stream and spawns the worker on success.
    ///
    /// When the producer rejects the request the fresh token is cancelled
    /// once so anything the producer already registered gets torn down.
    pub fn start(
        tailable: &dyn Tailable,
        request: LogRequest,
        buffer: Arc<LineBuffer>,
        display: Arc<dyn LogDisplay>,
        policy: FlushPolicy,
    ) -> Result<Self, TailError> {
        let token = CancelToken::new();
        let (sink, lines) = bounded::<String>(SINK_CAPACITY);
        if let Err(err) = tailable.logs(&request, sink, &token) {
            token.cancel();
            return Err(err);
        }

        let state = Arc::new(Mutex::new(SessionState::Active));
        let handle = {
            let token = token.clone();
            let state = state.clone();
            let container = request.container.clone();
            thread::spawn(move || {
                let end = run_worker(lines, &token, &buffer, display.as_ref(), policy);
                let mut current = state.lock();
                if *current == SessionState::Active {
                    *current = end;
                }
                debug!(container = %container, state = ?*current, "log worker exited");
            })
        };
        debug!(
            namespace = %request.namespace,
            name = %request.name,
            container = %request.container,
            tail = request.tail_lines,
            "log session started"
        );

        Ok(Self {
            request,
            token,
            state,
            handle: Some(handle),
        })
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    pub fn cancel(&self) {
        if self.token.cancel() {
            debug!(container = %self.request.container, "log session cancelled");
        }
        let mut state = self.state.lock();
        if *state == SessionState::Active {
            *state = SessionState::Cancelled;
        }
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

fn run_worker(
    lines: Receiver<String>,
    token: &CancelToken,
    buffer: &LineBuffer,
    display: &dyn LogDisplay,
    policy: FlushPolicy,
) -> SessionState {
    let ticker = tick(policy.refresh_rate);
    let mut count = 0usize;
    let mut first = true;
    loop {
        select! {
            recv(lines) -> line => match line {
                Ok(line) => {
                    if !buffer.add_for(token, line) {
                        return SessionState::Cancelled;
                    }
                }
                Err(_) => {
                    if token.is_cancelled() {
                        return SessionState::Cancelled;
                    }
                    if !buffer.is_empty() {
                        buffer.add_for(token, NO_MORE_LOGS);
                        if let Some(snapshot) = buffer.snapshot_for(token) {
                            display.render(&snapshot);
                            display.scroll_to_end();
                        }
                    }
                    return SessionState::Completed;
                }
            },
            recv(ticker) -> _ => {
                if token.is_cancelled() {
                    return SessionState::Cancelled;
                }
                count += 1;
                if count >= policy.cleanse_every {
                    let removed = buffer.cleanse();
                    debug!(removed, "cleansing logs");
                    count = 0;
                }
                let Some(snapshot) = buffer.snapshot_for(token) else {
                    return SessionState::Cancelled;
                };
                if snapshot.is_empty() {
                    display.clear();
                    continue;
                }
                display.render(&snapshot);
                if first {
                    display.scroll_to_end();
                    first = false;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/session_tests.rs"]
mod tests;
