use std::collections::VecDeque;

use parking_lot::Mutex;

use super::cancel::CancelToken;

/// Bounded, ordered holder of the most recent log lines.
///
/// The buffer is shared between a session worker (appends) and the
/// controller (resets on switch/clear), so every access goes through the
/// internal lock.
#[derive(Debug)]
pub struct LineBuffer {
    inner: Mutex<BufferState>,
}

#[derive(Debug)]
struct BufferState {
    lines: VecDeque<String>,
    capacity: usize,
}

impl BufferState {
    fn push(&mut self, line: String) {
        while self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }
}

impl LineBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(BufferState {
                lines: VecDeque::with_capacity(capacity.min(4096)),
                capacity,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity
    }

    pub fn add(&self, line: impl Into<String>) {
        self.inner.lock().push(line.into());
    }

    /// Appends `line` unless `token` has been cancelled.
    ///
    /// The check happens under the buffer lock: once the controller has
    /// cancelled a session and then reset the buffer, the superseded
    /// worker can no longer slip a stale line in.
    pub fn add_for(&self, token: &CancelToken, line: impl Into<String>) -> bool {
        let mut state = self.inner.lock();
        if token.is_cancelled() {
            return false;
        }
        state.push(line.into());
        true
    }

    pub fn clear(&self) {
        self.inner.lock().lines.clear();
    }

    /// Clears the buffer and adopts a new capacity.
    pub fn reset(&self, capacity: usize) {
        let mut state = self.inner.lock();
        state.lines.clear();
        state.capacity = capacity.max(1);
    }

    /// Drops blank lines and collapses runs of identical consecutive lines.
    ///
    /// Returns the number of lines removed.
    pub fn cleanse(&self) -> usize {
        let mut state = self.inner.lock();
        let before = state.lines.len();
        let mut kept: VecDeque<String> = VecDeque::with_capacity(before);
        for line in state.lines.drain(..) {
            if line.trim().is_empty() {
                continue;
            }
            if kept.back().is_some_and(|last| *last == line) {
                continue;
            }
            kept.push_back(line);
        }
        state.lines = kept;
        before - state.lines.len()
    }

    pub fn length(&self) -> usize {
        self.inner.lock().lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().lines.is_empty()
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.inner.lock().lines.iter().cloned().collect()
    }

    /// Snapshot taken only while `token` is still live.
    pub fn snapshot_for(&self, token: &CancelToken) -> Option<Vec<String>> {
        let state = self.inner.lock();
        if token.is_cancelled() {
            return None;
        }
        Some(state.lines.iter().cloned().collect())
    }
}
