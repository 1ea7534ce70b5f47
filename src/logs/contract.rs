//! Collaborators the logs view drives but does not own.

use std::sync::Arc;

use crossbeam_channel::Sender;

use super::cancel::CancelToken;
use super::error::TailError;

/// Identity and size of one requested log stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRequest {
    pub namespace: String,
    pub name: String,
    pub container: String,
    pub tail_lines: usize,
    pub previous: bool,
}

/// A producer able to stream decoded log lines for a container.
///
/// `logs` must return promptly. On success the producer pushes lines into
/// `sink` from its own threads and closes the stream by dropping every
/// sender. Teardown belongs in [`CancelToken::on_cancel`]; honoring the
/// token must close the sink.
pub trait Tailable: Send + Sync {
    fn logs(
        &self,
        request: &LogRequest,
        sink: Sender<String>,
        cancel: &CancelToken,
    ) -> Result<(), TailError>;
}

/// The resource currently being inspected.
pub trait Resource: Send + Sync {
    fn kind(&self) -> &str;

    /// Capability check; resources that cannot stream logs return `None`.
    fn tailable(&self) -> Option<&dyn Tailable> {
        None
    }
}

/// Display page fed with whole-buffer snapshots.
pub trait LogDisplay: Send + Sync {
    fn render(&self, lines: &[String]);
    fn clear(&self);
    fn scroll_to_beginning(&self);
    fn scroll_to_end(&self);
    fn page_up(&self);
    fn page_down(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Info,
    Warn,
    Error,
}

/// The view hosting the logs pages: selection, navigation and flash messages.
pub trait LogHost {
    /// `namespace/name` of the selected resource.
    fn selection(&self) -> String;
    fn resource(&self) -> Arc<dyn Resource>;
    /// Page to return to when leaving the logs view.
    fn list_name(&self) -> String;
    fn switch_page(&self, name: &str);
    fn flash(&self, level: FlashLevel, message: &str);
}

pub trait LogSettings {
    fn log_buffer_size(&self) -> usize;
}

/// Splits a `namespace/name` selection. A bare name has no namespace.
pub fn namespaced(path: &str) -> (&str, &str) {
    match path.split_once('/') {
        Some((namespace, name)) => (namespace, name),
        None => ("", path),
    }
}

#[cfg(test)]
mod tests {
    use super::namespaced;

    #[test]
    fn namespaced_splits_on_first_slash() {
        assert_eq!(namespaced("kube-system/dns-1"), ("kube-system", "dns-1"));
        assert_eq!(namespaced("dns-1"), ("", "dns-1"));
        assert_eq!(namespaced("a/b/c"), ("a", "b/c"));
    }
}
