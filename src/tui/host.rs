use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use crate::logs::{FlashLevel, LogHost, Resource};

use super::config::{FLASH_TTL, LIST_PAGE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Flash {
    pub(super) level: FlashLevel,
    pub(super) message: String,
    pub(super) at: Instant,
}

/// Host side of the log view: the selected resource plus the status line
/// and navigation requests the view raises.
pub(super) struct TuiHost {
    selection: String,
    resource: Arc<dyn Resource>,
    state: Mutex<HostState>,
}

#[derive(Default)]
struct HostState {
    flash: Option<Flash>,
    switched_to: Option<String>,
}

impl TuiHost {
    pub(super) fn new(selection: impl Into<String>, resource: Arc<dyn Resource>) -> Self {
        Self {
            selection: selection.into(),
            resource,
            state: Mutex::new(HostState::default()),
        }
    }

    /// Latest flash, while it is still fresh.
    pub(super) fn current_flash(&self, now: Instant) -> Option<Flash> {
        self.state
            .lock()
            .flash
            .clone()
            .filter(|flash| now.saturating_duration_since(flash.at) < FLASH_TTL)
    }

    pub(super) fn switched_to(&self) -> Option<String> {
        self.state.lock().switched_to.clone()
    }
}

impl LogHost for TuiHost {
    fn selection(&self) -> String {
        self.selection.clone()
    }

    fn resource(&self) -> Arc<dyn Resource> {
        self.resource.clone()
    }

    fn list_name(&self) -> String {
        LIST_PAGE.to_owned()
    }

    fn switch_page(&self, name: &str) {
        self.state.lock().switched_to = Some(name.to_owned());
    }

    fn flash(&self, level: FlashLevel, message: &str) {
        self.state.lock().flash = Some(Flash {
            level,
            message: message.to_owned(),
            at: Instant::now(),
        });
    }
}
