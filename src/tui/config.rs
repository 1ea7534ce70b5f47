use std::time::Duration;

pub(super) const INPUT_POLL_WAIT: Duration = Duration::from_millis(50);
pub(super) const FLASH_TTL: Duration = Duration::from_secs(3);
pub(super) const LIST_PAGE: &str = "resources";
