//! Live log tailing for the containers of a selected resource.
//!
//! A [`LogsView`] owns one [`LineBuffer`] shared with at most one
//! [`StreamSession`] worker. The worker appends lines as they arrive and
//! pushes a snapshot to the active page on a fixed cadence, so redraws stay
//! bounded however bursty the producer is.

pub mod actions;
pub mod buffer;
pub mod cancel;
pub mod contract;
pub mod error;
pub mod page;
pub mod session;
pub mod sources;
pub mod view;

pub use actions::{ActionDispatcher, Dispatch, Hint, KeyAction, LogAction, NumKeys};
pub use buffer::LineBuffer;
pub use cancel::CancelToken;
pub use contract::{
    namespaced, FlashLevel, LogDisplay, LogHost, LogRequest, LogSettings, Resource, Tailable,
};
pub use error::{LogsError, TailError};
pub use page::LogPage;
pub use session::{FlushPolicy, SessionState, StreamSession, MAX_CLEANSE, NO_MORE_LOGS, REFRESH_RATE};
pub use sources::SourceSet;
pub use view::{LogsView, NO_LOGS_PLACEHOLDER};
