use super::{FlushPolicy, SessionState, StreamSession, NO_MORE_LOGS};
use crate::logs::{LineBuffer, LogDisplay, LogRequest, TailError};
use crate::testing::{wait_until, RecordingDisplay, Script, ScriptedResource};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

fn fast_policy() -> FlushPolicy {
    FlushPolicy {
        refresh_rate: Duration::from_millis(10),
        cleanse_every: 100,
    }
}

fn request(container: &str, tail_lines: usize) -> LogRequest {
    LogRequest {
        namespace: "default".to_owned(),
        name: "api-0".to_owned(),
        container: container.to_owned(),
        tail_lines,
        previous: false,
    }
}

fn start(
    resource: &ScriptedResource,
    container: &str,
    buffer: &Arc<LineBuffer>,
    display: &Arc<RecordingDisplay>,
    policy: FlushPolicy,
) -> Result<StreamSession, TailError> {
    let display: Arc<dyn LogDisplay> = display.clone();
    StreamSession::start(
        resource,
        request(container, buffer.capacity()),
        buffer.clone(),
        display,
        policy,
    )
}

#[test]
fn closed_stream_appends_one_sentinel_subject_to_eviction() {
    let resource =
        ScriptedResource::new().with_container("api", Script::finite(&["a", "b", "c", "d", "e", "f"]));
    let buffer = Arc::new(LineBuffer::new(5));
    let display = Arc::new(RecordingDisplay::new());

    let session = start(&resource, "api", &buffer, &display, fast_policy()).expect("start");
    assert!(wait_until(WAIT, || session.state() == SessionState::Completed));
    assert!(wait_until(WAIT, || session.is_finished()));

    let expected = vec!["c", "d", "e", "f", NO_MORE_LOGS];
    assert_eq!(buffer.snapshot(), expected);
    assert_eq!(display.last_render(), Some(expected.iter().map(|s| s.to_string()).collect()));
    assert!(display.log().ends >= 1);

    thread::sleep(Duration::from_millis(50));
    assert_eq!(buffer.snapshot(), expected);
}

#[test]
fn empty_stream_completes_without_sentinel() {
    let resource = ScriptedResource::new().with_container("api", Script::finite(&[]));
    let buffer = Arc::new(LineBuffer::new(5));
    let display = Arc::new(RecordingDisplay::new());

    let session = start(&resource, "api", &buffer, &display, fast_policy()).expect("start");
    assert!(wait_until(WAIT, || session.state() == SessionState::Completed));
    assert!(buffer.is_empty());
    assert!(display.log().renders.is_empty());
}

#[test]
fn ticks_flush_snapshots_and_scroll_to_end_once() {
    let resource = ScriptedResource::new().with_container("api", Script::follow(&["a", "b"]));
    let buffer = Arc::new(LineBuffer::new(10));
    let display = Arc::new(RecordingDisplay::new());

    let session = start(&resource, "api", &buffer, &display, fast_policy()).expect("start");
    assert!(wait_until(WAIT, || {
        display
            .log()
            .renders
            .iter()
            .filter(|render| render.len() == 2)
            .count()
            >= 3
    }));
    let log = display.log();
    assert_eq!(log.ends, 1);
    assert!(log.renders.iter().all(|render| !render.is_empty()));
    assert_eq!(session.state(), SessionState::Active);

    session.cancel();
    assert_eq!(session.state(), SessionState::Cancelled);
    assert!(wait_until(WAIT, || session.is_finished()));
}

#[test]
fn empty_buffer_tick_clears_display_instead_of_rendering() {
    let resource = ScriptedResource::new().with_container("api", Script::follow(&[]));
    let buffer = Arc::new(LineBuffer::new(10));
    let display = Arc::new(RecordingDisplay::new());

    let session = start(&resource, "api", &buffer, &display, fast_policy()).expect("start");
    assert!(wait_until(WAIT, || display.log().clears >= 2));
    assert!(display.log().renders.is_empty());
    session.cancel();
}

#[test]
fn rejected_open_cancels_the_fresh_token() {
    let resource = ScriptedResource::new().with_container("api", Script::Reject("denied".to_owned()));
    let buffer = Arc::new(LineBuffer::new(10));
    let display = Arc::new(RecordingDisplay::new());

    let err = start(&resource, "api", &buffer, &display, fast_policy())
        .err()
        .expect("start should fail");
    assert!(matches!(err, TailError::Rejected { ref details } if details == "denied"));
    let tokens = resource.tokens();
    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].is_cancelled());
    assert_eq!(resource.teardowns(), 1);
}

#[test]
fn cancelled_worker_leaves_reset_buffer_alone() {
    let resource = ScriptedResource::new().with_container("api", Script::follow(&["a", "b"]));
    let buffer = Arc::new(LineBuffer::new(10));
    let display = Arc::new(RecordingDisplay::new());

    let session = start(&resource, "api", &buffer, &display, fast_policy()).expect("start");
    assert!(wait_until(WAIT, || buffer.length() == 2));
    session.cancel();
    buffer.clear();
    assert!(wait_until(WAIT, || session.is_finished()));
    let renders_after_exit = display.log().renders.len();

    thread::sleep(Duration::from_millis(50));
    assert!(buffer.is_empty());
    assert_eq!(display.log().renders.len(), renders_after_exit);
    assert_eq!(session.state(), SessionState::Cancelled);

    session.cancel();
    assert_eq!(session.state(), SessionState::Cancelled);
    assert_eq!(resource.teardowns(), 1);
}

#[test]
fn cleanse_runs_on_tick_cadence() {
    let resource =
        ScriptedResource::new().with_container("api", Script::follow(&["x", "", "x", "y"]));
    let buffer = Arc::new(LineBuffer::new(10));
    let display = Arc::new(RecordingDisplay::new());
    let policy = FlushPolicy {
        refresh_rate: Duration::from_millis(10),
        cleanse_every: 2,
    };

    let session = start(&resource, "api", &buffer, &display, policy).expect("start");
    assert!(wait_until(WAIT, || buffer.snapshot() == vec!["x", "y"]));
    session.cancel();
}

#[test]
fn dropping_a_session_cancels_it() {
    let resource = ScriptedResource::new().with_container("api", Script::follow(&["a"]));
    let buffer = Arc::new(LineBuffer::new(10));
    let display = Arc::new(RecordingDisplay::new());

    let session = start(&resource, "api", &buffer, &display, fast_policy()).expect("start");
    drop(session);
    assert!(resource.tokens()[0].is_cancelled());
}
