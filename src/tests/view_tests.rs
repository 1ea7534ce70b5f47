use super::{LogsView, NO_LOGS_PLACEHOLDER};
use crate::logs::{
    FlashLevel, FlushPolicy, LogRequest, LogsError, SessionState, NO_MORE_LOGS,
};
use crate::testing::{
    wait_until, FakeHost, FixedSettings, PlainResource, RecordingDisplay, Script,
    ScriptedResource,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

fn view_for(
    resource: Arc<ScriptedResource>,
    containers: &[&str],
    capacity: usize,
) -> (LogsView<RecordingDisplay>, Arc<FakeHost>) {
    let host = Arc::new(FakeHost::new("default/api-0", resource));
    let mut view = LogsView::new(host.clone(), Arc::new(FixedSettings(capacity)))
        .with_flush_policy(FlushPolicy {
            refresh_rate: Duration::from_millis(10),
            cleanse_every: 100,
        });
    for name in containers {
        view.add_container(*name, RecordingDisplay::new());
    }
    (view, host)
}

fn page(view: &LogsView<RecordingDisplay>, name: &str) -> Arc<RecordingDisplay> {
    view.sources().page(name).cloned().expect("page")
}

#[test]
fn init_attaches_to_first_source() {
    let resource = Arc::new(
        ScriptedResource::new()
            .with_container("api", Script::follow(&["a", "b"]))
            .with_container("sidecar", Script::follow(&["x"])),
    );
    let (mut view, _host) = view_for(resource.clone(), &["api", "sidecar"], 5);

    view.init().expect("init");
    assert_eq!(
        resource.requests(),
        vec![LogRequest {
            namespace: "default".to_owned(),
            name: "api-0".to_owned(),
            container: "api".to_owned(),
            tail_lines: 5,
            previous: false,
        }]
    );
    assert_eq!(view.session_state(), SessionState::Active);
    let api = page(&view, "api");
    assert!(wait_until(WAIT, || api.last_render() == Some(vec!["a".to_owned(), "b".to_owned()])));
    view.stop();
}

#[test]
fn digit_key_replaces_the_session_without_mixing_sources() {
    let resource = Arc::new(
        ScriptedResource::new()
            .with_container("api", Script::follow(&["a", "b"]))
            .with_container("sidecar", Script::follow(&["x"]))
            .with_container("proxy", Script::follow(&["p"])),
    );
    let (mut view, _host) = view_for(resource.clone(), &["api", "sidecar", "proxy"], 10);
    view.init().expect("init");
    assert!(wait_until(WAIT, || view.buffer().length() == 2));

    assert!(view.keyboard(key('2')).is_none());
    let tokens = resource.tokens();
    assert_eq!(tokens.len(), 2);
    assert!(tokens[0].is_cancelled());
    assert!(!tokens[1].is_cancelled());
    assert_eq!(resource.requests()[1].container, "sidecar");
    assert_eq!(view.active_index(), 1);

    let sidecar = page(&view, "sidecar");
    assert!(wait_until(WAIT, || sidecar.last_render() == Some(vec!["x".to_owned()])));
    assert_eq!(view.buffer().snapshot(), vec!["x"]);
    view.stop();
    assert!(resource.tokens()[1].is_cancelled());
}

#[test]
fn out_of_range_switch_changes_nothing() {
    let resource = Arc::new(ScriptedResource::new().with_container("api", Script::follow(&["a"])));
    let (mut view, host) = view_for(resource.clone(), &["api", "sidecar"], 10);
    view.init().expect("init");
    assert!(wait_until(WAIT, || view.buffer().length() == 1));
    let renders = page(&view, "sidecar").log();

    view.switch_to(2).expect("no-op");
    view.switch_to(usize::MAX).expect("no-op");
    assert_eq!(view.active_index(), 0);
    assert_eq!(resource.requests().len(), 1);
    assert_eq!(view.buffer().snapshot(), vec!["a"]);
    assert_eq!(page(&view, "sidecar").log(), renders);
    assert!(host.flashes().is_empty());
    assert!(!resource.tokens()[0].is_cancelled());

    assert_eq!(view.keyboard(key('3')), Some(key('3')));
    assert_eq!(view.active_index(), 0);
    view.stop();
}

#[test]
fn missing_capability_flashes_and_shows_placeholder() {
    let host = Arc::new(FakeHost::new("default/settings", Arc::new(PlainResource::new("configmap"))));
    let mut view: LogsView<RecordingDisplay> =
        LogsView::new(host.clone(), Arc::new(FixedSettings(10)));
    view.add_container("main", RecordingDisplay::new());

    let err = view.init().err().expect("not tailable");
    assert!(matches!(err, LogsError::NotTailable { ref kind } if kind == "configmap"));
    assert_eq!(
        host.flashes(),
        vec![(FlashLevel::Error, "Resource configmap is not tailable".to_owned())]
    );
    assert_eq!(view.session_state(), SessionState::Idle);
    assert_eq!(view.buffer().snapshot(), vec![NO_LOGS_PLACEHOLDER]);
    assert_eq!(
        page(&view, "main").last_render(),
        Some(vec![NO_LOGS_PLACEHOLDER.to_owned()])
    );
}

#[test]
fn rejected_stream_releases_token_and_reports() {
    let resource = Arc::new(
        ScriptedResource::new().with_container("api", Script::Reject("no such pod".to_owned())),
    );
    let (mut view, host) = view_for(resource.clone(), &["api"], 10);

    let err = view.init().err().expect("rejected");
    assert!(matches!(err, LogsError::Start { .. }));
    assert!(resource.tokens()[0].is_cancelled());
    assert_eq!(resource.teardowns(), 1);
    assert_eq!(view.session_state(), SessionState::Idle);
    let flashes = host.flashes();
    assert_eq!(flashes.len(), 1);
    assert_eq!(flashes[0].0, FlashLevel::Error);
    assert!(flashes[0].1.contains("no such pod"));
    assert_eq!(
        page(&view, "api").last_render(),
        Some(vec![NO_LOGS_PLACEHOLDER.to_owned()])
    );
}

#[test]
fn finished_stream_ends_with_sentinel_on_the_page() {
    let resource = Arc::new(
        ScriptedResource::new()
            .with_container("api", Script::finite(&["a", "b", "c", "d", "e", "f"])),
    );
    let (mut view, _host) = view_for(resource, &["api"], 5);
    view.init().expect("init");

    assert!(wait_until(WAIT, || view.session_state() == SessionState::Completed));
    let expected = vec!["c", "d", "e", "f", NO_MORE_LOGS];
    assert_eq!(view.buffer().snapshot(), expected);
    assert_eq!(
        page(&view, "api").last_render(),
        Some(expected.iter().map(|line| line.to_string()).collect())
    );
}

#[test]
fn repeated_stop_is_harmless() {
    let resource = Arc::new(ScriptedResource::new().with_container("api", Script::follow(&[])));
    let (mut view, host) = view_for(resource.clone(), &["api"], 10);
    view.stop();
    view.stop();
    assert_eq!(view.session_state(), SessionState::Idle);

    view.init().expect("init");
    view.stop();
    view.stop();
    assert!(resource.tokens()[0].is_cancelled());
    assert_eq!(resource.teardowns(), 1);
    assert!(host.flashes().is_empty());
}

#[test]
fn back_stops_streaming_and_returns_to_list() {
    let resource = Arc::new(ScriptedResource::new().with_container("api", Script::follow(&["a"])));
    let (mut view, host) = view_for(resource.clone(), &["api"], 10);
    view.init().expect("init");

    let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
    assert!(view.keyboard(esc).is_none());
    assert!(resource.tokens()[0].is_cancelled());
    assert_eq!(host.switched_pages(), vec!["pods".to_owned()]);
    assert_eq!(view.session_state(), SessionState::Idle);
}

#[test]
fn navigation_keys_drive_the_active_page() {
    let resource = Arc::new(ScriptedResource::new().with_container("api", Script::follow(&["a"])));
    let (mut view, host) = view_for(resource, &["api"], 10);
    view.init().expect("init");
    assert!(wait_until(WAIT, || view.buffer().length() == 1));

    for c in ['u', 'd', 'b', 'f', 'c'] {
        assert!(view.keyboard(key(c)).is_none());
    }
    let log = page(&view, "api").log();
    assert_eq!(log.tops, 1);
    assert!(log.ends >= 1);
    assert_eq!(log.page_ups, 1);
    assert_eq!(log.page_downs, 1);
    assert!(log.clears >= 1);
    assert!(view.buffer().is_empty());
    assert_eq!(
        host.flashes()
            .into_iter()
            .map(|(_, message)| message)
            .collect::<Vec<String>>(),
        vec![
            "Top logs...",
            "Bottom logs...",
            "Page Up logs...",
            "Page Down logs...",
            "Clearing logs...",
        ]
    );
    view.stop();
}

#[test]
fn unhandled_keys_are_passed_back() {
    let resource = Arc::new(ScriptedResource::new());
    let (mut view, _host) = view_for(resource, &["api"], 10);
    let up = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
    assert_eq!(view.keyboard(up), Some(up));
}

#[test]
fn deleting_pages_drops_shortcuts_and_session() {
    let resource = Arc::new(
        ScriptedResource::new()
            .with_container("api", Script::follow(&["a"]))
            .with_container("sidecar", Script::follow(&["x"])),
    );
    let (mut view, _host) = view_for(resource.clone(), &["api", "sidecar"], 10);
    view.init().expect("init");
    assert_eq!(view.hints().len(), 8);

    view.delete_all_pages();
    assert!(resource.tokens()[0].is_cancelled());
    assert!(view.sources().is_empty());
    assert_eq!(view.hints().len(), 6);
    assert_eq!(view.keyboard(key('1')), Some(key('1')));
    assert_eq!(resource.requests().len(), 1);

    view.add_container("proxy", RecordingDisplay::new());
    assert_eq!(view.sources().active_name(), Some("proxy"));
}
