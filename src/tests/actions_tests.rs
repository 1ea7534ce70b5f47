use super::{default_bindings, ActionDispatcher, Dispatch, KeyAction, LogAction, NumKeys};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn dispatcher_with(sources: &[&str]) -> ActionDispatcher {
    let mut dispatcher = ActionDispatcher::new();
    dispatcher.sync_sources(sources.iter().copied());
    dispatcher
}

#[test]
fn fixed_actions_resolve_first() {
    let dispatcher = dispatcher_with(&["api"]);
    assert_eq!(
        dispatcher.dispatch(&key(KeyCode::Esc)),
        Dispatch::Action(LogAction::Back)
    );
    assert_eq!(
        dispatcher.dispatch(&key(KeyCode::Char('c'))),
        Dispatch::Action(LogAction::Clear)
    );
    assert_eq!(
        dispatcher.dispatch(&key(KeyCode::Char('b'))),
        Dispatch::Action(LogAction::PageUp)
    );
    assert_eq!(
        dispatcher.dispatch(&key(KeyCode::Char('f'))),
        Dispatch::Action(LogAction::PageDown)
    );
}

#[test]
fn character_codes_match_case_insensitively() {
    let dispatcher = dispatcher_with(&[]);
    let shifted = KeyEvent::new(KeyCode::Char('U'), KeyModifiers::SHIFT);
    assert_eq!(dispatcher.dispatch(&shifted), Dispatch::Action(LogAction::Top));
}

#[test]
fn control_chords_pass_through() {
    let dispatcher = dispatcher_with(&["api", "sidecar"]);
    let chord = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert_eq!(dispatcher.dispatch(&chord), Dispatch::PassThrough);
}

#[test]
fn digits_map_to_zero_based_source_indexes() {
    let dispatcher = dispatcher_with(&["api", "sidecar", "proxy"]);
    assert_eq!(dispatcher.shortcut_count(), 3);
    assert_eq!(dispatcher.dispatch(&key(KeyCode::Char('1'))), Dispatch::Switch(0));
    assert_eq!(dispatcher.dispatch(&key(KeyCode::Char('2'))), Dispatch::Switch(1));
    assert_eq!(dispatcher.dispatch(&key(KeyCode::Char('3'))), Dispatch::Switch(2));
    assert_eq!(
        dispatcher.dispatch(&key(KeyCode::Char('4'))),
        Dispatch::PassThrough
    );
    assert_eq!(
        dispatcher.dispatch(&key(KeyCode::Char('0'))),
        Dispatch::PassThrough
    );
}

#[test]
fn digit_shortcuts_are_label_only_entries() {
    let dispatcher = dispatcher_with(&["api", "sidecar"]);
    assert_eq!(
        dispatcher.get(&KeyCode::Char('2')),
        Some(&KeyAction::label("sidecar"))
    );
}

#[test]
fn sync_sources_rebuilds_shortcuts() {
    let mut dispatcher = dispatcher_with(&["api", "sidecar", "proxy"]);
    dispatcher.sync_sources(["api"]);
    assert_eq!(dispatcher.shortcut_count(), 1);
    assert!(dispatcher.get(&KeyCode::Char('2')).is_none());
    assert_eq!(
        dispatcher.dispatch(&key(KeyCode::Char('2'))),
        Dispatch::PassThrough
    );

    dispatcher.sync_sources(std::iter::empty());
    assert_eq!(dispatcher.shortcut_count(), 0);
    assert_eq!(
        dispatcher.dispatch(&key(KeyCode::Char('1'))),
        Dispatch::PassThrough
    );
}

#[test]
fn shortcuts_are_bounded_by_num_keys() {
    let names = (0..12).map(|n| format!("c{n}")).collect::<Vec<String>>();
    let mut dispatcher = ActionDispatcher::new();
    dispatcher.sync_sources(names.iter().map(String::as_str));
    assert_eq!(dispatcher.shortcut_count(), 9);
    assert_eq!(dispatcher.dispatch(&key(KeyCode::Char('9'))), Dispatch::Switch(8));

    let narrow = NumKeys::new(2);
    assert_eq!(narrow.parse('2'), Some(2));
    assert_eq!(narrow.parse('3'), None);
    assert_eq!(narrow.key(3), None);
    assert_eq!(NumKeys::new(0).max(), 1);
}

#[test]
fn unbound_keys_pass_through() {
    let dispatcher = dispatcher_with(&["api"]);
    assert_eq!(dispatcher.dispatch(&key(KeyCode::Up)), Dispatch::PassThrough);
    assert_eq!(
        dispatcher.dispatch(&key(KeyCode::Char('z'))),
        Dispatch::PassThrough
    );
}

#[test]
fn hints_list_sources_only_when_there_is_a_choice() {
    let single = dispatcher_with(&["api"]);
    let keys = single
        .hints()
        .into_iter()
        .map(|hint| hint.key)
        .collect::<Vec<String>>();
    assert_eq!(keys, vec!["esc", "c", "u", "d", "b", "f"]);

    let multi = dispatcher_with(&["api", "sidecar"]);
    let hints = multi.hints();
    assert_eq!(hints.len(), 8);
    assert_eq!(hints[6].key, "1");
    assert_eq!(hints[6].description, "api");
    assert_eq!(hints[7].description, "sidecar");
}

#[test]
fn fixed_digit_binding_survives_shortcut_rebuilds() {
    let mut bindings = default_bindings();
    bindings.push((KeyCode::Char('1'), KeyAction::new("Top", LogAction::Top)));
    let mut dispatcher = ActionDispatcher::with_bindings(bindings, NumKeys::default());

    dispatcher.sync_sources(["api", "sidecar"]);
    dispatcher.sync_sources(["api", "sidecar", "proxy"]);
    assert_eq!(dispatcher.shortcut_count(), 3);
    assert_eq!(
        dispatcher.dispatch(&key(KeyCode::Char('1'))),
        Dispatch::Action(LogAction::Top)
    );
    assert_eq!(dispatcher.dispatch(&key(KeyCode::Char('2'))), Dispatch::Switch(1));

    dispatcher.sync_sources(std::iter::empty());
    assert_eq!(
        dispatcher.get(&KeyCode::Char('1')),
        Some(&KeyAction::new("Top", LogAction::Top))
    );
    let ones = dispatcher
        .hints()
        .into_iter()
        .filter(|hint| hint.key == "1")
        .count();
    assert_eq!(ones, 1);
}
