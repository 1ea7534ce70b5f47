use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogAction {
    Back,
    Clear,
    Top,
    Bottom,
    PageUp,
    PageDown,
}

/// A bound key. Entries without an action only label a hint; the numeric
/// source shortcuts are registered this way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAction {
    pub description: String,
    pub action: Option<LogAction>,
}

impl KeyAction {
    pub fn new(description: impl Into<String>, action: LogAction) -> Self {
        Self {
            description: description.into(),
            action: Some(action),
        }
    }

    pub fn label(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            action: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    pub key: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Action(LogAction),
    /// Switch to the source at this zero-based index.
    Switch(usize),
    PassThrough,
}

/// Digit keys available as source shortcuts, `1..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumKeys {
    max: u8,
}

impl NumKeys {
    pub const MAX: u8 = 9;

    pub fn new(max: u8) -> Self {
        Self {
            max: max.clamp(1, Self::MAX),
        }
    }

    pub fn max(self) -> usize {
        usize::from(self.max)
    }

    pub fn key(self, n: usize) -> Option<KeyCode> {
        if n == 0 || n > self.max() {
            return None;
        }
        char::from_digit(n as u32, 10).map(KeyCode::Char)
    }

    pub fn parse(self, c: char) -> Option<usize> {
        let n = c.to_digit(10)? as usize;
        (1..=self.max()).contains(&n).then_some(n)
    }
}

impl Default for NumKeys {
    fn default() -> Self {
        Self::new(Self::MAX)
    }
}

pub struct ActionDispatcher {
    actions: IndexMap<KeyCode, KeyAction>,
    num_keys: NumKeys,
    shortcuts: usize,
}

impl Default for ActionDispatcher {
    fn default() -> Self {
        Self::with_bindings(default_bindings(), NumKeys::default())
    }
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bindings<I>(bindings: I, num_keys: NumKeys) -> Self
    where
        I: IntoIterator<Item = (KeyCode, KeyAction)>,
    {
        Self {
            actions: bindings.into_iter().collect(),
            num_keys,
            shortcuts: 0,
        }
    }

    /// Rebuilds the digit shortcuts so `1..=n` label the current sources.
    ///
    /// Only label entries are replaced; a fixed action bound to a digit
    /// stays and keeps precedence over the switch.
    pub fn sync_sources<'a, I>(&mut self, names: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.actions.retain(|_, entry| entry.action.is_some());
        self.shortcuts = 0;
        for (idx, name) in names.into_iter().take(self.num_keys.max()).enumerate() {
            let Some(key) = self.num_keys.key(idx + 1) else {
                break;
            };
            if !self.actions.contains_key(&key) {
                self.actions.insert(key, KeyAction::label(name));
            }
            self.shortcuts = idx + 1;
        }
    }

    pub fn shortcut_count(&self) -> usize {
        self.shortcuts
    }

    #[cfg(test)]
    fn get(&self, key: &KeyCode) -> Option<&KeyAction> {
        self.actions.get(key)
    }

    pub fn dispatch(&self, key: &KeyEvent) -> Dispatch {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return Dispatch::PassThrough;
        }
        if let Some(action) = self.actions.get(&key.code).and_then(|entry| entry.action) {
            return Dispatch::Action(action);
        }
        let KeyCode::Char(c) = key.code else {
            return Dispatch::PassThrough;
        };
        let folded = KeyCode::Char(c.to_ascii_lowercase());
        if let Some(action) = self.actions.get(&folded).and_then(|entry| entry.action) {
            return Dispatch::Action(action);
        }
        match self.num_keys.parse(c) {
            Some(n) if n <= self.shortcuts => Dispatch::Switch(n - 1),
            _ => Dispatch::PassThrough,
        }
    }

    /// Key hints in binding order. Source shortcuts only show up when
    /// there is more than one source to pick from.
    pub fn hints(&self) -> Vec<Hint> {
        self.actions
            .iter()
            .filter(|(_, entry)| entry.action.is_some() || self.shortcuts > 1)
            .map(|(key, entry)| Hint {
                key: key_label(key),
                description: entry.description.clone(),
            })
            .collect()
    }
}

pub fn default_bindings() -> Vec<(KeyCode, KeyAction)> {
    vec![
        (KeyCode::Esc, KeyAction::new("Back", LogAction::Back)),
        (KeyCode::Char('c'), KeyAction::new("Clear", LogAction::Clear)),
        (KeyCode::Char('u'), KeyAction::new("Top", LogAction::Top)),
        (KeyCode::Char('d'), KeyAction::new("Bottom", LogAction::Bottom)),
        (KeyCode::Char('b'), KeyAction::new("PageUp", LogAction::PageUp)),
        (KeyCode::Char('f'), KeyAction::new("PageDown", LogAction::PageDown)),
    ]
}

fn key_label(key: &KeyCode) -> String {
    match key {
        KeyCode::Esc => "esc".to_owned(),
        KeyCode::Char(c) => c.to_string(),
        other => format!("{other:?}").to_lowercase(),
    }
}

#[cfg(test)]
#[path = "../tests/actions_tests.rs"]
mod tests;
