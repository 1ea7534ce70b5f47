use std::sync::Arc;

use indexmap::IndexMap;

/// Ordered registry of a resource's log sources and their pages.
///
/// Pages outlive activation: a page keeps its last snapshot while another
/// source is active, but only the active source is fed by a worker.
pub struct SourceSet<P> {
    pages: IndexMap<String, Arc<P>>,
    active: usize,
}

impl<P> Default for SourceSet<P> {
    fn default() -> Self {
        Self {
            pages: IndexMap::new(),
            active: 0,
        }
    }
}

impl<P> SourceSet<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a source. Re-adding a known name replaces its page in place.
    pub fn add_source(&mut self, name: impl Into<String>, page: P) {
        self.pages.insert(name.into(), Arc::new(page));
    }

    pub fn remove_all(&mut self) {
        self.pages.clear();
        self.active = 0;
    }

    /// Makes `index` active. Out-of-range indexes are ignored.
    pub fn switch_to(&mut self, index: usize) -> Option<&Arc<P>> {
        if index >= self.pages.len() {
            return None;
        }
        self.active = index;
        self.pages.get_index(index).map(|(_, page)| page)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_name(&self) -> Option<&str> {
        self.pages
            .get_index(self.active)
            .map(|(name, _)| name.as_str())
    }

    pub fn active_page(&self) -> Option<&Arc<P>> {
        self.pages.get_index(self.active).map(|(_, page)| page)
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.pages.get_index(index).map(|(name, _)| name.as_str())
    }

    pub fn page(&self, name: &str) -> Option<&Arc<P>> {
        self.pages.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }
}
