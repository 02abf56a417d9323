use std::collections::HashMap;

/// An ordered collection of variables, indexed by name.
///
/// Entries keep the order in which their names were first seen; overwriting a value leaves the
/// entry where it is, and new names are appended at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.entries[i].value())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Insert `name`, or overwrite its value in place if it is already present.
    pub fn set(&mut self, name: &str, value: &str) {
        if let Some(i) = self.position(name) {
            value.clone_into(&mut self.entries[i].value);
        } else {
            self.index.insert(name.to_owned(), self.entries.len());
            self.entries.push(Entry::new(name.to_owned(), value.to_owned()));
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: String,
    value: String,
}

impl Entry {
    #[must_use]
    pub(crate) fn new(name: String, value: String) -> Self {
        Self { name, value }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}
