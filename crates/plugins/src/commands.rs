use serde::{Serialize, Serializer, ser::SerializeMap};

/// Insertion-ordered `pattern -> description` table.
///
/// Patterns are opaque strings. Matching is a case-insensitive substring
/// test against the literal pattern text; no pattern syntax is interpreted,
/// so a pattern like `tell (me )?joke` only matches input that contains
/// those exact characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandTable {
    entries: Vec<(String, String)>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. An overwritten pattern keeps its original slot
    /// and the previous description is returned.
    pub fn insert(
        &mut self,
        pattern: impl Into<String>,
        description: impl Into<String>,
    ) -> Option<String> {
        let pattern = pattern.into();
        let description = description.into();
        if let Some((_, slot)) = self.entries.iter_mut().find(|(p, _)| *p == pattern) {
            return Some(std::mem::replace(slot, description));
        }
        self.entries.push((pattern, description));
        None
    }

    pub fn get(&self, pattern: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == pattern)
            .map(|(_, d)| d.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, d)| (p.as_str(), d.as_str()))
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(p, _)| p.as_str())
    }

    /// True when any registered pattern, case-folded, occurs inside the
    /// case-folded command.
    pub fn matches(&self, command: &str) -> bool {
        let command = command.to_lowercase();
        self.patterns()
            .any(|pattern| command.contains(&pattern.to_lowercase()))
    }
}

impl Serialize for CommandTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (pattern, description) in &self.entries {
            map.serialize_entry(pattern, description)?;
        }
        map.end()
    }
}
