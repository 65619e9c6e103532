// Reference-link table: case-insensitive label -> (URI, optional title).
//
// Labels are normalized per §3: Unicode case-fold, then collapse runs of
// whitespace to a single space, then trim. `unicase::UniCase` supplies the
// case-fold comparison/hash; we do the whitespace collapse ourselves before
// handing the result to `UniCase`.

use crate::lexical::collapse_whitespace;
use std::collections::HashMap;
use unicase::UniCase;
use url::Url;

pub fn normalize_label(label: &str) -> UniCase<String> {
    UniCase::unicode(collapse_whitespace(label))
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    entries: HashMap<UniCase<String>, (Url, Option<String>)>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a definition. Returns `false` (without replacing the existing
    /// entry) if `label` is already defined — per §4.2, "the first
    /// definition wins" and the caller is responsible for raising
    /// `DuplicateReferenceDefinition` at the second occurrence.
    pub fn insert(&mut self, label: &str, dest: Url, title: Option<String>) -> bool {
        let key = normalize_label(label);
        if self.entries.contains_key(&key) {
            false
        } else {
            self.entries.insert(key, (dest, title));
            true
        }
    }

    pub fn get(&self, label: &str) -> Option<&(Url, Option<String>)> {
        self.entries.get(&normalize_label(label))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(&normalize_label(label))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The 3 defined labels closest to `label` by edit distance, for a
    /// `CouldNotFindReferenceDefinition` diagnostic.
    pub fn nearest_labels(&self, label: &str, count: usize) -> Vec<String> {
        let normalized = collapse_whitespace(label).to_lowercase();
        let mut scored: Vec<(usize, String)> = self
            .entries
            .keys()
            .map(|k| {
                let original = k.as_ref().to_string();
                let distance = strsim::levenshtein(&normalized, &original.to_lowercase());
                (distance, original)
            })
            .collect();
        scored.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        scored.into_iter().take(count).map(|(_, name)| name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_case_folds_and_collapses_whitespace() {
        let mut table = ReferenceTable::new();
        table.insert("Foo   Bar", Url::parse("https://example.com").unwrap(), None);
        assert!(table.get("foo bar").is_some());
        assert!(table.get("  FOO   BAR  ").is_some());
    }

    #[test]
    fn first_definition_wins_on_duplicate_insert() {
        let mut table = ReferenceTable::new();
        let first = Url::parse("https://first.example").unwrap();
        let second = Url::parse("https://second.example").unwrap();
        assert!(table.insert("dup", first.clone(), None));
        assert!(!table.insert("dup", second, None));
        assert_eq!(table.get("dup").unwrap().0, first);
    }

    #[test]
    fn nearest_labels_orders_by_edit_distance() {
        let mut table = ReferenceTable::new();
        for label in ["foo", "bar", "foot", "baz"] {
            table.insert(label, Url::parse("https://example.com").unwrap(), None);
        }
        let nearest = table.nearest_labels("fo", 2);
        assert_eq!(nearest.len(), 2);
        assert!(nearest.contains(&"foo".to_string()));
    }
}
