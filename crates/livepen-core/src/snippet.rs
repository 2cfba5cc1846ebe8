//! Named snippets
//!
//! All snippets are kept as one ordered JSON array under [`SNIPPETS_KEY`].
//! Names are unique: saving under an existing name either overwrites the
//! entry in place or is rejected, depending on the caller's [`OnConflict`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fragment::SourceBundle;
use crate::storage::KeyValueStore;

/// Storage key holding the snippet list
pub const SNIPPETS_KEY: &str = "codeSnippets";

/// A named, saved set of sources
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub name: String,
    #[serde(flatten)]
    pub sources: SourceBundle,
    #[serde(rename = "timestamp")]
    pub saved_at: DateTime<Utc>,
}

/// What to do when a snippet name is already taken
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnConflict {
    Overwrite,
    Reject,
}

/// Result of a successful save
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Overwritten,
}

/// Snippet list backed by a key-value store
#[derive(Debug, Clone)]
pub struct SnippetLibrary<S> {
    store: S,
}

impl<S: KeyValueStore> SnippetLibrary<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All snippets in save order
    ///
    /// A missing key is an empty library; unparsable data is an error.
    pub fn list(&self) -> Result<Vec<Snippet>> {
        match self.store.get(SNIPPETS_KEY)? {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|source| Error::Corrupt {
                key: SNIPPETS_KEY,
                source,
            }),
        }
    }

    pub fn contains(&self, name: &str) -> Result<bool> {
        let name = name.trim();
        Ok(self.list()?.iter().any(|s| s.name == name))
    }

    pub fn get(&self, name: &str) -> Result<Option<Snippet>> {
        let name = name.trim();
        Ok(self.list()?.into_iter().find(|s| s.name == name))
    }

    /// Save `sources` under `name`
    ///
    /// With [`OnConflict::Overwrite`] the first entry with that name is
    /// replaced in place and any further duplicates are dropped.
    pub fn save(
        &self,
        name: &str,
        sources: SourceBundle,
        saved_at: DateTime<Utc>,
        on_conflict: OnConflict,
    ) -> Result<SaveOutcome> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptySnippetName);
        }

        let mut snippets = self.list()?;
        let snippet = Snippet {
            name: name.to_string(),
            sources,
            saved_at,
        };

        let outcome = match snippets.iter().position(|s| s.name == name) {
            None => {
                snippets.push(snippet);
                SaveOutcome::Created
            }
            Some(_) if on_conflict == OnConflict::Reject => {
                return Err(Error::SnippetExists(name.to_string()));
            }
            Some(idx) => {
                snippets[idx] = snippet;
                let mut seen = false;
                snippets.retain(|s| {
                    if s.name != name {
                        return true;
                    }
                    let keep = !seen;
                    seen = true;
                    keep
                });
                SaveOutcome::Overwritten
            }
        };

        self.write(&snippets)?;
        tracing::info!("Saved snippet `{}` ({:?})", name, outcome);
        Ok(outcome)
    }

    /// Delete the snippet called `name`; returns whether it existed
    pub fn delete(&self, name: &str) -> Result<bool> {
        let name = name.trim();
        let mut snippets = self.list()?;
        let before = snippets.len();
        snippets.retain(|s| s.name != name);

        if snippets.len() == before {
            return Ok(false);
        }

        self.write(&snippets)?;
        tracing::info!("Deleted snippet `{}`", name);
        Ok(true)
    }

    fn write(&self, snippets: &[Snippet]) -> Result<()> {
        let json = serde_json::to_string(snippets)?;
        self.store.set(SNIPPETS_KEY, &json)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    fn bundle(tag: &str) -> SourceBundle {
        SourceBundle::new(format!("<p>{tag}</p>"), "", "")
    }

    #[test]
    fn test_empty_library() {
        let library = SnippetLibrary::new(MemoryStore::new());
        assert!(library.list().unwrap().is_empty());
        assert!(!library.contains("A").unwrap());
    }

    #[test]
    fn test_save_and_get() {
        let library = SnippetLibrary::new(MemoryStore::new());
        let outcome = library
            .save("  Card  ", bundle("card"), at(9), OnConflict::Reject)
            .unwrap();

        assert_eq!(outcome, SaveOutcome::Created);
        let snippet = library.get("Card").unwrap().unwrap();
        assert_eq!(snippet.name, "Card");
        assert_eq!(snippet.sources, bundle("card"));
        assert_eq!(snippet.saved_at, at(9));
    }

    #[test]
    fn test_empty_name_rejected() {
        let library = SnippetLibrary::new(MemoryStore::new());
        let err = library
            .save("   ", bundle("x"), at(1), OnConflict::Overwrite)
            .unwrap_err();
        assert!(matches!(err, Error::EmptySnippetName));
    }

    #[test]
    fn test_duplicate_name_rejected_when_declined() {
        let library = SnippetLibrary::new(MemoryStore::new());
        library.save("A", bundle("one"), at(1), OnConflict::Reject).unwrap();

        let err = library
            .save("A", bundle("two"), at(2), OnConflict::Reject)
            .unwrap_err();
        assert!(matches!(err, Error::SnippetExists(ref n) if n == "A"));

        let snippets = library.list().unwrap();
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].sources, bundle("one"));
    }

    #[test]
    fn test_duplicate_name_overwritten_in_place() {
        let library = SnippetLibrary::new(MemoryStore::new());
        library.save("A", bundle("one"), at(1), OnConflict::Reject).unwrap();
        library.save("B", bundle("b"), at(2), OnConflict::Reject).unwrap();

        let outcome = library
            .save("A", bundle("two"), at(3), OnConflict::Overwrite)
            .unwrap();
        assert_eq!(outcome, SaveOutcome::Overwritten);

        let snippets = library.list().unwrap();
        let names: Vec<_> = snippets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(snippets[0].sources, bundle("two"));
        assert_eq!(snippets[0].saved_at, at(3));
    }

    #[test]
    fn test_overwrite_collapses_legacy_duplicates() {
        let store = MemoryStore::new();
        let legacy = r#"[
            {"name":"A","html":"1","css":"","js":"","timestamp":"2024-05-01T01:00:00.000Z"},
            {"name":"A","html":"2","css":"","js":"","timestamp":"2024-05-01T02:00:00.000Z"}
        ]"#;
        store.set(SNIPPETS_KEY, legacy).unwrap();

        let library = SnippetLibrary::new(&store);
        library.save("A", bundle("3"), at(3), OnConflict::Overwrite).unwrap();

        let snippets = library.list().unwrap();
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].sources, bundle("3"));
    }

    #[test]
    fn test_delete() {
        let library = SnippetLibrary::new(MemoryStore::new());
        library.save("A", bundle("a"), at(1), OnConflict::Reject).unwrap();

        assert!(library.delete("A").unwrap());
        assert!(!library.delete("A").unwrap());
        assert!(library.list().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_list_is_an_error() {
        let store = MemoryStore::new();
        store.set(SNIPPETS_KEY, "{not json").unwrap();

        let library = SnippetLibrary::new(&store);
        assert!(matches!(library.list(), Err(Error::Corrupt { .. })));
    }

    #[test]
    fn test_serialized_shape() {
        let store = MemoryStore::new();
        let library = SnippetLibrary::new(&store);
        library.save("A", SourceBundle::new("h", "c", "j"), at(4), OnConflict::Reject).unwrap();

        let raw = store.get(SNIPPETS_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["name"], "A");
        assert_eq!(value[0]["html"], "h");
        assert_eq!(value[0]["css"], "c");
        assert_eq!(value[0]["js"], "j");
        assert!(value[0]["timestamp"].as_str().unwrap().starts_with("2024-05-01T04:00:00"));
    }
}
