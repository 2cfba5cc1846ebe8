//! Periodic auto-save and session restore
//!
//! The current sources are written under [`AUTOSAVE_KEY`] on a fixed interval
//! and when the app closes. On the next launch a record younger than the
//! restore window is offered back to the user.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::Result;
use crate::fragment::SourceBundle;
use crate::storage::KeyValueStore;

/// Storage key holding the auto-save record
pub const AUTOSAVE_KEY: &str = "autoSave";

/// How often the sources are auto-saved
pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(30);

/// Records older than this are not offered for restore
pub const DEFAULT_RESTORE_WINDOW_HOURS: u32 = 24;

/// The last auto-saved sources
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoSaveRecord {
    #[serde(flatten)]
    pub sources: SourceBundle,
    pub timestamp: DateTime<Utc>,
}

impl AutoSaveRecord {
    /// Time elapsed since the record was written
    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        now.signed_duration_since(self.timestamp)
    }
}

/// Reads and writes the auto-save record
#[derive(Debug, Clone)]
pub struct AutoSaver<S> {
    store: S,
    restore_window: TimeDelta,
}

impl<S: KeyValueStore> AutoSaver<S> {
    pub fn new(store: S) -> Self {
        Self::with_restore_window(store, DEFAULT_RESTORE_WINDOW_HOURS)
    }

    pub fn with_restore_window(store: S, hours: u32) -> Self {
        Self {
            store,
            restore_window: TimeDelta::hours(i64::from(hours)),
        }
    }

    /// Write the current sources, stamped with `now`
    pub fn save(&self, sources: SourceBundle, now: DateTime<Utc>) -> Result<()> {
        let record = AutoSaveRecord {
            sources,
            timestamp: now,
        };
        let json = serde_json::to_string(&record)?;
        self.store.set(AUTOSAVE_KEY, &json)?;
        tracing::debug!("Auto-saved at {}", now);
        Ok(())
    }

    /// The record to offer for restore, if one exists and is recent enough
    ///
    /// Corrupt data is removed so it is not reported again.
    pub fn restore_candidate(&self, now: DateTime<Utc>) -> Option<AutoSaveRecord> {
        let raw = match self.store.get(AUTOSAVE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Error loading auto-save data: {}", e);
                return None;
            }
        };

        let record: AutoSaveRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Failed to parse auto-saved data, removing it: {}", e);
                if let Err(e) = self.store.remove(AUTOSAVE_KEY) {
                    tracing::warn!("Failed to remove corrupt auto-save data: {}", e);
                }
                return None;
            }
        };

        if record.age(now) < self.restore_window {
            Some(record)
        } else {
            tracing::debug!("Auto-save from {} is too old to restore", record.timestamp);
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_nothing_saved() {
        let saver = AutoSaver::new(MemoryStore::new());
        assert!(saver.restore_candidate(noon()).is_none());
    }

    #[test]
    fn test_recent_record_is_offered() {
        let saver = AutoSaver::new(MemoryStore::new());
        let sources = SourceBundle::new("<p>draft</p>", "", "");
        saver.save(sources.clone(), noon()).unwrap();

        let later = noon() + TimeDelta::hours(23) + TimeDelta::minutes(59);
        let record = saver.restore_candidate(later).unwrap();
        assert_eq!(record.sources, sources);
        assert_eq!(record.timestamp, noon());
    }

    #[test]
    fn test_record_older_than_a_day_is_not_offered() {
        let saver = AutoSaver::new(MemoryStore::new());
        saver.save(SourceBundle::default(), noon()).unwrap();

        assert!(saver.restore_candidate(noon() + TimeDelta::hours(24)).is_none());
        assert!(saver.restore_candidate(noon() + TimeDelta::days(3)).is_none());
    }

    #[test]
    fn test_custom_restore_window() {
        let saver = AutoSaver::with_restore_window(MemoryStore::new(), 1);
        saver.save(SourceBundle::default(), noon()).unwrap();

        assert!(saver.restore_candidate(noon() + TimeDelta::minutes(30)).is_some());
        assert!(saver.restore_candidate(noon() + TimeDelta::hours(2)).is_none());
    }

    #[test]
    fn test_corrupt_record_is_removed() {
        let store = MemoryStore::new();
        store.set(AUTOSAVE_KEY, "not json at all").unwrap();

        let saver = AutoSaver::new(&store);
        assert!(saver.restore_candidate(noon()).is_none());
        assert_eq!(store.get(AUTOSAVE_KEY).unwrap(), None);
    }

    #[test]
    fn test_reads_flat_record_with_millisecond_timestamp() {
        let store = MemoryStore::new();
        store
            .set(
                AUTOSAVE_KEY,
                r#"{"html":"<b>x</b>","css":"b{}","js":"","timestamp":"2024-06-10T11:00:00.000Z"}"#,
            )
            .unwrap();

        let record = AutoSaver::new(&store).restore_candidate(noon()).unwrap();
        assert_eq!(record.sources, SourceBundle::new("<b>x</b>", "b{}", ""));
        assert_eq!(record.age(noon()), TimeDelta::hours(1));
    }
}
