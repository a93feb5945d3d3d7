//! Hall of fame: high-scoring candidates kept across sessions.

use super::storage::{FavoritesSlot, PersistenceError};
use crate::models::RefusalCandidate;
use std::collections::HashSet;

/// Ordered, text-deduplicated favorites list, written through to its slot
/// on every mutation. Never shrinks.
pub struct FavoritesStore {
    entries: Vec<RefusalCandidate>,
    slot: Box<dyn FavoritesSlot>,
}

impl FavoritesStore {
    /// Load from the slot. A missing, unreadable or corrupt slot yields an
    /// empty store; the failure is only logged.
    pub fn load(slot: Box<dyn FavoritesSlot>) -> Self {
        let entries = match Self::read_entries(slot.as_ref()) {
            Ok(entries) => {
                tracing::info!("[Favorites] Loaded {} entries", entries.len());
                entries
            }
            Err(e) => {
                tracing::error!("[Favorites] Failed to load, starting empty: {}", e);
                Vec::new()
            }
        };
        Self { entries, slot }
    }

    fn read_entries(slot: &dyn FavoritesSlot) -> Result<Vec<RefusalCandidate>, PersistenceError> {
        let Some(content) = slot.read()? else {
            return Ok(Vec::new());
        };
        let parsed: Vec<RefusalCandidate> = serde_json::from_str(&content)?;

        // A hand-edited file may carry duplicates; keep the first of each.
        let mut seen = HashSet::new();
        Ok(parsed
            .into_iter()
            .filter(|c| seen.insert(c.text.clone()))
            .collect())
    }

    pub fn entries(&self) -> &[RefusalCandidate] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.entries.iter().any(|e| e.text == text)
    }

    /// Prepend every high scorer not already saved, in the order given.
    /// Returns how many were added; persists only when that is non-zero.
    pub fn merge_high_scorers(&mut self, candidates: &[RefusalCandidate]) -> usize {
        let mut seen: HashSet<&str> = self.entries.iter().map(|e| e.text.as_str()).collect();
        let fresh: Vec<RefusalCandidate> = candidates
            .iter()
            .filter(|c| c.is_high_scorer())
            .filter(|&c| seen.insert(c.text.as_str()))
            .cloned()
            .collect();

        let added = fresh.len();
        if added == 0 {
            return 0;
        }

        self.entries.splice(0..0, fresh);
        tracing::info!(
            "[Favorites] Added {} entr{} (total {})",
            added,
            if added == 1 { "y" } else { "ies" },
            self.entries.len()
        );
        self.persist();
        added
    }

    /// Full-replace write of the current list. Failures are logged, never raised.
    fn persist(&self) {
        let result = serde_json::to_string(&self.entries)
            .map_err(PersistenceError::from)
            .and_then(|json| self.slot.write(&json));
        if let Err(e) = result {
            tracing::error!("[Favorites] Failed to save: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::storage::JsonFileSlot;
    use proptest::prelude::*;
    use std::sync::{Arc, Mutex};

    /// In-memory slot that can be told to fail.
    #[derive(Clone, Default)]
    struct MemorySlot {
        data: Arc<Mutex<Option<String>>>,
        writes: Arc<Mutex<usize>>,
        fail_reads: bool,
        fail_writes: bool,
    }

    impl FavoritesSlot for MemorySlot {
        fn read(&self) -> Result<Option<String>, PersistenceError> {
            if self.fail_reads {
                return Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into());
            }
            Ok(self.data.lock().unwrap().clone())
        }

        fn write(&self, contents: &str) -> Result<(), PersistenceError> {
            if self.fail_writes {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into());
            }
            *self.data.lock().unwrap() = Some(contents.to_string());
            *self.writes.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn cand(text: &str, score: u8) -> RefusalCandidate {
        RefusalCandidate {
            tone: "정중하게".to_string(),
            text: text.to_string(),
            score,
        }
    }

    fn texts(store: &FavoritesStore) -> Vec<&str> {
        store.entries().iter().map(|e| e.text.as_str()).collect()
    }

    // ── Loading ─────────────────────────────────────────────

    #[test]
    fn failing_read_starts_empty() {
        let slot = MemorySlot {
            fail_reads: true,
            ..Default::default()
        };
        let store = FavoritesStore::load(Box::new(slot));
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_slot_starts_empty() {
        let slot = MemorySlot::default();
        *slot.data.lock().unwrap() = Some("{\"not\": \"a list\"".to_string());
        let store = FavoritesStore::load(Box::new(slot));
        assert!(store.is_empty());
    }

    #[test]
    fn duplicate_texts_in_slot_are_collapsed() {
        let slot = MemorySlot::default();
        let saved = vec![cand("a", 95), cand("b", 91), cand("a", 99)];
        *slot.data.lock().unwrap() = Some(serde_json::to_string(&saved).unwrap());
        let store = FavoritesStore::load(Box::new(slot));
        assert_eq!(texts(&store), vec!["a", "b"]);
        assert_eq!(store.entries()[0].score, 95);
    }

    // ── Merging ─────────────────────────────────────────────

    #[test]
    fn only_high_scorers_are_prepended_in_order() {
        let slot = MemorySlot::default();
        let mut store = FavoritesStore::load(Box::new(slot.clone()));
        store.merge_high_scorers(&[cand("old", 92)]);

        let added = store.merge_high_scorers(&[
            cand("first", 95),
            cand("low", 89),
            cand("second", 90),
            cand("old", 99),
        ]);

        assert_eq!(added, 2);
        assert_eq!(texts(&store), vec!["first", "second", "old"]);
        assert_eq!(*slot.writes.lock().unwrap(), 2);
    }

    #[test]
    fn nothing_new_means_no_write() {
        let slot = MemorySlot::default();
        let mut store = FavoritesStore::load(Box::new(slot.clone()));
        assert_eq!(store.merge_high_scorers(&[cand("low", 10)]), 0);
        assert_eq!(*slot.writes.lock().unwrap(), 0);
    }

    #[test]
    fn same_text_twice_in_one_batch_added_once() {
        let mut store = FavoritesStore::load(Box::new(MemorySlot::default()));
        assert_eq!(store.merge_high_scorers(&[cand("dup", 95), cand("dup", 97)]), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn write_failure_keeps_in_memory_entries() {
        let slot = MemorySlot {
            fail_writes: true,
            ..Default::default()
        };
        let mut store = FavoritesStore::load(Box::new(slot));
        assert_eq!(store.merge_high_scorers(&[cand("kept", 93)]), 1);
        assert!(store.contains("kept"));
    }

    #[test]
    fn file_round_trip_preserves_order() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut store = FavoritesStore::load(Box::new(JsonFileSlot::in_dir(tmp.path())));
        store.merge_high_scorers(&[cand("c", 90)]);
        store.merge_high_scorers(&[cand("a", 100), cand("b", 94)]);

        let reloaded = FavoritesStore::load(Box::new(JsonFileSlot::in_dir(tmp.path())));
        assert_eq!(reloaded.entries(), store.entries());
        assert_eq!(texts(&reloaded), vec!["a", "b", "c"]);
    }

    // ── Properties ──────────────────────────────────────────

    fn arb_candidate() -> impl Strategy<Value = RefusalCandidate> {
        // Tiny text alphabet so collisions are common
        ("[abc]{1,2}", 0u8..=100).prop_map(|(text, score)| cand(&text, score))
    }

    proptest! {
        #[test]
        fn never_holds_duplicate_texts(batches in prop::collection::vec(
            prop::collection::vec(arb_candidate(), 0..6), 0..8)
        ) {
            let mut store = FavoritesStore::load(Box::new(MemorySlot::default()));
            for batch in &batches {
                store.merge_high_scorers(batch);
            }
            let unique: HashSet<_> = store.entries().iter().map(|e| e.text.clone()).collect();
            prop_assert_eq!(unique.len(), store.len());

            for batch in &batches {
                for c in batch.iter().filter(|c| c.is_high_scorer()) {
                    prop_assert!(store.contains(&c.text));
                }
            }
            prop_assert!(store.entries().iter().all(|e| e.is_high_scorer()));
        }

        #[test]
        fn persisted_list_reloads_equal(batches in prop::collection::vec(
            prop::collection::vec(arb_candidate(), 0..6), 0..5)
        ) {
            let slot = MemorySlot::default();
            let mut store = FavoritesStore::load(Box::new(slot.clone()));
            for batch in &batches {
                store.merge_high_scorers(batch);
            }
            let reloaded = FavoritesStore::load(Box::new(slot));
            prop_assert_eq!(reloaded.entries(), store.entries());
        }
    }
}
