use std::cell::RefCell;

use anyhow::Result;

use crate::engine::stats::Stats;
use crate::store::{StatsStore, decode_stats};

/// Keeps the serialized snapshot in memory. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    entry: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an arbitrary stored value, e.g. a corrupted one.
    pub fn with_raw(raw: &str) -> Self {
        Self {
            entry: RefCell::new(Some(raw.to_string())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.entry.borrow().clone()
    }
}

impl StatsStore for MemoryStore {
    fn load(&self) -> Stats {
        match self.entry.borrow().as_deref() {
            Some(raw) => decode_stats(raw),
            None => Stats::default(),
        }
    }

    fn save(&self, stats: &Stats) -> Result<()> {
        let json = serde_json::to_string(stats)?;
        *self.entry.borrow_mut() = Some(json);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.entry.borrow_mut() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_snapshot() {
        let store = MemoryStore::new();
        assert_eq!(store.load(), Stats::default());

        let stats = Stats { correct: 3, incorrect: 1, streak: 2 };
        store.save(&stats).unwrap();
        assert_eq!(store.load(), stats);
    }

    #[test]
    fn corrupted_entry_reads_as_zero() {
        let store = MemoryStore::with_raw("[1, 2, 3]");
        assert_eq!(store.load(), Stats::default());
    }

    #[test]
    fn clear_drops_entry() {
        let store = MemoryStore::new();
        store.save(&Stats { correct: 1, incorrect: 0, streak: 1 }).unwrap();
        store.clear().unwrap();
        assert!(store.raw().is_none());
        assert_eq!(store.load(), Stats::default());
    }
}
