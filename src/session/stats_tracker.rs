use crate::engine::stats::Stats;
use crate::store::StatsStore;

/// Owns the live stats and writes every change through to the store.
/// Storage failures are logged; the in-memory value stays authoritative.
pub struct StatsTracker {
    stats: Stats,
    store: Box<dyn StatsStore>,
}

impl StatsTracker {
    pub fn load(store: Box<dyn StatsStore>) -> Self {
        let stats = store.load();
        tracing::info!(
            correct = stats.correct,
            incorrect = stats.incorrect,
            streak = stats.streak,
            "loaded stats"
        );
        Self { stats, store }
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn record(&mut self, correct: bool) -> Stats {
        self.stats = self.stats.record_result(correct);
        if let Err(err) = self.store.save(&self.stats) {
            tracing::warn!(%err, "failed to persist stats");
        }
        self.stats
    }

    pub fn reset(&mut self) -> Stats {
        self.stats = Stats::default();
        if let Err(err) = self.store.clear() {
            tracing::warn!(%err, "failed to clear persisted stats");
        }
        tracing::info!("stats reset");
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::store::memory::MemoryStore;

    #[test]
    fn test_starts_from_persisted_snapshot() {
        let store = Rc::new(MemoryStore::new());
        let saved = Stats { correct: 4, incorrect: 1, streak: 2 };
        store.save(&saved).unwrap();

        let tracker = StatsTracker::load(Box::new(Rc::clone(&store)));
        assert_eq!(tracker.stats(), saved);
    }

    #[test]
    fn test_every_result_is_persisted() {
        let store = Rc::new(MemoryStore::new());
        let mut tracker = StatsTracker::load(Box::new(Rc::clone(&store)));

        tracker.record(true);
        assert_eq!(store.load(), Stats { correct: 1, incorrect: 0, streak: 1 });
        tracker.record(false);
        assert_eq!(store.load(), Stats { correct: 1, incorrect: 1, streak: 0 });
    }

    #[test]
    fn test_reset_zeroes_and_clears_store() {
        let store = Rc::new(MemoryStore::new());
        let mut tracker = StatsTracker::load(Box::new(Rc::clone(&store)));
        tracker.record(true);
        tracker.record(true);

        assert_eq!(tracker.reset(), Stats::default());
        assert!(store.raw().is_none());

        let reloaded = StatsTracker::load(Box::new(Rc::clone(&store)));
        assert_eq!(reloaded.stats(), Stats::default());
    }

    #[test]
    fn test_corrupt_store_starts_at_zero() {
        let store = MemoryStore::with_raw("garbage");
        let tracker = StatsTracker::load(Box::new(store));
        assert_eq!(tracker.stats(), Stats::default());
    }
}
