pub mod json_store;
pub mod memory;

use anyhow::Result;

use crate::engine::stats::Stats;

/// Durable home of the stats snapshot.
///
/// `load` never fails: a missing or unreadable entry is the zero state.
pub trait StatsStore {
    fn load(&self) -> Stats;
    fn save(&self, stats: &Stats) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Parse a stored snapshot, treating anything unparsable as zero state.
pub(crate) fn decode_stats(raw: &str) -> Stats {
    match serde_json::from_str(raw) {
        Ok(stats) => stats,
        Err(err) => {
            tracing::warn!(%err, "discarding unreadable stats snapshot");
            Stats::default()
        }
    }
}

impl<S: StatsStore + ?Sized> StatsStore for std::rc::Rc<S> {
    fn load(&self) -> Stats {
        (**self).load()
    }

    fn save(&self, stats: &Stats) -> Result<()> {
        (**self).save(stats)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}
