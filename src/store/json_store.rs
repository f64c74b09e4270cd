use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::engine::stats::Stats;
use crate::store::{StatsStore, decode_stats};

const STATS_FILE: &str = "stats.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)
            .with_context(|| format!("creating data directory {}", base_dir.display()))?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("verbdrill")
}

impl StatsStore for JsonStore {
    fn load(&self) -> Stats {
        let path = self.file_path(STATS_FILE);
        if !path.exists() {
            return Stats::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => decode_stats(&content),
            Err(err) => {
                tracing::warn!(%err, path = %path.display(), "could not read stats file");
                Stats::default()
            }
        }
    }

    fn save(&self, stats: &Stats) -> Result<()> {
        let path = self.file_path(STATS_FILE);
        let tmp_path = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(stats)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let path = self.file_path(STATS_FILE);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("removing {}", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_file_loads_zero_state() {
        let (_dir, store) = make_test_store();
        assert_eq!(store.load(), Stats::default());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (_dir, store) = make_test_store();
        let stats = Stats { correct: 12, incorrect: 4, streak: 3 };
        store.save(&stats).unwrap();
        assert_eq!(store.load(), stats);

        // A second store over the same directory sees the same snapshot.
        let reopened = JsonStore::with_base_dir(store.base_dir().to_path_buf()).unwrap();
        assert_eq!(reopened.load(), stats);
    }

    #[test]
    fn test_corrupt_file_loads_zero_state() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(STATS_FILE), "{not json").unwrap();
        assert_eq!(store.load(), Stats::default());

        fs::write(
            store.file_path(STATS_FILE),
            r#"{"correct": -1, "incorrect": 2, "streak": 0}"#,
        )
        .unwrap();
        assert_eq!(store.load(), Stats::default());
    }

    #[test]
    fn test_reads_plain_snapshot_format() {
        let (_dir, store) = make_test_store();
        fs::write(
            store.file_path(STATS_FILE),
            r#"{"correct":7,"incorrect":2,"streak":1}"#,
        )
        .unwrap();
        assert_eq!(store.load(), Stats { correct: 7, incorrect: 2, streak: 1 });
    }

    #[test]
    fn test_clear_removes_snapshot() {
        let (_dir, store) = make_test_store();
        store.save(&Stats { correct: 1, incorrect: 0, streak: 1 }).unwrap();
        store.clear().unwrap();
        assert!(!store.file_path(STATS_FILE).exists());
        assert_eq!(store.load(), Stats::default());

        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn test_save_leaves_no_tmp_files() {
        let (dir, store) = make_test_store();
        store.save(&Stats::default()).unwrap();
        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty(), "no residual .tmp files");
    }
}
