use std::fs;
use std::path::Path;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_PREFIX: &str = "verbdrill";
const LOG_SUFFIX: &str = "log";
const MAX_LOG_FILES: usize = 7;

/// Daily-rotated `verbdrill.<date>.log` files in `dir`, oldest pruned.
pub fn file_appender(dir: &Path) -> Result<RollingFileAppender> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix(LOG_SUFFIX)
        .max_log_files(MAX_LOG_FILES)
        .build(dir)?;
    Ok(appender)
}

/// Install the global subscriber. Logs go to files because the terminal
/// belongs to the UI; writes happen on a background worker that flushes
/// when the returned guard is dropped.
pub fn init_logging(dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(dir)?;
    let (writer, guard) = tracing_appender::non_blocking(file_appender(dir)?);

    let env_filter =
        EnvFilter::try_from_env("VERBDRILL_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_contents(dir: &Path) -> String {
        fs::read_dir(dir)
            .unwrap()
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().starts_with(LOG_PREFIX))
            .map(|e| fs::read_to_string(e.path()).unwrap())
            .collect()
    }

    #[test]
    fn events_reach_the_file_once_the_guard_drops() {
        let dir = tempfile::tempdir().unwrap();
        let (writer, guard) = tracing_appender::non_blocking(file_appender(dir.path()).unwrap());
        let subscriber = fmt().with_writer(writer).with_ansi(false).finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(verbs = 110, "catalog loaded");
        });
        drop(guard);

        let contents = log_contents(dir.path());
        assert!(contents.contains("catalog loaded"), "log was: {contents:?}");
        assert!(contents.contains("verbs=110"));
    }

    #[test]
    fn log_files_carry_prefix_and_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let (writer, guard) = tracing_appender::non_blocking(file_appender(dir.path()).unwrap());
        let subscriber = fmt().with_writer(writer).finish();
        tracing::subscriber::with_default(subscriber, || tracing::warn!("stats not saved"));
        drop(guard);

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("verbdrill."));
        assert!(names[0].ends_with(".log"));
    }
}
