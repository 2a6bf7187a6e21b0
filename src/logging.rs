// src/logging.rs
//! File logging setup.
//!
//! The TUI owns the terminal while a track plays, so tracing output goes to
//! `waveline.log` in the state directory, rotated daily.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::SystemTime;

use anyhow::{anyhow, Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE: &str = "waveline.log";

/// Rotated files kept after startup cleanup.
const KEEP_LOG_FILES: usize = 7;

/// Flushes the background writer when the process exits.
static WRITER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the global subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_logging() -> Result<()> {
    let dir = log_dir()?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    if let Err(e) = prune_logs(&dir) {
        eprintln!("Warning: could not prune old logs in {}: {e:#}", dir.display());
    }

    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&dir, LOG_FILE));
    WRITER_GUARD
        .set(guard)
        .map_err(|_| anyhow!("logging already initialized"))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    tracing::debug!(dir = %dir.display(), "logging to file");
    Ok(())
}

/// `<state dir>/waveline`, falling back to `~/.local/state/waveline` on
/// platforms without a state directory.
fn log_dir() -> Result<PathBuf> {
    let base = dirs::state_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("state")))
        .ok_or_else(|| anyhow!("could not determine a directory for logs"))?;
    Ok(base.join("waveline"))
}

/// Daily files look like `waveline.log.2026-10-19`.
fn is_rotated_log(name: &str) -> bool {
    name.strip_prefix(LOG_FILE)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|date| date.len() == 10 && date.matches('-').count() == 2)
}

/// Everything past the newest `keep` entries.
fn stale_logs(mut logs: Vec<(PathBuf, SystemTime)>, keep: usize) -> Vec<PathBuf> {
    logs.sort_by(|a, b| b.1.cmp(&a.1));
    logs.into_iter().skip(keep).map(|(path, _)| path).collect()
}

fn prune_logs(dir: &Path) -> Result<()> {
    let mut logs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !is_rotated_log(&entry.file_name().to_string_lossy()) {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        logs.push((entry.path(), modified));
    }

    for path in stale_logs(logs, KEEP_LOG_FILES) {
        if let Err(e) = fs::remove_file(&path) {
            eprintln!("Warning: could not remove {}: {e}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_is_rotated_log() {
        assert!(is_rotated_log("waveline.log.2026-10-19"));
        assert!(!is_rotated_log("waveline.log"));
        assert!(!is_rotated_log("waveline.log.old"));
        assert!(!is_rotated_log("other.log.2026-10-19"));
        assert!(!is_rotated_log("waveline.logx2026-10-19"));
    }

    #[test]
    fn test_stale_logs_keeps_newest() {
        let at = |secs| SystemTime::UNIX_EPOCH + Duration::from_secs(secs);
        let logs = vec![
            (PathBuf::from("b"), at(20)),
            (PathBuf::from("a"), at(10)),
            (PathBuf::from("d"), at(40)),
            (PathBuf::from("c"), at(30)),
        ];
        assert_eq!(
            stale_logs(logs, 2),
            vec![PathBuf::from("b"), PathBuf::from("a")]
        );
        assert!(stale_logs(Vec::new(), 2).is_empty());
    }
}
