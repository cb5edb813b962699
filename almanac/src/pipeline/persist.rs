//! Snapshot and `latest` publication.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use almanac_core::{AlmanacError, PersistConfig};
use chrono::NaiveDateTime;

use super::util::jitter_wait;

const SNAPSHOT_STAMP: &str = "%Y%m%d_%H%M%S";

/// Files written by one publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    /// Timestamped snapshot, never overwritten.
    pub snapshot: PathBuf,
    /// Canonical `<name>_latest.csv`.
    pub latest: PathBuf,
    /// Copy of the previous `latest`, when one existed.
    pub backup: Option<PathBuf>,
    /// Non-fatal issues (failed backup, retried renames).
    pub warnings: Vec<AlmanacError>,
}

/// Path of the canonical `latest` file for a table name.
#[must_use]
pub fn latest_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}_latest.csv"))
}

/// Path of the backup copy of the previous `latest`.
#[must_use]
pub fn backup_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}_backup.csv"))
}

pub(crate) fn check_table_name(name: &str) -> Result<(), AlmanacError> {
    if name.trim().is_empty() || name.chars().any(|c| std::path::is_separator(c) || c == '\0') {
        return Err(AlmanacError::InvalidArg(format!(
            "table name must be a plain file stem, got '{name}'"
        )));
    }
    Ok(())
}

/// Write `bytes` as a new snapshot and atomically replace `latest` with it.
///
/// Steps:
/// 1. `<name>_<YYYYMMDD_HHMMSS>.csv` is created exclusively; a `_N` suffix
///    is added when a snapshot for the same second already exists.
/// 2. The previous `latest`, if any, is copied to `<name>_backup.csv`.
/// 3. `<name>_latest.csv.tmp` is written, then renamed over `latest` with up
///    to `cfg.max_attempts` attempts separated by jittered delays.
///
/// # Errors
/// - `Io` if the directory or the snapshot cannot be written.
/// - `Persist` if `latest` could not be replaced; the snapshot is named as
///   fallback and the previous `latest` is untouched.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "almanac::persist::publish",
        skip(bytes, cfg),
        fields(dir = %dir.display(), bytes = bytes.len()),
    )
)]
pub fn publish(
    bytes: &[u8],
    dir: &Path,
    name: &str,
    cfg: &PersistConfig,
    now: NaiveDateTime,
) -> Result<Published, AlmanacError> {
    check_table_name(name)?;
    fs::create_dir_all(dir).map_err(|e| AlmanacError::io(dir, e))?;

    let snapshot = write_snapshot(bytes, dir, name, now)?;
    let latest = latest_path(dir, name);
    let mut warnings = Vec::new();

    let mut backup = None;
    if cfg.keep_backup && latest.exists() {
        let target = backup_path(dir, name);
        match fs::copy(&latest, &target) {
            Ok(_) => backup = Some(target),
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %e, "could not back up previous latest");
                warnings.push(AlmanacError::io(&target, e));
            }
        }
    }

    let tmp = dir.join(format!("{name}_latest.csv.tmp"));
    let latest_shown = latest.display().to_string();
    let fallback = snapshot.display().to_string();
    let persist_err = |attempts: u32, msg: String| AlmanacError::Persist {
        path: latest_shown.clone(),
        attempts,
        fallback: Some(fallback.clone()),
        msg,
        assembly: None,
    };
    write_file(&tmp, bytes).map_err(|e| persist_err(0, format!("temp file: {e}")))?;

    let mut last_err = String::new();
    for attempt in 1..=cfg.max_attempts {
        match fs::rename(&tmp, &latest) {
            Ok(()) => {
                #[cfg(feature = "tracing")]
                tracing::info!(
                    snapshot = %snapshot.display(),
                    latest = %latest.display(),
                    attempt,
                    "published table"
                );
                return Ok(Published {
                    snapshot,
                    latest,
                    backup,
                    warnings,
                });
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(attempt, max = cfg.max_attempts, error = %e, "replace of latest failed");
                last_err = e.to_string();
                if attempt < cfg.max_attempts {
                    std::thread::sleep(jitter_wait(cfg.retry_delay, cfg.jitter_percent));
                }
            }
        }
    }

    let _ = fs::remove_file(&tmp);
    Err(persist_err(cfg.max_attempts, last_err))
}

fn write_snapshot(
    bytes: &[u8],
    dir: &Path,
    name: &str,
    now: NaiveDateTime,
) -> Result<PathBuf, AlmanacError> {
    let stamp = now.format(SNAPSHOT_STAMP);
    for n in 0u32.. {
        let path = if n == 0 {
            dir.join(format!("{name}_{stamp}.csv"))
        } else {
            dir.join(format!("{name}_{stamp}_{n}.csv"))
        };
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut f) => {
                f.write_all(bytes)
                    .and_then(|()| f.sync_all())
                    .map_err(|e| AlmanacError::io(&path, e))?;
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => return Err(AlmanacError::io(&path, e)),
        }
    }
    Err(AlmanacError::Data("snapshot suffixes exhausted".into()))
}

fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut f = fs::File::create(path)?;
    f.write_all(bytes)?;
    f.sync_all()
}
