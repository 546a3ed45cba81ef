use crate::analysis::ranking::AggregatedChampionStat;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// How many preceding snapshots feed the trend computation.
pub const MAX_HISTORY: usize = 6;

const SNAPSHOT_PREFIX: &str = "results-";
const LATEST_FILE: &str = "latest.json";

/// One published aggregation result. Never rewritten once on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub total_players_analyzed: usize,
    pub results: Vec<AggregatedChampionStat>,
}

impl Snapshot {
    pub fn file_name(&self) -> String {
        format!(
            "{}{}.json",
            SNAPSHOT_PREFIX,
            self.timestamp.format("%Y%m%dT%H%M%S%.3fZ")
        )
    }
}

/// The current snapshot and the ones before it, newest first.
#[derive(Debug, Clone)]
pub struct LoadedSnapshots {
    pub current: Snapshot,
    pub history: Vec<Snapshot>,
}

/// Directory of timestamped snapshot files for one server.
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SnapshotStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes a new archive file and refreshes `latest.json`. Refuses to
    /// overwrite an existing archive file.
    pub fn write(&self, snapshot: &Snapshot) -> Result<PathBuf, AppError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            AppError::SnapshotError(format!("Failed to create {}: {}", self.dir.display(), e))
        })?;

        let json = serde_json::to_string_pretty(snapshot).map_err(|e| {
            AppError::JsonError(format!("Failed to serialize snapshot: {}", e))
        })?;

        let path = self.dir.join(snapshot.file_name());
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| {
                AppError::SnapshotError(format!("Failed to create {}: {}", path.display(), e))
            })?;
        file.write_all(json.as_bytes()).map_err(|e| {
            AppError::SnapshotError(format!("Failed to write {}: {}", path.display(), e))
        })?;

        let latest = self.dir.join(LATEST_FILE);
        fs::write(&latest, &json).map_err(|e| {
            AppError::SnapshotError(format!("Failed to write {}: {}", latest.display(), e))
        })?;

        debug!("snapshot written to {}", path.display());
        Ok(path)
    }

    /// Archive files, oldest first. A missing directory is an empty store.
    pub fn list(&self) -> Result<Vec<PathBuf>, AppError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AppError::SnapshotError(format!(
                    "Failed to read {}: {}",
                    self.dir.display(),
                    e
                )))
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .map(|name| name.starts_with(SNAPSHOT_PREFIX) && name.ends_with(".json"))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();
        Ok(paths)
    }

    pub fn load(path: &Path) -> Result<Snapshot, AppError> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::SnapshotError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            AppError::JsonError(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// The newest `limit` archived snapshots, newest first. Files that
    /// vanished or fail to parse are skipped.
    pub fn load_history(&self, limit: usize) -> Result<Vec<Snapshot>, AppError> {
        let paths = self.list()?;
        Ok(load_tolerant(paths.iter().rev().take(limit)))
    }

    /// Latest snapshot plus up to [`MAX_HISTORY`] preceding ones. Falls back
    /// to `latest.json` when the directory holds no archive files.
    pub fn load_recent(&self) -> Result<Option<LoadedSnapshots>, AppError> {
        let paths = self.list()?;

        let Some((newest, older)) = paths.split_last() else {
            let latest = self.dir.join(LATEST_FILE);
            if !latest.exists() {
                return Ok(None);
            }
            return Ok(Some(LoadedSnapshots {
                current: Self::load(&latest)?,
                history: Vec::new(),
            }));
        };

        let current = Self::load(newest)?;
        let history = load_tolerant(older.iter().rev().take(MAX_HISTORY));

        Ok(Some(LoadedSnapshots { current, history }))
    }
}

fn load_tolerant<'a>(paths: impl Iterator<Item = &'a PathBuf>) -> Vec<Snapshot> {
    paths
        .filter_map(|path| match SnapshotStore::load(path) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("skipping historical snapshot: {}", e);
                None
            }
        })
        .collect()
}
