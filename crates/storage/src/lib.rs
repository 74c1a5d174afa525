pub mod attendance;
pub mod classes;
pub mod reports;

use std::{
    fs,
    path::{Path, PathBuf},
};

use eyre::{Context as _, Result};
use log::warn;
use serde::{de::DeserializeOwned, Serialize};

use attendance::AttendanceStore;
use classes::ClassStore;
use reports::ReportStore;

/// The persistence gateway: one JSON array file per collection inside a
/// single data directory. Everything is load-all/save-all; there are no
/// incremental writes and no locking.
pub struct Storage {
    pub classes: ClassStore,
    pub attendance: AttendanceStore,
    pub reports: ReportStore,
}

impl Storage {
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Storage> {
        let dir = data_dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;

        Ok(Storage {
            classes: ClassStore::open(dir)?,
            attendance: AttendanceStore::open(dir),
            reports: ReportStore::open(dir),
        })
    }
}

/// Reads a whole JSON array file. A missing file is an empty collection; an
/// unreadable or unparsable one degrades to empty with a warning, so a
/// corrupt store never takes the application down with it.
pub(crate) fn read_collection<T: DeserializeOwned>(path: &PathBuf) -> Vec<T> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(err) => {
            warn!("Could not read {}: {}", path.display(), err);
            return Vec::new();
        }
    };

    match serde_json::from_slice(&raw) {
        Ok(items) => items,
        Err(err) => {
            warn!(
                "Malformed data in {}, starting from an empty collection: {}",
                path.display(),
                err
            );
            Vec::new()
        }
    }
}

pub(crate) fn write_collection<T: Serialize>(path: &PathBuf, items: &[T]) -> Result<()> {
    let raw = serde_json::to_vec_pretty(items)
        .with_context(|| format!("Failed to encode {}", path.display()))?;
    fs::write(path, raw).with_context(|| format!("Failed to write {}", path.display()))
}
