use std::path::{Path, PathBuf};

use eyre::Result;
use model::attendance::AttendanceRecord;

const FILE: &str = "attendance.json";

/// Whole-array store for the attendance ledger. Every save rewrites the
/// full file; the ledger itself guarantees records are append-only.
pub struct AttendanceStore {
    path: PathBuf,
}

impl AttendanceStore {
    pub(crate) fn open(dir: &Path) -> AttendanceStore {
        AttendanceStore {
            path: dir.join(FILE),
        }
    }

    pub fn load(&self) -> Vec<AttendanceRecord> {
        crate::read_collection(&self.path)
    }

    pub fn save(&self, records: &[AttendanceRecord]) -> Result<()> {
        crate::write_collection(&self.path, records)
    }
}
