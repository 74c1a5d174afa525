use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use eyre::Result;
use model::report::MonthlyReport;

const FILE: &str = "monthly_reports.json";

/// Append-only history of generated monthly reports. One entry per append;
/// months are deliberately not deduplicated, so regenerating a month adds a
/// second snapshot.
pub struct ReportStore {
    path: PathBuf,
}

impl ReportStore {
    pub(crate) fn open(dir: &Path) -> ReportStore {
        ReportStore {
            path: dir.join(FILE),
        }
    }

    pub fn load(&self) -> Vec<MonthlyReport> {
        crate::read_collection(&self.path)
    }

    pub fn save(&self, reports: &[MonthlyReport]) -> Result<()> {
        crate::write_collection(&self.path, reports)
    }

    /// Read-modify-write append of one report to the history file.
    pub fn append(&self, report: &MonthlyReport) -> Result<()> {
        let mut reports = self.load();
        reports.push(report.clone());
        self.save(&reports)
    }

    /// Reports whose month falls inside the window, sorted by month.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Vec<MonthlyReport> {
        let mut reports: Vec<MonthlyReport> = self
            .load()
            .into_iter()
            .filter(|report| report.month >= start && report.month <= end)
            .collect();
        reports.sort_by_key(|report| report.month);
        reports
    }
}
