use chrono::NaiveDate;
use eyre::Result;
use log::info;
use model::{attendance::AttendanceRecord, decimal::Decimal, ids::ClassId};
use storage::attendance::AttendanceStore;

/// The attendance ledger: append-only records, persisted in full on every
/// append (the store has no incremental write).
pub struct Attendance {
    store: AttendanceStore,
    records: Vec<AttendanceRecord>,
}

impl Attendance {
    pub(crate) fn load(store: AttendanceStore) -> Attendance {
        let records = store.load();
        info!("Loaded {} attendance records", records.len());
        Attendance { store, records }
    }

    pub(crate) fn record(&mut self, record: AttendanceRecord) -> Result<()> {
        self.records.push(record);
        self.store.save(&self.records)
    }

    /// Records for the class inside the inclusive date window.
    pub fn records_between(
        &self,
        class_id: ClassId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<&AttendanceRecord> {
        self.records
            .iter()
            .filter(|record| record.class_id == class_id && record.is_between(start, end))
            .collect()
    }

    /// Attended records for the class on the exact date.
    pub fn count_on(&self, class_id: ClassId, date: NaiveDate) -> usize {
        self.records
            .iter()
            .filter(|record| record.class_id == class_id && record.date == date && record.attended)
            .count()
    }

    /// Sum of `amount_paid` over the window, attended or not: a paid
    /// no-show still counts toward revenue.
    pub fn revenue_between(&self, class_id: ClassId, start: NaiveDate, end: NaiveDate) -> Decimal {
        self.records
            .iter()
            .filter(|record| record.class_id == class_id && record.is_between(start, end))
            .map(|record| record.amount_paid)
            .sum()
    }

    pub fn all(&self) -> &[AttendanceRecord] {
        &self.records
    }
}
