use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Months, NaiveDate};
use eyre::Result;
use model::{
    decimal::Decimal,
    ids::MemberId,
    report::{ClassAttendance, ClassRevenue, MonthlyReport},
};
use storage::reports::ReportStore;

use super::{attendance::Attendance, classes::Classes};

pub struct Reports {
    store: ReportStore,
}

impl Reports {
    pub(crate) fn new(store: ReportStore) -> Reports {
        Reports { store }
    }

    /// Aggregates the calendar month containing `month`. Only attended
    /// records count toward attendance, revenue, and the active-member
    /// set; a class with any record in the window (attended or not)
    /// counts as held. Read-only: persisting the result is a separate
    /// explicit call.
    pub fn generate(
        &self,
        classes: &Classes,
        attendance: &Attendance,
        month: NaiveDate,
    ) -> MonthlyReport {
        let (start, end) = month_bounds(month);

        let mut total_attendance = 0u32;
        let mut total_revenue = Decimal::zero();
        let mut total_classes_held = 0u32;
        let mut active_members: BTreeSet<MemberId> = BTreeSet::new();
        let mut attendance_by_class: BTreeMap<String, u32> = BTreeMap::new();
        let mut revenue_by_class: BTreeMap<String, Decimal> = BTreeMap::new();

        for class in classes.all() {
            let records = attendance.records_between(class.id, start, end);
            if records.is_empty() {
                continue;
            }
            total_classes_held += 1;

            for record in records {
                if !record.attended {
                    continue;
                }
                *attendance_by_class.entry(class.name.clone()).or_default() += 1;
                *revenue_by_class.entry(class.name.clone()).or_default() += record.amount_paid;
                active_members.insert(record.member_id);
                total_attendance += 1;
                total_revenue += record.amount_paid;
            }
        }

        MonthlyReport {
            month,
            total_active_members: active_members.len() as u32,
            total_classes_held,
            total_attendance,
            total_revenue,
            class_attendance: attendance_by_class
                .into_iter()
                .map(|(class_name, count)| ClassAttendance { class_name, count })
                .collect(),
            class_revenue: revenue_by_class
                .into_iter()
                .filter(|(_, amount)| *amount > Decimal::zero())
                .map(|(class_name, amount)| ClassRevenue { class_name, amount })
                .collect(),
        }
    }

    /// Appends a snapshot to the report history file.
    pub fn save_monthly_report(&self, report: &MonthlyReport) -> Result<()> {
        self.store.append(report)
    }

    /// Persisted report history inside the window, sorted by month.
    pub fn monthly_reports(&self, start: NaiveDate, end: NaiveDate) -> Vec<MonthlyReport> {
        self.store.between(start, end)
    }
}

fn month_bounds(month: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = month.with_day(1).unwrap_or(month);
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(start);
    (start, end)
}
