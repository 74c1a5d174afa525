use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Decimal;

/// Attendance and revenue aggregate for one calendar month, derived on
/// demand from the attendance ledger. Persisted snapshots form an
/// append-only history: one entry per save call, months are not
/// deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub month: NaiveDate,
    pub total_active_members: u32,
    pub total_classes_held: u32,
    pub total_attendance: u32,
    pub total_revenue: Decimal,
    pub class_attendance: Vec<ClassAttendance>,
    pub class_revenue: Vec<ClassRevenue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassAttendance {
    pub class_name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRevenue {
    pub class_name: String,
    pub amount: Decimal,
}
