use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    decimal::Decimal,
    ids::{ClassId, MemberId},
};

/// One attendance entry. Records are append-only: once written they are
/// never updated or removed. A record may carry a payment without the
/// member having attended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub class_id: ClassId,
    pub member_id: MemberId,
    pub date: NaiveDate,
    pub attended: bool,
    pub amount_paid: Decimal,
}

impl AttendanceRecord {
    pub fn new(
        class_id: ClassId,
        member_id: MemberId,
        date: NaiveDate,
        attended: bool,
        amount_paid: Decimal,
    ) -> AttendanceRecord {
        AttendanceRecord {
            class_id,
            member_id,
            date,
            attended,
            amount_paid,
        }
    }

    pub fn is_between(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.date >= start && self.date <= end
    }
}
