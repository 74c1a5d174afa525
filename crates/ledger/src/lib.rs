use std::sync::Arc;

use chrono::NaiveDate;
use eyre::Result;
use log::error;
use model::{
    attendance::AttendanceRecord,
    decimal::Decimal,
    errors::LedgerError,
    ids::{ClassId, MemberId},
    report::MonthlyReport,
};
use sim_time::Clock;
use storage::Storage;
use thiserror::Error;

use notification::{ClassEvent, ClassObserver, Notifier};
use service::{attendance::Attendance, classes::Classes, reports::Reports};

pub mod notification;
pub mod service;

/// The external member system, as far as the enrollment engine cares: is
/// the subscription currently active, and does the member rank as VIP on
/// the waitlist.
pub trait SubscriptionOracle: Send + Sync {
    fn is_subscription_active(&self, member_id: MemberId) -> bool;
    fn is_vip_member(&self, member_id: MemberId) -> bool;
}

/// The class registry: owns the class collection, the enrollment state
/// machine, the attendance ledger, and monthly reporting. Dirty state is
/// flushed on an explicit `save` or once at drop.
pub struct Ledger {
    pub classes: Classes,
    pub attendance: Attendance,
    pub reports: Reports,
    notifier: Notifier,
    oracle: Arc<dyn SubscriptionOracle>,
    clock: Arc<dyn Clock>,
}

impl Ledger {
    pub fn new(
        storage: Storage,
        oracle: Arc<dyn SubscriptionOracle>,
        clock: Arc<dyn Clock>,
    ) -> Ledger {
        let notifier = Notifier::default();
        let classes = Classes::load(storage.classes, notifier.clone());
        let attendance = Attendance::load(storage.attendance);
        let reports = Reports::new(storage.reports);

        Ledger {
            classes,
            attendance,
            reports,
            notifier,
            oracle,
            clock,
        }
    }

    pub fn subscribe(&self, observer: Arc<dyn ClassObserver>) {
        self.notifier.subscribe(observer);
    }

    /// Enrolls the member, or routes them to the waitlist when the class
    /// is full. A full class never turns into a success: the member is
    /// waitlisted (with the oracle's VIP flag and the clock's current
    /// time) and the call still fails with `ClassFull`.
    pub fn enroll_member(
        &mut self,
        class_id: ClassId,
        member_id: MemberId,
    ) -> Result<(), EnrollError> {
        if self.classes.get(class_id).is_none() {
            return Err(EnrollError::ClassNotFound(class_id));
        }
        if self.classes.is_member_enrolled(class_id, member_id) {
            return Err(EnrollError::AlreadySignedUp(member_id));
        }
        if !self.oracle.is_subscription_active(member_id) {
            return Err(EnrollError::InactiveSubscription(member_id));
        }

        if self.classes.is_full(class_id) {
            let is_vip = self.oracle.is_vip_member(member_id);
            let waitlisted = self
                .classes
                .add_to_waitlist(class_id, member_id, is_vip, self.clock.now())
                .is_ok();
            return Err(EnrollError::ClassFull {
                class_id,
                member_id,
                waitlisted,
            });
        }

        self.classes.enroll(class_id, member_id);
        Ok(())
    }

    /// Frees the member's slot. The waitlist is left untouched: promotion
    /// is the separate `promote_next_waitlist_member` call.
    pub fn unenroll_member(
        &mut self,
        class_id: ClassId,
        member_id: MemberId,
    ) -> Result<(), UnenrollError> {
        if self.classes.get(class_id).is_none() {
            return Err(UnenrollError::ClassNotFound(class_id));
        }
        if !self.classes.cancel_enrollment(class_id, member_id) {
            return Err(UnenrollError::MemberNotEnrolled {
                class_id,
                member_id,
            });
        }
        Ok(())
    }

    /// Pops the front of the waitlist and runs it through the enrollment
    /// state machine. The popped entry is not restored when enrollment
    /// then fails (an inactive subscription forfeits the slot).
    pub fn promote_next_waitlist_member(
        &mut self,
        class_id: ClassId,
    ) -> Result<MemberId, PromoteError> {
        let class = self
            .classes
            .get(class_id)
            .ok_or(PromoteError::ClassNotFound(class_id))?;
        if class.is_full() {
            return Err(PromoteError::ClassFull(class_id));
        }

        let member_id = self
            .classes
            .pop_waitlist(class_id)
            .ok_or(PromoteError::WaitlistEmpty(class_id))?;

        self.enroll_member(class_id, member_id)
            .map_err(|source| PromoteError::Enroll { member_id, source })?;

        self.notifier.notify(ClassEvent::Promoted {
            class_id,
            member_id,
        });
        Ok(member_id)
    }

    /// Public waitlist entry point; join time comes from the injected
    /// clock.
    pub fn add_to_waitlist(
        &mut self,
        class_id: ClassId,
        member_id: MemberId,
        is_vip: bool,
    ) -> Result<(), LedgerError> {
        self.classes
            .add_to_waitlist(class_id, member_id, is_vip, self.clock.now())
    }

    /// Appends an immutable record and persists the whole ledger.
    pub fn record_attendance(
        &mut self,
        class_id: ClassId,
        member_id: MemberId,
        date: NaiveDate,
        attended: bool,
        amount_paid: Decimal,
    ) -> Result<(), LedgerError> {
        if self.classes.get(class_id).is_none() {
            return Err(LedgerError::ClassNotFound(class_id));
        }

        self.attendance.record(AttendanceRecord::new(
            class_id,
            member_id,
            date,
            attended,
            amount_paid,
        ))?;
        self.notifier.notify(ClassEvent::AttendanceRecorded {
            class_id,
            member_id,
        });
        Ok(())
    }

    /// Derives the report for the calendar month containing `month`
    /// without persisting it.
    pub fn generate_monthly_report(&self, month: NaiveDate) -> MonthlyReport {
        self.reports
            .generate(&self.classes, &self.attendance, month)
    }

    pub fn save_monthly_report(&self, report: &MonthlyReport) -> Result<(), LedgerError> {
        self.reports.save_monthly_report(report).map_err(Into::into)
    }

    /// Flushes dirty collections.
    pub fn save(&mut self) -> Result<()> {
        self.classes.save()
    }
}

impl Drop for Ledger {
    fn drop(&mut self) {
        if self.classes.is_dirty() {
            if let Err(err) = self.classes.save() {
                error!("Failed to save classes on shutdown: {err:#}");
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum EnrollError {
    #[error("Class not found: {0}")]
    ClassNotFound(ClassId),
    #[error("Member {0} is already signed up for this class")]
    AlreadySignedUp(MemberId),
    #[error("Only members with an active subscription can enroll")]
    InactiveSubscription(MemberId),
    #[error("Class {class_id} is full")]
    ClassFull {
        class_id: ClassId,
        member_id: MemberId,
        /// Whether this call placed the member on the waitlist (`false`
        /// when they were already queued).
        waitlisted: bool,
    },
}

#[derive(Debug, Error)]
pub enum UnenrollError {
    #[error("Class not found: {0}")]
    ClassNotFound(ClassId),
    #[error("Member {member_id} is not enrolled in class {class_id}")]
    MemberNotEnrolled {
        class_id: ClassId,
        member_id: MemberId,
    },
}

#[derive(Debug, Error)]
pub enum PromoteError {
    #[error("Class not found: {0}")]
    ClassNotFound(ClassId),
    #[error("Cannot promote into class {0}: it is already full")]
    ClassFull(ClassId),
    #[error("No members in the waitlist of class {0}")]
    WaitlistEmpty(ClassId),
    #[error("Promotion of member {member_id} failed")]
    Enroll {
        member_id: MemberId,
        #[source]
        source: EnrollError,
    },
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{TimeZone as _, Utc};
    use model::class::Class;
    use parking_lot::Mutex;
    use sim_time::SimClock;
    use tempfile::TempDir;

    use super::*;

    struct StubOracle {
        active: HashSet<MemberId>,
        vip: HashSet<MemberId>,
    }

    impl StubOracle {
        fn everyone_active(vip: &[i64]) -> Arc<StubOracle> {
            Arc::new(StubOracle {
                active: (1..100).map(MemberId::new).collect(),
                vip: vip.iter().copied().map(MemberId::new).collect(),
            })
        }
    }

    impl SubscriptionOracle for StubOracle {
        fn is_subscription_active(&self, member_id: MemberId) -> bool {
            self.active.contains(&member_id)
        }

        fn is_vip_member(&self, member_id: MemberId) -> bool {
            self.vip.contains(&member_id)
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn clock() -> Arc<SimClock> {
        Arc::new(SimClock::start_paused(
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single().unwrap(),
            1.0,
        ))
    }

    fn ledger_in(dir: &TempDir, oracle: Arc<StubOracle>) -> Ledger {
        let storage = Storage::open(dir.path()).unwrap();
        Ledger::new(storage, oracle, clock())
    }

    fn add_class(ledger: &mut Ledger, name: &str, capacity: u32) -> ClassId {
        ledger
            .classes
            .add_class(Class::new(
                name,
                "Coach",
                date(2024, 1, 1),
                date(2024, 12, 31),
                capacity,
            ))
            .unwrap()
    }

    #[test]
    fn test_enroll_until_full_then_waitlist() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger_in(&dir, StubOracle::everyone_active(&[]));
        let class_id = add_class(&mut ledger, "Yoga", 1);

        ledger.enroll_member(class_id, MemberId::new(7)).unwrap();
        assert_eq!(ledger.classes.enrolled_count(class_id), 1);
        assert!(ledger.classes.is_full(class_id));

        let err = ledger.enroll_member(class_id, MemberId::new(8)).unwrap_err();
        assert!(matches!(
            err,
            EnrollError::ClassFull {
                waitlisted: true,
                ..
            }
        ));
        assert_eq!(ledger.classes.waitlist(class_id), vec![MemberId::new(8)]);
        assert_eq!(ledger.classes.enrolled_count(class_id), 1);
    }

    #[test]
    fn test_capacity_invariant_over_many_attempts() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger_in(&dir, StubOracle::everyone_active(&[]));
        let class_id = add_class(&mut ledger, "HIIT", 3);

        for member in 1..20 {
            let _ = ledger.enroll_member(class_id, MemberId::new(member));
            assert!(
                ledger.classes.enrolled_count(class_id)
                    <= ledger.classes.get(class_id).unwrap().capacity
            );
        }
        assert_eq!(ledger.classes.enrolled_count(class_id), 3);
        assert_eq!(ledger.classes.waitlist_size(class_id), 16);
    }

    #[test]
    fn test_enroll_unknown_class() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger_in(&dir, StubOracle::everyone_active(&[]));

        let err = ledger
            .enroll_member(ClassId::new(42), MemberId::new(1))
            .unwrap_err();
        assert!(matches!(err, EnrollError::ClassNotFound(_)));
    }

    #[test]
    fn test_enroll_requires_active_subscription() {
        let dir = TempDir::new().unwrap();
        let oracle = Arc::new(StubOracle {
            active: HashSet::new(),
            vip: HashSet::new(),
        });
        let mut ledger = ledger_in(&dir, oracle);
        let class_id = add_class(&mut ledger, "Yoga", 5);

        let err = ledger.enroll_member(class_id, MemberId::new(1)).unwrap_err();
        assert!(matches!(err, EnrollError::InactiveSubscription(_)));
        assert_eq!(ledger.classes.enrolled_count(class_id), 0);
    }

    #[test]
    fn test_enroll_twice_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger_in(&dir, StubOracle::everyone_active(&[]));
        let class_id = add_class(&mut ledger, "Yoga", 5);

        ledger.enroll_member(class_id, MemberId::new(7)).unwrap();
        let err = ledger.enroll_member(class_id, MemberId::new(7)).unwrap_err();
        assert!(matches!(err, EnrollError::AlreadySignedUp(_)));
        assert_eq!(ledger.classes.enrolled_count(class_id), 1);
    }

    #[test]
    fn test_vip_skips_ahead_of_earlier_regular() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger_in(&dir, StubOracle::everyone_active(&[9]));
        let class_id = add_class(&mut ledger, "Yoga", 1);
        ledger.enroll_member(class_id, MemberId::new(1)).unwrap();

        // Regular member 5 queues first, VIP 9 later.
        let _ = ledger.enroll_member(class_id, MemberId::new(5));
        let _ = ledger.enroll_member(class_id, MemberId::new(9));

        assert_eq!(
            ledger.classes.next_waitlist_member(class_id),
            Some(MemberId::new(9))
        );
        assert_eq!(
            ledger.classes.waitlist(class_id),
            vec![MemberId::new(9), MemberId::new(5)]
        );
    }

    #[test]
    fn test_unenroll_does_not_promote() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger_in(&dir, StubOracle::everyone_active(&[]));
        let class_id = add_class(&mut ledger, "Yoga", 1);
        ledger.enroll_member(class_id, MemberId::new(7)).unwrap();
        let _ = ledger.enroll_member(class_id, MemberId::new(8));

        ledger.unenroll_member(class_id, MemberId::new(7)).unwrap();

        assert_eq!(ledger.classes.enrolled_count(class_id), 0);
        assert!(!ledger.classes.is_member_enrolled(class_id, MemberId::new(8)));
        assert_eq!(ledger.classes.waitlist(class_id), vec![MemberId::new(8)]);
    }

    #[test]
    fn test_unenroll_unknown_member() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger_in(&dir, StubOracle::everyone_active(&[]));
        let class_id = add_class(&mut ledger, "Yoga", 2);

        let err = ledger
            .unenroll_member(class_id, MemberId::new(3))
            .unwrap_err();
        assert!(matches!(err, UnenrollError::MemberNotEnrolled { .. }));
    }

    #[test]
    fn test_promote_after_unenroll() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger_in(&dir, StubOracle::everyone_active(&[]));
        let class_id = add_class(&mut ledger, "Yoga", 1);
        ledger.enroll_member(class_id, MemberId::new(7)).unwrap();
        let _ = ledger.enroll_member(class_id, MemberId::new(8));

        ledger.unenroll_member(class_id, MemberId::new(7)).unwrap();
        let promoted = ledger.promote_next_waitlist_member(class_id).unwrap();

        assert_eq!(promoted, MemberId::new(8));
        assert!(ledger.classes.is_member_enrolled(class_id, MemberId::new(8)));
        assert_eq!(ledger.classes.enrolled_count(class_id), 1);
        assert_eq!(ledger.classes.waitlist_size(class_id), 0);
    }

    #[test]
    fn test_promote_into_full_class_fails() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger_in(&dir, StubOracle::everyone_active(&[]));
        let class_id = add_class(&mut ledger, "Yoga", 1);
        ledger.enroll_member(class_id, MemberId::new(7)).unwrap();
        let _ = ledger.enroll_member(class_id, MemberId::new(8));

        let err = ledger.promote_next_waitlist_member(class_id).unwrap_err();
        assert!(matches!(err, PromoteError::ClassFull(_)));
        assert_eq!(ledger.classes.waitlist(class_id), vec![MemberId::new(8)]);
    }

    #[test]
    fn test_promote_forfeits_slot_of_inactive_member() {
        let dir = TempDir::new().unwrap();
        let oracle = Arc::new(StubOracle {
            active: [MemberId::new(7)].into_iter().collect(),
            vip: HashSet::new(),
        });
        let storage = Storage::open(dir.path()).unwrap();
        let mut ledger = Ledger::new(storage, oracle, clock());
        let class_id = add_class(&mut ledger, "Yoga", 1);
        ledger.enroll_member(class_id, MemberId::new(7)).unwrap();
        ledger
            .add_to_waitlist(class_id, MemberId::new(8), false)
            .unwrap();

        ledger.unenroll_member(class_id, MemberId::new(7)).unwrap();
        let err = ledger.promote_next_waitlist_member(class_id).unwrap_err();

        assert!(matches!(
            err,
            PromoteError::Enroll {
                source: EnrollError::InactiveSubscription(_),
                ..
            }
        ));
        // The popped entry is gone; the next promotion sees an empty queue.
        let err = ledger.promote_next_waitlist_member(class_id).unwrap_err();
        assert!(matches!(err, PromoteError::WaitlistEmpty(_)));
    }

    #[test]
    fn test_member_class_history_follows_enrollment() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger_in(&dir, StubOracle::everyone_active(&[]));
        let yoga = add_class(&mut ledger, "Yoga", 5);
        let boxing = add_class(&mut ledger, "Boxing", 5);

        ledger.enroll_member(yoga, MemberId::new(7)).unwrap();
        ledger.enroll_member(boxing, MemberId::new(7)).unwrap();
        assert_eq!(
            ledger.classes.classes_of_member(MemberId::new(7)),
            vec![yoga, boxing]
        );

        ledger.unenroll_member(yoga, MemberId::new(7)).unwrap();
        assert_eq!(
            ledger.classes.classes_of_member(MemberId::new(7)),
            vec![boxing]
        );
    }

    #[test]
    fn test_record_attendance_and_queries() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger_in(&dir, StubOracle::everyone_active(&[]));
        let class_id = add_class(&mut ledger, "Yoga", 5);
        let day = date(2024, 2, 14);

        ledger
            .record_attendance(class_id, MemberId::new(9), day, true, Decimal::int(20))
            .unwrap();

        assert_eq!(ledger.attendance.count_on(class_id, day), 1);
        assert_eq!(
            ledger.attendance.revenue_between(class_id, day, day),
            Decimal::int(20)
        );
    }

    #[test]
    fn test_unattended_payment_counts_toward_revenue_not_attendance() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger_in(&dir, StubOracle::everyone_active(&[]));
        let class_id = add_class(&mut ledger, "Yoga", 5);
        let day = date(2024, 2, 14);

        ledger
            .record_attendance(class_id, MemberId::new(9), day, false, Decimal::int(15))
            .unwrap();

        assert_eq!(ledger.attendance.count_on(class_id, day), 0);
        assert_eq!(
            ledger.attendance.revenue_between(class_id, day, day),
            Decimal::int(15)
        );
    }

    #[test]
    fn test_record_attendance_unknown_class() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger_in(&dir, StubOracle::everyone_active(&[]));

        let err = ledger
            .record_attendance(
                ClassId::new(3),
                MemberId::new(9),
                date(2024, 2, 14),
                true,
                Decimal::int(20),
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::ClassNotFound(_)));
    }

    #[test]
    fn test_monthly_report_aggregation() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger_in(&dir, StubOracle::everyone_active(&[]));
        let yoga = add_class(&mut ledger, "Yoga", 5);
        let boxing = add_class(&mut ledger, "Boxing", 5);
        let idle = add_class(&mut ledger, "Spin", 5);

        ledger
            .record_attendance(yoga, MemberId::new(1), date(2024, 2, 5), true, Decimal::int(20))
            .unwrap();
        ledger
            .record_attendance(yoga, MemberId::new(2), date(2024, 2, 12), true, Decimal::int(20))
            .unwrap();
        // Same member twice: one active member, two attendances.
        ledger
            .record_attendance(boxing, MemberId::new(1), date(2024, 2, 19), true, Decimal::int(30))
            .unwrap();
        // No-show with payment: held, but no attendance and no report revenue.
        ledger
            .record_attendance(idle, MemberId::new(3), date(2024, 2, 20), false, Decimal::int(10))
            .unwrap();
        // Outside the month.
        ledger
            .record_attendance(yoga, MemberId::new(4), date(2024, 3, 1), true, Decimal::int(20))
            .unwrap();

        let report = ledger.generate_monthly_report(date(2024, 2, 14));

        assert_eq!(report.total_active_members, 2);
        assert_eq!(report.total_classes_held, 3);
        assert_eq!(report.total_attendance, 3);
        assert_eq!(report.total_revenue, Decimal::int(70));
        assert_eq!(report.class_attendance.len(), 2);
        assert_eq!(report.class_revenue.len(), 2);

        let yoga_attendance = report
            .class_attendance
            .iter()
            .find(|entry| entry.class_name == "Yoga")
            .unwrap();
        assert_eq!(yoga_attendance.count, 2);
    }

    #[test]
    fn test_generate_does_not_persist_until_saved() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger_in(&dir, StubOracle::everyone_active(&[]));
        let class_id = add_class(&mut ledger, "Yoga", 5);
        ledger
            .record_attendance(class_id, MemberId::new(1), date(2024, 2, 5), true, Decimal::int(20))
            .unwrap();

        let window = (date(2000, 1, 1), date(2100, 12, 31));
        let report = ledger.generate_monthly_report(date(2024, 2, 1));
        assert!(ledger.reports.monthly_reports(window.0, window.1).is_empty());

        ledger.save_monthly_report(&report).unwrap();
        ledger.save_monthly_report(&report).unwrap();
        assert_eq!(ledger.reports.monthly_reports(window.0, window.1).len(), 2);
    }

    #[test]
    fn test_save_round_trips_through_storage() {
        let dir = TempDir::new().unwrap();
        let class_id;
        {
            let mut ledger = ledger_in(&dir, StubOracle::everyone_active(&[]));
            class_id = add_class(&mut ledger, "Yoga", 2);
            ledger.enroll_member(class_id, MemberId::new(7)).unwrap();
            ledger.classes.add_session(class_id, date(2024, 2, 5)).unwrap();
            ledger.save().unwrap();
            assert!(!ledger.classes.is_dirty());
        }

        let reloaded = ledger_in(&dir, StubOracle::everyone_active(&[]));
        let class = reloaded.classes.get(class_id).unwrap();
        assert_eq!(class.name, "Yoga");
        assert_eq!(class.enrolled_count(), 1);
        assert_eq!(reloaded.classes.sessions(class_id), vec![date(2024, 2, 5)]);
        // The member set does not survive a reload; only the count does.
        assert!(!reloaded.classes.is_member_enrolled(class_id, MemberId::new(7)));
    }

    #[test]
    fn test_dirty_state_flushes_on_drop() {
        let dir = TempDir::new().unwrap();
        let class_id;
        {
            let mut ledger = ledger_in(&dir, StubOracle::everyone_active(&[]));
            class_id = add_class(&mut ledger, "Yoga", 2);
            // No explicit save.
        }

        let reloaded = ledger_in(&dir, StubOracle::everyone_active(&[]));
        assert!(reloaded.classes.get(class_id).is_some());
    }

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<ClassEvent>>,
    }

    impl ClassObserver for RecordingObserver {
        fn on_class_changed(&self, event: &ClassEvent) {
            self.events.lock().push(event.clone());
        }
    }

    #[test]
    fn test_observers_see_state_changes() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger_in(&dir, StubOracle::everyone_active(&[]));
        let observer = Arc::new(RecordingObserver::default());
        ledger.subscribe(observer.clone());

        let class_id = add_class(&mut ledger, "Yoga", 1);
        ledger.enroll_member(class_id, MemberId::new(7)).unwrap();
        let _ = ledger.enroll_member(class_id, MemberId::new(8));
        ledger.unenroll_member(class_id, MemberId::new(7)).unwrap();

        let events = observer.events.lock();
        assert_eq!(
            *events,
            vec![
                ClassEvent::Created(class_id),
                ClassEvent::Enrolled {
                    class_id,
                    member_id: MemberId::new(7)
                },
                ClassEvent::Waitlisted {
                    class_id,
                    member_id: MemberId::new(8)
                },
                ClassEvent::Unenrolled {
                    class_id,
                    member_id: MemberId::new(7)
                },
            ]
        );
    }

    #[test]
    fn test_class_queries_by_coach_and_date() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger_in(&dir, StubOracle::everyone_active(&[]));
        let yoga = ledger
            .classes
            .add_class(Class::new("Yoga", "Sara", date(2024, 1, 1), date(2024, 6, 30), 5))
            .unwrap();
        let boxing = ledger
            .classes
            .add_class(Class::new("Boxing", "Omar", date(2024, 1, 1), date(2024, 6, 30), 5))
            .unwrap();
        ledger.classes.add_session(yoga, date(2024, 2, 5)).unwrap();
        ledger.classes.add_session(boxing, date(2024, 2, 6)).unwrap();

        let by_sara = ledger.classes.by_coach("Sara");
        assert_eq!(by_sara.len(), 1);
        assert_eq!(by_sara[0].id, yoga);

        let on_feb_6 = ledger.classes.by_date(date(2024, 2, 6));
        assert_eq!(on_feb_6.len(), 1);
        assert_eq!(on_feb_6[0].id, boxing);
    }

    #[test]
    fn test_remove_session_through_registry() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger_in(&dir, StubOracle::everyone_active(&[]));
        let class_id = add_class(&mut ledger, "Yoga", 5);
        ledger.classes.add_session(class_id, date(2024, 1, 1)).unwrap();
        ledger.classes.add_session(class_id, date(2024, 1, 8)).unwrap();

        ledger.classes.remove_session(class_id, date(2024, 1, 1)).unwrap();

        assert_eq!(ledger.classes.sessions(class_id), vec![date(2024, 1, 8)]);
    }

    #[test]
    fn test_waitlist_registry_boundary_errors() {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger_in(&dir, StubOracle::everyone_active(&[]));
        let class_id = add_class(&mut ledger, "Yoga", 5);

        ledger
            .add_to_waitlist(class_id, MemberId::new(4), false)
            .unwrap();
        let err = ledger
            .add_to_waitlist(class_id, MemberId::new(4), false)
            .unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyWaitlisted { .. }));

        let err = ledger
            .add_to_waitlist(ClassId::new(99), MemberId::new(4), false)
            .unwrap_err();
        assert!(matches!(err, LedgerError::ClassNotFound(_)));

        ledger
            .classes
            .remove_from_waitlist(class_id, MemberId::new(4))
            .unwrap();
        let err = ledger
            .classes
            .remove_from_waitlist(class_id, MemberId::new(4))
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotWaitlisted { .. }));
    }
}
