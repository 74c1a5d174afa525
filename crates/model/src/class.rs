use std::collections::{BTreeSet, VecDeque};

use chrono::NaiveDate;

use crate::{
    ids::{ClassId, MemberId},
    waitlist::PriorityWaitlist,
};

/// A scheduled group activity with bounded capacity.
///
/// The stored enrolled count and the member set are tracked separately: the
/// persisted form keeps only the count, so after a reload the count is the
/// single authoritative enrollment figure (see `set_enrolled`).
#[derive(Debug, Clone, Default)]
pub struct Class {
    pub id: ClassId,
    pub name: String,
    pub coach_name: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub capacity: u32,
    enrolled: u32,
    enrolled_members: BTreeSet<MemberId>,
    sessions: VecDeque<NaiveDate>,
    waitlist: PriorityWaitlist,
}

impl Class {
    pub fn new(
        name: impl Into<String>,
        coach_name: impl Into<String>,
        from_date: NaiveDate,
        to_date: NaiveDate,
        capacity: u32,
    ) -> Class {
        Class {
            id: ClassId::UNASSIGNED,
            name: name.into(),
            coach_name: coach_name.into(),
            from_date,
            to_date,
            capacity,
            enrolled: 0,
            enrolled_members: BTreeSet::new(),
            sessions: VecDeque::new(),
            waitlist: PriorityWaitlist::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.enrolled >= self.capacity
    }

    pub fn enrolled_count(&self) -> u32 {
        self.enrolled
    }

    /// Sets the stored enrolled count, clamping upward to the member-set
    /// size. The count is never clamped downward: the persisted form drops
    /// the member set, so a count above `enrolled_members.len()` is the
    /// normal state after a reload.
    pub fn set_enrolled(&mut self, count: u32) {
        let members = self.enrolled_members.len() as u32;
        self.enrolled = count.max(members);
    }

    pub fn add_member(&mut self, member_id: MemberId) {
        self.enrolled_members.insert(member_id);
    }

    pub fn remove_member(&mut self, member_id: MemberId) -> bool {
        self.enrolled_members.remove(&member_id)
    }

    pub fn is_member_enrolled(&self, member_id: MemberId) -> bool {
        self.enrolled_members.contains(&member_id)
    }

    pub fn enrolled_members(&self) -> impl Iterator<Item = MemberId> + '_ {
        self.enrolled_members.iter().copied()
    }

    /// Removes the member and resets the count to the member-set size.
    /// Returns whether the member was enrolled. Freeing the slot does not
    /// promote anyone from the waitlist; promotion is an explicit registry
    /// operation.
    pub fn cancel_enrollment(&mut self, member_id: MemberId) -> bool {
        if self.enrolled_members.remove(&member_id) {
            self.enrolled = self.enrolled_members.len() as u32;
            true
        } else {
            false
        }
    }

    /// Appends unconditionally; the session queue keeps duplicates.
    pub fn add_session(&mut self, date: NaiveDate) {
        self.sessions.push_back(date);
    }

    /// Drops every session equal to `date`, not just the first.
    pub fn remove_session(&mut self, date: NaiveDate) {
        self.sessions.retain(|session| *session != date);
    }

    pub fn has_session_on(&self, date: NaiveDate) -> bool {
        self.sessions.iter().any(|session| *session == date)
    }

    pub fn sessions(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.sessions.iter().copied()
    }

    pub fn waitlist(&self) -> &PriorityWaitlist {
        &self.waitlist
    }

    pub fn waitlist_mut(&mut self) -> &mut PriorityWaitlist {
        &mut self.waitlist
    }
}
