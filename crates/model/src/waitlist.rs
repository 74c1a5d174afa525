use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::MemberId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub member_id: MemberId,
    pub is_vip: bool,
    pub joined_at: DateTime<Utc>,
}

/// Priority rank of a waitlist entry. VIP entries sort before regular ones,
/// earlier join times before later ones; member id breaks exact-time ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Rank {
    regular: bool,
    joined_at: DateTime<Utc>,
    member_id: MemberId,
}

impl Rank {
    fn of(entry: &WaitlistEntry) -> Rank {
        Rank {
            regular: !entry.is_vip,
            joined_at: entry.joined_at,
            member_id: entry.member_id,
        }
    }
}

/// Overflow queue for a single class: members waiting for an enrollment
/// slot, ranked by VIP status first and join time second. A member appears
/// at most once.
#[derive(Debug, Clone, Default)]
pub struct PriorityWaitlist {
    order: BTreeSet<Rank>,
    members: HashMap<MemberId, WaitlistEntry>,
}

impl PriorityWaitlist {
    pub fn new() -> PriorityWaitlist {
        PriorityWaitlist::default()
    }

    pub fn add_member(&mut self, member_id: MemberId, is_vip: bool) {
        self.add_member_with_time(member_id, is_vip, Utc::now());
    }

    /// No-op when the member is already queued.
    pub fn add_member_with_time(
        &mut self,
        member_id: MemberId,
        is_vip: bool,
        joined_at: DateTime<Utc>,
    ) {
        if self.members.contains_key(&member_id) {
            return;
        }

        let entry = WaitlistEntry {
            member_id,
            is_vip,
            joined_at,
        };
        self.order.insert(Rank::of(&entry));
        self.members.insert(member_id, entry);
    }

    /// Returns whether the member was queued.
    pub fn remove_member(&mut self, member_id: MemberId) -> bool {
        match self.members.remove(&member_id) {
            Some(entry) => {
                self.order.remove(&Rank::of(&entry));
                true
            }
            None => false,
        }
    }

    /// Peeks the highest-priority member without mutating the queue.
    pub fn next_member(&self) -> Option<MemberId> {
        self.order.first().map(|rank| rank.member_id)
    }

    /// Removes and returns the highest-priority member.
    pub fn pop_next_member(&mut self) -> Option<MemberId> {
        let rank = self.order.pop_first()?;
        self.members.remove(&rank.member_id);
        Some(rank.member_id)
    }

    pub fn contains(&self, member_id: MemberId) -> bool {
        self.members.contains_key(&member_id)
    }

    /// Member ids in priority order.
    pub fn members(&self) -> Vec<MemberId> {
        self.order.iter().map(|rank| rank.member_id).collect()
    }

    /// Full entries in priority order.
    pub fn entries(&self) -> Vec<&WaitlistEntry> {
        self.order
            .iter()
            .filter_map(|rank| self.members.get(&rank.member_id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }
}
