use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use eyre::Result;
use log::info;
use model::{
    class::Class,
    errors::LedgerError,
    ids::{ClassId, MemberId},
};
use storage::classes::ClassStore;

use crate::notification::{ClassEvent, Notifier};

/// The class collection: in-memory map keyed by id, dirty flag, store
/// handle. All capacity decisions live in the registry's enrollment state
/// machine; this service owns CRUD, sessions, and the waitlist
/// pass-throughs.
pub struct Classes {
    store: ClassStore,
    by_id: HashMap<ClassId, Class>,
    member_history: HashMap<MemberId, Vec<ClassId>>,
    dirty: bool,
    notifier: Notifier,
}

impl Classes {
    pub(crate) fn load(store: ClassStore, notifier: Notifier) -> Classes {
        let by_id: HashMap<ClassId, Class> = store
            .load()
            .into_iter()
            .map(|class| (class.id, class))
            .collect();
        info!("Loaded {} classes", by_id.len());

        Classes {
            store,
            by_id,
            member_history: HashMap::new(),
            dirty: false,
            notifier,
        }
    }

    /// Assigns the next free id. Rejects a class that already carries one.
    pub fn add_class(&mut self, mut class: Class) -> Result<ClassId, LedgerError> {
        if class.id.is_assigned() {
            return Err(LedgerError::ClassAlreadyExists(class.id));
        }

        let id = self.next_id();
        class.id = id;
        self.by_id.insert(id, class);
        self.dirty = true;
        self.notifier.notify(ClassEvent::Created(id));
        Ok(id)
    }

    fn next_id(&self) -> ClassId {
        self.by_id
            .keys()
            .max()
            .map(ClassId::next)
            .unwrap_or_else(|| ClassId::new(1))
    }

    /// Wholesale replacement of an existing class.
    pub fn update_class(&mut self, class: Class) -> Result<(), LedgerError> {
        if !class.id.is_assigned() {
            return Err(LedgerError::InvalidClassId);
        }
        if !self.by_id.contains_key(&class.id) {
            return Err(LedgerError::ClassNotFound(class.id));
        }

        let id = class.id;
        self.by_id.insert(id, class);
        self.dirty = true;
        self.notifier.notify(ClassEvent::Updated(id));
        Ok(())
    }

    pub fn delete_class(&mut self, class_id: ClassId) -> Result<(), LedgerError> {
        if self.by_id.remove(&class_id).is_none() {
            return Err(LedgerError::ClassNotFound(class_id));
        }

        self.dirty = true;
        self.notifier.notify(ClassEvent::Deleted(class_id));
        Ok(())
    }

    pub fn get(&self, class_id: ClassId) -> Option<&Class> {
        self.by_id.get(&class_id)
    }

    pub fn all(&self) -> Vec<&Class> {
        let mut classes: Vec<&Class> = self.by_id.values().collect();
        classes.sort_by_key(|class| class.id);
        classes
    }

    pub fn by_coach(&self, coach_name: &str) -> Vec<&Class> {
        self.all()
            .into_iter()
            .filter(|class| class.coach_name == coach_name)
            .collect()
    }

    /// Classes holding a session on the given date.
    pub fn by_date(&self, date: NaiveDate) -> Vec<&Class> {
        self.all()
            .into_iter()
            .filter(|class| class.has_session_on(date))
            .collect()
    }

    pub fn add_session(&mut self, class_id: ClassId, date: NaiveDate) -> Result<(), LedgerError> {
        let class = self
            .by_id
            .get_mut(&class_id)
            .ok_or(LedgerError::ClassNotFound(class_id))?;
        class.add_session(date);
        self.dirty = true;
        self.notifier.notify(ClassEvent::SessionsChanged(class_id));
        Ok(())
    }

    /// Drops every session on `date`.
    pub fn remove_session(&mut self, class_id: ClassId, date: NaiveDate) -> Result<(), LedgerError> {
        let class = self
            .by_id
            .get_mut(&class_id)
            .ok_or(LedgerError::ClassNotFound(class_id))?;
        class.remove_session(date);
        self.dirty = true;
        self.notifier.notify(ClassEvent::SessionsChanged(class_id));
        Ok(())
    }

    /// Session dates in FIFO order; empty for an unknown class.
    pub fn sessions(&self, class_id: ClassId) -> Vec<NaiveDate> {
        self.by_id
            .get(&class_id)
            .map(|class| class.sessions().collect())
            .unwrap_or_default()
    }

    pub fn add_to_waitlist(
        &mut self,
        class_id: ClassId,
        member_id: MemberId,
        is_vip: bool,
        joined_at: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        let class = self
            .by_id
            .get_mut(&class_id)
            .ok_or(LedgerError::ClassNotFound(class_id))?;
        if class.waitlist().contains(member_id) {
            return Err(LedgerError::AlreadyWaitlisted {
                class_id,
                member_id,
            });
        }

        class
            .waitlist_mut()
            .add_member_with_time(member_id, is_vip, joined_at);
        self.dirty = true;
        self.notifier.notify(ClassEvent::Waitlisted {
            class_id,
            member_id,
        });
        Ok(())
    }

    pub fn remove_from_waitlist(
        &mut self,
        class_id: ClassId,
        member_id: MemberId,
    ) -> Result<(), LedgerError> {
        let class = self
            .by_id
            .get_mut(&class_id)
            .ok_or(LedgerError::ClassNotFound(class_id))?;
        if !class.waitlist_mut().remove_member(member_id) {
            return Err(LedgerError::NotWaitlisted {
                class_id,
                member_id,
            });
        }

        self.dirty = true;
        Ok(())
    }

    pub fn next_waitlist_member(&self, class_id: ClassId) -> Option<MemberId> {
        self.by_id
            .get(&class_id)
            .and_then(|class| class.waitlist().next_member())
    }

    /// Waitlisted member ids in priority order; empty for an unknown class.
    pub fn waitlist(&self, class_id: ClassId) -> Vec<MemberId> {
        self.by_id
            .get(&class_id)
            .map(|class| class.waitlist().members())
            .unwrap_or_default()
    }

    pub fn waitlist_size(&self, class_id: ClassId) -> usize {
        self.by_id
            .get(&class_id)
            .map(|class| class.waitlist().len())
            .unwrap_or(0)
    }

    pub(crate) fn pop_waitlist(&mut self, class_id: ClassId) -> Option<MemberId> {
        let member = self
            .by_id
            .get_mut(&class_id)
            .and_then(|class| class.waitlist_mut().pop_next_member());
        if member.is_some() {
            self.dirty = true;
        }
        member
    }

    pub fn is_full(&self, class_id: ClassId) -> bool {
        self.by_id
            .get(&class_id)
            .map(|class| class.is_full())
            .unwrap_or(false)
    }

    pub fn enrolled_count(&self, class_id: ClassId) -> u32 {
        self.by_id
            .get(&class_id)
            .map(|class| class.enrolled_count())
            .unwrap_or(0)
    }

    pub fn is_member_enrolled(&self, class_id: ClassId, member_id: MemberId) -> bool {
        self.by_id
            .get(&class_id)
            .map(|class| class.is_member_enrolled(member_id))
            .unwrap_or(false)
    }

    /// Classes the member has enrolled into during this run, oldest first.
    pub fn classes_of_member(&self, member_id: MemberId) -> Vec<ClassId> {
        self.member_history
            .get(&member_id)
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn enroll(&mut self, class_id: ClassId, member_id: MemberId) {
        if let Some(class) = self.by_id.get_mut(&class_id) {
            class.add_member(member_id);
            let count = class.enrolled_count() + 1;
            class.set_enrolled(count);
            self.member_history
                .entry(member_id)
                .or_default()
                .push(class_id);
            self.dirty = true;
            self.notifier.notify(ClassEvent::Enrolled {
                class_id,
                member_id,
            });
        }
    }

    pub(crate) fn cancel_enrollment(&mut self, class_id: ClassId, member_id: MemberId) -> bool {
        let Some(class) = self.by_id.get_mut(&class_id) else {
            return false;
        };
        if !class.cancel_enrollment(member_id) {
            return false;
        }

        if let Some(history) = self.member_history.get_mut(&member_id) {
            history.retain(|id| *id != class_id);
        }
        self.dirty = true;
        self.notifier.notify(ClassEvent::Unenrolled {
            class_id,
            member_id,
        });
        true
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Persists the collection when the dirty flag is set.
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        self.store.save(self.all())?;
        self.dirty = false;
        Ok(())
    }
}
