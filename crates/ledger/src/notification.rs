use std::sync::Arc;

use model::ids::{ClassId, MemberId};
use parking_lot::Mutex;

/// What changed. The presentation layer subscribes to refresh itself;
/// nothing in the core depends on who is listening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassEvent {
    Created(ClassId),
    Updated(ClassId),
    Deleted(ClassId),
    Enrolled {
        class_id: ClassId,
        member_id: MemberId,
    },
    Unenrolled {
        class_id: ClassId,
        member_id: MemberId,
    },
    Waitlisted {
        class_id: ClassId,
        member_id: MemberId,
    },
    Promoted {
        class_id: ClassId,
        member_id: MemberId,
    },
    SessionsChanged(ClassId),
    AttendanceRecorded {
        class_id: ClassId,
        member_id: MemberId,
    },
}

pub trait ClassObserver: Send + Sync {
    fn on_class_changed(&self, event: &ClassEvent);
}

#[derive(Clone, Default)]
pub struct Notifier {
    observers: Arc<Mutex<Vec<Arc<dyn ClassObserver>>>>,
}

impl Notifier {
    pub fn subscribe(&self, observer: Arc<dyn ClassObserver>) {
        self.observers.lock().push(observer);
    }

    pub(crate) fn notify(&self, event: ClassEvent) {
        for observer in self.observers.lock().iter() {
            observer.on_class_changed(&event);
        }
    }
}
