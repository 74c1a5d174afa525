use thiserror::Error;

use crate::ids::{ClassId, MemberId};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Common error: {0}")]
    Common(#[from] eyre::Error),
    #[error("Class not found: {0}")]
    ClassNotFound(ClassId),
    #[error("Class already has an id ({0})")]
    ClassAlreadyExists(ClassId),
    #[error("Invalid class id")]
    InvalidClassId,
    #[error("Member {member_id} is not enrolled in class {class_id}")]
    MemberNotEnrolled {
        class_id: ClassId,
        member_id: MemberId,
    },
    #[error("Member {member_id} is already in the waitlist of class {class_id}")]
    AlreadyWaitlisted {
        class_id: ClassId,
        member_id: MemberId,
    },
    #[error("Member {member_id} is not in the waitlist of class {class_id}")]
    NotWaitlisted {
        class_id: ClassId,
        member_id: MemberId,
    },
}
