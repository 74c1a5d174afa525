use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Class ids are positive and assigned by the registry on `add_class`.
/// A freshly constructed class carries `ClassId::UNASSIGNED`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ClassId(i64);

impl ClassId {
    pub const UNASSIGNED: ClassId = ClassId(0);

    pub fn new(id: i64) -> ClassId {
        ClassId(id)
    }

    pub fn inner(&self) -> i64 {
        self.0
    }

    pub fn is_assigned(&self) -> bool {
        self.0 > 0
    }

    pub fn next(&self) -> ClassId {
        ClassId(self.0 + 1)
    }
}

impl Display for ClassId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MemberId(i64);

impl MemberId {
    pub fn new(id: i64) -> MemberId {
        MemberId(id)
    }

    pub fn inner(&self) -> i64 {
        self.0
    }
}

impl Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
