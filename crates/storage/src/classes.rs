use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use eyre::{Context as _, Result};
use model::{class::Class, ids::ClassId};
use serde::{Deserialize, Serialize};

const FILE: &str = "classes.json";

/// On-disk form of a class. The enrolled-member set and the waitlist are
/// not part of the format and do not survive a reload; only the enrolled
/// count does. This is a known limitation of the data files, kept for
/// compatibility with them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredClass {
    pub id: ClassId,
    pub class_name: String,
    pub coach_name: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub capacity: u32,
    pub num_of_enrolled: u32,
    pub sessions: Vec<NaiveDate>,
}

impl From<&Class> for StoredClass {
    fn from(class: &Class) -> StoredClass {
        StoredClass {
            id: class.id,
            class_name: class.name.clone(),
            coach_name: class.coach_name.clone(),
            from: class.from_date,
            to: class.to_date,
            capacity: class.capacity,
            num_of_enrolled: class.enrolled_count(),
            sessions: class.sessions().collect(),
        }
    }
}

impl StoredClass {
    pub fn into_class(self) -> Class {
        let mut class = Class::new(
            self.class_name,
            self.coach_name,
            self.from,
            self.to,
            self.capacity,
        );
        class.id = self.id;
        class.set_enrolled(self.num_of_enrolled);
        for session in self.sessions {
            class.add_session(session);
        }
        class
    }
}

pub struct ClassStore {
    path: PathBuf,
}

impl ClassStore {
    pub(crate) fn open(dir: &Path) -> Result<ClassStore> {
        let path = dir.join(FILE);
        if !path.exists() {
            fs::write(&path, "[]")
                .with_context(|| format!("Failed to seed {}", path.display()))?;
        }
        Ok(ClassStore { path })
    }

    pub fn load(&self) -> Vec<Class> {
        crate::read_collection::<StoredClass>(&self.path)
            .into_iter()
            .map(StoredClass::into_class)
            .collect()
    }

    pub fn save<'a>(&self, classes: impl IntoIterator<Item = &'a Class>) -> Result<()> {
        let stored: Vec<StoredClass> = classes.into_iter().map(StoredClass::from).collect();
        crate::write_collection(&self.path, &stored)
    }
}
