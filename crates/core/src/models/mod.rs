pub mod class;
pub mod common;
pub mod course;
pub mod enrollment;
pub mod grade;
pub mod student;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use class::Class;
use common::{Collection, EntityId};
use course::Course;
use enrollment::Enrollment;
use grade::Grade;
use student::Student;

/// A record stored in one of the API's collections.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Request body for create and full-replace update (the entity minus its id).
    type Draft: Draft;

    const COLLECTION: Collection;

    fn id(&self) -> EntityId;

    /// Full body suitable for a PUT of this record.
    fn to_draft(&self) -> Self::Draft;

    fn rows(collections: &Collections) -> &[Self];

    fn rows_mut(collections: &mut Collections) -> &mut Vec<Self>;
}

/// Entity body without an id. Validated before any request is issued.
pub trait Draft: Serialize + Send + Sync {
    fn validate(&self) -> Result<()>;
}

/// All five collections as last loaded from the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collections {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub classes: Vec<Class>,
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub enrollments: Vec<Enrollment>,
    #[serde(default)]
    pub grades: Vec<Grade>,
}

/// Row totals per collection (the dashboard summary).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub courses: usize,
    pub classes: usize,
    pub students: usize,
    pub enrollments: usize,
    pub grades: usize,
}

impl Collections {
    pub fn counts(&self) -> Counts {
        Counts {
            courses: self.courses.len(),
            classes: self.classes.len(),
            students: self.students.len(),
            enrollments: self.enrollments.len(),
            grades: self.grades.len(),
        }
    }

    pub fn find<E: Entity>(&self, id: EntityId) -> Option<&E> {
        E::rows(self).iter().find(|row| row.id() == id)
    }
}

pub(crate) fn require_non_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(crate::error::ClassbookError::Validation(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

pub(crate) fn require_reference(field: &str, id: EntityId) -> Result<()> {
    if id <= 0 {
        return Err(crate::error::ClassbookError::Validation(format!(
            "{field} must reference an existing record"
        )));
    }
    Ok(())
}
