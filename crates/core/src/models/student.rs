use serde::{Deserialize, Serialize};

use super::common::{Collection, EntityId};
use super::{require_non_blank, Collections, Draft, Entity};
use crate::error::{ClassbookError, Result};

/// A student. Class membership is normally expressed through enrollments;
/// `class_id` is the older direct link and is only used for display labels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Student {
    pub id: EntityId,
    #[serde(alias = "nome")]
    pub name: String,
    pub email: String,
    // `curso_id` on legacy student rows pointed at a class, not a course.
    #[serde(
        default,
        alias = "curso_id",
        alias = "classId",
        skip_serializing_if = "Option::is_none"
    )]
    pub class_id: Option<EntityId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<EntityId>,
}

impl Draft for NewStudent {
    fn validate(&self) -> Result<()> {
        require_non_blank("student name", &self.name)?;
        require_non_blank("student email", &self.email)?;
        if !self.email.contains('@') {
            return Err(ClassbookError::Validation(format!(
                "student email is not an address: {}",
                self.email
            )));
        }
        Ok(())
    }
}

impl Entity for Student {
    type Draft = NewStudent;

    const COLLECTION: Collection = Collection::Students;

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_draft(&self) -> NewStudent {
        NewStudent {
            name: self.name.clone(),
            email: self.email.clone(),
            class_id: self.class_id,
        }
    }

    fn rows(collections: &Collections) -> &[Self] {
        &collections.students
    }

    fn rows_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.students
    }
}
