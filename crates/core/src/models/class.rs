use serde::{Deserialize, Serialize};

use super::common::{Collection, EntityId};
use super::{require_non_blank, require_reference, Collections, Draft, Entity};
use crate::error::Result;

/// A class (turma): a group of students taking one course.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Class {
    pub id: EntityId,
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(alias = "curso_id", alias = "courseId")]
    pub course_id: EntityId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NewClass {
    pub name: String,
    pub course_id: EntityId,
}

impl Draft for NewClass {
    fn validate(&self) -> Result<()> {
        require_non_blank("class name", &self.name)?;
        require_reference("course_id", self.course_id)
    }
}

impl Entity for Class {
    type Draft = NewClass;

    const COLLECTION: Collection = Collection::Classes;

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_draft(&self) -> NewClass {
        NewClass {
            name: self.name.clone(),
            course_id: self.course_id,
        }
    }

    fn rows(collections: &Collections) -> &[Self] {
        &collections.classes
    }

    fn rows_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.classes
    }
}
