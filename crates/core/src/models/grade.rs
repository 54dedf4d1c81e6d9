use serde::{Deserialize, Serialize};

use super::common::{Collection, EntityId, GradeKind};
use super::{require_reference, Collections, Draft, Entity};
use crate::error::{ClassbookError, Result};

pub const MIN_GRADE: f64 = 0.0;
pub const MAX_GRADE: f64 = 10.0;

/// A single grade of one kind for one enrollment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Grade {
    pub id: EntityId,
    #[serde(alias = "matricula_id", alias = "enrollmentId")]
    pub enrollment_id: EntityId,
    #[serde(alias = "tipo")]
    pub kind: GradeKind,
    #[serde(alias = "valor")]
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewGrade {
    pub enrollment_id: EntityId,
    pub kind: GradeKind,
    pub value: f64,
}

/// Check that `value` is a finite number in `[0, 10]`.
pub fn validate_grade_value(value: f64) -> Result<()> {
    if !value.is_finite() || !(MIN_GRADE..=MAX_GRADE).contains(&value) {
        return Err(ClassbookError::Validation(format!(
            "grade must be between {MIN_GRADE} and {MAX_GRADE}, got {value}"
        )));
    }
    Ok(())
}

impl Draft for NewGrade {
    fn validate(&self) -> Result<()> {
        require_reference("enrollment_id", self.enrollment_id)?;
        validate_grade_value(self.value)
    }
}

impl Entity for Grade {
    type Draft = NewGrade;

    const COLLECTION: Collection = Collection::Grades;

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_draft(&self) -> NewGrade {
        NewGrade {
            enrollment_id: self.enrollment_id,
            kind: self.kind,
            value: self.value,
        }
    }

    fn rows(collections: &Collections) -> &[Self] {
        &collections.grades
    }

    fn rows_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.grades
    }
}
