use serde::{Deserialize, Serialize};

use super::common::{Collection, EntityId};
use super::{require_reference, Collections, Draft, Entity};
use crate::error::Result;

/// Links a student to a class. Grades hang off enrollments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Enrollment {
    pub id: EntityId,
    #[serde(alias = "estudante_id", alias = "studentId")]
    pub student_id: EntityId,
    #[serde(alias = "turma_id", alias = "classId")]
    pub class_id: EntityId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NewEnrollment {
    pub student_id: EntityId,
    pub class_id: EntityId,
}

impl Draft for NewEnrollment {
    fn validate(&self) -> Result<()> {
        require_reference("student_id", self.student_id)?;
        require_reference("class_id", self.class_id)
    }
}

impl Entity for Enrollment {
    type Draft = NewEnrollment;

    const COLLECTION: Collection = Collection::Enrollments;

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_draft(&self) -> NewEnrollment {
        NewEnrollment {
            student_id: self.student_id,
            class_id: self.class_id,
        }
    }

    fn rows(collections: &Collections) -> &[Self] {
        &collections.enrollments
    }

    fn rows_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.enrollments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enrollment_reads_legacy_fields() {
        let json = r#"{"id":9,"estudante_id":5,"turma_id":2}"#;
        let enrollment: Enrollment = serde_json::from_str(json).unwrap();
        assert_eq!(
            enrollment,
            Enrollment {
                id: 9,
                student_id: 5,
                class_id: 2,
            }
        );
    }

    #[test]
    fn enrollment_writes_canonical_fields() {
        let draft = NewEnrollment {
            student_id: 5,
            class_id: 2,
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json, serde_json::json!({"student_id": 5, "class_id": 2}));
    }

    #[test]
    fn new_enrollment_requires_both_references() {
        let draft = NewEnrollment {
            student_id: 5,
            class_id: 0,
        };
        assert!(draft.validate().unwrap_err().to_string().contains("class_id"));
    }
}
