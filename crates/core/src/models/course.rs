use serde::{Deserialize, Serialize};

use super::common::{Collection, EntityId};
use super::{require_non_blank, Collections, Draft, Entity};
use crate::error::Result;

/// A course offered by the institution. Classes are scheduled instances of a course.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    pub id: EntityId,
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(
        default,
        alias = "descricao",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

/// Create/replace body for [`Course`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NewCourse {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Draft for NewCourse {
    fn validate(&self) -> Result<()> {
        require_non_blank("course name", &self.name)
    }
}

impl Entity for Course {
    type Draft = NewCourse;

    const COLLECTION: Collection = Collection::Courses;

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_draft(&self) -> NewCourse {
        NewCourse {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }

    fn rows(collections: &Collections) -> &[Self] {
        &collections.courses
    }

    fn rows_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.courses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_optional_description_omitted() {
        let course = Course {
            id: 1,
            name: "Mathematics".to_string(),
            description: None,
        };
        let json = serde_json::to_string(&course).unwrap();
        assert_eq!(json, r#"{"id":1,"name":"Mathematics"}"#);
    }

    #[test]
    fn course_reads_legacy_fields() {
        let json = r#"{"id":4,"nome":"Física","descricao":"Mecânica clássica"}"#;
        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.name, "Física");
        assert_eq!(course.description.as_deref(), Some("Mecânica clássica"));
    }

    #[test]
    fn new_course_requires_name() {
        let draft = NewCourse {
            name: "   ".into(),
            description: Some("no name".into()),
        };
        let err = draft.validate().unwrap_err();
        assert!(err.to_string().contains("course name"));

        let ok = NewCourse {
            name: "History".into(),
            description: None,
        };
        ok.validate().unwrap();
    }
}
