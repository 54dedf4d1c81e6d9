//! Field names and grade kind values as the API stores them.
//!
//! Models always serialize to the canonical snake_case names and already
//! accept the legacy names when decoding, so only outgoing bodies and list
//! filters need translating.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Filter;
use crate::models::common::{Collection, GradeKind};

/// Naming convention of the API's rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldNaming {
    /// `name`, `course_id`, `enrollment_id`, `kind = "exam"`, ...
    #[default]
    Canonical,
    /// `nome`, `curso_id`, `matricula_id`, `tipo = "prova"`, ...
    Legacy,
}

const LEGACY_FIELDS: &[(Collection, &str, &str)] = &[
    (Collection::Courses, "name", "nome"),
    (Collection::Courses, "description", "descricao"),
    (Collection::Classes, "name", "nome"),
    (Collection::Classes, "course_id", "curso_id"),
    (Collection::Students, "name", "nome"),
    (Collection::Students, "class_id", "curso_id"),
    (Collection::Enrollments, "student_id", "estudante_id"),
    (Collection::Enrollments, "class_id", "turma_id"),
    (Collection::Grades, "enrollment_id", "matricula_id"),
    (Collection::Grades, "kind", "tipo"),
    (Collection::Grades, "value", "valor"),
];

impl FieldNaming {
    /// Wire name of the canonical `field` of `collection`.
    pub fn field<'a>(self, collection: Collection, field: &'a str) -> &'a str {
        match self {
            Self::Canonical => field,
            Self::Legacy => LEGACY_FIELDS
                .iter()
                .find(|(c, canonical, _)| *c == collection && *canonical == field)
                .map(|(_, _, legacy)| *legacy)
                .unwrap_or(field),
        }
    }

    pub fn grade_kind(self, kind: GradeKind) -> &'static str {
        match self {
            Self::Canonical => kind.as_str(),
            Self::Legacy => kind.legacy_str(),
        }
    }

    /// Rename the keys (and grade kind values) of a canonical body.
    pub fn encode(self, collection: Collection, body: Value) -> Value {
        if self == Self::Canonical {
            return body;
        }
        match body {
            Value::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(key, value)| {
                        let value = self.encode_value(collection, &key, value);
                        (self.field(collection, &key).to_string(), value)
                    })
                    .collect::<Map<String, Value>>(),
            ),
            other => other,
        }
    }

    /// Translate equality filters written with canonical names.
    pub fn filter(self, collection: Collection, filter: Filter<'_>) -> Vec<(String, String)> {
        filter
            .iter()
            .map(|(field, value)| {
                let value = if collection == Collection::Grades && *field == "kind" {
                    value
                        .parse::<GradeKind>()
                        .map(|kind| self.grade_kind(kind).to_string())
                        .unwrap_or_else(|_| value.clone())
                } else {
                    value.clone()
                };
                (self.field(collection, field).to_string(), value)
            })
            .collect()
    }

    fn encode_value(self, collection: Collection, field: &str, value: Value) -> Value {
        if collection != Collection::Grades || field != "kind" {
            return value;
        }
        match value.as_str().and_then(|s| s.parse::<GradeKind>().ok()) {
            Some(kind) => Value::from(self.grade_kind(kind)),
            None => value,
        }
    }
}
