use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Numeric identifier assigned by the records API on creation.
pub type EntityId = i64;

/// The five entity collections exposed by the records API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Courses,
    Classes,
    Students,
    Enrollments,
    Grades,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Courses,
        Collection::Classes,
        Collection::Students,
        Collection::Enrollments,
        Collection::Grades,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Courses => "courses",
            Self::Classes => "classes",
            Self::Students => "students",
            Self::Enrollments => "enrollments",
            Self::Grades => "grades",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grade kind. At most one grade of each kind exists per enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeKind {
    #[serde(alias = "prova")]
    Exam,
    #[serde(alias = "trabalho")]
    Work,
}

impl GradeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exam => "exam",
            Self::Work => "work",
        }
    }

    /// Name used by the older API surface.
    pub fn legacy_str(&self) -> &'static str {
        match self {
            Self::Exam => "prova",
            Self::Work => "trabalho",
        }
    }
}

impl fmt::Display for GradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GradeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exam" | "prova" => Ok(Self::Exam),
            "work" | "trabalho" => Ok(Self::Work),
            other => Err(format!("unknown grade kind: {other}")),
        }
    }
}
