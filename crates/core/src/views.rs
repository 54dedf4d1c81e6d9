//! Derived read views: left joins over the flat collections.
//!
//! Dangling foreign keys never fail a join; the derived label is left empty
//! (or the row dropped, for rosters) instead.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::models::class::Class;
use crate::models::common::{EntityId, GradeKind};
use crate::models::course::Course;
use crate::models::enrollment::Enrollment;
use crate::models::grade::Grade;
use crate::models::student::Student;

/// A class with the name of its course (`""` when the course is missing).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassWithCourse {
    #[serde(flatten)]
    pub class: Class,
    pub course_name: String,
}

/// A student with the name of its directly linked class (`""` when unlinked or missing).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentWithClass {
    #[serde(flatten)]
    pub student: Student,
    pub class_name: String,
}

/// Exam and work grades of one enrollment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GradePair {
    pub exam: Option<f64>,
    pub work: Option<f64>,
}

impl GradePair {
    pub fn get(&self, kind: GradeKind) -> Option<f64> {
        match kind {
            GradeKind::Exam => self.exam,
            GradeKind::Work => self.work,
        }
    }

    pub fn average(&self) -> Average {
        average(self.exam, self.work)
    }
}

/// Mean of exam and work, defined only when both grades exist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Average {
    Value(f64),
    NoGrade,
}

impl Average {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::NoGrade => None,
        }
    }
}

impl fmt::Display for Average {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v:.1}"),
            Self::NoGrade => f.write_str("no grade"),
        }
    }
}

/// One row of a class's grade sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterEntry {
    pub student: Student,
    pub enrollment_id: EntityId,
    pub grades: GradePair,
    pub average: Average,
}

/// An enrollment of a student, with the class label and grades.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrollmentDetail {
    pub enrollment: Enrollment,
    pub class_name: String,
    pub grades: GradePair,
    pub average: Average,
}

/// A student with all of its enrollments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentDetail {
    pub student: Student,
    pub enrollments: Vec<EnrollmentDetail>,
}

/// Index `rows` by id, keeping the first row when ids repeat.
fn index_by<'a, T>(rows: &'a [T], id: impl Fn(&T) -> EntityId) -> HashMap<EntityId, &'a T> {
    let mut index = HashMap::with_capacity(rows.len());
    for row in rows {
        index.entry(id(row)).or_insert(row);
    }
    index
}

pub fn classes_with_course_name(classes: &[Class], courses: &[Course]) -> Vec<ClassWithCourse> {
    let courses = index_by(courses, |c| c.id);
    classes
        .iter()
        .map(|class| ClassWithCourse {
            class: class.clone(),
            course_name: courses
                .get(&class.course_id)
                .map(|course| course.name.clone())
                .unwrap_or_default(),
        })
        .collect()
}

pub fn students_with_class_name(students: &[Student], classes: &[Class]) -> Vec<StudentWithClass> {
    let classes = index_by(classes, |c| c.id);
    students
        .iter()
        .map(|student| StudentWithClass {
            student: student.clone(),
            class_name: student
                .class_id
                .and_then(|id| classes.get(&id))
                .map(|class| class.name.clone())
                .unwrap_or_default(),
        })
        .collect()
}

/// Students enrolled in `class_id`, in enrollment order. Enrollments whose
/// student no longer exists are skipped.
pub fn students_in_class(
    class_id: EntityId,
    enrollments: &[Enrollment],
    students: &[Student],
) -> Vec<Student> {
    let students = index_by(students, |s| s.id);
    enrollments
        .iter()
        .filter(|e| e.class_id == class_id)
        .filter_map(|e| students.get(&e.student_id).map(|s| (*s).clone()))
        .collect()
}

/// Exam and work grades recorded for `enrollment_id`. If the API holds
/// duplicates for a kind, the first one wins.
pub fn grades_for(enrollment_id: EntityId, grades: &[Grade]) -> GradePair {
    let mut pair = GradePair::default();
    for grade in grades.iter().filter(|g| g.enrollment_id == enrollment_id) {
        let slot = match grade.kind {
            GradeKind::Exam => &mut pair.exam,
            GradeKind::Work => &mut pair.work,
        };
        if slot.is_none() {
            *slot = Some(grade.value);
        }
    }
    pair
}

/// `(exam + work) / 2` rounded to one decimal, or [`Average::NoGrade`] unless both exist.
pub fn average(exam: Option<f64>, work: Option<f64>) -> Average {
    match (exam, work) {
        (Some(exam), Some(work)) => Average::Value(round_one_decimal((exam + work) / 2.0)),
        _ => Average::NoGrade,
    }
}

fn round_one_decimal(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// The grade sheet of a class: one entry per enrollment with a known student.
pub fn class_roster(
    class_id: EntityId,
    enrollments: &[Enrollment],
    students: &[Student],
    grades: &[Grade],
) -> Vec<RosterEntry> {
    let students = index_by(students, |s| s.id);
    enrollments
        .iter()
        .filter(|e| e.class_id == class_id)
        .filter_map(|e| {
            let student = students.get(&e.student_id)?;
            let pair = grades_for(e.id, grades);
            Some(RosterEntry {
                student: (*student).clone(),
                enrollment_id: e.id,
                grades: pair,
                average: pair.average(),
            })
        })
        .collect()
}

/// Enrollments of `student_id` with class labels and grades.
pub fn enrollment_details(
    student_id: EntityId,
    enrollments: &[Enrollment],
    classes: &[Class],
    grades: &[Grade],
) -> Vec<EnrollmentDetail> {
    let classes = index_by(classes, |c| c.id);
    enrollments
        .iter()
        .filter(|e| e.student_id == student_id)
        .map(|e| {
            let pair = grades_for(e.id, grades);
            EnrollmentDetail {
                enrollment: e.clone(),
                class_name: classes
                    .get(&e.class_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_default(),
                grades: pair,
                average: pair.average(),
            }
        })
        .collect()
}
