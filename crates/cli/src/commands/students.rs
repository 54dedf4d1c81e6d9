use classbook_core::models::common::EntityId;
use classbook_core::models::student::{NewStudent, Student};
use classbook_core::models::Entity;

use super::{confirm, connect, print_json};

#[derive(clap::Subcommand)]
pub enum StudentAction {
    /// List students with their linked class
    List,
    /// Create a student
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Directly linked class id (enrollments are the usual way to place a student)
        #[arg(long)]
        class: Option<EntityId>,
    },
    /// Replace a student's fields; omitted flags keep their current value
    Edit {
        id: EntityId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        class: Option<EntityId>,
        /// Remove the direct class link
        #[arg(long, conflicts_with = "class")]
        no_class: bool,
    },
    /// Delete a student
    Delete {
        id: EntityId,
        #[arg(long)]
        yes: bool,
    },
    /// Show a student with enrollments and grades
    Show { id: EntityId },
}

/// Run a `students` subcommand.
pub async fn run(config_path: &str, json: bool, action: StudentAction) -> anyhow::Result<()> {
    let (_, engine) = connect(config_path).await?;

    match action {
        StudentAction::List => {
            let students = engine.students_with_class_name().await;
            if json {
                return print_json(&students);
            }
            println!("{:<6} {:<24} {:<30} CLASS", "ID", "NAME", "EMAIL");
            for row in &students {
                println!(
                    "{:<6} {:<24} {:<30} {}",
                    row.student.id, row.student.name, row.student.email, row.class_name
                );
            }
        }
        StudentAction::Add { name, email, class } => {
            let student = engine
                .create::<Student>(NewStudent {
                    name,
                    email,
                    class_id: class,
                })
                .await?;
            println!("Created student {} ({})", student.id, student.name);
        }
        StudentAction::Edit {
            id,
            name,
            email,
            class,
            no_class,
        } => {
            let current = engine
                .snapshot()
                .await
                .find::<Student>(id)
                .map(Entity::to_draft)
                .ok_or_else(|| anyhow::anyhow!("student {id} not found"))?;
            let class = if no_class {
                ClassLink::Clear
            } else {
                class.map_or(ClassLink::Keep, ClassLink::Set)
            };
            let draft = merge_edit(current, name, email, class);
            let student = engine.update::<Student>(id, draft).await?;
            println!("Updated student {} ({})", student.id, student.name);
        }
        StudentAction::Delete { id, yes } => {
            let deleted = engine
                .delete::<Student, _>(id, |student| {
                    let label = student.map(|s| s.name.as_str()).unwrap_or("unknown");
                    confirm(&format!("Delete student {id} ({label})?"), yes)
                })
                .await?;
            if deleted {
                println!("Deleted student {id}");
            } else {
                println!("Cancelled");
            }
        }
        StudentAction::Show { id } => {
            let detail = engine
                .student_detail(id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("student {id} not found"))?;
            if json {
                return print_json(&detail);
            }
            println!("{} <{}>", detail.student.name, detail.student.email);
            if detail.enrollments.is_empty() {
                println!("No enrollments.");
            }
            for row in &detail.enrollments {
                let class = if row.class_name.is_empty() {
                    format!("class {}", row.enrollment.class_id)
                } else {
                    row.class_name.clone()
                };
                println!(
                    "  {:<24} exam {:<6} work {:<6} average {}",
                    class,
                    format_grade(row.grades.exam),
                    format_grade(row.grades.work),
                    row.average
                );
            }
        }
    }

    Ok(())
}

/// How `students edit` changes the direct class link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassLink {
    Keep,
    Set(EntityId),
    Clear,
}

/// Overlay the edited fields on the student's current values.
fn merge_edit(
    current: NewStudent,
    name: Option<String>,
    email: Option<String>,
    class: ClassLink,
) -> NewStudent {
    NewStudent {
        name: name.unwrap_or(current.name),
        email: email.unwrap_or(current.email),
        class_id: match class {
            ClassLink::Keep => current.class_id,
            ClassLink::Set(id) => Some(id),
            ClassLink::Clear => None,
        },
    }
}

pub fn format_grade(grade: Option<f64>) -> String {
    grade.map(|g| format!("{g:.1}")).unwrap_or_else(|| "-".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> NewStudent {
        NewStudent {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            class_id: Some(3),
        }
    }

    #[test]
    fn edit_keeps_unspecified_fields() {
        let draft = merge_edit(ana(), None, Some("ana@school.org".into()), ClassLink::Keep);
        assert_eq!(draft.name, "Ana");
        assert_eq!(draft.email, "ana@school.org");
        assert_eq!(draft.class_id, Some(3));
    }

    #[test]
    fn edit_sets_or_clears_class_link() {
        assert_eq!(merge_edit(ana(), None, None, ClassLink::Set(5)).class_id, Some(5));
        let cleared = merge_edit(ana(), None, None, ClassLink::Clear);
        assert_eq!(cleared.class_id, None);
        assert_eq!(cleared.name, "Ana");
    }

    #[test]
    fn missing_grade_is_dash() {
        assert_eq!(format_grade(None), "-");
        assert_eq!(format_grade(Some(7.26)), "7.3");
        assert_eq!(format_grade(Some(10.0)), "10.0");
    }
}
