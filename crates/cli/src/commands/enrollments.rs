use classbook_core::models::common::EntityId;
use classbook_core::models::enrollment::{Enrollment, NewEnrollment};

use super::{confirm, connect, print_json};

#[derive(clap::Subcommand)]
pub enum EnrollmentAction {
    /// List enrollments, optionally only those of one class
    List {
        #[arg(long)]
        class: Option<EntityId>,
    },
    /// Enroll a student in a class
    Add {
        #[arg(long)]
        student: EntityId,
        #[arg(long)]
        class: EntityId,
    },
    /// Remove an enrollment
    Delete {
        id: EntityId,
        #[arg(long)]
        yes: bool,
    },
}

/// Run an `enrollments` subcommand.
pub async fn run(config_path: &str, json: bool, action: EnrollmentAction) -> anyhow::Result<()> {
    let (_, engine) = connect(config_path).await?;

    match action {
        EnrollmentAction::List { class } => {
            let snapshot = engine.snapshot().await;
            let enrollments: Vec<&Enrollment> = snapshot
                .enrollments
                .iter()
                .filter(|e| class.map_or(true, |id| e.class_id == id))
                .collect();
            if json {
                return print_json(&enrollments);
            }
            println!("{:<6} {:<24} CLASS", "ID", "STUDENT");
            for enrollment in enrollments {
                let student = snapshot
                    .students
                    .iter()
                    .find(|s| s.id == enrollment.student_id)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| format!("#{}", enrollment.student_id));
                let class = snapshot
                    .classes
                    .iter()
                    .find(|c| c.id == enrollment.class_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| format!("#{}", enrollment.class_id));
                println!("{:<6} {:<24} {}", enrollment.id, student, class);
            }
        }
        EnrollmentAction::Add { student, class } => {
            let enrollment = engine
                .create::<Enrollment>(NewEnrollment {
                    student_id: student,
                    class_id: class,
                })
                .await?;
            println!(
                "Enrolled student {} in class {} (enrollment {})",
                enrollment.student_id, enrollment.class_id, enrollment.id
            );
        }
        EnrollmentAction::Delete { id, yes } => {
            let deleted = engine
                .delete::<Enrollment, _>(id, |_| confirm(&format!("Delete enrollment {id}?"), yes))
                .await?;
            if deleted {
                println!("Deleted enrollment {id}");
            } else {
                println!("Cancelled");
            }
        }
    }

    Ok(())
}
