use classbook_core::models::common::{EntityId, GradeKind};

use super::students::format_grade;
use super::{connect, print_json};

#[derive(clap::Subcommand)]
pub enum GradeAction {
    /// Show the grade sheet of a class
    Roster {
        #[arg(long)]
        class: EntityId,
    },
    /// Record a grade, replacing any existing grade of the same kind
    Set {
        #[arg(long)]
        enrollment: EntityId,
        /// exam or work
        #[arg(long)]
        kind: GradeKind,
        /// Value between 0 and 10
        #[arg(long, allow_negative_numbers = true)]
        value: f64,
    },
}

/// Run a `grades` subcommand.
pub async fn run(config_path: &str, json: bool, action: GradeAction) -> anyhow::Result<()> {
    let (_, engine) = connect(config_path).await?;

    match action {
        GradeAction::Roster { class } => {
            let roster = engine.class_roster(class).await;
            if json {
                return print_json(&roster);
            }
            if roster.is_empty() {
                println!("No students enrolled in class {class}.");
                return Ok(());
            }
            println!(
                "{:<6} {:<24} {:<6} {:<6} AVERAGE",
                "ENR", "STUDENT", "EXAM", "WORK"
            );
            for row in &roster {
                println!(
                    "{:<6} {:<24} {:<6} {:<6} {}",
                    row.enrollment_id,
                    row.student.name,
                    format_grade(row.grades.exam),
                    format_grade(row.grades.work),
                    row.average
                );
            }
        }
        GradeAction::Set {
            enrollment,
            kind,
            value,
        } => {
            let grade = engine.upsert_grade(enrollment, kind, value).await?;
            let pair = engine.grades_for(enrollment).await;
            if json {
                return print_json(&grade);
            }
            println!(
                "Saved {} grade {:.1} for enrollment {} (average {})",
                grade.kind,
                grade.value,
                grade.enrollment_id,
                pair.average()
            );
        }
    }

    Ok(())
}
