use classbook_core::models::common::EntityId;
use classbook_core::models::course::{Course, NewCourse};
use classbook_core::models::Entity;

use super::{confirm, connect, print_json};

#[derive(clap::Subcommand)]
pub enum CourseAction {
    /// List all courses
    List,
    /// Create a course
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Replace a course's fields; omitted flags keep their current value
    Edit {
        id: EntityId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a course (its classes are kept)
    Delete {
        id: EntityId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Run a `courses` subcommand.
pub async fn run(config_path: &str, json: bool, action: CourseAction) -> anyhow::Result<()> {
    let (_, engine) = connect(config_path).await?;

    match action {
        CourseAction::List => {
            let courses = engine.snapshot().await.courses;
            if json {
                return print_json(&courses);
            }
            println!("{:<6} {:<30} DESCRIPTION", "ID", "NAME");
            for course in &courses {
                println!(
                    "{:<6} {:<30} {}",
                    course.id,
                    course.name,
                    course.description.as_deref().unwrap_or("-")
                );
            }
        }
        CourseAction::Add { name, description } => {
            let course = engine.create::<Course>(NewCourse { name, description }).await?;
            println!("Created course {} ({})", course.id, course.name);
        }
        CourseAction::Edit {
            id,
            name,
            description,
        } => {
            let current = engine
                .snapshot()
                .await
                .find::<Course>(id)
                .map(Entity::to_draft)
                .ok_or_else(|| anyhow::anyhow!("course {id} not found"))?;
            let draft = NewCourse {
                name: name.unwrap_or(current.name),
                description: description.or(current.description),
            };
            let course = engine.update::<Course>(id, draft).await?;
            println!("Updated course {} ({})", course.id, course.name);
        }
        CourseAction::Delete { id, yes } => {
            let deleted = engine
                .delete::<Course, _>(id, |course| {
                    let label = course.map(|c| c.name.as_str()).unwrap_or("unknown");
                    confirm(&format!("Delete course {id} ({label})?"), yes)
                })
                .await?;
            if deleted {
                println!("Deleted course {id}");
            } else {
                println!("Cancelled");
            }
        }
    }

    Ok(())
}
