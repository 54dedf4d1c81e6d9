use classbook_core::models::class::{Class, NewClass};
use classbook_core::models::common::EntityId;
use classbook_core::models::Entity;

use super::{confirm, connect, print_json};

#[derive(clap::Subcommand)]
pub enum ClassAction {
    /// List classes with their course names
    List,
    /// Create a class for a course
    Add {
        #[arg(long)]
        name: String,
        /// Course id
        #[arg(long)]
        course: EntityId,
    },
    /// Replace a class's fields; omitted flags keep their current value
    Edit {
        id: EntityId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        course: Option<EntityId>,
    },
    /// Delete a class
    Delete {
        id: EntityId,
        #[arg(long)]
        yes: bool,
    },
}

/// Run a `classes` subcommand.
pub async fn run(config_path: &str, json: bool, action: ClassAction) -> anyhow::Result<()> {
    let (_, engine) = connect(config_path).await?;

    match action {
        ClassAction::List => {
            let classes = engine.classes_with_course_name().await;
            if json {
                return print_json(&classes);
            }
            println!("{:<6} {:<24} COURSE", "ID", "NAME");
            for row in &classes {
                let course = if row.course_name.is_empty() {
                    format!("(missing course {})", row.class.course_id)
                } else {
                    row.course_name.clone()
                };
                println!("{:<6} {:<24} {}", row.class.id, row.class.name, course);
            }
        }
        ClassAction::Add { name, course } => {
            let class = engine
                .create::<Class>(NewClass {
                    name,
                    course_id: course,
                })
                .await?;
            println!("Created class {} ({})", class.id, class.name);
        }
        ClassAction::Edit { id, name, course } => {
            let current = engine
                .snapshot()
                .await
                .find::<Class>(id)
                .map(Entity::to_draft)
                .ok_or_else(|| anyhow::anyhow!("class {id} not found"))?;
            let draft = NewClass {
                name: name.unwrap_or(current.name),
                course_id: course.unwrap_or(current.course_id),
            };
            let class = engine.update::<Class>(id, draft).await?;
            println!("Updated class {} ({})", class.id, class.name);
        }
        ClassAction::Delete { id, yes } => {
            let deleted = engine
                .delete::<Class, _>(id, |class| {
                    let label = class.map(|c| c.name.as_str()).unwrap_or("unknown");
                    confirm(&format!("Delete class {id} ({label})?"), yes)
                })
                .await?;
            if deleted {
                println!("Deleted class {id}");
            } else {
                println!("Cancelled");
            }
        }
    }

    Ok(())
}
