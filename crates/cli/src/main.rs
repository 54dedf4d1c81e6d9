use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::classes::ClassAction;
use commands::courses::CourseAction;
use commands::enrollments::EnrollmentAction;
use commands::grades::GradeAction;
use commands::students::StudentAction;

#[derive(Parser)]
#[command(
    name = "classbook",
    about = "Academic records: courses, classes, students, enrollments and grades",
    version
)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "classbook.toml")]
    config: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Records API base URL
        #[arg(long, default_value = "http://localhost:3000")]
        base_url: String,
        /// Target the older Portuguese API surface (cursos, nome, matricula_id, ...)
        #[arg(long)]
        legacy_paths: bool,
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
    /// Show totals for every collection
    Summary,
    /// Manage courses
    Courses {
        #[command(subcommand)]
        action: CourseAction,
    },
    /// Manage classes
    Classes {
        #[command(subcommand)]
        action: ClassAction,
    },
    /// Manage students
    Students {
        #[command(subcommand)]
        action: StudentAction,
    },
    /// Manage enrollments
    Enrollments {
        #[command(subcommand)]
        action: EnrollmentAction,
    },
    /// View and record grades
    Grades {
        #[command(subcommand)]
        action: GradeAction,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_str();
    let json = cli.json;

    match cli.command {
        Commands::Init {
            base_url,
            legacy_paths,
            force,
        } => {
            commands::init::run(config, &base_url, legacy_paths, force).await?;
        }
        Commands::Summary => {
            commands::summary::run(config, json).await?;
        }
        Commands::Courses { action } => {
            commands::courses::run(config, json, action).await?;
        }
        Commands::Classes { action } => {
            commands::classes::run(config, json, action).await?;
        }
        Commands::Students { action } => {
            commands::students::run(config, json, action).await?;
        }
        Commands::Enrollments { action } => {
            commands::enrollments::run(config, json, action).await?;
        }
        Commands::Grades { action } => {
            commands::grades::run(config, json, action).await?;
        }
    }

    Ok(())
}
