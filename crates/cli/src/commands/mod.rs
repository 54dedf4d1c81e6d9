pub mod classes;
pub mod courses;
pub mod enrollments;
pub mod grades;
pub mod init;
pub mod students;
pub mod summary;

use std::io::{BufRead, Write};
use std::path::Path;

use classbook_core::api::HttpApi;
use classbook_core::config::ClassbookConfig;
use classbook_core::engine::RecordsEngine;
use serde::Serialize;
use tracing::info;

/// Load and validate the config, then build an engine with all collections loaded.
pub async fn connect(config_path: &str) -> anyhow::Result<(ClassbookConfig, RecordsEngine<HttpApi>)> {
    let config = ClassbookConfig::load(Path::new(config_path))?;
    config.validate()?;
    info!("Loaded configuration from {}", config_path);

    let engine = RecordsEngine::new(HttpApi::from_config(&config.api));
    engine.load_all().await?;
    Ok((config, engine))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Ask the operator to confirm a destructive action. `--yes` skips the prompt.
pub fn confirm(prompt: &str, assume_yes: bool) -> bool {
    if assume_yes {
        return true;
    }
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    ask(&mut stdin.lock(), &mut stdout, prompt).unwrap_or(false)
}

fn ask(input: &mut impl BufRead, output: &mut impl Write, prompt: &str) -> std::io::Result<bool> {
    write!(output, "{prompt} [y/N] ")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
