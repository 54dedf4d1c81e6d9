use std::path::Path;

use classbook_core::config::{ApiConfig, ClassbookConfig};
use tracing::info;

/// Run the `init` command: write a default configuration file.
pub async fn run(
    config_path: &str,
    base_url: &str,
    legacy_paths: bool,
    force: bool,
) -> anyhow::Result<()> {
    let path = Path::new(config_path);
    if path.exists() && !force {
        anyhow::bail!("{config_path} already exists (use --force to overwrite)");
    }

    let mut config = ClassbookConfig::generate_default();
    config.api = if legacy_paths {
        ApiConfig::legacy(base_url)
    } else {
        ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        }
    };
    config.validate()?;
    config.save(path)?;
    info!("Wrote configuration to {}", config_path);

    println!("Classbook initialized.");
    println!("  Config:   {config_path}");
    println!("  API:      {base_url}");
    println!("\nRun `classbook summary` to check the connection.");

    Ok(())
}
