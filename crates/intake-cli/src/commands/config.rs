//! Resolved configuration display.

use anyhow::Result;
use colored::Colorize;
use intake_core::config::{AssistantAvailability, IntakeConfig};
use std::path::Path;

pub fn execute(project_dir: &Path) -> Result<()> {
    let path = IntakeConfig::path(project_dir);
    let config = IntakeConfig::load(project_dir)?;

    let source = if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found, using defaults)", path.display())
    };

    println!("{}", "Configuration".bold());
    println!();
    println!("  {:<16} {}", "File", source.dimmed());
    println!("  {:<16} {}", "Redis", config.redis_url.cyan());
    println!(
        "  {:<16} {}",
        "Reopen policy",
        config.reopen_policy.as_str().cyan()
    );

    match config.assistant.availability() {
        AssistantAvailability::Enabled { model } => {
            println!("  {:<16} {} ({})", "Assistant", "enabled".green(), model);
        }
        AssistantAvailability::Disabled { reason } => {
            println!("  {:<16} {}", "Assistant", "disabled".yellow());
            println!();
            println!("{} {}", "⚠".yellow(), reason.dimmed());
        }
    }

    Ok(())
}

