use anyhow::Context;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> anyhow::Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();
    let settings = config.settings();

    println!("{} {}", "Config file:".bold(), path.display());
    if !path.exists() {
        println!("{}", "(not created yet, showing defaults)".dimmed());
    }
    println!();

    let rows = [
        ("server.base_url", settings.base_url.clone()),
        ("server.timeout_secs", settings.timeout.as_secs().to_string()),
        (
            "ui.slide_interval_secs",
            settings.slide_interval.as_secs().to_string(),
        ),
        (
            "ui.welcome_secs",
            settings.welcome_duration.as_secs().to_string(),
        ),
        ("ui.parallax", settings.parallax.name().to_string()),
        (
            "ui.assume_registered",
            settings.assume_registered.to_string(),
        ),
        ("ui.theme", settings.theme.clone()),
    ];
    for (key, value) in rows {
        println!("  {} {}", format!("{key:<24}").cyan(), value);
    }
    Ok(())
}

fn set(key: &str, value: &str) -> anyhow::Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save().context("Failed to save config")?;
    println!(
        "{} {} = {} ({})",
        "Saved".green(),
        key.cyan(),
        value,
        path.display().to_string().dimmed()
    );
    Ok(())
}
