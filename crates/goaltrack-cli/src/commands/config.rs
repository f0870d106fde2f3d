//! Configuration commands

use crate::config::{Settings, SettingsManager};
use anyhow::{Context, Result};
use colored::Colorize;
use goaltrack_core::AuthSession;

/// Show the effective configuration, environment overrides included
pub async fn show(manager: &SettingsManager, settings: &Settings) -> Result<()> {
    println!("{}", "Goal Tracker Configuration".bold().underline());
    println!();

    println!("{}", "Backend:".cyan().bold());
    if settings.demo_mode {
        println!("  Mode:     {}", "demo".yellow());
        println!("  Latency:  {} ms", settings.demo_latency_ms);
    } else {
        println!("  Mode:     {}", "server".green());
    }
    println!("  API URL:  {}", settings.api_url);
    println!();

    println!("{}", "User:".cyan().bold());
    let session = AuthSession::from_token(settings.access_token.clone());
    match (&session.access_token, &session.username) {
        (None, _) => println!("  {}", "Not logged in".yellow()),
        (Some(_), Some(username)) => println!("  Logged in as {}", username.cyan()),
        (Some(_), None) => println!("  {}", "Token stored (undecodable)".yellow()),
    }
    println!();

    println!("{}", "Config Files:".cyan().bold());
    println!(
        "  Settings: {}",
        manager.settings_path().display().to_string().dimmed()
    );

    Ok(())
}

pub async fn set_server(manager: &SettingsManager, url: &str) -> Result<()> {
    let url = url.trim_end_matches('/').to_string();
    check_api_url(&url)?;

    manager
        .update(|s| {
            s.api_url = url.clone();
            s.demo_mode = false;
        })
        .context("Failed to save settings")?;

    println!("{} API URL set to: {}", "✓".green(), url.cyan());
    Ok(())
}

fn check_api_url(url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        anyhow::bail!("API URL must start with http:// or https://")
    }
}

pub async fn demo(manager: &SettingsManager, enable: bool, latency_ms: Option<u64>) -> Result<()> {
    let settings = manager
        .update(|s| {
            s.demo_mode = enable;
            if let Some(ms) = latency_ms {
                s.demo_latency_ms = ms;
            }
        })
        .context("Failed to save settings")?;

    if settings.demo_mode {
        println!(
            "{} Demo mode {} ({} ms latency)",
            "✓".green(),
            "enabled".yellow(),
            settings.demo_latency_ms
        );
        println!(
            "{}",
            "  Demo data is reseeded on every invocation; changes are not kept.".dimmed()
        );
    } else {
        println!("{} Demo mode disabled", "✓".green());
    }
    Ok(())
}
