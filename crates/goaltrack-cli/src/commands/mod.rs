pub mod auth;
pub mod categories;
pub mod config;
pub mod goals;
pub mod password;
pub mod users;

use anyhow::Result;
use colored::Colorize;

/// Ask before a destructive call unless `--yes` was given
pub(crate) fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }

    let confirmed = dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    if !confirmed {
        println!("{}", "Cancelled.".yellow());
    }
    Ok(confirmed)
}
