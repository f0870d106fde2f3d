//! Authentication commands

use crate::config::SettingsManager;
use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use goaltrack_core::{AuthSession, Backend, LoginFields, UserSignupFields};
use tracing::info;

pub async fn login(
    backend: &Backend,
    manager: &SettingsManager,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    println!("{}", "Login to Goal Tracker".blue().bold());
    println!();

    let username = match username {
        Some(u) => u,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Username")
            .interact_text()?,
    };
    let password = match password {
        Some(p) => p,
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()?,
    };

    println!("{}", "Authenticating...".dimmed());
    let response = backend
        .auth
        .login(LoginFields { username, password })
        .await?;

    manager
        .update(|s| s.access_token = Some(response.token.clone()))
        .context("Failed to store access token")?;
    info!("Logged in as {}", response.username);

    println!();
    println!("{}", "Login successful!".green().bold());
    println!("   Welcome, {}!", response.username.cyan());
    println!("   Role:    {}", response.role);
    println!("   Expires: {}", response.expires_at.dimmed());

    Ok(())
}

pub async fn logout(manager: &SettingsManager) -> Result<()> {
    let settings = manager.load_file()?;
    if settings.access_token.is_none() {
        println!("{}", "Not logged in".yellow());
        return Ok(());
    }

    manager.update(|s| s.access_token = None)?;
    info!("Cleared stored access token");

    println!("{}", "Logged out successfully".green());
    Ok(())
}

/// Claims of the stored token; nothing is sent to the server
pub async fn whoami(access_token: Option<String>) -> Result<()> {
    let session = AuthSession::from_token(access_token);
    if !session.is_authenticated() {
        println!("{}", "Not logged in".yellow());
        return Ok(());
    }

    if session.username.is_none() {
        println!("{}", "Stored token could not be decoded".yellow());
        return Ok(());
    }

    let unknown = || "-".to_string();
    println!("{}", "User Info".blue().bold());
    println!();
    println!("   ID:       {}", session.user_id.clone().unwrap_or_else(unknown).dimmed());
    println!("   Username: {}", session.username.clone().unwrap_or_else(unknown).cyan());
    println!("   Email:    {}", session.email.clone().unwrap_or_else(unknown));
    println!("   Role:     {}", session.role.clone().unwrap_or_else(unknown));
    if let Some(expires_at) = session.expires_at {
        let expiry = expires_at.format("%Y-%m-%d %H:%M:%S UTC").to_string();
        if session.is_expired(Utc::now()) {
            println!("   Expires:  {} {}", expiry, "(expired)".red());
        } else {
            println!("   Expires:  {}", expiry.dimmed());
        }
    }

    Ok(())
}

pub struct RegisterArgs {
    pub username: String,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub password: Option<String>,
}

pub async fn register(backend: &Backend, args: RegisterArgs) -> Result<()> {
    let (password, confirm_password) = match args.password {
        Some(p) => (p.clone(), p),
        None => {
            let password = dialoguer::Password::new()
                .with_prompt("Password")
                .interact()?;
            let confirm = dialoguer::Password::new()
                .with_prompt("Confirm password")
                .interact()?;
            (password, confirm)
        }
    };

    let user = backend
        .auth
        .register(UserSignupFields {
            username: args.username,
            email: args.email,
            password,
            confirm_password,
            firstname: args.firstname,
            lastname: args.lastname,
        })
        .await?;

    println!("{} Registered {} (id {})", "✓".green(), user.username.cyan(), user.id);
    println!("{}", "  You can now log in.".dimmed());
    Ok(())
}
