//! Forgot-password flow

use anyhow::Result;
use colored::Colorize;
use goaltrack_core::{Backend, ResetPasswordFields, Validate};

pub async fn forgot(backend: &Backend, email: &str, captcha: Option<&str>) -> Result<()> {
    let response = backend
        .password_recovery
        .send_recovery_email(email, captcha)
        .await?;

    println!("{} {}", "✓".green(), response.message);
    Ok(())
}

pub async fn validate(backend: &Backend, token: &str) -> Result<()> {
    let response = backend.password_recovery.validate_reset_token(token).await?;

    if response.is_valid {
        println!("{} {}", "✓".green(), response.message);
    } else {
        println!("{} {}", "✗".red(), response.message);
    }
    Ok(())
}

pub async fn reset(backend: &Backend, token: &str, password: Option<String>) -> Result<()> {
    let fields = match password {
        Some(p) => ResetPasswordFields {
            new_password: p.clone(),
            confirm_password: p,
        },
        None => ResetPasswordFields {
            new_password: dialoguer::Password::new()
                .with_prompt("New password")
                .interact()?,
            confirm_password: dialoguer::Password::new()
                .with_prompt("Confirm password")
                .interact()?,
        },
    };
    fields.validate()?;

    let response = backend
        .password_recovery
        .reset_password(token, &fields.new_password)
        .await?;

    println!("{} {}", "✓".green(), response.message);
    Ok(())
}
