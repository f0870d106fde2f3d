//! User administration commands

use super::confirm;
use anyhow::Result;
use colored::{ColoredString, Colorize};
use goaltrack_core::{Backend, PageRequest, User, UserFilter, UserRole};
use tracing::info;

fn role_label(role: UserRole) -> ColoredString {
    match role {
        UserRole::User => role.as_str().normal(),
        UserRole::Admin => role.as_str().yellow(),
        UserRole::SuperAdmin => role.as_str().magenta(),
    }
}

fn print_user_line(user: &User) {
    println!(
        "  {:>4}  {}  {} {}  <{}>  {}",
        user.id.to_string().dimmed(),
        user.username.cyan(),
        user.firstname,
        user.lastname,
        user.email,
        role_label(user.user_role)
    );
}

pub async fn list(backend: &Backend, page: PageRequest, filter: UserFilter) -> Result<()> {
    let result = backend.users.get_all_users(page, filter).await?;

    println!("{}", "Users".bold().underline());
    println!();
    if result.data.is_empty() {
        println!("  {}", "No users match".dimmed());
    }
    for user in &result.data {
        print_user_line(user);
    }

    let pages = if result.page_size == 0 {
        1
    } else {
        result.total_records.div_ceil(u64::from(result.page_size)).max(1)
    };
    println!();
    println!(
        "  {}",
        format!(
            "Page {} of {} ({} users)",
            result.page_number, pages, result.total_records
        )
        .dimmed()
    );

    Ok(())
}

/// Looks up by id when `key` is numeric, otherwise by username
pub async fn show(backend: &Backend, key: &str) -> Result<()> {
    let user = match key.parse::<i64>() {
        Ok(id) => backend.users.get_user_by_id(id).await?,
        Err(_) => backend.users.get_user_by_username(key).await?,
    };
    print_user_line(&user);
    Ok(())
}

pub async fn promote(backend: &Backend, id: i64) -> Result<()> {
    let user = backend.users.promote_to_admin(id).await?;
    info!("User {} is now {}", user.id, user.user_role);

    println!("{} Promoted {}", "✓".green(), user.username.cyan());
    print_user_line(&user);
    Ok(())
}

pub async fn demote(backend: &Backend, id: i64) -> Result<()> {
    let user = backend.users.demote_to_user(id).await?;
    info!("User {} is now {}", user.id, user.user_role);

    println!("{} Demoted {}", "✓".green(), user.username.cyan());
    print_user_line(&user);
    Ok(())
}

pub async fn delete(backend: &Backend, id: i64, yes: bool) -> Result<()> {
    if !confirm(&format!("Delete user {}?", id), yes)? {
        return Ok(());
    }

    backend.users.delete_user(id).await?;
    info!("Deleted user {}", id);

    println!("{} Deleted user {}", "✓".green(), id);
    Ok(())
}
