//! Category commands

use super::confirm;
use anyhow::Result;
use colored::Colorize;
use goaltrack_core::{Backend, Category, CategoryCreateFields, CategoryUpdateFields};
use tracing::info;

fn print_category_line(category: &Category) {
    let goals = match category.goal_count {
        1 => "1 goal".to_string(),
        n => format!("{} goals", n),
    };
    println!(
        "  {:>4}  {}  {}",
        category.id.to_string().dimmed(),
        category.name.cyan(),
        goals.dimmed()
    );
}

pub async fn list(backend: &Backend) -> Result<()> {
    let categories = backend.categories.get_all_categories().await?;

    println!("{}", "Categories".bold().underline());
    println!();
    if categories.is_empty() {
        println!("  {}", "No categories yet".dimmed());
    }
    for category in &categories {
        print_category_line(category);
    }

    Ok(())
}

pub async fn show(backend: &Backend, id: i64) -> Result<()> {
    let category = backend.categories.get_category(id).await?;
    print_category_line(&category);
    Ok(())
}

pub async fn create(backend: &Backend, name: String) -> Result<()> {
    let category = backend
        .categories
        .create_category(CategoryCreateFields { name })
        .await?;
    info!("Created category {}", category.id);

    println!("{} Created category", "✓".green());
    print_category_line(&category);
    Ok(())
}

/// Renaming also renames the category on every goal that references it
pub async fn rename(backend: &Backend, id: i64, name: String) -> Result<()> {
    let renamed = backend
        .categories
        .update_category(id, CategoryUpdateFields { name })
        .await?;
    let category = match renamed {
        Some(category) => category,
        None => backend.categories.get_category(id).await?,
    };
    info!("Renamed category {}", id);

    println!("{} Renamed category", "✓".green());
    print_category_line(&category);
    Ok(())
}

pub async fn delete(backend: &Backend, id: i64, yes: bool) -> Result<()> {
    let prompt = format!("Delete category {}? Its goals will be left uncategorised.", id);
    if !confirm(&prompt, yes)? {
        return Ok(());
    }

    backend.categories.delete_category(id).await?;
    info!("Deleted category {}", id);

    println!("{} Deleted category {}", "✓".green(), id);
    Ok(())
}
