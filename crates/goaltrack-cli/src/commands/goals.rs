//! Goal commands

use super::confirm;
use anyhow::Result;
use colored::{ColoredString, Colorize};
use goaltrack_core::{
    non_empty, Backend, Goal, GoalCreateFields, GoalStatus, GoalUpdateFields,
};
use tracing::info;

fn status_label(status: GoalStatus) -> ColoredString {
    match status {
        GoalStatus::InProgress => "in progress".yellow(),
        GoalStatus::Completed => "completed".green(),
        GoalStatus::Cancelled => "cancelled".dimmed(),
    }
}

fn print_goal_line(goal: &Goal) {
    println!(
        "  {:>4}  {}  [{}]{}",
        goal.id.to_string().dimmed(),
        goal.title.cyan(),
        status_label(goal.status),
        goal.category_name
            .as_deref()
            .map(|c| format!("  ({})", c))
            .unwrap_or_default()
    );
}

pub async fn list(backend: &Backend) -> Result<()> {
    let goals = backend.goals.get_goals().await?;

    println!("{}", "Goals".bold().underline());
    println!();
    if goals.is_empty() {
        println!("  {}", "No goals yet".dimmed());
    }
    for goal in &goals {
        print_goal_line(goal);
    }

    Ok(())
}

pub async fn show(backend: &Backend, id: i64) -> Result<()> {
    let goal = backend.goals.get_goal(id).await?;

    println!("{}", goal.title.cyan().bold());
    println!();
    println!("  ID:          {}", goal.id);
    println!("  Status:      {}", status_label(goal.status));
    println!(
        "  Category:    {}",
        goal.category_name.as_deref().unwrap_or("-")
    );
    println!("  Due:         {}", goal.due_date.as_deref().unwrap_or("-"));
    println!(
        "  Created:     {}",
        goal.created_date.format("%Y-%m-%d %H:%M")
    );
    if let Some(description) = &goal.description {
        println!();
        println!("  {}", description);
    }

    Ok(())
}

pub async fn create(backend: &Backend, fields: GoalCreateFields) -> Result<()> {
    let fields = GoalCreateFields {
        description: non_empty(fields.description),
        due_date: non_empty(fields.due_date),
        ..fields
    };
    let goal = backend.goals.create_goal(fields).await?;
    info!("Created goal {}", goal.id);

    println!("{} Created goal {}", "✓".green(), goal.title.cyan());
    print_goal_line(&goal);
    Ok(())
}

/// Changes requested on the command line; unset fields keep their value
#[derive(Debug, Default)]
pub struct GoalChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<GoalStatus>,
    pub due_date: Option<String>,
    pub category: Option<i64>,
    pub no_category: bool,
}

impl GoalChanges {
    /// Full record to send, since updates overwrite every field. An empty
    /// string clears `description` or `due_date`.
    fn apply(self, goal: &Goal) -> GoalUpdateFields {
        let mut fields = GoalUpdateFields::from(goal);
        if let Some(title) = self.title {
            fields.title = title;
        }
        if let Some(description) = self.description {
            fields.description = non_empty(Some(description));
        }
        if let Some(status) = self.status {
            fields.status = status;
        }
        if let Some(due_date) = self.due_date {
            fields.due_date = non_empty(Some(due_date));
        }
        if self.no_category {
            fields.goal_category_id = None;
        } else if let Some(category) = self.category {
            fields.goal_category_id = Some(category);
        }
        fields
    }
}

pub async fn update(backend: &Backend, id: i64, changes: GoalChanges) -> Result<()> {
    let current = backend.goals.get_goal(id).await?;
    let fields = changes.apply(&current);

    let updated = match backend.goals.update_goal(id, fields).await? {
        Some(goal) => goal,
        None => backend.goals.get_goal(id).await?,
    };
    info!("Updated goal {}", id);

    println!("{} Updated goal", "✓".green());
    print_goal_line(&updated);
    Ok(())
}

pub async fn delete(backend: &Backend, id: i64, yes: bool) -> Result<()> {
    if !confirm(&format!("Delete goal {}?", id), yes)? {
        return Ok(());
    }

    backend.goals.delete_goal(id).await?;
    info!("Deleted goal {}", id);

    println!("{} Deleted goal {}", "✓".green(), id);
    Ok(())
}
