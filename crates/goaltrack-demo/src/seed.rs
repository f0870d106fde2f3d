//! Sample data the demo backend starts with

use crate::state::{StoreState, StoredUser};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use goaltrack_core::{Category, Goal, GoalStatus, User, UserRole};

pub const DEMO_PASSWORD: &str = "Demo123!";
pub const SUPERADMIN_USERNAME: &str = "superadmin";
pub const SUPERADMIN_PASSWORD: &str = "SuperAdmin123!";

fn iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn goal(
    id: i64,
    title: &str,
    description: &str,
    status: GoalStatus,
    due_in_days: i64,
    created_days_ago: i64,
    category: (i64, &str),
    now: DateTime<Utc>,
) -> Goal {
    Goal {
        id,
        title: title.to_string(),
        description: Some(description.to_string()),
        status,
        due_date: Some(iso(now + Duration::days(due_in_days))),
        created_date: now - Duration::days(created_days_ago),
        goal_category_id: Some(category.0),
        category_name: Some(category.1.to_string()),
    }
}

fn user(
    id: i64,
    username: &str,
    email: &str,
    name: (&str, &str),
    role: UserRole,
    password: &str,
) -> StoredUser {
    StoredUser {
        user: User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            firstname: name.0.to_string(),
            lastname: name.1.to_string(),
            user_role: role,
        },
        password: password.to_string(),
    }
}

/// Five goals, five categories and five users, with ids continuing at 6.
pub(crate) fn seeded_state(now: DateTime<Utc>) -> StoreState {
    let development = (1, "Development");
    let health = (2, "Health");
    let personal = (3, "Personal");

    let goals = vec![
        goal(
            1,
            "Complete React Project",
            "Build a full-stack goal tracker application",
            GoalStatus::InProgress,
            7,
            5,
            development,
            now,
        ),
        goal(
            2,
            "Learn TypeScript",
            "Master TypeScript fundamentals and advanced patterns",
            GoalStatus::InProgress,
            14,
            10,
            development,
            now,
        ),
        goal(
            3,
            "Exercise Daily",
            "30 minutes of cardio every morning",
            GoalStatus::InProgress,
            30,
            2,
            health,
            now,
        ),
        goal(
            4,
            "Read 12 Books This Year",
            "One book per month challenge",
            GoalStatus::InProgress,
            60,
            30,
            personal,
            now,
        ),
        goal(
            5,
            "Launch Side Project",
            "Deploy SaaS application to production",
            GoalStatus::Completed,
            -5,
            90,
            development,
            now,
        ),
    ];

    let categories = [
        (1, "Development", 3),
        (2, "Health", 1),
        (3, "Personal", 1),
        (4, "Finance", 0),
        (5, "Education", 0),
    ]
    .into_iter()
    .map(|(id, name, goal_count)| Category {
        id,
        name: name.to_string(),
        goal_count,
    })
    .collect();

    let users = vec![
        user(1, "demo-user", "user@demo.com", ("Demo", "User"), UserRole::User, DEMO_PASSWORD),
        user(2, "demo-admin", "admin@demo.com", ("Demo", "Admin"), UserRole::Admin, DEMO_PASSWORD),
        user(
            3,
            SUPERADMIN_USERNAME,
            "superadmin@demo.com",
            ("Super", "Admin"),
            UserRole::SuperAdmin,
            SUPERADMIN_PASSWORD,
        ),
        user(4, "john-doe", "john@demo.com", ("John", "Doe"), UserRole::User, DEMO_PASSWORD),
        user(5, "jane-smith", "jane@demo.com", ("Jane", "Smith"), UserRole::User, DEMO_PASSWORD),
    ];

    StoreState {
        users,
        goals,
        categories,
        next_user_id: 6,
        next_goal_id: 6,
        next_category_id: 6,
        ..StoreState::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_counts_match_goals() {
        let state = seeded_state(Utc::now());
        for category in &state.categories {
            let live = state
                .goals
                .iter()
                .filter(|g| g.goal_category_id == Some(category.id))
                .count() as u32;
            assert_eq!(category.goal_count, live, "category {}", category.name);
        }
    }

    #[test]
    fn test_seed_names_match_categories() {
        let state = seeded_state(Utc::now());
        for goal in &state.goals {
            let category = state.category(goal.goal_category_id.unwrap()).unwrap();
            assert_eq!(goal.category_name.as_deref(), Some(category.name.as_str()));
        }
    }
}
