//! Collections and the bookkeeping that keeps them consistent
//!
//! Every method here runs to completion synchronously. `goal_count` on a
//! category always equals the number of goals pointing at it, and a goal's
//! `category_name` is refreshed on every write that touches the goal or its
//! category.

use chrono::{DateTime, Utc};
use goaltrack_core::{
    non_empty, Category, CategoryCreateFields, CategoryUpdateFields, Goal, GoalCreateFields,
    GoalStatus, GoalTrackError, GoalUpdateFields, PageRequest, PaginatedResult, Result, User,
    UserFilter, UserRole, UserSignupFields, UserUpdateFields,
};
use std::collections::HashMap;

/// A user row; the password never leaves the store
#[derive(Debug, Clone)]
pub(crate) struct StoredUser {
    pub user: User,
    pub password: String,
}

#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub users: Vec<StoredUser>,
    pub goals: Vec<Goal>,
    pub categories: Vec<Category>,
    /// Outstanding password reset tokens, token -> user id
    pub reset_tokens: HashMap<String, i64>,
    pub next_user_id: i64,
    pub next_goal_id: i64,
    pub next_category_id: i64,
}

fn take_id(counter: &mut i64) -> i64 {
    let id = *counter;
    *counter += 1;
    id
}

impl StoreState {
    pub fn new() -> Self {
        Self {
            next_user_id: 1,
            next_goal_id: 1,
            next_category_id: 1,
            ..Self::default()
        }
    }

    // ---------------------------------------------------------------------
    // Goals
    // ---------------------------------------------------------------------

    pub fn goal(&self, id: i64) -> Result<&Goal> {
        self.goals
            .iter()
            .find(|g| g.id == id)
            .ok_or_else(|| GoalTrackError::not_found("Goal", id))
    }

    /// An id that names no category is stored as uncategorized.
    pub fn create_goal(&mut self, fields: GoalCreateFields, now: DateTime<Utc>) -> Goal {
        let category = fields
            .goal_category_id
            .and_then(|id| self.categories.iter_mut().find(|c| c.id == id));

        let (goal_category_id, category_name) = match category {
            Some(category) => {
                category.goal_count += 1;
                (Some(category.id), Some(category.name.clone()))
            }
            None => (None, None),
        };

        let goal = Goal {
            id: take_id(&mut self.next_goal_id),
            title: fields.title,
            description: non_empty(fields.description),
            status: GoalStatus::InProgress,
            due_date: non_empty(fields.due_date),
            created_date: now,
            goal_category_id,
            category_name,
        };
        self.goals.push(goal.clone());
        goal
    }

    pub fn update_goal(&mut self, id: i64, fields: GoalUpdateFields) -> Result<Goal> {
        let index = self
            .goals
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| GoalTrackError::not_found("Goal", id))?;

        let old_category_id = self.goals[index].goal_category_id;
        let new_category = fields
            .goal_category_id
            .and_then(|cid| self.categories.iter().find(|c| c.id == cid))
            .map(|c| (c.id, c.name.clone()));
        let new_category_id = new_category.as_ref().map(|(cid, _)| *cid);

        if old_category_id != new_category_id {
            if let Some(old_id) = old_category_id {
                self.adjust_goal_count(old_id, -1);
            }
            if let Some(new_id) = new_category_id {
                self.adjust_goal_count(new_id, 1);
            }
        }

        let goal = &mut self.goals[index];
        goal.title = fields.title;
        goal.description = non_empty(fields.description);
        goal.status = fields.status;
        goal.due_date = non_empty(fields.due_date);
        goal.goal_category_id = new_category_id;
        goal.category_name = new_category.map(|(_, name)| name);

        Ok(goal.clone())
    }

    pub fn delete_goal(&mut self, id: i64) -> Result<Goal> {
        let index = self
            .goals
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| GoalTrackError::not_found("Goal", id))?;

        if let Some(category_id) = self.goals[index].goal_category_id {
            self.adjust_goal_count(category_id, -1);
        }

        Ok(self.goals.remove(index))
    }

    /// Counts never drop below zero.
    fn adjust_goal_count(&mut self, category_id: i64, delta: i32) {
        if let Some(category) = self.categories.iter_mut().find(|c| c.id == category_id) {
            category.goal_count = if delta < 0 {
                category.goal_count.saturating_sub(delta.unsigned_abs())
            } else {
                category.goal_count.saturating_add(delta as u32)
            };
        }
    }

    // ---------------------------------------------------------------------
    // Categories
    // ---------------------------------------------------------------------

    pub fn category(&self, id: i64) -> Result<&Category> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| GoalTrackError::not_found("Category", id))
    }

    pub fn create_category(&mut self, fields: CategoryCreateFields) -> Category {
        let category = Category {
            id: take_id(&mut self.next_category_id),
            name: fields.name,
            goal_count: 0,
        };
        self.categories.push(category.clone());
        category
    }

    /// Renames in place and rewrites `category_name` on every goal using it.
    pub fn update_category(&mut self, id: i64, fields: CategoryUpdateFields) -> Result<Category> {
        let category = self
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| GoalTrackError::not_found("Category", id))?;
        category.name = fields.name;
        let updated = category.clone();

        for goal in self
            .goals
            .iter_mut()
            .filter(|g| g.goal_category_id == Some(id))
        {
            goal.category_name = Some(updated.name.clone());
        }

        Ok(updated)
    }

    /// Detaches referencing goals; they are never deleted.
    pub fn delete_category(&mut self, id: i64) -> Result<Category> {
        let index = self
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| GoalTrackError::not_found("Category", id))?;

        for goal in self
            .goals
            .iter_mut()
            .filter(|g| g.goal_category_id == Some(id))
        {
            goal.goal_category_id = None;
            goal.category_name = None;
        }

        Ok(self.categories.remove(index))
    }

    // ---------------------------------------------------------------------
    // Users
    // ---------------------------------------------------------------------

    pub fn user(&self, id: i64) -> Result<&StoredUser> {
        self.users
            .iter()
            .find(|u| u.user.id == id)
            .ok_or_else(|| GoalTrackError::not_found("User", id))
    }

    fn user_mut(&mut self, id: i64) -> Result<&mut StoredUser> {
        self.users
            .iter_mut()
            .find(|u| u.user.id == id)
            .ok_or_else(|| GoalTrackError::not_found("User", id))
    }

    pub fn user_by_username(&self, username: &str) -> Result<&StoredUser> {
        self.users
            .iter()
            .find(|u| u.user.username == username)
            .ok_or_else(|| GoalTrackError::not_found("User", username))
    }

    pub fn find_login(&self, username: &str) -> Option<&StoredUser> {
        self.users
            .iter()
            .find(|u| u.user.username.eq_ignore_ascii_case(username))
    }

    pub fn find_by_email(&self, email: &str) -> Option<&StoredUser> {
        self.users
            .iter()
            .find(|u| u.user.email.eq_ignore_ascii_case(email.trim()))
    }

    /// Username and email are unique case-insensitively, ignoring `except`.
    fn ensure_unique(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        except: Option<i64>,
    ) -> Result<()> {
        let others = || self.users.iter().filter(move |u| Some(u.user.id) != except);

        if let Some(username) = username.map(str::trim) {
            if others().any(|u| u.user.username.trim().eq_ignore_ascii_case(username)) {
                return Err(GoalTrackError::Conflict("Username already exists".to_string()));
            }
        }
        if let Some(email) = email.map(str::trim) {
            if others().any(|u| u.user.email.trim().eq_ignore_ascii_case(email)) {
                return Err(GoalTrackError::Conflict("Email already exists".to_string()));
            }
        }
        Ok(())
    }

    /// Username and email are stored trimmed.
    pub fn register(&mut self, fields: UserSignupFields) -> Result<User> {
        let username = fields.username.trim().to_string();
        let email = fields.email.trim().to_string();
        self.ensure_unique(Some(&username), Some(&email), None)?;

        let user = User {
            id: take_id(&mut self.next_user_id),
            username,
            email,
            firstname: fields.firstname,
            lastname: fields.lastname,
            user_role: UserRole::User,
        };
        self.users.push(StoredUser {
            user: user.clone(),
            password: fields.password,
        });
        Ok(user)
    }

    pub fn update_user(&mut self, id: i64, fields: UserUpdateFields) -> Result<User> {
        self.user(id)?;
        let username = non_empty(fields.username).map(|v| v.trim().to_string());
        let email = non_empty(fields.email).map(|v| v.trim().to_string());
        self.ensure_unique(username.as_deref(), email.as_deref(), Some(id))?;

        let stored = self.user_mut(id)?;
        if let Some(username) = username {
            stored.user.username = username;
        }
        if let Some(email) = email {
            stored.user.email = email;
        }
        if let Some(firstname) = non_empty(fields.firstname) {
            stored.user.firstname = firstname;
        }
        if let Some(lastname) = non_empty(fields.lastname) {
            stored.user.lastname = lastname;
        }
        if let Some(role) = fields.user_role {
            stored.user.user_role = role;
        }
        Ok(stored.user.clone())
    }

    pub fn delete_user(&mut self, id: i64) -> Result<User> {
        let index = self
            .users
            .iter()
            .position(|u| u.user.id == id)
            .ok_or_else(|| GoalTrackError::not_found("User", id))?;
        self.reset_tokens.retain(|_, user_id| *user_id != id);
        Ok(self.users.remove(index).user)
    }

    pub fn promote(&mut self, id: i64) -> Result<User> {
        let stored = self.user_mut(id)?;
        stored.user.user_role = stored.user.user_role.promoted();
        Ok(stored.user.clone())
    }

    pub fn demote(&mut self, id: i64) -> Result<User> {
        let stored = self.user_mut(id)?;
        stored.user.user_role = stored.user.user_role.demoted();
        Ok(stored.user.clone())
    }

    /// Filters run before pagination; `total_records` counts the filtered set.
    pub fn list_users(&self, page: PageRequest, filter: &UserFilter) -> PaginatedResult<User> {
        let filtered: Vec<User> = self
            .users
            .iter()
            .map(|u| &u.user)
            .filter(|u| filter.matches(u))
            .cloned()
            .collect();
        page.apply(&filtered)
    }

    // ---------------------------------------------------------------------
    // Password reset
    // ---------------------------------------------------------------------

    /// Replaces any token the user already holds.
    pub fn issue_reset_token(&mut self, user_id: i64, token: String) {
        self.reset_tokens.retain(|_, owner| *owner != user_id);
        self.reset_tokens.insert(token, user_id);
    }

    pub fn reset_token_owner(&self, token: &str) -> Option<i64> {
        self.reset_tokens.get(token).copied()
    }

    /// Consumes `token` and replaces the owner's password.
    pub fn consume_reset_token(&mut self, token: &str, new_password: &str) -> Option<i64> {
        let user_id = self.reset_tokens.remove(token)?;
        let stored = self.user_mut(user_id).ok()?;
        stored.password = new_password.to_string();
        Some(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(state: &mut StoreState, name: &str) -> Category {
        state.create_category(CategoryCreateFields {
            name: name.to_string(),
        })
    }

    fn goal(state: &mut StoreState, title: &str, category_id: Option<i64>) -> Goal {
        state.create_goal(
            GoalCreateFields {
                title: title.to_string(),
                goal_category_id: category_id,
                ..Default::default()
            },
            Utc::now(),
        )
    }

    fn update_fields(goal: &Goal, category_id: Option<i64>) -> GoalUpdateFields {
        GoalUpdateFields {
            goal_category_id: category_id,
            ..GoalUpdateFields::from(goal)
        }
    }

    fn signup(username: &str, email: &str) -> UserSignupFields {
        UserSignupFields {
            username: username.to_string(),
            email: email.to_string(),
            password: "Str0ng!Passw0rd".to_string(),
            confirm_password: "Str0ng!Passw0rd".to_string(),
            firstname: "First".to_string(),
            lastname: "Last".to_string(),
        }
    }

    #[test]
    fn test_create_goal_resolves_category() {
        let mut state = StoreState::new();
        let health = category(&mut state, "Health");
        let run = goal(&mut state, "Run", Some(health.id));

        assert_eq!(run.category_name.as_deref(), Some("Health"));
        assert_eq!(run.status, GoalStatus::InProgress);
        assert_eq!(state.category(health.id).unwrap().goal_count, 1);
    }

    #[test]
    fn test_create_goal_with_unknown_category_is_uncategorized() {
        let mut state = StoreState::new();
        let g = goal(&mut state, "Orphan", Some(99));
        assert_eq!(g.goal_category_id, None);
        assert_eq!(g.category_name, None);
    }

    #[test]
    fn test_create_goal_blank_optionals_become_none() {
        let mut state = StoreState::new();
        let g = state.create_goal(
            GoalCreateFields {
                title: "Run".to_string(),
                description: Some(String::new()),
                due_date: Some(String::new()),
                goal_category_id: None,
            },
            Utc::now(),
        );
        assert_eq!(g.description, None);
        assert_eq!(g.due_date, None);
    }

    #[test]
    fn test_move_goal_between_categories() {
        let mut state = StoreState::new();
        let a = category(&mut state, "A");
        let b = category(&mut state, "B");
        let g = goal(&mut state, "Move me", Some(a.id));

        let moved = state.update_goal(g.id, update_fields(&g, Some(b.id))).unwrap();

        assert_eq!(moved.category_name.as_deref(), Some("B"));
        assert_eq!(state.category(a.id).unwrap().goal_count, 0);
        assert_eq!(state.category(b.id).unwrap().goal_count, 1);
    }

    #[test]
    fn test_update_goal_same_category_keeps_counts() {
        let mut state = StoreState::new();
        let a = category(&mut state, "A");
        let g = goal(&mut state, "Stay", Some(a.id));

        let mut fields = update_fields(&g, Some(a.id));
        fields.title = "Renamed".to_string();
        fields.status = GoalStatus::Completed;
        let updated = state.update_goal(g.id, fields).unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.status, GoalStatus::Completed);
        assert_eq!(updated.created_date, g.created_date);
        assert_eq!(state.category(a.id).unwrap().goal_count, 1);
    }

    #[test]
    fn test_update_goal_overwrites_optionals() {
        let mut state = StoreState::new();
        let g = state.create_goal(
            GoalCreateFields {
                title: "Run".to_string(),
                description: Some("5k".to_string()),
                due_date: Some("2030-01-01".to_string()),
                goal_category_id: None,
            },
            Utc::now(),
        );

        let updated = state
            .update_goal(
                g.id,
                GoalUpdateFields {
                    title: "Run".to_string(),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.description, None);
        assert_eq!(updated.due_date, None);
    }

    #[test]
    fn test_update_missing_goal() {
        let mut state = StoreState::new();
        let err = state
            .update_goal(1, GoalUpdateFields::default())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_goal_decrements() {
        let mut state = StoreState::new();
        let a = category(&mut state, "A");
        let g = goal(&mut state, "Gone", Some(a.id));

        state.delete_goal(g.id).unwrap();
        assert_eq!(state.category(a.id).unwrap().goal_count, 0);
        assert!(state.goal(g.id).is_err());
        assert!(state.delete_goal(g.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_goal_count_never_negative() {
        let mut state = StoreState::new();
        let a = category(&mut state, "A");
        let g = goal(&mut state, "G", Some(a.id));
        state.categories[0].goal_count = 0;

        state.delete_goal(g.id).unwrap();
        assert_eq!(state.category(a.id).unwrap().goal_count, 0);
    }

    #[test]
    fn test_rename_category_cascades_only_to_its_goals() {
        let mut state = StoreState::new();
        let a = category(&mut state, "A");
        let b = category(&mut state, "B");
        let ga = goal(&mut state, "in a", Some(a.id));
        let gb = goal(&mut state, "in b", Some(b.id));

        let fields = CategoryUpdateFields {
            name: "Alpha".to_string(),
        };
        state.update_category(a.id, fields).unwrap();

        assert_eq!(state.goal(ga.id).unwrap().category_name.as_deref(), Some("Alpha"));
        assert_eq!(state.goal(gb.id).unwrap().category_name.as_deref(), Some("B"));
    }

    #[test]
    fn test_delete_category_detaches_goals() {
        let mut state = StoreState::new();
        let a = category(&mut state, "A");
        let g = goal(&mut state, "keep me", Some(a.id));

        state.delete_category(a.id).unwrap();

        let kept = state.goal(g.id).unwrap();
        assert_eq!(kept.goal_category_id, None);
        assert_eq!(kept.category_name, None);
        assert!(state.category(a.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_category_ids_are_sequential() {
        let mut state = StoreState::new();
        assert_eq!(category(&mut state, "A").id, 1);
        assert_eq!(category(&mut state, "B").id, 2);
        state.delete_category(2).unwrap();
        assert_eq!(category(&mut state, "C").id, 3);
    }

    #[test]
    fn test_register_conflicts_case_insensitive() {
        let mut state = StoreState::new();
        state.register(signup("alice", "alice@demo.com")).unwrap();

        let err = state.register(signup("ALICE", "other@demo.com")).unwrap_err();
        assert_eq!(err, GoalTrackError::Conflict("Username already exists".to_string()));

        let err = state.register(signup("bob", "Alice@Demo.com")).unwrap_err();
        assert_eq!(err, GoalTrackError::Conflict("Email already exists".to_string()));
    }

    #[test]
    fn test_register_ignores_surrounding_whitespace() {
        let mut state = StoreState::new();
        state.register(signup("demo-user", "user@demo.com")).unwrap();

        let err = state.register(signup("bob", " USER@demo.com ")).unwrap_err();
        assert_eq!(err, GoalTrackError::Conflict("Email already exists".to_string()));

        let err = state.register(signup(" Demo-User", "bob@demo.com")).unwrap_err();
        assert_eq!(err, GoalTrackError::Conflict("Username already exists".to_string()));

        let bob = state.register(signup(" bob ", " bob@demo.com ")).unwrap();
        assert_eq!(bob.username, "bob");
        assert_eq!(bob.email, "bob@demo.com");
        assert_eq!(state.find_by_email("bob@demo.com").unwrap().user.id, bob.id);
    }

    #[test]
    fn test_update_user_email_is_trimmed() {
        let mut state = StoreState::new();
        state.register(signup("alice", "alice@demo.com")).unwrap();
        let bob = state.register(signup("bob", "bob@demo.com")).unwrap();

        let taken = UserUpdateFields {
            email: Some(" ALICE@demo.com".to_string()),
            ..Default::default()
        };
        let err = state.update_user(bob.id, taken).unwrap_err();
        assert!(matches!(err, GoalTrackError::Conflict(_)));

        let padded = UserUpdateFields {
            email: Some(" robert@demo.com ".to_string()),
            ..Default::default()
        };
        let updated = state.update_user(bob.id, padded).unwrap();
        assert_eq!(updated.email, "robert@demo.com");
    }

    #[test]
    fn test_update_user_partial_merge() {
        let mut state = StoreState::new();
        let alice = state.register(signup("alice", "alice@demo.com")).unwrap();
        state.register(signup("bob", "bob@demo.com")).unwrap();

        let updated = state
            .update_user(
                alice.id,
                UserUpdateFields {
                    firstname: Some("Alicia".to_string()),
                    email: Some(String::new()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.firstname, "Alicia");
        assert_eq!(updated.email, "alice@demo.com");

        let err = state
            .update_user(
                alice.id,
                UserUpdateFields {
                    username: Some("Bob".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, GoalTrackError::Conflict(_)));

        // Keeping your own username is not a conflict
        assert!(state
            .update_user(
                alice.id,
                UserUpdateFields {
                    username: Some("ALICE".to_string()),
                    ..Default::default()
                },
            )
            .is_ok());
    }

    #[test]
    fn test_reset_token_single_use() {
        let mut state = StoreState::new();
        let alice = state.register(signup("alice", "alice@demo.com")).unwrap();
        state.issue_reset_token(alice.id, "tok".to_string());

        assert_eq!(state.reset_token_owner("tok"), Some(alice.id));
        assert_eq!(state.consume_reset_token("tok", "N3w!Password99"), Some(alice.id));
        assert_eq!(state.user(alice.id).unwrap().password, "N3w!Password99");
        assert_eq!(state.consume_reset_token("tok", "x"), None);
    }

    #[test]
    fn test_delete_user_drops_reset_tokens() {
        let mut state = StoreState::new();
        let alice = state.register(signup("alice", "alice@demo.com")).unwrap();
        state.issue_reset_token(alice.id, "tok".to_string());

        state.delete_user(alice.id).unwrap();
        assert_eq!(state.reset_token_owner("tok"), None);
    }

    #[test]
    fn test_new_reset_token_revokes_previous() {
        let mut state = StoreState::new();
        let alice = state.register(signup("alice", "alice@demo.com")).unwrap();
        let bob = state.register(signup("bob", "bob@demo.com")).unwrap();
        state.issue_reset_token(alice.id, "first".to_string());
        state.issue_reset_token(bob.id, "bobs".to_string());
        state.issue_reset_token(alice.id, "second".to_string());

        assert_eq!(state.reset_token_owner("first"), None);
        assert_eq!(state.reset_token_owner("second"), Some(alice.id));
        assert_eq!(state.reset_token_owner("bobs"), Some(bob.id));
        assert_eq!(state.reset_tokens.len(), 2);
    }
}
