//! In-memory goal-tracking backend
//!
//! `DemoStore` answers every API port from process memory. Each call first
//! awaits the configured latency, then takes the state lock and applies the
//! whole operation (including cross-entity bookkeeping) without yielding, so
//! concurrent callers observe operations one at a time.

use crate::config::DemoConfig;
use crate::seed::seeded_state;
use crate::state::StoreState;
use crate::token::{infer_role, mint_token, token_lifetime};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use goaltrack_core::validation::{is_strong_password, PASSWORD_RULE_MESSAGE};
use goaltrack_core::{
    AuthApi, CategoriesApi, Category, CategoryCreateFields, CategoryUpdateFields, Goal,
    GoalCreateFields, GoalTrackError, GoalUpdateFields, GoalsApi, LoginFields, LoginResponse,
    PageRequest, PaginatedResult, PasswordRecoveryApi, ResetPasswordResponse, Result,
    SendRecoveryEmailResponse, User, UserFilter, UserSignupFields, UserUpdateFields, UsersApi,
    Validate, ValidateTokenResponse, ValidationErrors,
};
use rand::Rng;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const RECOVERY_EMAIL_SENT: &str =
    "If an account with that email exists, a password reset link has been sent.";
pub const RESET_TOKEN_VALID: &str = "Reset token is valid.";
pub const RESET_TOKEN_INVALID: &str = "This reset link is invalid or has expired.";
pub const RESET_TOKEN_REJECTED: &str = "Invalid or expired reset token.";
pub const PASSWORD_RESET_DONE: &str = "Your password has been reset successfully.";

pub struct DemoStore {
    state: Mutex<StoreState>,
    config: DemoConfig,
}

impl DemoStore {
    /// A store with no records; ids start at 1
    pub fn empty(config: DemoConfig) -> Self {
        Self {
            state: Mutex::new(StoreState::new()),
            config,
        }
    }

    /// A store pre-filled with the sample goals, categories and users
    pub fn seeded(config: DemoConfig) -> Self {
        Self {
            state: Mutex::new(seeded_state(Utc::now())),
            config,
        }
    }

    async fn delay(&self) {
        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }
    }

    /// The outstanding reset token issued to `email`; each request replaces
    /// the previous one. Stands in for the inbox the real backend would
    /// deliver the link to.
    pub async fn pending_reset_token(&self, email: &str) -> Option<String> {
        let state = self.state.lock().await;
        let user_id = state.find_by_email(email)?.user.id;
        state
            .reset_tokens
            .iter()
            .find(|(_, owner)| **owner == user_id)
            .map(|(token, _)| token.clone())
    }
}

#[async_trait]
impl GoalsApi for DemoStore {
    async fn get_goals(&self) -> Result<Vec<Goal>> {
        self.delay().await;
        let state = self.state.lock().await;
        debug!("Listing {} goals", state.goals.len());
        Ok(state.goals.clone())
    }

    async fn get_goal(&self, id: i64) -> Result<Goal> {
        self.delay().await;
        debug!("Fetching goal {}", id);
        self.state.lock().await.goal(id).cloned()
    }

    async fn create_goal(&self, fields: GoalCreateFields) -> Result<Goal> {
        fields.validate()?;
        self.delay().await;

        let requested = fields.goal_category_id;
        let goal = self.state.lock().await.create_goal(fields, Utc::now());
        if requested.is_some() && goal.goal_category_id.is_none() {
            warn!(
                "Goal {} references unknown category {:?}; stored uncategorized",
                goal.id, requested
            );
        }
        info!("Created goal {} ({:?})", goal.id, goal.title);
        Ok(goal)
    }

    async fn update_goal(&self, id: i64, fields: GoalUpdateFields) -> Result<Option<Goal>> {
        fields.validate()?;
        self.delay().await;

        let goal = self.state.lock().await.update_goal(id, fields)?;
        info!(
            "Updated goal {}: status={}, category={:?}",
            goal.id, goal.status, goal.goal_category_id
        );
        Ok(Some(goal))
    }

    async fn delete_goal(&self, id: i64) -> Result<()> {
        self.delay().await;
        let goal = self.state.lock().await.delete_goal(id)?;
        info!("Deleted goal {}", goal.id);
        Ok(())
    }
}

#[async_trait]
impl CategoriesApi for DemoStore {
    async fn get_all_categories(&self) -> Result<Vec<Category>> {
        self.delay().await;
        let state = self.state.lock().await;
        debug!("Listing {} categories", state.categories.len());
        Ok(state.categories.clone())
    }

    async fn get_category(&self, id: i64) -> Result<Category> {
        self.delay().await;
        debug!("Fetching category {}", id);
        self.state.lock().await.category(id).cloned()
    }

    async fn create_category(&self, fields: CategoryCreateFields) -> Result<Category> {
        fields.validate()?;
        self.delay().await;

        let category = self.state.lock().await.create_category(fields);
        info!("Created category {} ({:?})", category.id, category.name);
        Ok(category)
    }

    async fn update_category(
        &self,
        id: i64,
        fields: CategoryUpdateFields,
    ) -> Result<Option<Category>> {
        fields.validate()?;
        self.delay().await;

        let category = self.state.lock().await.update_category(id, fields)?;
        info!(
            "Renamed category {} to {:?} ({} goals updated)",
            category.id, category.name, category.goal_count
        );
        Ok(Some(category))
    }

    async fn delete_category(&self, id: i64) -> Result<()> {
        self.delay().await;
        let category = self.state.lock().await.delete_category(id)?;
        info!(
            "Deleted category {} ({} goals detached)",
            category.id, category.goal_count
        );
        Ok(())
    }
}

#[async_trait]
impl UsersApi for DemoStore {
    async fn get_all_users(
        &self,
        page: PageRequest,
        filter: UserFilter,
    ) -> Result<PaginatedResult<User>> {
        self.delay().await;
        debug!("Listing users: page={:?}, filter={:?}", page, filter);
        Ok(self.state.lock().await.list_users(page, &filter))
    }

    async fn get_user_by_id(&self, id: i64) -> Result<User> {
        self.delay().await;
        self.state.lock().await.user(id).map(|u| u.user.clone())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<User> {
        self.delay().await;
        self.state
            .lock()
            .await
            .user_by_username(username)
            .map(|u| u.user.clone())
    }

    async fn update_user(&self, id: i64, fields: UserUpdateFields) -> Result<User> {
        fields.validate()?;
        self.delay().await;

        let user = self.state.lock().await.update_user(id, fields)?;
        info!("Updated user {} ({})", user.id, user.username);
        Ok(user)
    }

    async fn delete_user(&self, id: i64) -> Result<()> {
        self.delay().await;
        let user = self.state.lock().await.delete_user(id)?;
        info!("Deleted user {} ({})", user.id, user.username);
        Ok(())
    }

    async fn promote_to_admin(&self, id: i64) -> Result<User> {
        self.delay().await;
        let user = self.state.lock().await.promote(id)?;
        info!("User {} role is now {}", user.id, user.user_role);
        Ok(user)
    }

    async fn demote_to_user(&self, id: i64) -> Result<User> {
        self.delay().await;
        let user = self.state.lock().await.demote(id)?;
        info!("User {} role is now {}", user.id, user.user_role);
        Ok(user)
    }
}

#[async_trait]
impl AuthApi for DemoStore {
    /// Stored users must give their password. Any other username is let in
    /// with a role guessed from the name.
    async fn login(&self, fields: LoginFields) -> Result<LoginResponse> {
        fields.validate()?;
        let guest_id: i64 = rand::thread_rng().gen_range(0..10_000);
        self.delay().await;

        let (user_id, username, role) = {
            let state = self.state.lock().await;
            match state.find_login(&fields.username) {
                Some(stored) if stored.password == fields.password => (
                    stored.user.id,
                    stored.user.username.clone(),
                    stored.user.user_role,
                ),
                Some(_) => {
                    warn!("Rejected demo login for {}", fields.username);
                    return Err(GoalTrackError::Unauthorized(
                        "Invalid username or password".to_string(),
                    ));
                }
                None => (
                    guest_id,
                    fields.username.clone(),
                    infer_role(&fields.username),
                ),
            }
        };

        let now = Utc::now();
        let token = mint_token(user_id, &username, role, now)?;
        info!("Demo login: {} as {}", username, role);

        Ok(LoginResponse {
            token,
            username,
            role: role.to_string(),
            expires_at: (now + token_lifetime()).to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }

    async fn register(&self, fields: UserSignupFields) -> Result<User> {
        fields.validate()?;
        self.delay().await;

        let user = self.state.lock().await.register(fields)?;
        info!("Registered user {} ({})", user.id, user.username);
        Ok(user)
    }
}

#[async_trait]
impl PasswordRecoveryApi for DemoStore {
    /// Answers identically whether or not the email is known.
    async fn send_recovery_email(
        &self,
        email: &str,
        _captcha_token: Option<&str>,
    ) -> Result<SendRecoveryEmailResponse> {
        goaltrack_core::ForgotPasswordFields {
            email: email.to_string(),
        }
        .validate()?;
        self.delay().await;

        let mut state = self.state.lock().await;
        let owner = state.find_by_email(email).map(|u| u.user.id);
        if let Some(user_id) = owner {
            let token = uuid::Uuid::new_v4().simple().to_string();
            info!("Demo reset token for {}: {}", email, token);
            state.issue_reset_token(user_id, token);
        } else {
            debug!("No demo account for {}", email);
        }

        Ok(SendRecoveryEmailResponse {
            message: RECOVERY_EMAIL_SENT.to_string(),
        })
    }

    async fn validate_reset_token(&self, token: &str) -> Result<ValidateTokenResponse> {
        self.delay().await;
        let is_valid = self.state.lock().await.reset_token_owner(token).is_some();

        Ok(ValidateTokenResponse {
            is_valid,
            message: if is_valid {
                RESET_TOKEN_VALID
            } else {
                RESET_TOKEN_INVALID
            }
            .to_string(),
        })
    }

    async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<ResetPasswordResponse> {
        if !is_strong_password(new_password) {
            return Err(ValidationErrors::new()
                .with_error("newPassword", PASSWORD_RULE_MESSAGE, "WEAK_PASSWORD")
                .into());
        }
        self.delay().await;

        match self
            .state
            .lock()
            .await
            .consume_reset_token(token, new_password)
        {
            Some(user_id) => {
                info!("Password reset for user {}", user_id);
                Ok(ResetPasswordResponse {
                    message: PASSWORD_RESET_DONE.to_string(),
                })
            }
            None => Err(ValidationErrors::new()
                .with_error("token", RESET_TOKEN_REJECTED, "INVALID_TOKEN")
                .into()),
        }
    }
}
