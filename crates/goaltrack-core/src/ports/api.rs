//! One trait per REST resource family

use crate::Result;
use async_trait::async_trait;
use goaltrack_types::{
    Category, CategoryCreateFields, CategoryUpdateFields, Goal, GoalCreateFields,
    GoalUpdateFields, LoginFields, LoginResponse, PageRequest, PaginatedResult,
    ResetPasswordResponse, SendRecoveryEmailResponse, User, UserFilter, UserSignupFields,
    UserUpdateFields, ValidateTokenResponse,
};

/// Login and registration
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, fields: LoginFields) -> Result<LoginResponse>;
    async fn register(&self, fields: UserSignupFields) -> Result<User>;
}

/// Goals of the authenticated user
#[async_trait]
pub trait GoalsApi: Send + Sync {
    async fn get_goals(&self) -> Result<Vec<Goal>>;
    async fn get_goal(&self, id: i64) -> Result<Goal>;
    async fn create_goal(&self, fields: GoalCreateFields) -> Result<Goal>;
    /// Full overwrite. Backends without a response body return `None`.
    async fn update_goal(&self, id: i64, fields: GoalUpdateFields) -> Result<Option<Goal>>;
    async fn delete_goal(&self, id: i64) -> Result<()>;
}

/// Categories of the authenticated user
#[async_trait]
pub trait CategoriesApi: Send + Sync {
    async fn get_all_categories(&self) -> Result<Vec<Category>>;
    async fn get_category(&self, id: i64) -> Result<Category>;
    async fn create_category(&self, fields: CategoryCreateFields) -> Result<Category>;
    async fn update_category(
        &self,
        id: i64,
        fields: CategoryUpdateFields,
    ) -> Result<Option<Category>>;
    async fn delete_category(&self, id: i64) -> Result<()>;
}

/// User administration
#[async_trait]
pub trait UsersApi: Send + Sync {
    async fn get_all_users(
        &self,
        page: PageRequest,
        filter: UserFilter,
    ) -> Result<PaginatedResult<User>>;
    async fn get_user_by_id(&self, id: i64) -> Result<User>;
    async fn get_user_by_username(&self, username: &str) -> Result<User>;
    async fn update_user(&self, id: i64, fields: UserUpdateFields) -> Result<User>;
    async fn delete_user(&self, id: i64) -> Result<()>;
    async fn promote_to_admin(&self, id: i64) -> Result<User>;
    async fn demote_to_user(&self, id: i64) -> Result<User>;
}

/// Forgot-password flow
#[async_trait]
pub trait PasswordRecoveryApi: Send + Sync {
    async fn send_recovery_email(
        &self,
        email: &str,
        captcha_token: Option<&str>,
    ) -> Result<SendRecoveryEmailResponse>;
    async fn validate_reset_token(&self, token: &str) -> Result<ValidateTokenResponse>;
    async fn reset_password(&self, token: &str, new_password: &str)
        -> Result<ResetPasswordResponse>;
}
