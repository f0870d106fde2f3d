//! Routes every API family to one implementation

use super::api::{AuthApi, CategoriesApi, GoalsApi, PasswordRecoveryApi, UsersApi};
use std::sync::Arc;

/// The set of API implementations the application talks to
#[derive(Clone)]
pub struct Backend {
    pub auth: Arc<dyn AuthApi>,
    pub goals: Arc<dyn GoalsApi>,
    pub categories: Arc<dyn CategoriesApi>,
    pub users: Arc<dyn UsersApi>,
    pub password_recovery: Arc<dyn PasswordRecoveryApi>,
}

impl Backend {
    pub fn from_parts(
        auth: Arc<dyn AuthApi>,
        goals: Arc<dyn GoalsApi>,
        categories: Arc<dyn CategoriesApi>,
        users: Arc<dyn UsersApi>,
        password_recovery: Arc<dyn PasswordRecoveryApi>,
    ) -> Self {
        Self {
            auth,
            goals,
            categories,
            users,
            password_recovery,
        }
    }

    /// Route every family to a single implementation
    pub fn uniform<T>(api: Arc<T>) -> Self
    where
        T: AuthApi + GoalsApi + CategoriesApi + UsersApi + PasswordRecoveryApi + 'static,
    {
        Self::from_parts(api.clone(), api.clone(), api.clone(), api.clone(), api)
    }
}
