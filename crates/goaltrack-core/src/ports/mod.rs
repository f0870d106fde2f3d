//! Port traits (interfaces) for the goal-tracking API

pub mod api;
pub mod backend;

pub use api::{AuthApi, CategoriesApi, GoalsApi, PasswordRecoveryApi, UsersApi};
pub use backend::Backend;
