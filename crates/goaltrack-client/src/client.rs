//! HTTP implementation of the API ports

use crate::response::{
    recovery_error, resource_error, Failure, Lookup, RecoveryPolicy, RESET_PASSWORD,
    SEND_RECOVERY_EMAIL, VALIDATE_RESET_TOKEN,
};
use async_trait::async_trait;
use goaltrack_core::validation::{is_strong_password, PASSWORD_RULE_MESSAGE};
use goaltrack_core::{
    bearer_header, AuthApi, CategoriesApi, Category, CategoryCreateFields, CategoryUpdateFields,
    ForgotPasswordFields, Goal, GoalCreateFields, GoalTrackError, GoalUpdateFields, GoalsApi,
    LoginFields, LoginResponse, PageRequest, PaginatedResult, PasswordRecoveryApi,
    ResetPasswordResponse, Result, SendRecoveryEmailResponse, User, UserFilter,
    UserSignupFields, UserUpdateFields, UsersApi, Validate, ValidateTokenResponse,
    ValidationErrors,
};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

pub struct HttpClient {
    http: ReqwestClient,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: ReqwestClient::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    /// Send `Authorization: Bearer <token>` on every request
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// `base_url` plus percent-encoded path segments
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let invalid = || GoalTrackError::Config(format!("Invalid API URL: {}", self.base_url));
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!("{} {}", method, url);

        let builder = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");
        Ok(match &self.token {
            Some(token) => builder.header(AUTHORIZATION, bearer_header(Some(token))),
            None => builder,
        })
    }

    /// Send once; a non-success status comes back as `Err(Failure)`.
    async fn send(&self, builder: RequestBuilder) -> Result<std::result::Result<Response, Failure>> {
        let response = builder
            .send()
            .await
            .map_err(|e| GoalTrackError::Request(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(Ok(response));
        }

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.unwrap_or_default();
        debug!("Request failed with {}: {}", status, body);

        Ok(Err(Failure {
            status: status.as_u16(),
            retry_after,
            body,
        }))
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| GoalTrackError::Serialization(e.to_string()))
    }

    /// Resource call returning a JSON body
    async fn fetch<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        default: &str,
        lookup: Option<Lookup<'_>>,
    ) -> Result<T> {
        match self.send(builder).await? {
            Ok(response) => Self::parse(response).await,
            Err(failure) => Err(resource_error(&failure, default, lookup)),
        }
    }

    /// Resource call whose body is ignored
    async fn execute(
        &self,
        builder: RequestBuilder,
        default: &str,
        lookup: Option<Lookup<'_>>,
    ) -> Result<()> {
        match self.send(builder).await? {
            Ok(_) => Ok(()),
            Err(failure) => Err(resource_error(&failure, default, lookup)),
        }
    }

    async fn recover<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        policy: &RecoveryPolicy,
    ) -> Result<T> {
        match self.send(builder).await? {
            Ok(response) => Self::parse(response).await,
            Err(failure) => Err(recovery_error(&failure, policy)),
        }
    }
}

#[async_trait]
impl AuthApi for HttpClient {
    async fn login(&self, fields: LoginFields) -> Result<LoginResponse> {
        fields.validate()?;
        let request = self
            .request(Method::POST, &["auth", "login", "access-token"])?
            .json(&json!({
                "username": fields.username,
                "password": fields.password,
                "keepLoggedIn": false,
            }));
        self.fetch(request, "Login failed", None).await
    }

    async fn register(&self, fields: UserSignupFields) -> Result<User> {
        fields.validate()?;
        let request = self
            .request(Method::POST, &["auth", "register"])?
            .json(&fields);
        self.fetch(request, "Registration failed", None).await
    }
}

#[async_trait]
impl GoalsApi for HttpClient {
    async fn get_goals(&self) -> Result<Vec<Goal>> {
        let request = self.request(Method::GET, &["goals"])?;
        self.fetch(request, "Failed to load goals", None).await
    }

    async fn get_goal(&self, id: i64) -> Result<Goal> {
        let id = id.to_string();
        let request = self.request(Method::GET, &["goals", &id])?;
        let lookup = Lookup { entity: "Goal", id: &id };
        self.fetch(request, "Failed to load goal", Some(lookup)).await
    }

    async fn create_goal(&self, fields: GoalCreateFields) -> Result<Goal> {
        fields.validate()?;
        let request = self.request(Method::POST, &["goals"])?.json(&fields);
        self.fetch(request, "Failed to create goal", None).await
    }

    async fn update_goal(&self, id: i64, fields: GoalUpdateFields) -> Result<Option<Goal>> {
        fields.validate()?;
        let id = id.to_string();
        let request = self.request(Method::PUT, &["goals", &id])?.json(&fields);
        let lookup = Lookup { entity: "Goal", id: &id };
        self.execute(request, "Failed to update goal", Some(lookup))
            .await
            .map(|_| None)
    }

    async fn delete_goal(&self, id: i64) -> Result<()> {
        let id = id.to_string();
        let request = self.request(Method::DELETE, &["goals", &id])?;
        let lookup = Lookup { entity: "Goal", id: &id };
        self.execute(request, "Failed to delete goal", Some(lookup))
            .await
    }
}

#[async_trait]
impl CategoriesApi for HttpClient {
    async fn get_all_categories(&self) -> Result<Vec<Category>> {
        let request = self.request(Method::GET, &["categories"])?;
        self.fetch(request, "Failed to load categories", None).await
    }

    async fn get_category(&self, id: i64) -> Result<Category> {
        let id = id.to_string();
        let request = self.request(Method::GET, &["categories", &id])?;
        let lookup = Lookup {
            entity: "Category",
            id: &id,
        };
        self.fetch(request, "Failed to load category", Some(lookup))
            .await
    }

    async fn create_category(&self, fields: CategoryCreateFields) -> Result<Category> {
        fields.validate()?;
        let request = self.request(Method::POST, &["categories"])?.json(&fields);
        self.fetch(request, "Failed to create category", None).await
    }

    async fn update_category(
        &self,
        id: i64,
        fields: CategoryUpdateFields,
    ) -> Result<Option<Category>> {
        fields.validate()?;
        let id = id.to_string();
        let request = self
            .request(Method::PUT, &["categories", &id])?
            .json(&fields);
        let lookup = Lookup {
            entity: "Category",
            id: &id,
        };
        self.execute(request, "Failed to update category", Some(lookup))
            .await
            .map(|_| None)
    }

    async fn delete_category(&self, id: i64) -> Result<()> {
        let id = id.to_string();
        let request = self.request(Method::DELETE, &["categories", &id])?;
        self.execute(request, "Failed to delete category", None)
            .await
    }
}

#[async_trait]
impl UsersApi for HttpClient {
    async fn get_all_users(
        &self,
        page: PageRequest,
        filter: UserFilter,
    ) -> Result<PaginatedResult<User>> {
        let mut query = vec![
            ("pageNumber", page.page_number.to_string()),
            ("pageSize", page.page_size.to_string()),
        ];
        if let Some(username) = filter.username.filter(|v| !v.is_empty()) {
            query.push(("username", username));
        }
        if let Some(email) = filter.email.filter(|v| !v.is_empty()) {
            query.push(("email", email));
        }
        if let Some(role) = filter.user_role {
            query.push(("userRole", role.to_string()));
        }

        let request = self.request(Method::GET, &["users"])?.query(&query);
        self.fetch(request, "Failed to load users", None).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<User> {
        let id = id.to_string();
        let request = self.request(Method::GET, &["users", &id])?;
        let lookup = Lookup { entity: "User", id: &id };
        self.fetch(request, "Failed to load user", Some(lookup)).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<User> {
        let request = self.request(Method::GET, &["users", "username", username])?;
        let lookup = Lookup {
            entity: "User",
            id: username,
        };
        self.fetch(request, "Failed to load user", Some(lookup)).await
    }

    async fn update_user(&self, id: i64, fields: UserUpdateFields) -> Result<User> {
        fields.validate()?;
        let id = id.to_string();
        let request = self.request(Method::PUT, &["users", &id])?.json(&fields);
        let lookup = Lookup { entity: "User", id: &id };
        self.fetch(request, "Failed to update user", Some(lookup)).await
    }

    async fn delete_user(&self, id: i64) -> Result<()> {
        let id = id.to_string();
        let request = self.request(Method::DELETE, &["users", &id])?;
        let lookup = Lookup { entity: "User", id: &id };
        self.execute(request, "Failed to delete user", Some(lookup))
            .await
    }

    async fn promote_to_admin(&self, id: i64) -> Result<User> {
        let id = id.to_string();
        let request = self.request(Method::POST, &["users", &id, "promote"])?;
        let lookup = Lookup { entity: "User", id: &id };
        self.fetch(request, "Failed to promote user", Some(lookup))
            .await
    }

    async fn demote_to_user(&self, id: i64) -> Result<User> {
        let id = id.to_string();
        let request = self.request(Method::POST, &["users", &id, "demote"])?;
        let lookup = Lookup { entity: "User", id: &id };
        self.fetch(request, "Failed to demote user", Some(lookup))
            .await
    }
}

#[async_trait]
impl PasswordRecoveryApi for HttpClient {
    async fn send_recovery_email(
        &self,
        email: &str,
        captcha_token: Option<&str>,
    ) -> Result<SendRecoveryEmailResponse> {
        ForgotPasswordFields {
            email: email.to_string(),
        }
        .validate()?;

        let mut request = self.request(Method::POST, &["password-recovery", email])?;
        if let Some(captcha) = captcha_token.filter(|c| !c.is_empty()) {
            request = request.query(&[("captchaToken", captcha)]);
        }
        self.recover(request, &SEND_RECOVERY_EMAIL).await
    }

    async fn validate_reset_token(&self, token: &str) -> Result<ValidateTokenResponse> {
        let request = self.request(Method::GET, &["reset-password", token])?;
        self.recover(request, &VALIDATE_RESET_TOKEN).await
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

        let request = self
            .request(Method::POST, &["reset-password"])?
            .json(&json!({
                "token": token,
                "newPassword": new_password,
            }));
        self.recover(request, &RESET_PASSWORD).await
    }
}
