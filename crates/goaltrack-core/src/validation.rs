//! Client-side form validation
//!
//! Every form shape implements [`Validate`]. All failing fields are reported
//! together so a form can render each message next to its input.

use crate::error::{GoalTrackError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use goaltrack_types::{
    CategoryCreateFields, CategoryUpdateFields, ForgotPasswordFields, GoalCreateFields,
    GoalUpdateFields, LoginFields, ResetPasswordFields, UserSignupFields, UserUpdateFields,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

pub const PASSWORD_RULE_MESSAGE: &str = "Password must be at least 12 characters and contain at least one uppercase, one lowercase, one digit and one special character";

const GOAL_TITLE_MAX: usize = 100;
const GOAL_DESCRIPTION_MAX: usize = 500;
const CATEGORY_NAME_MAX: usize = 50;
const PERSON_NAME_MAX: usize = 100;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]{2,50}$").unwrap());
static UPPER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").unwrap());
static LOWER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]").unwrap());
static DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").unwrap());
static SPECIAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error(mut self, field: &str, message: &str, code: &str) -> Self {
        self.push(field, message, code);
        self
    }

    pub fn push(&mut self, field: &str, message: &str, code: &str) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
            code: code.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// First message recorded for `field`
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(GoalTrackError::Validation(self))
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&messages.join("; "))
    }
}

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn required(errors: &mut ValidationErrors, field: &str, value: &str, message: &str) -> bool {
    if value.trim().is_empty() {
        errors.push(field, message, "REQUIRED");
        false
    } else {
        true
    }
}

fn max_len(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.push(
            field,
            &format!("Must be at most {} characters", max),
            "TOO_LONG",
        );
    }
}

fn check_email(errors: &mut ValidationErrors, field: &str, value: &str) {
    if !EMAIL_RE.is_match(value.trim()) {
        errors.push(field, "Please enter a valid email address", "INVALID_EMAIL");
    }
}

fn check_username(errors: &mut ValidationErrors, field: &str, value: &str) {
    if !USERNAME_RE.is_match(value) {
        errors.push(
            field,
            "Username must be 2-50 characters of letters, digits, '.', '_' or '-'",
            "INVALID_USERNAME",
        );
    }
}

/// Strength rule shared by registration and password reset
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= 12
        && UPPER_RE.is_match(password)
        && LOWER_RE.is_match(password)
        && DIGIT_RE.is_match(password)
        && SPECIAL_RE.is_match(password)
}

fn check_password(errors: &mut ValidationErrors, field: &str, value: &str) {
    if !is_strong_password(value) {
        errors.push(field, PASSWORD_RULE_MESSAGE, "WEAK_PASSWORD");
    }
}

/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`.
pub fn is_iso_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}

fn check_due_date(errors: &mut ValidationErrors, value: &Option<String>) {
    if let Some(date) = value.as_deref().filter(|d| !d.trim().is_empty()) {
        if !is_iso_date(date.trim()) {
            errors.push("dueDate", "Due date must be a valid date", "INVALID_DATE");
        }
    }
}

fn check_goal_text(errors: &mut ValidationErrors, title: &str, description: &Option<String>) {
    if required(errors, "title", title, "Title is required") {
        max_len(errors, "title", title, GOAL_TITLE_MAX);
    }
    if let Some(description) = description {
        max_len(errors, "description", description, GOAL_DESCRIPTION_MAX);
    }
}

fn check_category_name(errors: &mut ValidationErrors, name: &str) {
    if required(errors, "name", name, "Category name is required") {
        max_len(errors, "name", name, CATEGORY_NAME_MAX);
    }
}

impl Validate for LoginFields {
    fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();
        required(&mut errors, "username", &self.username, "Username is required");
        required(&mut errors, "password", &self.password, "Password is required");
        errors.into_result()
    }
}

impl Validate for UserSignupFields {
    fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();

        if required(&mut errors, "username", &self.username, "Username is required") {
            check_username(&mut errors, "username", &self.username);
        }
        if required(&mut errors, "email", &self.email, "Email is required") {
            check_email(&mut errors, "email", &self.email);
        }
        if required(&mut errors, "firstname", &self.firstname, "First name is required") {
            max_len(&mut errors, "firstname", &self.firstname, PERSON_NAME_MAX);
        }
        if required(&mut errors, "lastname", &self.lastname, "Last name is required") {
            max_len(&mut errors, "lastname", &self.lastname, PERSON_NAME_MAX);
        }
        check_password(&mut errors, "password", &self.password);
        if required(
            &mut errors,
            "confirmPassword",
            &self.confirm_password,
            "Please confirm your password",
        ) && self.password != self.confirm_password
        {
            errors.push("confirmPassword", "Passwords do not match", "MISMATCH");
        }

        errors.into_result()
    }
}

impl Validate for UserUpdateFields {
    fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();

        if let Some(username) = self.username.as_deref().filter(|v| !v.is_empty()) {
            check_username(&mut errors, "username", username);
        }
        if let Some(email) = self.email.as_deref().filter(|v| !v.is_empty()) {
            check_email(&mut errors, "email", email);
        }
        if let Some(firstname) = &self.firstname {
            max_len(&mut errors, "firstname", firstname, PERSON_NAME_MAX);
        }
        if let Some(lastname) = &self.lastname {
            max_len(&mut errors, "lastname", lastname, PERSON_NAME_MAX);
        }

        errors.into_result()
    }
}

impl Validate for ForgotPasswordFields {
    fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();
        if required(&mut errors, "email", &self.email, "Email is required") {
            check_email(&mut errors, "email", &self.email);
        }
        errors.into_result()
    }
}

impl Validate for ResetPasswordFields {
    fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();
        check_password(&mut errors, "newPassword", &self.new_password);
        if required(
            &mut errors,
            "confirmPassword",
            &self.confirm_password,
            "Please confirm your password",
        ) && self.new_password != self.confirm_password
        {
            errors.push("confirmPassword", "Passwords do not match", "MISMATCH");
        }
        errors.into_result()
    }
}

impl Validate for GoalCreateFields {
    fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();
        check_goal_text(&mut errors, &self.title, &self.description);
        check_due_date(&mut errors, &self.due_date);
        errors.into_result()
    }
}

impl Validate for GoalUpdateFields {
    fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();
        check_goal_text(&mut errors, &self.title, &self.description);
        check_due_date(&mut errors, &self.due_date);
        errors.into_result()
    }
}

impl Validate for CategoryCreateFields {
    fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();
        check_category_name(&mut errors, &self.name);
        errors.into_result()
    }
}

impl Validate for CategoryUpdateFields {
    fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();
        check_category_name(&mut errors, &self.name);
        errors.into_result()
    }
}
