//! Validated input for mutating operations.
//!
//! Forms check field shape only. Checks that need the store (referenced
//! category exists, username is free) happen in the services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

pub const TITLE_MAX_LEN: usize = 256;
pub const USERNAME_MAX_LEN: usize = 150;
pub const MIN_PASSWORD_LEN: usize = 8;

/// Accumulates field errors so callers see all of them at once.
#[derive(Debug, Default)]
struct Errors(Vec<String>);

impl Errors {
    fn check(&mut self, ok: bool, message: impl Into<String>) {
        if !ok {
            self.0.push(message.into());
        }
    }

    fn required(&mut self, field: &str, value: &str) {
        self.check(!value.trim().is_empty(), format!("{field} is required"));
    }

    fn max_len(&mut self, field: &str, value: &str, max: usize) {
        self.check(
            value.chars().count() <= max,
            format!("{field} must be at most {max} characters"),
        );
    }

    fn finish(self) -> Result<(), DomainError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self.0))
        }
    }
}

/// Fields an author controls on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostForm {
    pub title: String,
    pub text: String,
    pub image: Option<String>,
    pub pub_date: DateTime<Utc>,
    pub location_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}

impl PostForm {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = Errors::default();
        errors.required("title", &self.title);
        errors.max_len("title", &self.title, TITLE_MAX_LEN);
        errors.required("text", &self.text);
        errors.check(self.category_id.is_some(), "category is required");
        if let Some(image) = &self.image {
            errors.required("image", image);
        }
        errors.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentForm {
    pub text: String,
}

impl CommentForm {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = Errors::default();
        errors.required("text", &self.text);
        errors.finish()
    }
}

/// Editable profile fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileForm {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = Errors::default();
        username_rules(&mut errors, &self.username);
        errors.max_len("first_name", &self.first_name, USERNAME_MAX_LEN);
        errors.max_len("last_name", &self.last_name, USERNAME_MAX_LEN);
        email_rules(&mut errors, &self.email, false);
        errors.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = Errors::default();
        username_rules(&mut errors, &self.username);
        email_rules(&mut errors, &self.email, true);
        errors.check(
            self.password.len() >= MIN_PASSWORD_LEN,
            format!("password must be at least {MIN_PASSWORD_LEN} characters"),
        );
        errors.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryForm {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
}

impl CategoryForm {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = Errors::default();
        errors.required("title", &self.title);
        errors.max_len("title", &self.title, TITLE_MAX_LEN);
        errors.required("description", &self.description);
        errors.check(
            is_slug(&self.slug),
            "slug may contain only latin letters, digits, hyphens and underscores",
        );
        errors.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationForm {
    pub name: String,
    pub is_published: bool,
}

impl LocationForm {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = Errors::default();
        errors.required("name", &self.name);
        errors.max_len("name", &self.name, TITLE_MAX_LEN);
        errors.finish()
    }
}

/// Staff edit of a post's publication gates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PublicationForm {
    pub is_published: bool,
    pub pub_date: DateTime<Utc>,
}

fn username_rules(errors: &mut Errors, username: &str) {
    errors.required("username", username);
    errors.max_len("username", username, USERNAME_MAX_LEN);
    errors.check(
        username
            .chars()
            .all(|c| c.is_alphanumeric() || "_.@+-".contains(c)),
        "username may contain only letters, digits and @/./+/-/_",
    );
}

fn email_rules(errors: &mut Errors, email: &str, required: bool) {
    if email.is_empty() {
        errors.check(!required, "email is required");
        return;
    }
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    errors.check(well_formed, "email address is invalid");
}

fn is_slug(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
