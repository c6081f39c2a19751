use std::sync::Arc;

use chrono::Utc;

use crate::domain::{Requester, User};
use crate::error::DomainError;
use crate::forms::{ProfileForm, RegistrationForm};
use crate::guard::require_auth;
use crate::ports::{PasswordService, UserRepository};

/// Account registration, login and self-service profile edits.
#[derive(Clone)]
pub struct ProfileService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    pub async fn register(&self, form: RegistrationForm) -> Result<User, DomainError> {
        form.validate()?;

        if self.users.find_by_username(&form.username).await?.is_some() {
            return Err(DomainError::Duplicate("Username already taken".to_string()));
        }
        if self.users.find_by_email(&form.email).await?.is_some() {
            return Err(DomainError::Duplicate("Email already registered".to_string()));
        }

        let password_hash = self
            .passwords
            .hash(&form.password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = self
            .users
            .insert(User::new(form.username, form.email, password_hash))
            .await?;
        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Check credentials. Unknown users and wrong passwords look the same.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if !valid {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(DomainError::Unauthorized);
        }
        Ok(user)
    }

    pub async fn current_user(&self, requester: Option<&Requester>) -> Result<User, DomainError> {
        let requester = require_auth(requester)?;
        self.users
            .find_by_id(requester.user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", requester.user_id))
    }

    /// Edit the requester's own profile.
    pub async fn update_profile(
        &self,
        requester: Option<&Requester>,
        form: ProfileForm,
    ) -> Result<User, DomainError> {
        let mut user = self.current_user(requester).await?;
        form.validate()?;

        if form.username != user.username {
            if let Some(other) = self.users.find_by_username(&form.username).await? {
                if other.id != user.id {
                    return Err(DomainError::Duplicate("Username already taken".to_string()));
                }
            }
        }

        user.username = form.username;
        user.first_name = form.first_name;
        user.last_name = form.last_name;
        user.email = form.email;
        user.updated_at = Utc::now();

        let user = self.users.update(user).await?;
        tracing::info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }
}
