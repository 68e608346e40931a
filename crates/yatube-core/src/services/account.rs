//! Account service - registration and credential checks.

use std::sync::Arc;

use crate::domain::{NewUser, User};
use crate::error::{DomainError, RepoError};
use crate::permissions::Caller;
use crate::ports::{AuthError, PasswordService, UserRepository};
use crate::validation::FieldErrors;

const USERNAME_MAX_LEN: usize = 150;
const PASSWORD_MIN_LEN: usize = 8;

pub const USERNAME_TAKEN: &str = "A user with that username already exists.";
pub const USERNAME_INVALID: &str = "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";

/// Validated registration input.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    /// Create a user account with a hashed password.
    pub async fn register(&self, registration: Registration) -> Result<User, DomainError> {
        let mut errors = validate_username(&registration.username);
        errors.merge(validate_password(
            &registration.username,
            &registration.password,
        ));
        errors.into_result()?;

        if self
            .users
            .find_by_username(&registration.username)
            .await?
            .is_some()
        {
            return Err(FieldErrors::single("username", USERNAME_TAKEN).into());
        }

        let password_hash = self
            .passwords
            .hash(&registration.password)
            .map_err(internal)?;

        let user = self
            .users
            .create(NewUser::new(
                registration.username,
                registration.email,
                password_hash,
            ))
            .await
            .map_err(|e| match e {
                RepoError::Constraint(_) => FieldErrors::single("username", USERNAME_TAKEN).into(),
                other => DomainError::from(other),
            })?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Check a username/password pair.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            // Hash anyway so unknown usernames take as long as wrong passwords.
            let _ = self.passwords.hash(password);
            return Err(DomainError::InvalidCredentials);
        };

        if !self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(internal)?
        {
            tracing::debug!(username = %username, "Password mismatch");
            return Err(DomainError::InvalidCredentials);
        }

        Ok(user)
    }

    /// The stored account behind an authenticated caller.
    pub async fn current(&self, caller: &Caller) -> Result<User, DomainError> {
        self.users
            .find_by_id(caller.user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", caller.user_id))
    }
}

fn internal(e: AuthError) -> DomainError {
    DomainError::Internal(e.to_string())
}

/// Letters, digits and `@.+-_`, at most 150 characters.
pub fn validate_username(username: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if username.chars().count() > USERNAME_MAX_LEN {
        errors.add(
            "username",
            format!("Ensure this field has no more than {USERNAME_MAX_LEN} characters."),
        );
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        errors.add("username", USERNAME_INVALID);
    }
    errors
}

pub fn validate_password(username: &str, password: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if password.chars().count() < PASSWORD_MIN_LEN {
        errors.add(
            "password",
            format!(
                "This password is too short. It must contain at least {PASSWORD_MIN_LEN} characters."
            ),
        );
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        errors.add("password", "This password is entirely numeric.");
    }
    if password.eq_ignore_ascii_case(username) {
        errors.add("password", "The password is too similar to the username.");
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice.b+test@x-y_z").is_empty());
        assert_eq!(
            validate_username("bad name").get("username"),
            Some(&[USERNAME_INVALID.to_string()][..])
        );
        assert!(!validate_username(&"a".repeat(151)).is_empty());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("alice", "correct-horse").is_empty());
        assert_eq!(
            validate_password("alice", "short")
                .get("password")
                .map(<[String]>::len),
            Some(1)
        );
        assert_eq!(
            validate_password("alice", "12345678")
                .get("password")
                .map(<[String]>::len),
            Some(1)
        );
        assert_eq!(
            validate_password("longusername", "LongUserName")
                .get("password")
                .map(<[String]>::len),
            Some(1)
        );
    }
}
