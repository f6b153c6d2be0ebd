//! Registration input validation.

use validator::Validate;

use crate::error::CoreError;

/// Minimum password length when none is configured.
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

/// Registration form after trimming.
#[derive(Debug, Clone, Validate)]
pub struct Registration {
    #[validate(length(min = 1, max = 50, message = "username must be 1-50 characters"))]
    pub username: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl Registration {
    /// Build a registration from raw form values, trimming identifiers.
    pub fn new(username: &str, email: &str, password: &str, confirm_password: &str) -> Self {
        Self {
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
            confirm_password: confirm_password.to_string(),
        }
    }

    /// Check field formats, password confirmation, and password length.
    ///
    /// Uniqueness of username and email is the store's concern.
    pub fn check(&self, min_password_length: usize) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;

        if self.password.is_empty() {
            return Err(CoreError::Validation("password is required".to_string()));
        }
        if self.password != self.confirm_password {
            return Err(CoreError::Validation("passwords do not match".to_string()));
        }
        if self.password.chars().count() < min_password_length {
            return Err(CoreError::Validation(format!(
                "password must be at least {min_password_length} characters long"
            )));
        }
        Ok(())
    }
}
