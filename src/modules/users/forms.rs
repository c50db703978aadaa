use serde::Deserialize;

use crate::utils::validation::{
    char_len, is_email, is_letters_and_spaces, is_strong_password, FieldErrors,
};

const NAME_MIN: usize = 5;
const NAME_MAX: usize = 30;

pub const PASSWORD_RULE: &str = "Password must be at least 8 characters and contain an uppercase letter, a lowercase letter, a number and a symbol.";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Registration fields after validation; the password is still plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<Registration, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = self.name.trim();
        if !is_letters_and_spaces(name) {
            errors.push("name", "Name must contain only letters and spaces");
        }
        let len = char_len(name);
        if !(NAME_MIN..=NAME_MAX).contains(&len) {
            errors.push("name", "Name must be 5-30 characters long");
        }

        let email = self.email.trim();
        if !is_email(email) {
            errors.push("email", "Email must be provided.");
        }

        let password = self.password.trim();
        if !is_strong_password(password) {
            errors.push("password", PASSWORD_RULE);
        }

        errors.finish(Registration {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
    }

    /// Copy safe to echo back into the form: never the password.
    pub fn redacted(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    /// Trimmed `(email, password)`.
    pub fn validate(&self) -> Result<(String, String), FieldErrors> {
        let mut errors = FieldErrors::new();

        let email = self.email.trim();
        if !is_email(email) {
            errors.push("email", "Email must be provided.");
        }
        let password = self.password.trim();
        if password.is_empty() {
            errors.push("password", "Password must be provided");
        }

        errors.finish((email.to_string(), password.to_string()))
    }

    pub fn redacted(&self) -> Self {
        Self {
            email: self.email.trim().to_string(),
            password: String::new(),
        }
    }
}
