//! User-related entity definitions.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ValidationErrors;

/// Minimum length of a first name.
pub const MIN_FIRST_NAME_LEN: usize = 2;
/// Minimum length of a last name.
pub const MIN_LAST_NAME_LEN: usize = 2;
/// Minimum length of a plain-text password on registration.
pub const MIN_PASSWORD_LEN: usize = 7;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,4}$").expect("email pattern compiles")
});

/// Returns true if the address matches the accepted email pattern.
pub fn is_email_valid(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier.
    pub id: Uuid,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email address, unique across users.
    pub email: String,
    /// bcrypt hash of the password. Never sent to clients.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Whether the user has administrator rights.
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    /// Creates a new non-admin user without a password hash.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password_hash: String::new(),
            is_admin: false,
        }
    }

    /// Sets the password hash.
    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = hash.into();
        self
    }

    /// Grants administrator rights.
    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    /// Validates profile fields.
    ///
    /// `password` is the plain-text password on registration and `None` on
    /// updates, where the stored hash is kept as is.
    pub fn validate(&self, password: Option<&str>) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if self.first_name.chars().count() < MIN_FIRST_NAME_LEN {
            errors.add(
                "firstName",
                format!("First name length should be at least {MIN_FIRST_NAME_LEN} characters"),
            );
        }
        if self.last_name.chars().count() < MIN_LAST_NAME_LEN {
            errors.add(
                "lastName",
                format!("Last name length should be at least {MIN_LAST_NAME_LEN} characters"),
            );
        }
        if !is_email_valid(&self.email) {
            errors.add("email", format!("Email \"{}\" is invalid", self.email));
        }
        if password.is_some_and(|p| p.chars().count() < MIN_PASSWORD_LEN) {
            errors.add(
                "password",
                format!("Password length should be at least {MIN_PASSWORD_LEN} characters"),
            );
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("Alex", "Xela", "hello@mail.ru");

        assert_eq!(user.email, "hello@mail.ru");
        assert!(!user.is_admin);
        assert!(user.password_hash.is_empty());
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_email_valid("helloworld@gmail.com"));
        assert!(is_email_valid("a.b+c@sub.domain.io"));
        assert!(!is_email_valid("somethingwrong"));
        assert!(!is_email_valid("UPPER@MAIL.COM"));
        assert!(!is_email_valid("a@b.toolongtld"));
    }

    #[test]
    fn test_validate_registration() {
        let user = User::new("A", "", "nope");
        let errors = user.validate(Some("123"));

        assert_eq!(errors.len(), 4);
        assert!(errors.contains("firstName"));
        assert!(errors.contains("lastName"));
        assert!(errors.contains("password"));
        assert_eq!(errors.get("email"), Some("Email \"nope\" is invalid"));
    }

    #[test]
    fn test_validate_update_skips_password() {
        let user = User::new("Alex", "Xela", "hello@mail.ru");
        assert!(user.validate(None).is_empty());
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let user = User::new("Alex", "Xela", "hello@mail.ru").with_password_hash("$2b$secret");
        let json = serde_json::to_value(&user).unwrap();

        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["firstName"], "Alex");
        assert_eq!(json["isAdmin"], false);
    }
}
