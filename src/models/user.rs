// src/models/user.rs

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::config::PASSWORD_MIN_LENGTH;

/// Marketplace role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Farmer,
    Company,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Farmer => "farmer",
            Role::Company => "company",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "farmer" => Ok(Role::Farmer),
            "company" => Ok(Role::Company),
            "admin" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}

/// A registered account as persisted in the user directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,

    pub name: String,

    /// Unique, case-sensitive as stored.
    pub email: String,

    /// Argon2 hash. Persisted with the record; API responses use
    /// `UserView`, which omits it.
    pub password_hash: String,

    pub role: Role,

    /// Set by the admin approval workflow; accounts cannot log in before it.
    pub approved: bool,

    pub email_verified: bool,

    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates an unapproved account, pending admin review.
    pub fn new(name: String, email: String, password_hash: String, role: Role) -> Self {
        Self {
            id: format!("user-{}", Uuid::new_v4()),
            name,
            email,
            password_hash,
            role,
            approved: false,
            email_verified: false,
            created_at: Utc::now(),
        }
    }

    pub fn view(&self) -> UserView {
        UserView {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            approved: self.approved,
            email_verified: self.email_verified,
            created_at: self.created_at,
        }
    }
}

/// Outward-facing projection of a user, without the password hash.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub approved: bool,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// DTO for account registration.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters."))]
    pub name: String,
    #[validate(email(message = "Invalid email address."))]
    pub email: String,
    #[validate(length(max = 128))]
    pub password: String,
    #[validate(length(max = 128))]
    pub confirm_password: String,
    pub role: Role,
}

/// DTO for login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address."))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

static HAS_LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new("[A-Za-z]").unwrap());
static HAS_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new("[0-9]").unwrap());

/// Checks the signup password policy.
/// Returns a user-facing message on violation, `None` when the password passes.
pub fn validate_password(password: &str) -> Option<&'static str> {
    if password.len() < PASSWORD_MIN_LENGTH {
        return Some("Password must be at least 8 characters long");
    }
    if !HAS_LETTER.is_match(password) || !HAS_DIGIT.is_match(password) {
        return Some("Password must contain both letters and numbers");
    }
    None
}
