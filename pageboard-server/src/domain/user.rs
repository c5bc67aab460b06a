use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use super::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
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
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(DomainError::Validation {
                field: "role",
                message: "must be 'user' or 'admin'",
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CreateUserRequest {
    pub(crate) nickname: String,
    pub(crate) email: String,
    pub(crate) password: String,
}

impl CreateUserRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let nickname = normalize_nickname(&self.nickname)?;
        let email = normalize_email(&self.email)?;
        let password_len = self.password.chars().count();
        if !(3..=8).contains(&password_len) {
            return Err(DomainError::Validation {
                field: "password",
                message: "must be 3..8 chars",
            });
        }
        Ok(Self {
            nickname,
            email,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) nickname: String,
    pub(crate) email: String,
    pub(crate) role: Role,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl User {
    pub(crate) fn new(
        id: i64,
        nickname: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if id <= 0 {
            return Err(DomainError::Validation {
                field: "id",
                message: "must be > 0",
            });
        }
        let nickname = normalize_nickname(&nickname.into())?;
        let email = normalize_email(&email.into())?;

        Ok(Self {
            id,
            nickname,
            email,
            role,
            created_at,
            updated_at,
        })
    }
}

fn normalize_nickname(nickname: &str) -> Result<String, DomainError> {
    let nickname = nickname.trim();
    let len = nickname.chars().count();
    if !(1..=20).contains(&len) {
        return Err(DomainError::Validation {
            field: "nickname",
            message: "must be 1..20 chars",
        });
    }
    Ok(nickname.to_string())
}

fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(DomainError::Validation {
            field: "email",
            message: "must be a valid email",
        });
    }
    Ok(email)
}
