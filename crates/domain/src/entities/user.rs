//! User entity - the identity owned by the onboarding service.
//!
//! This system only reads users: the authentication seam resolves a caller
//! to a user row, and the leaderboard joins display fields from it.
//! Passwords, confirmation codes, and registration live elsewhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::UserId;

/// Authorization role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Admin => "Admin",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "User" => Ok(Self::User),
            "Admin" => Ok(Self::Admin),
            other => Err(DomainError::parse(format!("Unknown role: {other}"))),
        }
    }
}

/// Account status of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "Active" => Ok(Self::Active),
            "Inactive" => Ok(Self::Inactive),
            other => Err(DomainError::parse(format!("Unknown user status: {other}"))),
        }
    }
}

/// A registered user, as far as this system needs to know one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(full_name: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            full_name: full_name.into(),
            email: email.into(),
            role: Role::User,
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}
