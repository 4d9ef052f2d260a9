//! User domain entity and related types.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{
    ROLE_ADMIN, ROLE_INSTRUCTOR, ROLE_STUDENT, STATUS_ACTIVE, STATUS_BANNED, STATUS_INACTIVE,
};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Instructor,
    Admin,
}

impl UserRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => ROLE_STUDENT,
            UserRole::Instructor => ROLE_INSTRUCTOR,
            UserRole::Admin => ROLE_ADMIN,
        }
    }

    /// Parse a stored role string. Unknown values fall back to the least
    /// privileged role.
    pub fn parse(s: &str) -> Self {
        match s {
            ROLE_ADMIN => UserRole::Admin,
            ROLE_INSTRUCTOR => UserRole::Instructor,
            _ => UserRole::Student,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Banned,
    Inactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => STATUS_ACTIVE,
            UserStatus::Banned => STATUS_BANNED,
            UserStatus::Inactive => STATUS_INACTIVE,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            STATUS_BANNED => UserStatus::Banned,
            STATUS_INACTIVE => UserStatus::Inactive,
            _ => UserStatus::Active,
        }
    }

    pub fn can_sign_in(&self) -> bool {
        matches!(self, UserStatus::Active)
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-reported study pace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LearningPace {
    Slow,
    #[default]
    Medium,
    Intensive,
}

/// Public profile fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
}

/// Onboarding answers collected from students
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub year_of_study: Option<i32>,
    pub degree: Option<String>,
    pub interest_type: Option<String>,
    #[serde(default)]
    pub domains: BTreeSet<String>,
    pub career_goal: Option<String>,
    #[serde(default)]
    pub learning_pace: LearningPace,
    #[serde(default)]
    pub onboarded: bool,
}

impl StudentProfile {
    /// Lowercase and trim domains, dropping empties.
    pub fn normalize_domains<I, S>(domains: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        domains
            .into_iter()
            .map(|d| d.as_ref().trim().to_lowercase())
            .filter(|d| !d.is_empty())
            .collect()
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub profile: Profile,
    pub student_profile: Option<StudentProfile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_active(&self) -> bool {
        self.status.can_sign_in()
    }
}

/// Data needed to create an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub profile: Profile,
}

/// Profile fields a user may change on their own account.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
}

impl Profile {
    /// Apply the provided fields, leaving the rest untouched.
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(v) = update.first_name {
            self.first_name = Some(v);
        }
        if let Some(v) = update.last_name {
            self.last_name = Some(v);
        }
        if let Some(v) = update.avatar_url {
            self.avatar_url = Some(v);
        }
        if let Some(v) = update.phone {
            self.phone = Some(v);
        }
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub profile: Profile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_profile: Option<StudentProfile>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            status: user.status,
            profile: user.profile,
            student_profile: user.student_profile,
            created_at: user.created_at,
        }
    }
}
