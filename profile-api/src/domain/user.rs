use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::{models::UserId, Email, FieldViolation, UserError};

/// Profile image every user starts with, and falls back to when their
/// uploaded avatar is removed.
pub const PLACEHOLDER_PROFILE_URL: &str = "https://i.stack.imgur.com/l60Hf.png";

const MAX_FULL_NAME_LENGTH: usize = 100;
const MAX_BIO_LENGTH: usize = 500;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    User,
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        match role.as_str() {
            "Admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role_str = match self {
            Role::Admin => "Admin",
            Role::User => "User",
        };
        write!(f, "{role_str}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub bio: String,
    pub role: Role,
    pub profile_url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Attributes for a user that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub full_name: String,
    pub bio: String,
    pub role: Role,
}

impl NewUser {
    pub fn new(email: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            full_name: full_name.into(),
            bio: String::new(),
            role: Role::User,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = bio.into();
        self
    }

    /// Checks every constraint at once and returns the normalized attributes.
    pub fn validated(self) -> Result<Self, UserError> {
        let mut violations = Vec::new();

        let email = check_email(&self.email, &mut violations);
        let full_name = check_full_name(&self.full_name, &mut violations);
        check_bio(&self.bio, &mut violations);

        if !violations.is_empty() {
            return Err(UserError::Validation(violations));
        }

        Ok(Self {
            email: email.unwrap_or(self.email),
            full_name: full_name.unwrap_or(self.full_name),
            ..self
        })
    }
}

/// Which records an operation applies to. Every field that is set must
/// match; an empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub id: Option<UserId>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

impl UserFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: UserId) -> Self {
        Self::default().with_id(id)
    }

    pub fn with_id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into().trim().to_lowercase());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    #[cfg(test)]
    pub fn matches(&self, user: &User) -> bool {
        self.id.map_or(true, |id| user.id == id)
            && self.email.as_ref().map_or(true, |email| &user.email == email)
            && self.role.map_or(true, |role| user.role == role)
    }
}

/// Column-level changes applied by an update. `None` leaves a column as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub profile_url: Option<String>,
}

impl UserPatch {
    pub fn profile_url(url: impl Into<String>) -> Self {
        Self {
            profile_url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn validated(self) -> Result<Self, UserError> {
        let mut violations = Vec::new();

        let email = self
            .email
            .as_deref()
            .and_then(|email| check_email(email, &mut violations));
        let full_name = self
            .full_name
            .as_deref()
            .and_then(|name| check_full_name(name, &mut violations));
        if let Some(bio) = self.bio.as_deref() {
            check_bio(bio, &mut violations);
        }
        if let Some(url) = self.profile_url.as_deref() {
            if url.trim().is_empty() {
                violations.push(FieldViolation::new("profileUrl", "must not be empty"));
            }
        }

        if !violations.is_empty() {
            return Err(UserError::Validation(violations));
        }

        Ok(Self {
            email,
            full_name,
            ..self
        })
    }

    #[cfg(test)]
    pub fn apply_to(&self, user: &mut User) {
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(full_name) = &self.full_name {
            user.full_name = full_name.clone();
        }
        if let Some(bio) = &self.bio {
            user.bio = bio.clone();
        }
        if let Some(profile_url) = &self.profile_url {
            user.profile_url = profile_url.clone();
        }
    }
}

/// The fields a user may change on their own profile.
///
/// Anything outside this list (`id`, `role`, `profileUrl`, timestamps) is
/// rejected during deserialization, before the service is reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProfilePatch {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub bio: Option<String>,
}

impl From<ProfilePatch> for UserPatch {
    fn from(patch: ProfilePatch) -> Self {
        Self {
            email: patch.email,
            full_name: patch.full_name,
            bio: patch.bio,
            profile_url: None,
        }
    }
}

fn check_email(email: &str, violations: &mut Vec<FieldViolation>) -> Option<String> {
    match Email::try_from(email) {
        Ok(email) => Some(email.into_inner()),
        Err(err) => {
            violations.push(FieldViolation::new("email", err.to_string()));
            None
        }
    }
}

fn check_full_name(full_name: &str, violations: &mut Vec<FieldViolation>) -> Option<String> {
    let trimmed = full_name.trim();
    if trimmed.is_empty() {
        violations.push(FieldViolation::new("fullName", "must not be empty"));
        return None;
    }
    if trimmed.chars().count() > MAX_FULL_NAME_LENGTH {
        violations.push(FieldViolation::new(
            "fullName",
            format!("must be at most {MAX_FULL_NAME_LENGTH} characters"),
        ));
        return None;
    }
    Some(trimmed.to_string())
}

fn check_bio(bio: &str, violations: &mut Vec<FieldViolation>) {
    if bio.chars().count() > MAX_BIO_LENGTH {
        violations.push(FieldViolation::new(
            "bio",
            format!("must be at most {MAX_BIO_LENGTH} characters"),
        ));
    }
}
