//! Shared user-directory entity contract.
//!
//! Purpose: define the `User` aggregate and its value types once, so the
//! backend service and the client data layer serialise the same wire shape.
//! Keep types immutable and document invariants and serialisation contracts
//! (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - [`User`] — directory member: id, name, email, role, active, creation time.
//! - [`UserId`] — stable UUID identifier, assigned at creation.
//! - [`Role`] — closed enumeration of directory roles.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Validation errors returned when constructing model values from strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelValidationError {
    /// Identifier is empty or not a valid UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// Name is empty once trimmed of whitespace.
    #[error("name must not be empty")]
    EmptyName,
    /// Email is empty once trimmed of whitespace.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Role string is outside the closed enumeration.
    #[error("role must be one of: admin, editor, viewer")]
    UnknownRole,
}

/// Stable user identifier stored as a UUID.
///
/// Serialises to and from its canonical string form; the identifier is
/// opaque to callers and never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    ///
    /// # Errors
    ///
    /// Returns [`ModelValidationError::InvalidId`] when the input is not a
    /// canonical UUID string.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ModelValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw || raw.is_empty() {
            return Err(ModelValidationError::InvalidId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| ModelValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Generate a new random [`UserId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = ModelValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Closed enumeration of directory roles.
///
/// Serialises as the lowercase role name; parsing rejects anything outside
/// the closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// Can edit directory content.
    Editor,
    /// Read-only access.
    Viewer,
}

impl Role {
    /// All roles, in declaration order. Useful for validation messages.
    pub const ALL: [Self; 3] = [Self::Admin, Self::Editor, Self::Viewer];

    /// Lowercase wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModelValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "editor" => Ok(Self::Editor),
            "viewer" => Ok(Self::Viewer),
            _ => Err(ModelValidationError::UnknownRole),
        }
    }
}

/// Directory member.
///
/// ## Invariants
/// - `id` never changes after construction.
/// - `role` is drawn only from the closed [`Role`] set.
/// - `created_at` is set once at creation and is the sole sort key
///   (descending) for listings.
///
/// Wire shape is camelCase JSON with `createdAt` as an RFC 3339 string:
/// `{"id", "name", "email", "role", "active", "createdAt"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    role: Role,
    active: bool,
    created_at: DateTime<Utc>,
}

impl User {
    /// Build a [`User`] from validated components.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelValidationError`] when `name` or `email` is empty
    /// once trimmed. Uniqueness of `email` is owned by the data store, not
    /// checked here.
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        active: bool,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ModelValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelValidationError::EmptyName);
        }
        let email = email.into();
        if email.trim().is_empty() {
            return Err(ModelValidationError::EmptyEmail);
        }
        Ok(Self {
            id,
            name,
            email,
            role,
            active,
            created_at,
        })
    }

    /// Stable user identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Contact email. Uniqueness is enforced by the data store.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Directory role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Whether the member is currently active.
    #[must_use]
    pub const fn active(&self) -> bool {
        self.active
    }

    /// Creation timestamp; the sole listing sort key.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Copy of this user with `active` replaced.
    ///
    /// `active` is the only field the directory mutates; everything else is
    /// owned by out-of-scope admin paths.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}
