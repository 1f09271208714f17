//! User data model.
//!
//! Users are created lazily on first authenticated interaction: the external
//! identity provider vouches for a (provider, external id) pair and this
//! system assigns the internal numeric id. Nothing here ever deletes a user.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Internal ids are positive serial values.
    NonPositiveId,
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Username exceeds the stored column width.
    UsernameTooLong {
        /// Maximum accepted length in bytes.
        max: usize,
    },
    /// Username contains characters outside the accepted set.
    UsernameInvalidCharacters,
    /// Provider name was missing or blank once trimmed.
    EmptyProvider,
    /// Provider name exceeds the stored column width.
    ProviderTooLong {
        /// Maximum accepted length in bytes.
        max: usize,
    },
    /// Provider-assigned id was missing or blank once trimmed.
    EmptyExternalId,
    /// Provider-assigned id exceeds the stored column width.
    ExternalIdTooLong {
        /// Maximum accepted length in bytes.
        max: usize,
    },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveId => write!(f, "user id must be positive"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} bytes")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, numbers, dots, hyphens, or underscores",
            ),
            Self::EmptyProvider => write!(f, "identity provider must not be empty"),
            Self::ProviderTooLong { max } => {
                write!(f, "identity provider must be at most {max} bytes")
            }
            Self::EmptyExternalId => write!(f, "external id must not be empty"),
            Self::ExternalIdTooLong { max } => {
                write!(f, "external id must be at most {max} bytes")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Internal numeric user identifier backed by a serial column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct UserId(i32);

impl UserId {
    /// Validate and construct a [`UserId`] from a raw database value.
    pub fn try_new(id: i32) -> Result<Self, UserValidationError> {
        if id <= 0 {
            return Err(UserValidationError::NonPositiveId);
        }
        Ok(Self(id))
    }

    /// Access the raw numeric value.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<UserId> for i32 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Maximum accepted username length in bytes, matching the stored column.
pub const USERNAME_MAX: usize = 50;

fn is_username_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Unique display username.
///
/// ## Invariants
/// - Trimmed and non-empty.
/// - At most [`USERNAME_MAX`] bytes.
/// - ASCII letters, digits, dots, hyphens, and underscores only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`] from owned input.
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(username.into())
    }

    fn from_owned(username: String) -> Result<Self, UserValidationError> {
        let trimmed = username.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.len() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !trimmed.chars().all(is_username_char) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Maximum accepted provider name length in bytes.
pub const PROVIDER_MAX: usize = 50;
/// Maximum accepted provider-assigned id length in bytes.
pub const EXTERNAL_ID_MAX: usize = 100;

/// External authentication identity: provider name plus the id that provider
/// assigned. Unique together; this pair is the join key between the identity
/// collaborator and the internal user row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalIdentity {
    provider: String,
    external_id: String,
}

impl ExternalIdentity {
    /// Validate and construct an [`ExternalIdentity`] from raw parts.
    pub fn try_from_parts(
        provider: impl AsRef<str>,
        external_id: impl AsRef<str>,
    ) -> Result<Self, UserValidationError> {
        let provider = provider.as_ref().trim();
        if provider.is_empty() {
            return Err(UserValidationError::EmptyProvider);
        }
        if provider.len() > PROVIDER_MAX {
            return Err(UserValidationError::ProviderTooLong { max: PROVIDER_MAX });
        }

        let external_id = external_id.as_ref().trim();
        if external_id.is_empty() {
            return Err(UserValidationError::EmptyExternalId);
        }
        if external_id.len() > EXTERNAL_ID_MAX {
            return Err(UserValidationError::ExternalIdTooLong {
                max: EXTERNAL_ID_MAX,
            });
        }

        Ok(Self {
            provider: provider.to_owned(),
            external_id: external_id.to_owned(),
        })
    }

    /// Provider name, e.g. `clerk`.
    #[must_use]
    pub fn provider(&self) -> &str {
        self.provider.as_str()
    }

    /// Identifier assigned by the provider.
    #[must_use]
    pub fn external_id(&self) -> &str {
        self.external_id.as_str()
    }
}

impl fmt::Display for ExternalIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.external_id)
    }
}

/// Application user.
///
/// ## Invariants
/// - `id` is a positive internal identifier.
/// - `identity` is the external provider mapping that first created this row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    identity: ExternalIdentity,
}

impl User {
    /// Build a new [`User`] from validated components.
    #[must_use]
    pub fn new(id: UserId, username: Username, identity: ExternalIdentity) -> Self {
        Self {
            id,
            username,
            identity,
        }
    }

    /// Internal numeric identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Unique display username.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// External provider identity this user maps to.
    #[must_use]
    pub fn identity(&self) -> &ExternalIdentity {
        &self.identity
    }
}
