use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// TextAnywhere client login id.
///
/// Invariant: non-empty after trimming.
pub struct Login(String);

impl Login {
    /// Form field name used by the gateway (`externallogin`).
    pub const FIELD: &'static str = "externallogin";

    /// Create a validated [`Login`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated login.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// TextAnywhere client password.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct Password(String);

impl Password {
    /// Form field name used by the gateway (`password`).
    pub const FIELD: &'static str = "password";

    /// Create a validated [`Password`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Sender identifier shown to recipients (`originator`).
///
/// Invariant: non-empty after trimming. The value must be enabled for your
/// TextAnywhere account.
pub struct Originator(String);

impl Originator {
    /// Form field name used by the gateway (`originator`).
    pub const FIELD: &'static str = "originator";

    /// Create a validated [`Originator`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated originator.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message text (`body`).
///
/// Invariant: at most [`MessageText::MAX_CHARS`] characters. The value is
/// preserved as provided, including whitespace.
pub struct MessageText(String);

impl MessageText {
    /// Form field name used by the gateway (`body`).
    pub const FIELD: &'static str = "body";

    /// Maximum message length accepted by the gateway.
    pub const MAX_CHARS: usize = 160;

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let chars = value.chars().count();
        if chars > Self::MAX_CHARS {
            return Err(ValidationError::MessageTooLong {
                max: Self::MAX_CHARS,
                actual: chars,
            });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// One recipient phone number as sent to the gateway (`destinations`).
///
/// Construction strips every whitespace character from the input; no other
/// normalization is applied (no country-code logic, no digit validation).
///
/// Invariant: non-empty once whitespace is stripped.
pub struct DestinationNumber(String);

impl DestinationNumber {
    /// Form field name used by the gateway (`destinations`).
    pub const FIELD: &'static str = "destinations";

    /// Create a sanitized destination number.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let sanitized: String = value.chars().filter(|c| !c.is_whitespace()).collect();
        if sanitized.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(sanitized))
    }

    /// Sanitized value as sent to the gateway.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Unix timestamp in seconds.
///
/// Used for the `clientbillingreference` and `clientmessagereference` fields;
/// a fresh value is drawn per send, so repeated identical sends are distinct
/// gateway transactions.
pub struct UnixTimestamp(u64);

impl UnixTimestamp {
    /// Create a timestamp value (no range validation is performed).
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Current system time in seconds since the Unix epoch.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        Self(secs)
    }

    /// Get the underlying timestamp in seconds.
    pub fn value(self) -> u64 {
        self.0
    }
}
