//! Mobile number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing a [`Mobile`] number.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MobileError {
    /// The input string is empty.
    #[error("mobile number cannot be empty")]
    Empty,
    /// The input does not match the accepted format.
    #[error("mobile number must be an optional + followed by 7 to 15 digits")]
    InvalidFormat,
}

/// A mobile phone number.
///
/// The accepted format is an optional leading `+` followed by 7 to 15 ASCII
/// digits, with nothing before or after (the whole value must match). This
/// covers both international (`+14155551234`) and national (`9876543210`)
/// styles without attempting full E.164 validation.
///
/// ## Examples
///
/// ```
/// use clientele_core::Mobile;
///
/// assert!(Mobile::parse("+14155551234").is_ok());
/// assert!(Mobile::parse("9876543210").is_ok());
///
/// assert!(Mobile::parse("123").is_err());               // too short
/// assert!(Mobile::parse("12345678901234567").is_err()); // too long
/// assert!(Mobile::parse("+1 415 555 1234").is_err());   // spaces
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Mobile(String);

impl Mobile {
    /// Minimum number of digits.
    pub const MIN_DIGITS: usize = 7;
    /// Maximum number of digits.
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `Mobile` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or does not fully match an
    /// optional `+` followed by 7-15 digits.
    pub fn parse(s: &str) -> Result<Self, MobileError> {
        if s.is_empty() {
            return Err(MobileError::Empty);
        }

        let digits = s.strip_prefix('+').unwrap_or(s);
        let count = digits.len();

        if count < Self::MIN_DIGITS || count > Self::MAX_DIGITS {
            return Err(MobileError::InvalidFormat);
        }

        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MobileError::InvalidFormat);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the mobile number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Mobile` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Mobile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Mobile {
    type Err = MobileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Mobile {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
