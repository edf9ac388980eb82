//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input is not shaped like `local@domain`.
    #[error("email must be in the form local@domain")]
    Malformed,
}

/// An email address.
///
/// Validation here is structural only: a non-empty local part and domain
/// separated by a single `@`. Per-entity length limits (customer emails are
/// capped at 100 characters, account emails at 255) are enforced by the
/// callers via [`Email::parse_with_limit`].
///
/// ## Examples
///
/// ```
/// use clientele_core::Email;
///
/// assert!(Email::parse("user@example.com").is_ok());
/// assert!(Email::parse("user.name+tag@domain.co.uk").is_ok());
///
/// assert!(Email::parse("").is_err());             // empty
/// assert!(Email::parse("no-at-symbol").is_err()); // missing @
/// assert!(Email::parse("@domain.com").is_err());  // empty local part
/// assert!(Email::parse("user@").is_err());        // empty domain
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from a string using the RFC 5321 length limit.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 254 characters,
    /// or not shaped like `local@domain`.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        Self::parse_with_limit(s, Self::MAX_LENGTH)
    }

    /// Parse an `Email` enforcing a caller-supplied maximum length.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than `max` characters,
    /// or not shaped like `local@domain`.
    pub fn parse_with_limit(s: &str, max: usize) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }

        if s.chars().count() > max {
            return Err(EmailError::TooLong { max });
        }

        let at_pos = s.find('@').ok_or(EmailError::Malformed)?;
        if at_pos == 0 || at_pos == s.len() - 1 {
            return Err(EmailError::Malformed);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        for input in ["a@b", "user@example.com", "user.name+tag@domain.co.uk"] {
            assert!(Email::parse(input).is_ok(), "{input} should parse");
        }
    }

    #[test]
    fn test_empty_is_rejected() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
    }

    #[test]
    fn test_structural_failures() {
        for input in ["no-at-symbol", "@domain.com", "user@"] {
            assert_eq!(Email::parse(input), Err(EmailError::Malformed), "{input}");
        }
    }

    #[test]
    fn test_custom_length_limit() {
        let long = format!("{}@example.com", "a".repeat(100));
        assert!(Email::parse(&long).is_ok());
        assert_eq!(
            Email::parse_with_limit(&long, 100),
            Err(EmailError::TooLong { max: 100 })
        );
    }

    #[test]
    fn test_limit_counts_characters_not_bytes() {
        // 60 two-byte characters: over 100 bytes but well under 100 chars.
        let email = format!("{}@x.com", "é".repeat(60));
        assert!(email.len() > 100);
        assert!(Email::parse_with_limit(&email, 100).is_ok());
        assert_eq!(
            Email::parse_with_limit(&email, 50),
            Err(EmailError::TooLong { max: 50 })
        );
    }

    #[test]
    fn test_display_roundtrip() {
        let email = Email::parse("ada@x.com").unwrap();
        assert_eq!(email.to_string(), "ada@x.com");
        assert_eq!(email.as_str(), "ada@x.com");
    }
}
