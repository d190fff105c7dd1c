use std::fmt;
use std::ops::Deref;
use thiserror::Error;

/// A validated, normalized email address.
///
/// Normalization trims surrounding whitespace and lowercases the address so
/// that the unique constraint in the store compares like with like.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Email(String);

#[derive(Error, Debug, PartialEq)]
pub enum EmailError {
    #[error("email must not be empty")]
    Empty,
    #[error("'{0}' is not a valid email: must contain exactly one '@'")]
    InvalidFormat(String),
    #[error("'{0}' is not a valid email: missing local part")]
    MissingLocalPart(String),
    #[error("'{0}' is not a valid email: invalid domain part")]
    InvalidDomainPart(String),
}

impl TryFrom<&str> for Email {
    type Error = EmailError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(EmailError::Empty);
        }

        let Some((local_part, domain)) = normalized.split_once('@') else {
            return Err(EmailError::InvalidFormat(normalized));
        };

        if domain.contains('@') {
            return Err(EmailError::InvalidFormat(normalized));
        }

        if local_part.is_empty() || local_part.contains(char::is_whitespace) {
            return Err(EmailError::MissingLocalPart(normalized));
        }

        if domain.is_empty()
            || !domain.contains('.')
            || domain.starts_with('.')
            || domain.ends_with('.')
            || domain.contains(char::is_whitespace)
        {
            return Err(EmailError::InvalidDomainPart(normalized));
        }

        Ok(Self(normalized))
    }
}

impl Email {
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Deref for Email {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
