// ABOUTME: RFC 1123 label validation for service names and namespaces.
// ABOUTME: Both are DNS labels; distinct newtypes keep them from mixing.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("name cannot be empty")]
    Empty,

    #[error("name exceeds maximum length of 63 characters")]
    TooLong,

    #[error("name must start and end with a lowercase alphanumeric character")]
    BadBoundary,

    #[error("invalid character in name: '{0}'")]
    InvalidChar(char),
}

/// Validate an RFC 1123 DNS label: 1-63 lowercase alphanumerics or
/// hyphens, alphanumeric at both ends.
pub(crate) fn validate_label(value: &str) -> Result<(), NameError> {
    if value.is_empty() {
        return Err(NameError::Empty);
    }

    if value.len() > 63 {
        return Err(NameError::TooLong);
    }

    for c in value.chars() {
        if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' {
            return Err(NameError::InvalidChar(c));
        }
    }

    if value.starts_with('-') || value.ends_with('-') {
        return Err(NameError::BadBoundary);
    }

    Ok(())
}

/// The name of one service within a stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn new(value: &str) -> Result<Self, NameError> {
        validate_label(value)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The target namespace of a deploy. The namespace doubles as the stack
/// identity: one stack per namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(value: &str) -> Result<Self, NameError> {
        validate_label(value)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_labels() {
        assert!(ServiceName::new("web").is_ok());
        assert!(ServiceName::new("web-frontend-2").is_ok());
        assert!(Namespace::new("demo").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(ServiceName::new("").unwrap_err(), NameError::Empty);
    }

    #[test]
    fn rejects_uppercase() {
        assert_eq!(
            ServiceName::new("Web").unwrap_err(),
            NameError::InvalidChar('W')
        );
    }

    #[test]
    fn rejects_hyphen_at_edges() {
        assert_eq!(ServiceName::new("-web").unwrap_err(), NameError::BadBoundary);
        assert_eq!(ServiceName::new("web-").unwrap_err(), NameError::BadBoundary);
    }

    #[test]
    fn rejects_overlong() {
        let long = "a".repeat(64);
        assert_eq!(Namespace::new(&long).unwrap_err(), NameError::TooLong);
    }
}
