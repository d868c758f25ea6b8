//! Unified error types for the rules domain
//!
//! Provides a common error type for every usage error the rules engine can
//! surface, so callers can present them instead of silently recovering.

use thiserror::Error;

use crate::value_objects::DiceParseError;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., a stat outside its allowed range)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// A check was requested against a skill or attack the character does not have
    #[error("Unknown check target: {kind} '{id}'")]
    UnknownCheckTarget { kind: &'static str, id: String },

    /// An operation was invoked on the wrong kind of actor
    #[error("{operation} requires {expected}, got {actual}")]
    WrongActorKind {
        operation: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
}

impl DomainError {
    /// Creates a validation error for rule violations.
    ///
    /// Use this when domain invariants are violated:
    /// - Values are outside allowed ranges
    /// - Dice sizes outside the countdown ladder
    ///
    /// # Example
    /// ```ignore
    /// if !(1..=10).contains(&level) {
    ///     return Err(DomainError::validation("Level must be between 1 and 10"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an unknown check target error
    pub fn unknown_check_target(kind: &'static str, id: impl Into<String>) -> Self {
        Self::UnknownCheckTarget {
            kind,
            id: id.into(),
        }
    }

    /// Create a wrong actor kind error
    pub fn wrong_actor_kind(
        operation: &'static str,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::WrongActorKind {
            operation,
            expected,
            actual,
        }
    }
}

impl From<DiceParseError> for DomainError {
    fn from(err: DiceParseError) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("might must be between 1 and 10");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Validation failed: might must be between 1 and 10"
        );
    }

    #[test]
    fn test_unknown_check_target_error() {
        let err = DomainError::unknown_check_target("skill", "juggling");
        assert!(matches!(err, DomainError::UnknownCheckTarget { .. }));
        assert_eq!(err.to_string(), "Unknown check target: skill 'juggling'");
    }

    #[test]
    fn test_wrong_actor_kind_error() {
        let err = DomainError::wrong_actor_kind("Morale check", "an NPC", "a character");
        assert_eq!(err.to_string(), "Morale check requires an NPC, got a character");
    }

    #[test]
    fn test_from_dice_parse_error() {
        let dice_err = DiceParseError::Empty;
        let domain_err: DomainError = dice_err.into();
        assert!(matches!(domain_err, DomainError::Parse(_)));
        assert!(domain_err.to_string().contains("Empty dice formula"));
    }
}
