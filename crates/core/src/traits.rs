//! Core traits for FormForge
//!
//! This module defines the traits that schema types implement to provide
//! consistent behavior for validation, identification, and persistence.

use crate::error::EngineResult;
use crate::types::NodeId;
use serde::{Serialize, de::DeserializeOwned};

// ============================================================================
// Validatable Trait
// ============================================================================

/// Trait for types that can be validated
///
/// Types implementing this trait can check their internal consistency
/// and return validation errors if the state is invalid.
///
/// # Example
///
/// ```rust,ignore
/// use formforge_core::{Validatable, EngineResult, EngineError};
///
/// struct Label(String);
///
/// impl Validatable for Label {
///     fn validate(&self) -> EngineResult<()> {
///         if self.0.is_empty() {
///             return Err(EngineError::validation("Label cannot be empty"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validatable {
    /// Validate the current state of the object
    ///
    /// Returns `Ok(())` if valid, or an `EngineError` describing the problem.
    fn validate(&self) -> EngineResult<()>;

    /// Check if the object is valid without returning error details
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Get all validation errors (for types that can have multiple errors)
    fn validation_errors(&self) -> Vec<String> {
        match self.validate() {
            Ok(()) => vec![],
            Err(e) => vec![e.to_string()],
        }
    }
}

// ============================================================================
// Persistable Trait
// ============================================================================

/// Trait for types that can be serialized to and deserialized from files
pub trait Persistable: Serialize + DeserializeOwned + Sized {
    /// Get the file extension for this type (without the dot)
    fn file_extension() -> &'static str;

    /// Get the schema version for migration purposes
    fn schema_version() -> u32 {
        1
    }

    /// Save to a JSON string
    fn to_json(&self) -> EngineResult<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }

    /// Load from a JSON string
    fn from_json(json: &str) -> EngineResult<Self> {
        serde_json::from_str(json).map_err(Into::into)
    }
}

// ============================================================================
// Identifiable Trait
// ============================================================================

/// Trait for types that carry a node identifier
pub trait Identifiable {
    /// Get the identifier
    fn id(&self) -> &NodeId;

    /// Check if this matches another identifier
    fn matches_id(&self, id: &NodeId) -> bool {
        self.id() == id
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct TestValidatable {
        valid: bool,
    }

    impl Validatable for TestValidatable {
        fn validate(&self) -> EngineResult<()> {
            if self.valid {
                Ok(())
            } else {
                Err(crate::error::EngineError::validation("Invalid state"))
            }
        }
    }

    #[test]
    fn test_validatable_trait() {
        let valid = TestValidatable { valid: true };
        assert!(valid.is_valid());
        assert!(valid.validation_errors().is_empty());

        let invalid = TestValidatable { valid: false };
        assert!(!invalid.is_valid());
        assert_eq!(
            invalid.validation_errors(),
            vec!["Validation error: Invalid state".to_string()]
        );
    }

    struct Named(NodeId);

    impl Identifiable for Named {
        fn id(&self) -> &NodeId {
            &self.0
        }
    }

    #[test]
    fn test_identifiable_matches() {
        let n = Named(NodeId::new("a"));
        assert!(n.matches_id(&NodeId::new("a")));
        assert!(!n.matches_id(&NodeId::new("b")));
    }
}
