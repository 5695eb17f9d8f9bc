//! Error types for FormForge
//!
//! This module provides unified error handling across the engine: layout tree
//! violations raised by drops and moves, configuration errors, and the IO and
//! serialization failures that come with loading and saving form schemas.

use crate::types::{NodeId, NodeType};
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for FormForge
#[derive(Debug, Error)]
pub enum EngineError {
    // ========================================================================
    // Layout Tree Errors
    // ========================================================================
    /// Referenced node or container does not exist in the tree
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Target type cannot hold the source type
    #[error("Cannot place '{child}' inside '{parent}': allowed children are [{allowed}]")]
    CapabilityViolation {
        parent: NodeType,
        child: NodeType,
        allowed: String,
    },

    /// Target container is already full
    #[error("Container '{container}' already holds the maximum of {max} children")]
    CapacityExceeded { container: NodeId, max: usize },

    /// Source is the target or one of its ancestors
    #[error("Cannot move '{source_id}' into '{target}': target is inside the moved subtree")]
    CycleViolation { source_id: NodeId, target: NodeId },

    /// Insertion would nest deeper than allowed
    #[error("Maximum nesting depth of {max} exceeded (new depth {depth})")]
    DepthExceeded { depth: usize, max: usize },

    /// Node id already present in the tree
    #[error("Duplicate node id: {0}")]
    DuplicateNode(NodeId),

    /// No capability descriptor registered for a node type
    #[error("No capability descriptor for node type '{0}'")]
    MissingCapability(NodeType),

    /// Drop target could not be interpreted
    #[error("Invalid drop target: {0}")]
    InvalidDropTarget(String),

    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// General validation error
    #[error("Validation error: {0}")]
    Validation(String),

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema file not found
    #[error("Schema not found at path: {0}")]
    SchemaNotFound(PathBuf),

    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// File write error
    #[error("Failed to write file '{path}': {message}")]
    FileWrite { path: PathBuf, message: String },

    /// Directory creation failed
    #[error("Failed to create directory '{path}': {message}")]
    DirectoryCreate { path: PathBuf, message: String },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// Invalid schema file format
    #[error("Invalid schema file format: {0}")]
    InvalidSchemaFormat(String),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, found {found}")]
    SchemaVersionMismatch { expected: u32, found: u32 },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// TOML configuration could not be parsed
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl EngineError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        EngineError::Validation(msg.into())
    }

    /// Create a not-found error for a node id
    pub fn not_found(id: impl Into<NodeId>) -> Self {
        EngineError::NodeNotFound(id.into())
    }

    /// Create an invalid drop target error
    pub fn drop_target(msg: impl Into<String>) -> Self {
        EngineError::InvalidDropTarget(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        EngineError::Internal(msg.into())
    }

    /// Create an error with context
    pub fn with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        EngineError::WithContext {
            context: context.into(),
            message: msg.into(),
        }
    }

    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::NodeNotFound(_) | EngineError::SchemaNotFound(_)
        )
    }

    /// Check if this error rejects a drop or move on layout grounds
    pub fn is_drop_violation(&self) -> bool {
        matches!(
            self,
            EngineError::CapabilityViolation { .. }
                | EngineError::CapacityExceeded { .. }
                | EngineError::CycleViolation { .. }
                | EngineError::DepthExceeded { .. }
                | EngineError::DuplicateNode(_)
                | EngineError::MissingCapability(_)
        )
    }

    /// Check if this error is an IO error
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            EngineError::Io(_)
                | EngineError::FileRead { .. }
                | EngineError::FileWrite { .. }
                | EngineError::DirectoryCreate { .. }
        )
    }
}

/// Result type alias using EngineError
pub type EngineResult<T> = Result<T, EngineError>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> EngineResult<T>;
}

impl<T, E: Into<EngineError>> ResultExt<T> for Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> EngineResult<T> {
        self.map_err(|e| {
            let err: EngineError = e.into();
            EngineError::WithContext {
                context: context.into(),
                message: err.to_string(),
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
