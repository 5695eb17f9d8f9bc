//! # FormForge Core
//!
//! Core types, traits, and error handling for FormForge.
//!
//! This crate provides the foundational building blocks used throughout
//! the workspace, including:
//!
//! - **Types**: Node ids, node type tags, widget kinds, validation rules
//! - **Traits**: Common behaviors like `Validatable` and `Identifiable`
//! - **Errors**: Unified error handling with `EngineError` and `EngineResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{EngineError, EngineResult, ResultExt};
pub use traits::{Identifiable, Persistable, Validatable};
pub use types::{ChoiceOption, NodeId, NodeType, SlotKind, Validation, WidgetType};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
