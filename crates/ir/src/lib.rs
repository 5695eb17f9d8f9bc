//! # FormForge IR (Intermediate Representation)
//!
//! This crate holds the layout model of a form and the engine that edits it.
//!
//! ## Core Concepts
//!
//! - **LayoutNode**: a row, column, or component in the layout tree
//! - **LayoutTree**: the ordered root items of a form, shared structurally
//! - **CapabilityTable**: which node types may hold which, and how many
//! - **LayoutEngine**: validated find/insert/remove/move over trees
//! - **ComponentRegistry**: display configuration of each component, keyed by id
//! - **FormSchema**: the persisted document (metadata, layout, registry)
//!

// Module declarations
pub mod capability;
pub mod config;
pub mod engine;
pub mod node;
pub mod palette;
pub mod registry;
pub mod schema;
pub mod serialization;
pub mod tree;
pub mod validation;

// Re-export commonly used types at crate root
pub use capability::{CapabilityDescriptor, CapabilityTable, NestingLevel};
pub use config::{DEFAULT_MAX_DEPTH, EngineConfig};
pub use engine::{DepthValidation, DropValidation, LayoutEngine, TypeCompatibility};
pub use node::{ContainerNode, LayoutNode, LeafNode, NodeRef, NodeSlot, Props, is_descendant};
pub use palette::{PaletteItem, default_palette, find_palette_item};
pub use registry::{ComponentDefinition, ComponentRegistry};
pub use schema::{FormMeta, FormSchema, SchemaStats};
pub use serialization::{load_schema, load_schema_from_string, save_schema, save_schema_to_string};
pub use tree::{InsertAt, LayoutTree, NodeLocation, NodePath, PathStep};
pub use validation::{ValidationResult, ValidationRule, Validator};

// Re-export core types that are commonly used with IR
pub use formforge_core::{
    EngineError, EngineResult, NodeId, NodeType, SlotKind, Validation, WidgetType,
};

/// Current schema version for form files
pub const SCHEMA_VERSION: u32 = 1;

/// File extension for FormForge schema files
pub const SCHEMA_FILE_EXTENSION: &str = "ffs";

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient re-exports for common usage
pub mod prelude {
    pub use crate::{
        CapabilityTable,
        ComponentDefinition,
        ComponentRegistry,
        EngineConfig,
        // Re-exported from core
        EngineError,
        EngineResult,
        FormSchema,
        InsertAt,
        // Engine
        LayoutEngine,
        // Layout model
        LayoutNode,
        LayoutTree,
        NodeId,
        NodeType,
        PaletteItem,
        WidgetType,
    };
}

// ============================================================================
// Tests
// ============================================================================
