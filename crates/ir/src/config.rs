//! Engine configuration
//!
//! `EngineConfig` bundles the capability table and the nesting limit. It can
//! be built in code or loaded from a TOML file such as:
//!
//! ```toml
//! max_depth = 8
//!
//! [capabilities.row]
//! can_contain = ["column"]
//! is_container = true
//! max_children = 4
//! min_children = 1
//! nesting_level = "unlimited"
//! ```
//!
//! Types without a `[capabilities.<type>]` table have no descriptor.

use crate::capability::{CapabilityTable, NestingLevel};
use formforge_core::{EngineError, EngineResult, NodeType, Validatable};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default maximum nesting depth below the root
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Configuration for the layout engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum depth of any node (root items are at depth 0)
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Capability descriptors per node type
    #[serde(default)]
    pub capabilities: CapabilityTable,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            capabilities: CapabilityTable::standard(),
        }
    }
}

impl EngineConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum nesting depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the capability table
    pub fn with_capabilities(mut self, capabilities: CapabilityTable) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Parse from TOML
    ///
    /// A `[capabilities]` section replaces the standard table wholesale.
    pub fn from_toml_str(source: &str) -> EngineResult<Self> {
        let config: EngineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> EngineResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| EngineError::InvalidConfig(format!("Failed to serialize config: {}", e)))
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| EngineError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(
            "Loaded engine config from {} (max depth {})",
            path.display(),
            config.max_depth
        );
        Ok(config)
    }

    /// Save to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> EngineResult<()> {
        let path = path.as_ref();
        let toml = self.to_toml_string()?;
        std::fs::write(path, toml).map_err(|e| EngineError::FileWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

impl Validatable for EngineConfig {
    fn validate(&self) -> EngineResult<()> {
        if self.max_depth == 0 {
            return Err(EngineError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }

        for node_type in NodeType::all() {
            let Some(descriptor) = self.capabilities.get(node_type) else {
                continue;
            };
            if descriptor.min_children > descriptor.max_children {
                return Err(EngineError::InvalidConfig(format!(
                    "'{}' has min_children {} above max_children {}",
                    node_type, descriptor.min_children, descriptor.max_children
                )));
            }
            if !descriptor.is_container && !descriptor.can_contain.is_empty() {
                return Err(EngineError::InvalidConfig(format!(
                    "'{}' is not a container but lists allowed children",
                    node_type
                )));
            }
            if descriptor.is_container != node_type.is_layout() {
                return Err(EngineError::InvalidConfig(format!(
                    "'{}' must {}be a container",
                    node_type,
                    if node_type.is_layout() { "" } else { "not " }
                )));
            }
            if descriptor.nesting_level == NestingLevel::Leaf && descriptor.is_container {
                return Err(EngineError::InvalidConfig(format!(
                    "'{}' is a container with leaf nesting level",
                    node_type
                )));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
