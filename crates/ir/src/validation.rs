//! Validation rules and utilities for FormForge schemas
//!
//! The engine keeps trees valid as they are edited. This module checks a
//! whole schema after the fact, typically one loaded from disk, and reports
//! every problem it finds rather than stopping at the first.

use crate::capability::CapabilityTable;
use crate::config::EngineConfig;
use crate::schema::FormSchema;
use formforge_core::{EngineError, EngineResult, NodeType};
use std::collections::HashSet;

// ============================================================================
// ValidationResult
// ============================================================================

/// Result of a validation operation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// Whether the validation passed
    pub valid: bool,

    /// List of errors (empty if valid)
    pub errors: Vec<ValidationError>,

    /// List of warnings (non-fatal issues)
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Create a failed validation result with an error
    pub fn error(error: ValidationError) -> Self {
        Self {
            valid: false,
            errors: vec![error],
            warnings: Vec::new(),
        }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, error: ValidationError) {
        self.valid = false;
        self.errors.push(error);
    }

    /// Add a warning to the result
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Merge another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check whether an error with `code` was reported
    pub fn has_error_code(&self, code: ValidationErrorCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    /// Check whether a warning with `code` was reported
    pub fn has_warning_code(&self, code: ValidationWarningCode) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }

    /// Convert to EngineResult (fails if any errors)
    pub fn to_result(self) -> EngineResult<()> {
        if self.valid {
            Ok(())
        } else {
            let msg = self
                .errors
                .iter()
                .map(|e| e.message.clone())
                .collect::<Vec<_>>()
                .join("; ");
            Err(EngineError::validation(msg))
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

// ============================================================================
// ValidationError
// ============================================================================

/// A validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error code for programmatic handling
    pub code: ValidationErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Path to the problematic element (e.g., "layout.col_1a2b")
    pub path: Option<String>,

    /// Suggested fix
    pub suggestion: Option<String>,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(code: ValidationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
            suggestion: None,
        }
    }

    /// Add a path to the error
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add a suggestion to the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "[{}] {}", path, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

// ============================================================================
// ValidationErrorCode
// ============================================================================

/// Error codes for validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorCode {
    // Layout errors
    DuplicateNodeId,
    MissingCapability,
    InvalidChildType,
    TooManyChildren,
    DepthExceeded,

    // Registry errors
    MissingDefinition,
    DuplicateFieldName,
    EmptyFieldName,

    // Form errors
    EmptyFormName,

    // Generic
    Custom,
}

// ============================================================================
// ValidationWarning
// ============================================================================

/// A validation warning (non-fatal issue)
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    /// Warning code
    pub code: ValidationWarningCode,

    /// Human-readable warning message
    pub message: String,

    /// Path to the element
    pub path: Option<String>,
}

impl ValidationWarning {
    /// Create a new warning
    pub fn new(code: ValidationWarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Add a path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "[{}] Warning: {}", path, self.message)
        } else {
            write!(f, "Warning: {}", self.message)
        }
    }
}

// ============================================================================
// ValidationWarningCode
// ============================================================================

/// Warning codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationWarningCode {
    TooFewChildren,
    NonRowRoot,
    LegacySlots,
    OrphanDefinition,
    EmptyLayout,
    NoDescription,
    Custom,
}

// ============================================================================
// ValidationRule Trait
// ============================================================================

/// Trait for validation rules
pub trait ValidationRule {
    /// Get the rule name
    fn name(&self) -> &'static str;

    /// Get the rule description
    fn description(&self) -> &'static str;

    /// Validate a schema and return the result
    fn validate(&self, schema: &FormSchema) -> ValidationResult;
}

// ============================================================================
// Validator
// ============================================================================

/// Schema validator that runs multiple validation rules
#[derive(Default)]
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    /// Create a validator with no rules
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create a validator with the default rules and configuration
    pub fn with_default_rules() -> Self {
        Self::for_config(&EngineConfig::default())
    }

    /// Create a validator with the default rules for `config`
    pub fn for_config(config: &EngineConfig) -> Self {
        let mut validator = Self::new();
        validator.add_rule(Box::new(FormMetaRule));
        validator.add_rule(Box::new(UniqueIdsRule));
        validator.add_rule(Box::new(StructureRule::new(config.capabilities.clone())));
        validator.add_rule(Box::new(DepthRule::new(config.max_depth)));
        validator.add_rule(Box::new(RegistryRule));
        validator.add_rule(Box::new(FieldNamesRule));
        validator
    }

    /// Add a validation rule
    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Names of the registered rules, in run order
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Validate a schema with all rules
    pub fn validate(&self, schema: &FormSchema) -> ValidationResult {
        let mut result = ValidationResult::ok();

        for rule in &self.rules {
            let rule_result = rule.validate(schema);
            if rule_result.has_errors() {
                tracing::debug!(
                    "Rule '{}' reported {} error(s)",
                    rule.name(),
                    rule_result.errors.len()
                );
            }
            result.merge(rule_result);
        }

        result
    }

    /// Validate and return Result
    pub fn validate_result(&self, schema: &FormSchema) -> EngineResult<()> {
        self.validate(schema).to_result()
    }
}

// ============================================================================
// Built-in Validation Rules
// ============================================================================

fn node_path(id: impl std::fmt::Display) -> String {
    format!("layout.{}", id)
}

/// Rule: Form metadata
pub struct FormMetaRule;

impl ValidationRule for FormMetaRule {
    fn name(&self) -> &'static str {
        "form_meta"
    }

    fn description(&self) -> &'static str {
        "Validates the form name and flags empty forms"
    }

    fn validate(&self, schema: &FormSchema) -> ValidationResult {
        let mut result = ValidationResult::ok();

        if schema.meta.name.trim().is_empty() {
            result.add_error(
                ValidationError::new(ValidationErrorCode::EmptyFormName, "Form name cannot be empty")
                    .with_path("meta.name"),
            );
        }

        if schema.meta.description.is_none() {
            result.add_warning(
                ValidationWarning::new(ValidationWarningCode::NoDescription, "Form has no description")
                    .with_path("meta.description"),
            );
        }

        if schema.layout.is_empty() {
            result.add_warning(ValidationWarning::new(
                ValidationWarningCode::EmptyLayout,
                "Form layout is empty",
            ));
        }

        result
    }
}

/// Rule: Node ids are unique across the layout
pub struct UniqueIdsRule;

impl ValidationRule for UniqueIdsRule {
    fn name(&self) -> &'static str {
        "unique_ids"
    }

    fn description(&self) -> &'static str {
        "Validates that every layout node has a unique id"
    }

    fn validate(&self, schema: &FormSchema) -> ValidationResult {
        let mut result = ValidationResult::ok();
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();

        for (node, _) in schema.layout.iter() {
            let id = node.id();
            if !seen.insert(id) && reported.insert(id) {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::DuplicateNodeId,
                        format!("Duplicate node id: '{}'", id),
                    )
                    .with_path(node_path(id)),
                );
            }
        }

        result
    }
}

/// Rule: Containers honour the capability table
pub struct StructureRule {
    capabilities: CapabilityTable,
}

impl StructureRule {
    pub fn new(capabilities: CapabilityTable) -> Self {
        Self { capabilities }
    }
}

impl ValidationRule for StructureRule {
    fn name(&self) -> &'static str {
        "structure"
    }

    fn description(&self) -> &'static str {
        "Validates allowed child types and child counts of every container"
    }

    fn validate(&self, schema: &FormSchema) -> ValidationResult {
        let mut result = ValidationResult::ok();

        for root in schema.layout.roots() {
            if root.node_type() != NodeType::Row {
                result.add_warning(
                    ValidationWarning::new(
                        ValidationWarningCode::NonRowRoot,
                        format!("Root item '{}' is a {}, not a row", root.id(), root.node_type()),
                    )
                    .with_path(node_path(root.id())),
                );
            }
        }

        for (node, _) in schema.layout.iter() {
            let Some(container) = node.as_container() else {
                continue;
            };
            let path = node_path(node.id());

            if container.has_slots() {
                result.add_warning(
                    ValidationWarning::new(
                        ValidationWarningCode::LegacySlots,
                        format!("'{}' uses legacy tab/step/panel slots", node.id()),
                    )
                    .with_path(&path),
                );
            }

            let Some(descriptor) = self.capabilities.get(node.node_type()) else {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::MissingCapability,
                        format!("No capability descriptor for node type '{}'", node.node_type()),
                    )
                    .with_path(&path),
                );
                continue;
            };

            for child in &container.children {
                if !descriptor.can_contain(child.node_type()) {
                    result.add_error(
                        ValidationError::new(
                            ValidationErrorCode::InvalidChildType,
                            format!(
                                "'{}' ({}) cannot hold '{}' ({})",
                                node.id(),
                                node.node_type(),
                                child.id(),
                                child.node_type()
                            ),
                        )
                        .with_path(node_path(child.id()))
                        .with_suggestion(format!("Allowed children: {}", descriptor.allowed_list())),
                    );
                }
            }

            let count = container.children.len();
            if count > descriptor.max_children {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::TooManyChildren,
                        format!(
                            "'{}' holds {} children, more than the maximum of {}",
                            node.id(),
                            count,
                            descriptor.max_children
                        ),
                    )
                    .with_path(&path),
                );
            } else if count < descriptor.min_children {
                result.add_warning(
                    ValidationWarning::new(
                        ValidationWarningCode::TooFewChildren,
                        format!(
                            "'{}' holds {} children, fewer than the minimum of {}",
                            node.id(),
                            count,
                            descriptor.min_children
                        ),
                    )
                    .with_path(&path),
                );
            }
        }

        result
    }
}

/// Rule: No node nests deeper than the limit
pub struct DepthRule {
    max_depth: usize,
}

impl DepthRule {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl ValidationRule for DepthRule {
    fn name(&self) -> &'static str {
        "depth"
    }

    fn description(&self) -> &'static str {
        "Validates that no node exceeds the maximum nesting depth"
    }

    fn validate(&self, schema: &FormSchema) -> ValidationResult {
        let mut result = ValidationResult::ok();

        for (node, depth) in schema.layout.iter() {
            if depth > self.max_depth {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::DepthExceeded,
                        format!(
                            "'{}' is at depth {}, beyond the maximum of {}",
                            node.id(),
                            depth,
                            self.max_depth
                        ),
                    )
                    .with_path(node_path(node.id())),
                );
            }
        }

        result
    }
}

/// Rule: Layout and registry agree
pub struct RegistryRule;

impl ValidationRule for RegistryRule {
    fn name(&self) -> &'static str {
        "registry"
    }

    fn description(&self) -> &'static str {
        "Validates that every component has a definition and flags stale definitions"
    }

    fn validate(&self, schema: &FormSchema) -> ValidationResult {
        let mut result = ValidationResult::ok();

        for id in schema.components.missing_definitions(&schema.layout) {
            result.add_error(
                ValidationError::new(
                    ValidationErrorCode::MissingDefinition,
                    format!("Component '{}' has no definition", id),
                )
                .with_path(node_path(&id))
                .with_suggestion("Add a component definition or remove the node"),
            );
        }

        for id in schema.components.orphaned_definitions(&schema.layout) {
            result.add_warning(
                ValidationWarning::new(
                    ValidationWarningCode::OrphanDefinition,
                    format!("Definition '{}' does not belong to any layout node", id),
                )
                .with_path(format!("components.{}", id)),
            );
        }

        result
    }
}

/// Rule: Field names are present and unique
pub struct FieldNamesRule;

impl ValidationRule for FieldNamesRule {
    fn name(&self) -> &'static str {
        "field_names"
    }

    fn description(&self) -> &'static str {
        "Validates that component field names are non-empty and unique"
    }

    fn validate(&self, schema: &FormSchema) -> ValidationResult {
        let mut result = ValidationResult::ok();
        let mut definitions: Vec<_> = schema.components.iter().collect();
        definitions.sort_by(|a, b| a.id.cmp(&b.id));
        let mut seen = HashSet::new();

        for definition in definitions {
            let path = format!("components.{}.name", definition.id);
            if definition.name.trim().is_empty() {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::EmptyFieldName,
                        format!("Component '{}' has an empty field name", definition.id),
                    )
                    .with_path(path),
                );
                continue;
            }
            if !seen.insert(definition.name.as_str()) {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::DuplicateFieldName,
                        format!("Duplicate field name: '{}'", definition.name),
                    )
                    .with_path(path),
                );
            }
        }

        result
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ContainerNode, LayoutNode, NodeSlot};
    use crate::registry::{ComponentDefinition, ComponentRegistry};
    use crate::tree::LayoutTree;
    use formforge_core::{SlotKind, WidgetType};

    fn schema(nodes: Vec<LayoutNode>, definitions: Vec<ComponentDefinition>) -> FormSchema {
        let mut schema = FormSchema::new("Test").with_layout(
            LayoutTree::from_nodes(nodes),
            definitions.into_iter().collect::<ComponentRegistry>(),
        );
        schema.meta.description = Some("test form".to_string());
        schema
    }

    fn valid_schema() -> FormSchema {
        schema(
            vec![LayoutNode::row(
                "r1",
                vec![LayoutNode::column("c1", vec![LayoutNode::component("f1")])],
            )],
            vec![ComponentDefinition::new("f1", WidgetType::Input)],
        )
    }

    #[test]
    fn test_validation_result_ok() {
        let result = ValidationResult::ok();
        assert!(result.valid);
        assert!(!result.has_errors());
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_validation_result_merge() {
        let mut result = ValidationResult::ok();
        result.merge(ValidationResult::error(ValidationError::new(
            ValidationErrorCode::Custom,
            "boom",
        )));
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.to_result().is_err());
    }

    #[test]
    fn test_validation_error_display() {
        let error = ValidationError::new(ValidationErrorCode::Custom, "bad").with_path("layout.x");
        assert_eq!(error.to_string(), "[layout.x] bad");
        let warning = ValidationWarning::new(ValidationWarningCode::Custom, "meh");
        assert_eq!(warning.to_string(), "Warning: meh");
    }

    #[test]
    fn test_default_rules_accept_valid_schema() {
        let result = Validator::with_default_rules().validate(&valid_schema());
        assert!(result.valid, "{:?}", result.errors);
        assert!(!result.has_warnings(), "{:?}", result.warnings);
    }

    #[test]
    fn test_validate_is_idempotent() {
        let validator = Validator::with_default_rules();
        let schema = valid_schema();
        assert_eq!(validator.validate(&schema), validator.validate(&schema));
    }

    #[test]
    fn test_duplicate_ids() {
        let schema = schema(
            vec![
                LayoutNode::row("r1", vec![LayoutNode::column("c1", vec![])]),
                LayoutNode::row("r1", vec![LayoutNode::column("c2", vec![])]),
            ],
            vec![],
        );
        let result = UniqueIdsRule.validate(&schema);
        assert_eq!(result.errors.len(), 1);
        assert!(result.has_error_code(ValidationErrorCode::DuplicateNodeId));
    }

    #[test]
    fn test_structure_errors() {
        let schema = schema(
            vec![LayoutNode::row(
                "r1",
                vec![LayoutNode::component("f1"), LayoutNode::column("c1", vec![])],
            )],
            vec![ComponentDefinition::new("f1", WidgetType::Input)],
        );
        let result = StructureRule::new(CapabilityTable::standard()).validate(&schema);
        assert!(result.has_error_code(ValidationErrorCode::InvalidChildType));
        assert_eq!(result.errors[0].path.as_deref(), Some("layout.f1"));
    }

    #[test]
    fn test_structure_warnings() {
        let slotted = LayoutNode::Column(
            ContainerNode::new("c1").with_slot(SlotKind::Tabs, NodeSlot::new("t1", vec![])),
        );
        let schema = schema(
            vec![LayoutNode::row("r1", vec![]), LayoutNode::row("r2", vec![slotted]), LayoutNode::column("loose", vec![])],
            vec![],
        );
        let result = StructureRule::new(CapabilityTable::standard()).validate(&schema);
        assert!(result.valid);
        assert!(result.has_warning_code(ValidationWarningCode::TooFewChildren));
        assert!(result.has_warning_code(ValidationWarningCode::NonRowRoot));
        assert!(result.has_warning_code(ValidationWarningCode::LegacySlots));
    }

    #[test]
    fn test_structure_capacity_and_missing_descriptor() {
        let columns = (0..13)
            .map(|i| LayoutNode::column(format!("c{}", i), vec![]))
            .collect();
        let schema = schema(vec![LayoutNode::row("wide", columns)], vec![]);
        let result = StructureRule::new(CapabilityTable::standard()).validate(&schema);
        assert!(result.has_error_code(ValidationErrorCode::TooManyChildren));

        let result = StructureRule::new(CapabilityTable::standard().without(NodeType::Row))
            .validate(&valid_schema());
        assert!(result.has_error_code(ValidationErrorCode::MissingCapability));
    }

    #[test]
    fn test_depth_rule() {
        let schema = valid_schema();
        assert!(DepthRule::new(2).validate(&schema).valid);
        let result = DepthRule::new(1).validate(&schema);
        assert!(result.has_error_code(ValidationErrorCode::DepthExceeded));
    }

    #[test]
    fn test_registry_rule() {
        let schema = schema(
            vec![LayoutNode::row(
                "r1",
                vec![LayoutNode::column("c1", vec![LayoutNode::component("f1")])],
            )],
            vec![ComponentDefinition::new("stale", WidgetType::Input)],
        );
        let result = RegistryRule.validate(&schema);
        assert!(result.has_error_code(ValidationErrorCode::MissingDefinition));
        assert!(result.has_warning_code(ValidationWarningCode::OrphanDefinition));
    }

    #[test]
    fn test_field_names_rule() {
        let schema = schema(
            vec![],
            vec![
                ComponentDefinition::new("a", WidgetType::Input).with_name("email"),
                ComponentDefinition::new("b", WidgetType::Email).with_name("email"),
                ComponentDefinition::new("c", WidgetType::Email).with_name(" "),
            ],
        );
        let result = FieldNamesRule.validate(&schema);
        assert!(result.has_error_code(ValidationErrorCode::DuplicateFieldName));
        assert!(result.has_error_code(ValidationErrorCode::EmptyFieldName));
    }

    #[test]
    fn test_form_meta_rule() {
        let mut schema = FormSchema::new("");
        schema.meta.name.clear();
        let result = FormMetaRule.validate(&schema);
        assert!(result.has_error_code(ValidationErrorCode::EmptyFormName));
        assert!(result.has_warning_code(ValidationWarningCode::EmptyLayout));
        assert!(result.has_warning_code(ValidationWarningCode::NoDescription));
    }

    #[test]
    fn test_rule_names() {
        assert_eq!(
            Validator::with_default_rules().rule_names(),
            vec!["form_meta", "unique_ids", "structure", "depth", "registry", "field_names"]
        );
    }
}
