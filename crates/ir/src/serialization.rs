//! Serialization and deserialization for FormForge schemas
//!
//! This module provides functionality for saving and loading form schema
//! files, including JSON serialization, file I/O, and schema version migration.

use crate::schema::FormSchema;
use crate::{SCHEMA_FILE_EXTENSION, SCHEMA_VERSION};
use formforge_core::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ============================================================================
// Schema File Wrapper
// ============================================================================

/// Wrapper for schema files that includes version information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Schema version for migration purposes
    pub schema_version: u32,

    /// The form data
    pub form: FormSchema,

    /// File format version
    #[serde(default)]
    pub format_version: u32,
}

impl SchemaFile {
    /// Wrap a form schema
    pub fn new(form: FormSchema) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            form,
            format_version: 1,
        }
    }

    /// Check if migration is needed
    pub fn needs_migration(&self) -> bool {
        self.schema_version < SCHEMA_VERSION
    }

    /// Migrate to the latest schema version
    pub fn migrate(&mut self) -> EngineResult<()> {
        if self.schema_version > SCHEMA_VERSION {
            return Err(EngineError::SchemaVersionMismatch {
                expected: SCHEMA_VERSION,
                found: self.schema_version,
            });
        }
        while self.schema_version < SCHEMA_VERSION {
            self.migrate_one_version()?;
        }
        self.form.schema_version = self.schema_version;
        Ok(())
    }

    fn migrate_one_version(&mut self) -> EngineResult<()> {
        tracing::debug!("Migrating schema from version {}", self.schema_version);
        match self.schema_version {
            // Version 0 files predate the wrapper's version field; the layout is unchanged
            0 => self.schema_version = 1,
            _ => self.schema_version = SCHEMA_VERSION,
        }
        Ok(())
    }
}

// ============================================================================
// Save Functions
// ============================================================================

/// Save a form schema to a file
///
/// Missing parent directories are created.
///
/// # Example
///
/// ```rust,ignore
/// use formforge_ir::{FormSchema, save_schema};
///
/// let schema = FormSchema::new("Contact");
/// save_schema(&schema, "contact.ffs").unwrap();
/// ```
pub fn save_schema(schema: &FormSchema, path: impl AsRef<Path>) -> EngineResult<()> {
    let path = path.as_ref();
    let json = save_schema_to_string(schema).map_err(|e| EngineError::FileWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| EngineError::DirectoryCreate {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }
    }

    std::fs::write(path, json).map_err(|e| EngineError::FileWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    tracing::debug!("Saved schema '{}' to {}", schema.meta.name, path.display());
    Ok(())
}

/// Save a form schema to a pretty JSON string
pub fn save_schema_to_string(schema: &FormSchema) -> EngineResult<String> {
    let file = SchemaFile::new(schema.clone());
    Ok(serde_json::to_string_pretty(&file)?)
}

/// Save a form schema to a compact JSON string
pub fn save_schema_to_compact_string(schema: &FormSchema) -> EngineResult<String> {
    let file = SchemaFile::new(schema.clone());
    Ok(serde_json::to_string(&file)?)
}

// ============================================================================
// Load Functions
// ============================================================================

/// Load a form schema from a file
pub fn load_schema(path: impl AsRef<Path>) -> EngineResult<FormSchema> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(EngineError::SchemaNotFound(path.to_path_buf()));
    }

    let json = std::fs::read_to_string(path).map_err(|e| EngineError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    load_schema_from_string(&json).map_err(|e| match e {
        EngineError::JsonSerialization(je) => EngineError::FileRead {
            path: path.to_path_buf(),
            message: format!("Invalid schema file format: {}", je),
        },
        other => other,
    })
}

/// Load a form schema from a JSON string
///
/// Accepts the versioned wrapper or a bare schema object.
pub fn load_schema_from_string(json: &str) -> EngineResult<FormSchema> {
    if let Ok(mut file) = serde_json::from_str::<SchemaFile>(json) {
        if file.needs_migration() || file.schema_version > SCHEMA_VERSION {
            file.migrate()?;
        }
        return Ok(file.form);
    }

    let schema: FormSchema = serde_json::from_str(json)?;
    Ok(schema)
}

/// Load a form schema from bytes
pub fn load_schema_from_bytes(bytes: &[u8]) -> EngineResult<FormSchema> {
    let json = std::str::from_utf8(bytes)
        .map_err(|e| EngineError::InvalidSchemaFormat(format!("Invalid UTF-8: {}", e)))?;
    load_schema_from_string(json)
}

// ============================================================================
// Utility Functions
// ============================================================================

/// Get the default file name for a form
pub fn default_file_name(form_name: &str) -> String {
    let safe_name: String = form_name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!("{}.{}", safe_name.to_lowercase(), SCHEMA_FILE_EXTENSION)
}

/// Ensure a path has the schema file extension
pub fn ensure_extension(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.extension().is_none_or(|e| e != SCHEMA_FILE_EXTENSION) {
        path.with_extension(SCHEMA_FILE_EXTENSION)
    } else {
        path.to_path_buf()
    }
}

// ============================================================================
// Tests
// ============================================================================
