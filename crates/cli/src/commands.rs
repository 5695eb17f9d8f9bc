//! Subcommand implementations

use crate::output;
use anyhow::{Context, bail};
use colored::Colorize;
use formforge_dnd::{DraggedItem, DropHandler, DropOutcome, DropTarget};
use formforge_ir::serialization::{default_file_name, ensure_extension};
use formforge_ir::{
    EngineConfig, FormSchema, LayoutEngine, NodeId, Validator, default_palette,
    find_palette_item, load_schema, save_schema,
};
use std::path::{Path, PathBuf};

/// What a `drop` command drags
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropSource {
    /// Palette key
    Palette(String),
    /// Id of a node already in the layout
    Node(String),
}

pub fn new_schema(
    name: &str,
    output: Option<PathBuf>,
    description: Option<String>,
    force: bool,
) -> anyhow::Result<()> {
    let path = ensure_extension(output.unwrap_or_else(|| PathBuf::from(default_file_name(name))));
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let mut schema = FormSchema::new(name);
    if let Some(description) = description {
        schema.meta.description = Some(description);
    }
    save_schema(&schema, &path)?;

    tracing::info!("Created form '{}' at {}", name, path.display());
    println!("{} {}", "Created".green().bold(), path.display());
    Ok(())
}

pub fn validate(file: &Path, config: &EngineConfig, strict: bool) -> anyhow::Result<()> {
    let schema = load(file)?;
    let result = Validator::for_config(config).validate(&schema);
    print!("{}", output::render_report(&result));

    let failed = result.has_errors() || (strict && result.has_warnings());
    if failed {
        bail!(
            "{} failed validation with {} error(s) and {} warning(s)",
            file.display(),
            result.errors.len(),
            result.warnings.len()
        );
    }
    println!("{} {}", "Valid".green().bold(), file.display());
    Ok(())
}

pub fn info(file: &Path) -> anyhow::Result<()> {
    let schema = load(file)?;
    print!("{}", output::render_info(&schema));
    Ok(())
}

pub fn tree(file: &Path) -> anyhow::Result<()> {
    let schema = load(file)?;
    print!("{}", output::render_tree(&schema));
    Ok(())
}

pub fn config(config: &EngineConfig, output: Option<PathBuf>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            config.save(&path)?;
            println!("{} {}", "Wrote".green().bold(), path.display());
        }
        None => print!("{}", config.to_toml_string()?),
    }
    Ok(())
}

pub fn palette() -> anyhow::Result<()> {
    print!("{}", output::render_palette(&default_palette()));
    Ok(())
}

pub fn drop_item(
    file: &Path,
    config: &EngineConfig,
    source: DropSource,
    target: &str,
    check: bool,
) -> anyhow::Result<()> {
    let mut schema = load(file)?;
    let handler = DropHandler::new(LayoutEngine::new(config.clone()));
    let item = dragged_item(&schema, source)?;
    let target = DropTarget::parse(target)
        .with_context(|| format!("Invalid drop target '{}'", target))?;

    if check {
        let validation = handler.validate_advanced_drop(&target, &item, &schema.layout);
        if !validation.is_valid {
            bail!("Drop would be rejected: {}", validation.reason);
        }
        println!("{} {}", "Accepted".green().bold(), validation.reason);
        return Ok(());
    }

    let outcome = handler.try_handle_drop(&target, &item, &mut schema)?;
    save_schema(&schema, file)?;

    tracing::info!("Applied drop to {}", file.display());
    match outcome {
        DropOutcome::Created { id, inserted } if id != inserted => println!(
            "{} {} (wrapped in {})",
            "Created".green().bold(),
            id,
            inserted
        ),
        DropOutcome::Created { id, .. } => println!("{} {}", "Created".green().bold(), id),
        DropOutcome::Moved { id } => println!("{} {}", "Moved".green().bold(), id),
        DropOutcome::Removed { id, .. } => println!("{} {}", "Removed".green().bold(), id),
    }
    Ok(())
}

pub fn trash(file: &Path, config: &EngineConfig, id: &str) -> anyhow::Result<()> {
    let mut schema = load(file)?;
    let handler = DropHandler::new(LayoutEngine::new(config.clone()));
    let item = dragged_item(&schema, DropSource::Node(id.to_string()))?;

    let outcome = handler.try_handle_trash_drop(&item, &mut schema)?;
    save_schema(&schema, file)?;

    if let DropOutcome::Removed {
        id,
        definitions_removed,
    } = outcome
    {
        tracing::info!("Removed {} from {}", id, file.display());
        println!(
            "{} {} ({} definition(s))",
            "Removed".green().bold(),
            id,
            definitions_removed
        );
    }
    Ok(())
}

fn load(file: &Path) -> anyhow::Result<FormSchema> {
    load_schema(file).with_context(|| format!("Failed to load {}", file.display()))
}

fn dragged_item(schema: &FormSchema, source: DropSource) -> anyhow::Result<DraggedItem> {
    match source {
        DropSource::Palette(key) => {
            let palette = default_palette();
            let item = find_palette_item(&palette, &key).with_context(|| {
                let keys: Vec<_> = palette.iter().map(|item| item.key.as_str()).collect();
                format!("Unknown palette item '{}' (expected one of: {})", key, keys.join(", "))
            })?;
            Ok(DraggedItem::sidebar(item.clone()))
        }
        DropSource::Node(id) => {
            let id = NodeId::new(id);
            let node_type = schema
                .layout
                .get(&id)
                .map(|node| node.node_type())
                .with_context(|| format!("Node not found: {}", id))?;
            Ok(DraggedItem::existing(id, node_type))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formforge_ir::{ComponentDefinition, LayoutNode, LayoutTree, NodeType, WidgetType};
    use pretty_assertions::assert_eq;

    fn write_sample(dir: &Path) -> PathBuf {
        let schema = FormSchema::new("Sample").with_layout(
            LayoutTree::from_nodes(vec![LayoutNode::row(
                "r1",
                vec![LayoutNode::column("c1", vec![LayoutNode::component("f1")])],
            )]),
            std::iter::once(ComponentDefinition::new("f1", WidgetType::Input).with_name("first"))
                .collect(),
        );
        let path = dir.join("sample.ffs");
        save_schema(&schema, &path).unwrap();
        path
    }

    #[test]
    fn test_new_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.ffs");
        new_schema("Form", Some(path.clone()), None, false).unwrap();
        assert!(new_schema("Form", Some(path.clone()), None, false).is_err());
        new_schema("Form", Some(path.clone()), Some("Again".into()), true).unwrap();
        assert_eq!(load(&path).unwrap().meta.description.as_deref(), Some("Again"));
    }

    #[test]
    fn test_drop_palette_item_saves_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample(dir.path());
        let config = EngineConfig::default();

        drop_item(
            &path,
            &config,
            DropSource::Palette("email".into()),
            r#"{"containerId": "c1", "index": 0}"#,
            false,
        )
        .unwrap();

        let schema = load(&path).unwrap();
        let column = schema.layout.get(&NodeId::new("c1")).unwrap();
        assert_eq!(column.child_count(), 2);
        assert_eq!(schema.components.len(), 2);
    }

    #[test]
    fn test_drop_check_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample(dir.path());
        let before = std::fs::read_to_string(&path).unwrap();

        drop_item(
            &path,
            &EngineConfig::default(),
            DropSource::Palette("input".into()),
            "0-0-1",
            true,
        )
        .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);

        // rows only hold columns
        let rejected = drop_item(
            &path,
            &EngineConfig::default(),
            DropSource::Palette("input".into()),
            "0-0",
            true,
        );
        assert!(rejected.is_err());
    }

    #[test]
    fn test_trash_removes_definitions() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample(dir.path());
        trash(&path, &EngineConfig::default(), "r1").unwrap();

        let schema = load(&path).unwrap();
        assert!(schema.layout.is_empty());
        assert!(schema.components.is_empty());
    }

    #[test]
    fn test_dragged_item_lookup() {
        let schema = FormSchema::new("Empty").with_layout(
            LayoutTree::from_nodes(vec![LayoutNode::row("r1", vec![])]),
            Default::default(),
        );
        assert_eq!(
            dragged_item(&schema, DropSource::Node("r1".into())).unwrap(),
            DraggedItem::existing("r1", NodeType::Row)
        );
        assert!(dragged_item(&schema, DropSource::Node("nope".into())).is_err());
        assert!(dragged_item(&schema, DropSource::Palette("nope".into())).is_err());
    }
}
