//! Terminal rendering of schemas, reports, and the palette

use colored::Colorize;
use formforge_ir::validation::ValidationResult;
use formforge_ir::{
    ComponentRegistry, FormSchema, LayoutNode, NodeRef, NodeType, PaletteItem, SlotKind,
};
use std::fmt::Write;

/// Validation errors and warnings, one per line
pub fn render_report(result: &ValidationResult) -> String {
    let mut out = String::new();
    for error in &result.errors {
        let _ = writeln!(out, "{} {}", "error:".red().bold(), error);
        if let Some(suggestion) = &error.suggestion {
            let _ = writeln!(out, "  {} {}", "help:".cyan(), suggestion);
        }
    }
    for warning in &result.warnings {
        let _ = writeln!(out, "{} {}", "warning:".yellow().bold(), warning);
    }
    out
}

pub fn render_info(schema: &FormSchema) -> String {
    let stats = schema.stats();
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", "Form:".bold(), schema.meta.name);
    if let Some(description) = &schema.meta.description {
        let _ = writeln!(out, "{} {}", "Description:".bold(), description);
    }
    let _ = writeln!(out, "{} {}", "Id:".bold(), schema.meta.id);
    let _ = writeln!(out, "{} {}", "Modified:".bold(), schema.meta.modified_at.to_rfc3339());
    let _ = writeln!(out, "{} {}", "Roots:".bold(), stats.roots);
    let _ = writeln!(out, "{} {}", "Rows:".bold(), stats.rows);
    let _ = writeln!(out, "{} {}", "Columns:".bold(), stats.columns);
    let _ = writeln!(out, "{} {}", "Components:".bold(), stats.components);
    let _ = writeln!(out, "{} {}", "Definitions:".bold(), stats.definitions);
    let depth = stats
        .max_depth
        .map_or_else(|| "-".to_string(), |d| d.to_string());
    let _ = writeln!(out, "{} {}", "Max depth:".bold(), depth);
    out
}

/// Indented layout tree with component widgets and labels
pub fn render_tree(schema: &FormSchema) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", schema.meta.name.bold());
    if schema.layout.is_empty() {
        let _ = writeln!(out, "{}", "(empty layout)".dimmed());
        return out;
    }
    render_children(&mut out, schema.layout.roots(), &schema.components, "");
    out
}

fn render_children(
    out: &mut String,
    children: &[NodeRef],
    registry: &ComponentRegistry,
    prefix: &str,
) {
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let branch = if last { "└── " } else { "├── " };
        let _ = writeln!(out, "{}{}{}", prefix, branch, node_label(child, registry));

        let nested = format!("{}{}", prefix, if last { "    " } else { "│   " });
        render_children(out, child.children(), registry, &nested);

        if let Some(container) = child.as_container() {
            for kind in SlotKind::all() {
                for slot in container.slots(kind) {
                    let header = format!("[{:?} {}]", kind, slot.id);
                    let _ = writeln!(out, "{}{}", nested, header.dimmed());
                    render_children(out, &slot.children, registry, &format!("{}  ", nested));
                }
            }
        }
    }
}

fn node_label(node: &LayoutNode, registry: &ComponentRegistry) -> String {
    let kind = match node.node_type() {
        NodeType::Row => "row".blue(),
        NodeType::Column => "column".magenta(),
        NodeType::Component => "component".green(),
    };
    match registry.get(node.id()) {
        Some(definition) => format!(
            "{} {} [{}] {}",
            kind,
            node.id(),
            definition.widget,
            definition.label
        ),
        None if node.node_type() == NodeType::Component => {
            format!("{} {} {}", kind, node.id(), "(no definition)".red())
        }
        None => format!("{} {}", kind, node.id()),
    }
}

pub fn render_palette(palette: &[PaletteItem]) -> String {
    let mut out = String::new();
    for item in palette {
        let key = format!("{:<12}", item.key);
        let _ = writeln!(out, "{} {:<10} {}", key.bold(), item.node_type.as_str(), item.label);
    }
    out
}
