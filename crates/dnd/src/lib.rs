//! # FormForge DnD
//!
//! Drag/drop orchestration for the form canvas. This crate sits between the
//! canvas event handlers and the layout engine:
//!
//! - **DropTarget**: legacy `"0-1-2"` paths and structured drop zones
//! - **DraggedItem**: a palette entry or a node already on the canvas
//! - **DropHandler**: sidebar drops, moves, trash drops, and the
//!   validation-only checks behind drop-zone highlighting
//! - **LayoutStore**: where the (tree, registry) pair lives between drops
//!

pub mod handlers;
pub mod item;
pub mod store;
pub mod target;

pub use handlers::{DropHandler, DropOutcome};
pub use item::DraggedItem;
pub use store::{FormLayout, History, HistorySnapshot, HistoryStore, LayoutChange, LayoutStore};
pub use target::{DropTarget, DropZone, ResolvedDrop};
