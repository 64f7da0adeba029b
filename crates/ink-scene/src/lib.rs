//! Inkline Scene - Retained 2D Scene Graph
//!
//! This crate provides the drawable-node layer for the Inkline text stack:
//! - Node arena with parent/child grouping
//! - Per-node transform (position, scale, rotation)
//! - Color modulation (multiply + additive RGBA)
//! - Visibility flags that prune whole subtrees
//! - A CPU compositor that flattens sprites into a `tiny_skia::Pixmap`

mod compositor;
mod node;
mod scene;

pub use compositor::Compositor;
pub use node::{Drawable, Node, NodeContent, NodeId, Tint};
pub use scene::Scene;
