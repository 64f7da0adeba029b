//! Scene nodes and the drawable capability

use tiny_skia::Pixmap;

/// Unique identifier for a node in a [`Scene`](crate::Scene)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u64);

/// Color modulation applied when a node is composited.
///
/// Output channels are `straight * multiply + add`, each clamped to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    /// Multiplied RGBA
    pub multiply: [f32; 4],
    /// Additive RGBA
    pub add: [f32; 4],
}

impl Tint {
    /// No modulation
    pub const IDENTITY: Tint = Tint {
        multiply: [1.0, 1.0, 1.0, 1.0],
        add: [0.0, 0.0, 0.0, 0.0],
    };

    /// Plain opacity modulation
    pub fn alpha(a: f32) -> Self {
        Tint {
            multiply: [1.0, 1.0, 1.0, a],
            add: [0.0, 0.0, 0.0, 0.0],
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Tint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// What a node contributes to the composited image
pub enum NodeContent {
    /// Pure grouping node, draws nothing itself
    Group,
    /// An owned pixel buffer drawn with the node's transform and tint
    Sprite(Pixmap),
}

/// Node in the scene graph
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub visible: bool,
    pub pos: (f32, f32),
    pub scale: (f32, f32),
    /// Rotation in degrees
    pub rotation: f32,
    pub tint: Tint,
    pub content: NodeContent,
}

impl Node {
    pub(crate) fn new(content: NodeContent) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            visible: true,
            pos: (0.0, 0.0),
            scale: (1.0, 1.0),
            rotation: 0.0,
            tint: Tint::IDENTITY,
            content,
        }
    }

    /// Parent node, if attached
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Attached children, in attach order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Capability shared by everything placeable in a scene: position, scale,
/// tint, and visibility. Composite drawables (like a text block) implement
/// this alongside plain nodes.
pub trait Drawable {
    fn pos(&self) -> (f32, f32);
    fn set_pos(&mut self, x: f32, y: f32);
    fn scale(&self) -> (f32, f32);
    fn set_scale(&mut self, x: f32, y: f32);
    fn tint(&self) -> Tint;
    fn set_tint(&mut self, tint: Tint);
    fn visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);
}

impl Drawable for Node {
    fn pos(&self) -> (f32, f32) {
        self.pos
    }

    fn set_pos(&mut self, x: f32, y: f32) {
        self.pos = (x, y);
    }

    fn scale(&self) -> (f32, f32) {
        self.scale
    }

    fn set_scale(&mut self, x: f32, y: f32) {
        self.scale = (x, y);
    }

    fn tint(&self) -> Tint {
        self.tint
    }

    fn set_tint(&mut self, tint: Tint) {
        self.tint = tint;
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tint_identity() {
        assert!(Tint::IDENTITY.is_identity());
        assert!(Tint::default().is_identity());
        assert!(!Tint::alpha(0.5).is_identity());
    }

    #[test]
    fn test_drawable_roundtrip() {
        let mut node = Node::new(NodeContent::Group);
        node.set_pos(3.0, 4.0);
        node.set_scale(2.0, 2.0);
        node.set_visible(false);

        assert_eq!(node.pos(), (3.0, 4.0));
        assert_eq!(node.scale(), (2.0, 2.0));
        assert!(!node.visible());
    }
}
