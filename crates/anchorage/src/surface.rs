//! An in-memory host.
//!
//! `Surface` keeps a tree of nodes in a slotmap. Each node has an offset from
//! its parent, an intrinsic size, an optional role, and the style properties an
//! overlay writes. The parent of a node doubles as its offset parent. Sizes are
//! intrinsic: applying a width policy is recorded in the node's style but does
//! not feed back into [`Geometry::size`].

use slotmap::SlotMap;

use crate::{
    Direction, Expanse, Point,
    error::{Error, Result},
    host::{Geometry, Structure, Style, Visibility, WidthBounds},
    node::{NodeId, Role},
    place::Width,
};

/// Style properties written to a node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStyle {
    /// Opacity between 0 and 1.
    pub opacity: f32,
    /// Display state.
    pub visibility: Visibility,
    /// Applied width policy.
    pub width: Option<Width>,
    /// Pointer direction, for pointer nodes.
    pub direction: Option<Direction>,
    /// Configured width limits.
    pub bounds: WidthBounds,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            visibility: Visibility::Visible,
            width: None,
            direction: None,
            bounds: WidthBounds::default(),
        }
    }
}

/// A node in the surface tree.
#[derive(Debug, Clone, Default)]
struct SurfaceNode {
    /// Parent node, also the offset parent.
    parent: Option<NodeId>,
    /// Children in document order.
    children: Vec<NodeId>,
    /// Role inside an overlay, if any.
    role: Option<Role>,
    /// Offset relative to the parent.
    offset: Point,
    /// Intrinsic size.
    size: Expanse,
    /// Visible label.
    label: Option<String>,
    /// Current content.
    content: String,
    /// Written style.
    style: NodeStyle,
}

/// An in-memory document.
#[derive(Debug, Clone)]
pub struct Surface {
    /// All live nodes.
    nodes: SlotMap<NodeId, SurfaceNode>,
    /// The document's content box.
    document: Expanse,
    /// The window's viewport box.
    window: Expanse,
}

impl Surface {
    /// An empty surface with a window of the given size.
    pub fn new(window: Expanse) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            document: Expanse::default(),
            window,
        }
    }

    /// Add a top-level node.
    pub fn add(&mut self, offset: Point, size: Expanse) -> NodeId {
        self.nodes.insert(SurfaceNode {
            offset,
            size,
            ..Default::default()
        })
    }

    /// Add a node under `parent`.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        role: Option<Role>,
        offset: Point,
        size: Expanse,
    ) -> Result<NodeId> {
        if !self.nodes.contains_key(parent) {
            return Err(Error::UnknownNode);
        }
        let id = self.nodes.insert(SurfaceNode {
            parent: Some(parent),
            role,
            offset,
            size,
            ..Default::default()
        });
        self.nodes[parent].children.push(id);
        Ok(id)
    }

    /// The node, or an error.
    fn node_mut(&mut self, node: NodeId) -> Result<&mut SurfaceNode> {
        self.nodes.get_mut(node).ok_or(Error::UnknownNode)
    }

    /// Set a node's visible label.
    pub fn set_label(&mut self, node: NodeId, label: &str) -> Result<()> {
        self.node_mut(node)?.label = Some(label.into());
        Ok(())
    }

    /// Move a node relative to its parent.
    pub fn set_offset(&mut self, node: NodeId, offset: Point) -> Result<()> {
        self.node_mut(node)?.offset = offset;
        Ok(())
    }

    /// Change a node's intrinsic size.
    pub fn set_size(&mut self, node: NodeId, size: Expanse) -> Result<()> {
        self.node_mut(node)?.size = size;
        Ok(())
    }

    /// Configure a node's width limits.
    pub fn set_bounds(&mut self, node: NodeId, bounds: WidthBounds) -> Result<()> {
        self.node_mut(node)?.style.bounds = bounds;
        Ok(())
    }

    /// Resize the window.
    pub fn set_window(&mut self, window: Expanse) {
        self.window = window;
    }

    /// Resize the document content box.
    pub fn set_document(&mut self, document: Expanse) {
        self.document = document;
    }

    /// Remove a node and all its descendants.
    pub fn remove(&mut self, node: NodeId) -> Result<()> {
        let n = self.nodes.remove(node).ok_or(Error::UnknownNode)?;
        if let Some(p) = n.parent.and_then(|p| self.nodes.get_mut(p)) {
            p.children.retain(|c| *c != node);
        }
        for c in n.children {
            self.remove(c)?;
        }
        Ok(())
    }

    /// Does the node exist?
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    /// The style written to a node.
    pub fn style(&self, node: NodeId) -> Option<&NodeStyle> {
        self.nodes.get(node).map(|n| &n.style)
    }

    /// The content of a node.
    pub fn content(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node).map(|n| n.content.as_str())
    }

    /// Collect descendants with a role, depth-first.
    fn collect_role(&self, node: NodeId, role: Role, out: &mut Vec<NodeId>) {
        if let Some(n) = self.nodes.get(node) {
            for c in &n.children {
                if self.nodes.get(*c).is_some_and(|cn| cn.role == Some(role)) {
                    out.push(*c);
                }
                self.collect_role(*c, role, out);
            }
        }
    }
}

impl Structure for Surface {
    fn children_with_role(&self, root: NodeId, role: Role) -> Vec<NodeId> {
        let mut v = vec![];
        self.collect_role(root, role, &mut v);
        v
    }

    fn label(&self, node: NodeId) -> Option<String> {
        self.nodes.get(node).and_then(|n| n.label.clone())
    }

    fn set_content(&mut self, node: NodeId, text: &str) -> Result<()> {
        self.node_mut(node)?.content = text.into();
        Ok(())
    }
}

impl Geometry for Surface {
    fn offset(&self, node: NodeId) -> Option<Point> {
        self.nodes.get(node).map(|n| n.offset)
    }

    fn offset_parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    fn size(&self, node: NodeId) -> Option<Expanse> {
        self.nodes.get(node).map(|n| n.size)
    }

    fn document_extent(&self) -> Expanse {
        self.document
    }

    fn window_extent(&self) -> Expanse {
        self.window
    }
}

impl Style for Surface {
    fn width_bounds(&self, node: NodeId) -> WidthBounds {
        self.nodes
            .get(node)
            .map(|n| n.style.bounds)
            .unwrap_or_default()
    }

    fn set_position(&mut self, node: NodeId, pos: Point) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.offset = pos;
        }
    }

    fn set_width(&mut self, node: NodeId, width: Width) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.style.width = Some(width);
        }
    }

    fn set_opacity(&mut self, node: NodeId, opacity: f32) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.style.opacity = opacity;
        }
    }

    fn set_visibility(&mut self, node: NodeId, visibility: Visibility) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.style.visibility = visibility;
        }
    }

    fn set_pointer_direction(&mut self, node: NodeId, direction: Direction) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.style.direction = Some(direction);
        }
    }
}
