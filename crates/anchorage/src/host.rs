//! The narrow interfaces through which an overlay observes and mutates the
//! surface it lives on.
//!
//! A host is split along three concerns: [`Structure`] finds the overlay's
//! slots, [`Geometry`] measures nodes and the viewport, and [`Style`] applies
//! computed placement. Anything that implements all three is a [`Host`].

use serde::{Deserialize, Serialize};

use crate::{
    Direction, Expanse, Point, Rect,
    error::{Error, Result},
    node::{NodeId, Role},
    place::Width,
};

/// Whether a node takes part in display at all. Opacity is tracked separately,
/// so a node can be displayed but fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Displayed.
    #[default]
    Visible,
    /// Removed from display.
    Hidden,
}

/// Configured width limits of a node, unit-stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WidthBounds {
    /// Minimum width, if one is configured.
    pub min: Option<u32>,
    /// Maximum width, if one is configured.
    pub max: Option<u32>,
}

/// Node discovery and content.
pub trait Structure {
    /// All descendants of `root` tagged with `role`, in document order.
    fn children_with_role(&self, root: NodeId, role: Role) -> Vec<NodeId>;

    /// The visible label of a node.
    fn label(&self, node: NodeId) -> Option<String>;

    /// Replace the content of a node.
    fn set_content(&mut self, node: NodeId, text: &str) -> Result<()>;
}

/// Layout measurements.
pub trait Geometry {
    /// Offset of a node relative to its offset parent.
    fn offset(&self, node: NodeId) -> Option<Point>;

    /// The node that `offset` is measured against, if any.
    fn offset_parent(&self, node: NodeId) -> Option<NodeId>;

    /// The rendered size of a node.
    fn size(&self, node: NodeId) -> Option<Expanse>;

    /// Size of the document's content box.
    fn document_extent(&self) -> Expanse;

    /// Size of the window's viewport box.
    fn window_extent(&self) -> Expanse;
}

/// Style reads and writes.
pub trait Style {
    /// The configured width limits of a node.
    fn width_bounds(&self, node: NodeId) -> WidthBounds;

    /// Move a node to a position relative to its offset parent.
    fn set_position(&mut self, node: NodeId, pos: Point);

    /// Apply a resolved width policy.
    fn set_width(&mut self, node: NodeId, width: Width);

    /// Set opacity, between 0 and 1.
    fn set_opacity(&mut self, node: NodeId, opacity: f32);

    /// Include or remove a node from display.
    fn set_visibility(&mut self, node: NodeId, visibility: Visibility);

    /// Point the pointer indicator. Replaces any previous direction.
    fn set_pointer_direction(&mut self, node: NodeId, direction: Direction);
}

/// A complete collaborator for an overlay.
pub trait Host: Structure + Geometry + Style {}

impl<T> Host for T where T: Structure + Geometry + Style {}

/// Absolute page position of a node, found by summing offsets up the chain of
/// offset parents.
pub fn absolute_position<G>(g: &G, node: NodeId) -> Result<Point>
where
    G: Geometry + ?Sized,
{
    let mut pos = g.offset(node).ok_or(Error::UnknownNode)?;
    let mut cur = g.offset_parent(node);
    while let Some(parent) = cur {
        let off = g.offset(parent).ok_or(Error::UnknownNode)?;
        pos = pos.checked_add(off)?;
        cur = g.offset_parent(parent);
    }
    Ok(pos)
}

/// Absolute page rectangle of a node.
pub fn absolute_rect<G>(g: &G, node: NodeId) -> Result<Rect>
where
    G: Geometry + ?Sized,
{
    let size = g.size(node).ok_or(Error::UnknownNode)?;
    Ok(size.at(absolute_position(g, node)?))
}

/// The viewport: the larger of the document and the window, independently on
/// each axis.
pub fn viewport<G>(g: &G) -> Expanse
where
    G: Geometry + ?Sized,
{
    g.document_extent().max(g.window_extent())
}
