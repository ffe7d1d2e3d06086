//! Node identities and the roles an overlay's children play.

use std::fmt;

use slotmap::new_key_type;

new_key_type! {
    /// Identifier for a node owned by a host.
    pub struct NodeId;
}

/// The role a child node plays inside an overlay root.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Role {
    /// The heading slot. Exactly one.
    Heading,
    /// The body text slot. Exactly one.
    Text,
    /// The pointer indicator. Exactly one.
    Pointer,
    /// A button that closes the overlay. One or more.
    Action,
}

impl Role {
    /// The canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Heading => "heading",
            Self::Text => "text",
            Self::Pointer => "pointer",
            Self::Action => "action",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
