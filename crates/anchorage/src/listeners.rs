//! Ordered open/close callbacks.

use std::{fmt, rc::Rc, str::FromStr};

use crate::{
    error::{Error, Result},
    overlay::Click,
};

/// The kinds of event an overlay emits.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum EventKind {
    /// The overlay was shown.
    Opened,
    /// The overlay was closed.
    Closed,
}

impl EventKind {
    /// The external name of this event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Opened => "overlay:opened",
            Self::Closed => "overlay:closed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "overlay:opened" => Ok(Self::Opened),
            "overlay:closed" => Ok(Self::Closed),
            _ => Err(Error::UnknownEvent(s.into())),
        }
    }
}

/// Payload delivered to close listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseEvent {
    /// Label of the action that closed the overlay. `None` for programmatic
    /// closes.
    pub value: Option<String>,
    /// The click that closed the overlay, if any.
    pub click: Option<Click>,
}

/// What a listener is told.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The overlay opened. Carries no payload.
    Opened,
    /// The overlay closed.
    Closed(CloseEvent),
}

impl Notification {
    /// The kind of this notification.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Opened => EventKind::Opened,
            Self::Closed(_) => EventKind::Closed,
        }
    }
}

/// A registered callback. Callbacks are identified by pointer, so keep a clone
/// of the `Rc` to unregister later.
pub type Listener = Rc<dyn Fn(&Notification)>;

/// Two independent, insertion-ordered listener lists.
#[derive(Default)]
pub struct ListenerRegistry {
    /// Listeners for [`EventKind::Opened`].
    opened: Vec<Listener>,
    /// Listeners for [`EventKind::Closed`].
    closed: Vec<Listener>,
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("opened", &self.opened.len())
            .field("closed", &self.closed.len())
            .finish()
    }
}

impl ListenerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The list for a kind.
    fn list(&self, kind: EventKind) -> &Vec<Listener> {
        match kind {
            EventKind::Opened => &self.opened,
            EventKind::Closed => &self.closed,
        }
    }

    /// The mutable list for a kind.
    fn list_mut(&mut self, kind: EventKind) -> &mut Vec<Listener> {
        match kind {
            EventKind::Opened => &mut self.opened,
            EventKind::Closed => &mut self.closed,
        }
    }

    /// Append a listener.
    pub fn listen(&mut self, kind: EventKind, cb: Listener) {
        self.list_mut(kind).push(cb);
    }

    /// Remove the first registration of `cb`.
    pub fn unlisten(&mut self, kind: EventKind, cb: &Listener) -> Result<()> {
        let list = self.list_mut(kind);
        let idx = list
            .iter()
            .position(|l| Rc::ptr_eq(l, cb))
            .ok_or(Error::UnknownCallback)?;
        list.remove(idx);
        Ok(())
    }

    /// Append a listener for a named event.
    pub fn listen_named(&mut self, name: &str, cb: Listener) -> Result<()> {
        self.listen(name.parse()?, cb);
        Ok(())
    }

    /// Remove a listener for a named event.
    pub fn unlisten_named(&mut self, name: &str, cb: &Listener) -> Result<()> {
        self.unlisten(name.parse()?, cb)
    }

    /// Number of listeners registered for a kind.
    pub fn count(&self, kind: EventKind) -> usize {
        self.list(kind).len()
    }

    /// Call every listener for the notification's kind, in insertion order.
    pub fn notify(&self, n: &Notification) {
        for l in self.list(n.kind()) {
            l(n);
        }
    }
}
