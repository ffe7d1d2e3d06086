//! The overlay controller.
//!
//! An [`Overlay`] is bound to a root node on a host and moves between
//! [`State::Closed`] and [`State::Open`]. Showing solves a placement against an
//! anchor and applies it; closing fades the overlay out immediately and takes
//! it out of display once the hide delay passes. Viewport movement blanks the
//! overlay and re-places it when movement has been quiet for the settle delay.
//!
//! Deferred work only happens inside [`Overlay::tick`], which the host run loop
//! calls whenever [`Overlay::next_deadline`] passes.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::{
    Point,
    config::Config,
    error::{Error, Result},
    host::{Host, Structure, Visibility, absolute_rect, viewport},
    listeners::{CloseEvent, EventKind, Listener, ListenerRegistry, Notification},
    node::{NodeId, Role},
    place::{self, Placement, PlacementInput, Solution},
    task::{Clock, ScheduledTask, SystemClock},
};

/// Fully opaque.
const OPAQUE: f32 = 1.0;
/// Fully transparent.
const TRANSPARENT: f32 = 0.0;

/// Open/closed state.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub enum State {
    /// Not shown. The initial state.
    #[default]
    Closed,
    /// Shown next to an anchor.
    Open,
}

/// Viewport movement signals.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Movement {
    /// The window was resized.
    Resize,
    /// The page scrolled.
    Scroll,
}

/// Whether an input was consumed.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Outcome {
    /// The overlay handled the input.
    Handle,
    /// The input was not for this overlay.
    Ignore,
}

/// A click delivered by the host.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Click {
    /// The clicked node.
    pub target: NodeId,
    /// Page position of the click.
    pub pos: Point,
}

/// The inputs and result of the most recent successful placement.
#[derive(Debug, Clone, Copy)]
struct LastPlacement {
    /// Solver input, including the anchor geometry at the time.
    input: PlacementInput,
    /// What the solver chose.
    solution: Solution,
}

/// A floating panel positioned next to an anchor.
pub struct Overlay {
    /// The overlay's root node.
    root: NodeId,
    /// Heading slot.
    heading: NodeId,
    /// Text slot.
    text: NodeId,
    /// Pointer indicator.
    pointer: NodeId,
    /// Action slots. Clicking any of these closes the overlay.
    actions: Vec<NodeId>,

    /// Current state.
    state: State,
    /// The anchor, bound only while open.
    anchor: Option<NodeId>,
    /// Offset from the most recent show.
    offset: i32,
    /// The most recent successful placement.
    last: Option<LastPlacement>,

    /// Takes the overlay out of display after a close.
    hide_task: ScheduledTask<()>,
    /// Re-places the overlay after movement settles.
    reopen_task: ScheduledTask<()>,

    /// Open/close listeners.
    listeners: ListenerRegistry,
    /// Tunables.
    config: Config,
    /// Time source for scheduled tasks.
    clock: Box<dyn Clock>,
}

/// Find exactly one descendant of `root` with `role`.
fn one<S>(host: &S, root: NodeId, role: Role) -> Result<NodeId>
where
    S: Structure + ?Sized,
{
    match host.children_with_role(root, role).as_slice() {
        [n] => Ok(*n),
        v => Err(Error::InvalidStructure(format!(
            "expected exactly one {role} slot, found {}",
            v.len()
        ))),
    }
}

impl Overlay {
    /// Bind an overlay to `root`. The root must have exactly one heading, text
    /// and pointer slot, and at least one action slot.
    pub fn new<S>(host: &S, root: NodeId, config: Config) -> Result<Self>
    where
        S: Structure + ?Sized,
    {
        let heading = one(host, root, Role::Heading)?;
        let text = one(host, root, Role::Text)?;
        let pointer = one(host, root, Role::Pointer)?;
        let actions = host.children_with_role(root, Role::Action);
        if actions.is_empty() {
            return Err(Error::InvalidStructure(
                "expected at least one action slot".into(),
            ));
        }
        Ok(Self {
            root,
            heading,
            text,
            pointer,
            actions,
            state: State::Closed,
            anchor: None,
            offset: 0,
            last: None,
            hide_task: ScheduledTask::new(),
            reopen_task: ScheduledTask::new(),
            listeners: ListenerRegistry::new(),
            config,
            clock: Box::new(SystemClock),
        })
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The pointer indicator node.
    pub fn pointer(&self) -> NodeId {
        self.pointer
    }

    /// The action slots, in document order.
    pub fn actions(&self) -> &[NodeId] {
        &self.actions
    }

    /// The current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Is the overlay open?
    pub fn is_opened(&self) -> bool {
        self.state == State::Open
    }

    /// The bound anchor.
    pub fn anchor(&self) -> Option<NodeId> {
        self.anchor
    }

    /// The most recent successful placement, which outlives the session that
    /// produced it.
    pub fn last_placement(&self) -> Option<Solution> {
        self.last.map(|l| l.solution)
    }

    /// The configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Is a hide pending?
    pub fn hide_pending(&self) -> bool {
        self.hide_task.is_pending()
    }

    /// Is a reposition pending?
    pub fn reposition_pending(&self) -> bool {
        self.reopen_task.is_pending()
    }

    /// Register a listener.
    pub fn listen(&mut self, kind: EventKind, cb: Listener) {
        self.listeners.listen(kind, cb);
    }

    /// Unregister a listener.
    pub fn unlisten(&mut self, kind: EventKind, cb: &Listener) -> Result<()> {
        self.listeners.unlisten(kind, cb)
    }

    /// Register a listener for a named event.
    pub fn listen_named(&mut self, name: &str, cb: Listener) -> Result<()> {
        self.listeners.listen_named(name, cb)
    }

    /// Unregister a listener for a named event.
    pub fn unlisten_named(&mut self, name: &str, cb: &Listener) -> Result<()> {
        self.listeners.unlisten_named(name, cb)
    }

    /// Number of listeners for a kind.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.count(kind)
    }

    /// Gather solver input for an anchor.
    fn measure<H>(&self, host: &H, anchor: NodeId, offset: i32) -> Result<PlacementInput>
    where
        H: Host + ?Sized,
    {
        Ok(PlacementInput {
            anchor: absolute_rect(host, anchor)?,
            overlay: host.size(self.root).ok_or(Error::UnknownNode)?,
            bounds: host.width_bounds(self.root),
            pointer: host.size(self.pointer).ok_or(Error::UnknownNode)?,
            viewport: viewport(host),
            offset,
            gap: self.config.gap,
            edge_margin: self.config.edge_margin,
        })
    }

    /// Show the overlay next to `anchor`, shifted horizontally by `offset`.
    ///
    /// If no side has room, or the anchor cannot be measured, the overlay stays
    /// hidden and closed, no listener fires, and `Placement::NoFit` is
    /// returned.
    pub fn show<H>(&mut self, host: &mut H, anchor: NodeId, offset: i32) -> Placement
    where
        H: Host + ?Sized,
    {
        self.hide_task.cancel();
        self.offset = offset;

        let placed = match self.measure(host, anchor, offset) {
            Ok(input) => place::solve(&input).solution().map(|s| (input, s)),
            Err(e) => {
                warn!("cannot measure anchor: {e}");
                None
            }
        };
        let Some((input, s)) = placed else {
            warn!("no room to place overlay");
            host.set_opacity(self.root, TRANSPARENT);
            self.reopen_task.cancel();
            self.anchor = None;
            self.state = State::Closed;
            return Placement::NoFit;
        };

        if self.config.debug {
            debug!(
                side = ?s.side,
                x = s.overlay.x,
                y = s.overlay.y,
                width = ?s.width,
                "placing overlay"
            );
        }
        host.set_position(self.root, s.overlay);
        host.set_width(self.root, s.width);
        host.set_visibility(self.root, Visibility::Visible);
        host.set_opacity(self.root, OPAQUE);
        host.set_pointer_direction(self.pointer, s.side.pointer_direction());
        host.set_position(self.pointer, s.pointer);

        self.last = Some(LastPlacement { input, solution: s });
        self.anchor = Some(anchor);
        self.state = State::Open;
        self.listeners.notify(&Notification::Opened);
        Placement::Solved(s)
    }

    /// Close the overlay programmatically.
    pub fn close<H>(&mut self, host: &mut H)
    where
        H: Host + ?Sized,
    {
        self.close_with(host, None, None);
    }

    /// Close the overlay, notifying listeners with the given payload.
    fn close_with<H>(&mut self, host: &mut H, value: Option<String>, click: Option<Click>)
    where
        H: Host + ?Sized,
    {
        self.reopen_task.cancel();
        self.hide_task
            .schedule(self.clock.now(), self.config.hide_delay(), ());
        host.set_opacity(self.root, TRANSPARENT);
        self.anchor = None;
        self.state = State::Closed;
        self.listeners
            .notify(&Notification::Closed(CloseEvent { value, click }));
    }

    /// Handle a click. Clicks on an action slot close the overlay, with the
    /// slot's label as the close value.
    pub fn click<H>(&mut self, host: &mut H, click: Click) -> Outcome
    where
        H: Host + ?Sized,
    {
        if !self.actions.contains(&click.target) {
            return Outcome::Ignore;
        }
        let value = host.label(click.target);
        if self.config.debug {
            debug!("action {value:?} clicked");
        }
        self.close_with(host, value, Some(click));
        Outcome::Handle
    }

    /// Re-place the overlay against its current anchor.
    pub fn update_position<H>(&mut self, host: &mut H) -> Result<Placement>
    where
        H: Host + ?Sized,
    {
        match (self.state, self.anchor) {
            (State::Open, Some(anchor)) => Ok(self.show(host, anchor, self.offset)),
            _ => Err(Error::IllegalState(
                "update_position requires an open overlay".into(),
            )),
        }
    }

    /// Handle a viewport movement signal. The overlay is blanked at once, and
    /// if it is open a reposition is scheduled for when movement settles.
    pub fn viewport_changed<H>(&mut self, host: &mut H, movement: Movement)
    where
        H: Host + ?Sized,
    {
        host.set_opacity(self.root, TRANSPARENT);
        if self.state == State::Open {
            let replaced =
                self.reopen_task
                    .schedule(self.clock.now(), self.config.settle_delay(), ());
            if self.config.debug {
                debug!(?movement, replaced, "reposition scheduled");
            }
        }
    }

    /// When the next scheduled task becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.hide_task.deadline(), self.reopen_task.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Run any scheduled tasks that are due.
    pub fn tick<H>(&mut self, host: &mut H) -> Result<()>
    where
        H: Host + ?Sized,
    {
        let now = self.clock.now();
        if self.hide_task.take_due(now).is_some() {
            host.set_visibility(self.root, Visibility::Hidden);
        }
        if self.reopen_task.take_due(now).is_some() {
            self.reposition(host)?;
        }
        Ok(())
    }

    /// Settle-time reposition. An anchor that can no longer be measured closes
    /// the overlay.
    fn reposition<H>(&mut self, host: &mut H) -> Result<()>
    where
        H: Host + ?Sized,
    {
        let Some(anchor) = self.anchor else {
            return Ok(());
        };
        if absolute_rect(&*host, anchor).is_err() {
            info!("anchor is gone, closing overlay");
            self.close(host);
            return Ok(());
        }
        self.update_position(host)?;
        Ok(())
    }

    /// Replace the heading.
    pub fn set_heading<H>(&mut self, host: &mut H, text: &str) -> Result<()>
    where
        H: Host + ?Sized,
    {
        host.set_content(self.heading, text)?;
        self.refresh_pointer(host)
    }

    /// Replace the body text.
    pub fn set_text<H>(&mut self, host: &mut H, text: &str) -> Result<()>
    where
        H: Host + ?Sized,
    {
        host.set_content(self.text, text)?;
        self.refresh_pointer(host)
    }

    /// Recompute the pointer against the overlay's current size. With no prior
    /// placement, the pointer is centered on the bottom edge. A pointer that
    /// cannot be represented leaves the old position in place.
    fn refresh_pointer<H>(&mut self, host: &mut H) -> Result<()>
    where
        H: Host + ?Sized,
    {
        let size = host.size(self.root).ok_or(Error::UnknownNode)?;
        let pos = match self.last.as_mut() {
            Some(last) => {
                last.input.overlay = size;
                let Some(pos) = place::repoint(&last.input, &last.solution) else {
                    return Ok(());
                };
                pos
            }
            None => {
                let pw = host.size(self.pointer).ok_or(Error::UnknownNode)?.w;
                let x = (i64::from(size.w) - i64::from(pw)) / 2;
                Point::new(
                    i32::try_from(x).unwrap_or_default(),
                    i32::try_from(size.h).unwrap_or(i32::MAX),
                )
            }
        };
        host.set_position(self.pointer, pos);
        Ok(())
    }
}
