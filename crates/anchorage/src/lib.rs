//! Anchored overlay placement.
//!
//! An [`Overlay`] is a floating panel that is positioned next to an external
//! anchor node. Placement is chosen among four candidate sides by
//! [`place::solve`], and the overlay keeps itself in place as the viewport
//! scrolls or resizes by re-solving once movement settles.
//!
//! The overlay never talks to a rendering system directly. It reads and writes
//! through the collaborator traits in [`host`], and [`surface::Surface`] is an
//! in-memory implementation of those traits.

pub mod config;
pub mod error;
pub mod host;
pub mod listeners;
pub mod node;
pub mod overlay;
pub mod place;
pub mod surface;
pub mod task;

pub use anchorage_geom as geom;
pub use config::Config;
pub use error::{Error, Result};
pub use geom::{Direction, Expanse, Point, Rect};
pub use host::{Geometry, Host, Structure, Style, Visibility, WidthBounds};
pub use listeners::{CloseEvent, EventKind, Listener, ListenerRegistry, Notification};
pub use node::{NodeId, Role};
pub use overlay::{Click, Movement, Outcome, Overlay, State};
pub use place::{Placement, PlacementInput, Side, Solution, Width};
pub use surface::Surface;
pub use task::{Clock, ManualClock, ScheduledTask, SystemClock};
