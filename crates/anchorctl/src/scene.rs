//! Scene files: a viewport, an anchor, an overlay, and a script of steps.

use std::{cell::RefCell, rc::Rc};

use anchorage::{
    Click, Config, EventKind, Expanse, Geometry, ManualClock, Movement, NodeId, Notification,
    Overlay, Placement, PlacementInput, Point, Rect, Role, Side, Surface, Visibility, Width,
    WidthBounds, host, place,
};
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// A width and height.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Size {
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl From<Size> for Expanse {
    fn from(s: Size) -> Self {
        Self::new(s.w, s.h)
    }
}

/// A positioned box.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Bounds {
    /// Page x.
    pub x: i32,
    /// Page y.
    pub y: i32,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

/// One scripted step of a session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Show against the anchor.
    Show {
        /// Horizontal offset.
        #[serde(default)]
        offset: i32,
    },
    /// Close programmatically.
    Close,
    /// Click the action with this index.
    Click {
        /// Action index.
        action: usize,
    },
    /// Resize the window.
    Resize {
        /// New width.
        w: u32,
        /// New height.
        h: u32,
    },
    /// Scroll signal.
    Scroll,
    /// Move the anchor.
    MoveAnchor {
        /// New page x.
        x: i32,
        /// New page y.
        y: i32,
    },
    /// Remove the anchor from the surface.
    RemoveAnchor,
    /// Let time pass and run due tasks.
    Advance {
        /// Milliseconds.
        ms: u64,
    },
    /// Re-place against the bound anchor.
    Update,
    /// Replace the heading.
    Heading {
        /// New heading.
        text: String,
    },
    /// Replace the body text.
    Text {
        /// New text.
        text: String,
    },
}

/// A scene file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scene {
    /// Window viewport box.
    pub window: Size,
    /// Document content box.
    #[serde(default)]
    pub document: Size,
    /// The anchor's page geometry.
    pub anchor: Bounds,
    /// The overlay's natural size.
    pub overlay: Size,
    /// The pointer indicator's size.
    #[serde(default = "default_pointer")]
    pub pointer: Size,
    /// Overlay width limits.
    #[serde(default)]
    pub bounds: WidthBounds,
    /// Action labels.
    #[serde(default = "default_actions")]
    pub actions: Vec<String>,
    /// Overlay configuration.
    #[serde(default)]
    pub config: Config,
    /// Session script.
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Default pointer size.
fn default_pointer() -> Size {
    Size { w: 10, h: 10 }
}

/// Default action labels.
fn default_actions() -> Vec<String> {
    vec!["OK".into()]
}

/// A placement as printed.
#[derive(Debug, Serialize)]
pub struct PlacementReport {
    /// Chosen side, or none for no fit.
    pub side: Option<Side>,
    /// Overlay origin.
    pub overlay: Option<[i32; 2]>,
    /// Pointer origin relative to the overlay.
    pub pointer: Option<[i32; 2]>,
    /// Resolved width.
    pub width: Option<Width>,
}

impl From<Placement> for PlacementReport {
    fn from(p: Placement) -> Self {
        let s = p.solution();
        Self {
            side: s.map(|s| s.side),
            overlay: s.map(|s| [s.overlay.x, s.overlay.y]),
            pointer: s.map(|s| [s.pointer.x, s.pointer.y]),
            width: s.map(|s| s.width),
        }
    }
}

/// Overlay state after a session step.
#[derive(Debug, Serialize)]
pub struct StepReport {
    /// Step index.
    pub step: usize,
    /// Whether the overlay is open.
    pub open: bool,
    /// Overlay root position.
    pub position: Option<[i32; 2]>,
    /// Overlay opacity.
    pub opacity: f32,
    /// Overlay display state.
    pub visibility: Visibility,
    /// Events emitted during the step.
    pub events: Vec<String>,
    /// Error from the step, if it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Format a notification for output.
fn describe(n: &Notification) -> String {
    match n {
        Notification::Opened => EventKind::Opened.to_string(),
        Notification::Closed(e) => match &e.value {
            Some(v) => format!("{} {v}", EventKind::Closed),
            None => EventKind::Closed.to_string(),
        },
    }
}

impl Scene {
    /// The viewport this scene describes.
    fn surface(&self) -> Surface {
        let mut s = Surface::new(self.window.into());
        s.set_document(self.document.into());
        s
    }

    /// Solve the placement directly.
    pub fn place(&self) -> PlacementReport {
        let s = self.surface();
        let input = PlacementInput {
            anchor: Rect::new(self.anchor.x, self.anchor.y, self.anchor.w, self.anchor.h),
            overlay: self.overlay.into(),
            bounds: self.bounds,
            pointer: self.pointer.into(),
            viewport: host::viewport(&s),
            offset: 0,
            gap: self.config.gap,
            edge_margin: self.config.edge_margin,
        };
        place::solve(&input).into()
    }

    /// Build the overlay tree, returning its root.
    fn build(&self, s: &mut Surface) -> anchorage::Result<NodeId> {
        let root = s.add(Point::zero(), self.overlay.into());
        s.set_bounds(root, self.bounds)?;
        let w = self.overlay.w;
        s.add_child(root, Some(Role::Heading), Point::zero(), Expanse::new(w, 0))?;
        s.add_child(root, Some(Role::Text), Point::zero(), Expanse::new(w, 0))?;
        s.add_child(root, Some(Role::Pointer), Point::zero(), self.pointer.into())?;
        for label in &self.actions {
            let a = s.add_child(root, Some(Role::Action), Point::zero(), Expanse::new(0, 0))?;
            s.set_label(a, label)?;
        }
        Ok(root)
    }

    /// Replay the scripted steps.
    pub fn session(&self) -> Result<Vec<StepReport>> {
        let mut s = self.surface();
        let root = self.build(&mut s)?;
        let anchor = s.add(
            Point::new(self.anchor.x, self.anchor.y),
            Expanse::new(self.anchor.w, self.anchor.h),
        );

        let clock = ManualClock::new();
        let mut overlay = Overlay::new(&s, root, self.config.clone())?.with_clock(clock.clone());
        let log = Rc::new(RefCell::new(vec![]));
        for kind in [EventKind::Opened, EventKind::Closed] {
            let log = log.clone();
            overlay.listen(
                kind,
                Rc::new(move |n: &Notification| log.borrow_mut().push(describe(n))),
            );
        }

        let mut reports = vec![];
        for (i, step) in self.steps.iter().enumerate() {
            let res = self.step(&mut s, &mut overlay, &clock, anchor, step);
            let style = s.style(root).cloned().unwrap_or_default();
            reports.push(StepReport {
                step: i,
                open: overlay.is_opened(),
                position: s.offset(root).map(|p| [p.x, p.y]),
                opacity: style.opacity,
                visibility: style.visibility,
                events: log.borrow_mut().drain(..).collect(),
                error: res.err().map(|e| e.to_string()),
            });
        }
        Ok(reports)
    }

    /// Run one step.
    fn step(
        &self,
        s: &mut Surface,
        overlay: &mut Overlay,
        clock: &ManualClock,
        anchor: NodeId,
        step: &Step,
    ) -> Result<()> {
        match step {
            Step::Show { offset } => {
                overlay.show(s, anchor, *offset);
            }
            Step::Close => overlay.close(s),
            Step::Click { action } => {
                let Some(target) = overlay.actions().get(*action).copied() else {
                    bail!("no action {action}");
                };
                overlay.click(
                    s,
                    Click {
                        target,
                        pos: Point::zero(),
                    },
                );
            }
            Step::Resize { w, h } => {
                s.set_window(Expanse::new(*w, *h));
                overlay.viewport_changed(s, Movement::Resize);
            }
            Step::Scroll => overlay.viewport_changed(s, Movement::Scroll),
            Step::MoveAnchor { x, y } => s.set_offset(anchor, Point::new(*x, *y))?,
            Step::RemoveAnchor => s.remove(anchor)?,
            Step::Advance { ms } => {
                clock.advance_ms(*ms);
                overlay.tick(s)?;
            }
            Step::Update => {
                overlay.update_position(s)?;
            }
            Step::Heading { text } => overlay.set_heading(s, text)?,
            Step::Text { text } => overlay.set_text(s, text)?,
        }
        Ok(())
    }
}
