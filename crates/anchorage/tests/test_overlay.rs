use std::{cell::RefCell, rc::Rc};

use anchorage::{surface::NodeStyle, *};
use proptest::prelude::*;

/// A surface with one overlay and one anchor.
struct Fixture {
    surface: Surface,
    overlay: Overlay,
    anchor: NodeId,
    actions: Vec<NodeId>,
    clock: ManualClock,
    events: Rc<RefCell<Vec<Notification>>>,
}

impl Fixture {
    fn new(anchor: Point) -> Result<Self> {
        let mut surface = Surface::new(Expanse::new(800, 600));
        let root = surface.add(Point::zero(), Expanse::new(300, 80));
        surface.add_child(root, Some(Role::Heading), Point::zero(), Expanse::new(300, 20))?;
        surface.add_child(root, Some(Role::Text), Point::zero(), Expanse::new(300, 40))?;
        surface.add_child(root, Some(Role::Pointer), Point::zero(), Expanse::new(10, 10))?;
        let bar = surface.add_child(root, None, Point::new(0, 60), Expanse::new(300, 20))?;
        let mut actions = vec![];
        for label in ["OK", "Cancel"] {
            let a = surface.add_child(bar, Some(Role::Action), Point::zero(), Expanse::new(60, 20))?;
            surface.set_label(a, label)?;
            actions.push(a);
        }
        let anchor = surface.add(anchor, Expanse::new(40, 20));

        let clock = ManualClock::new();
        let mut overlay = Overlay::new(&surface, root, Config::default())?.with_clock(clock.clone());
        let events = Rc::new(RefCell::new(vec![]));
        for kind in [EventKind::Opened, EventKind::Closed] {
            let e = events.clone();
            overlay.listen(kind, Rc::new(move |n: &Notification| e.borrow_mut().push(n.clone())));
        }
        Ok(Self {
            surface,
            overlay,
            anchor,
            actions,
            clock,
            events,
        })
    }

    fn style(&self) -> NodeStyle {
        self.surface
            .style(self.overlay.root())
            .cloned()
            .expect("overlay root exists")
    }

    fn opens(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|n| **n == Notification::Opened)
            .count()
    }

    fn advance(&mut self, ms: u64) -> Result<()> {
        self.clock.advance_ms(ms);
        self.overlay.tick(&mut self.surface)
    }
}

#[test]
fn show_above() -> Result<()> {
    let mut f = Fixture::new(Point::new(100, 500))?;
    let p = f.overlay.show(&mut f.surface, f.anchor, 0);
    let s = p.solution().expect("placed");
    assert_eq!(s.side, Side::Above);
    assert_eq!(f.surface.offset(f.overlay.root()), Some(Point::new(100, 400)));
    assert_eq!(f.surface.offset(f.overlay.pointer()), Some(Point::new(15, 80)));
    assert_eq!(
        f.surface.style(f.overlay.pointer()).and_then(|s| s.direction),
        Some(Direction::Down)
    );
    assert!(f.overlay.is_opened());
    assert_eq!(f.overlay.anchor(), Some(f.anchor));
    assert_eq!(f.style().opacity, 1.0);
    assert_eq!(f.style().visibility, Visibility::Visible);
    assert_eq!(f.style().width, Some(Width::Fit(300)));
    assert_eq!(*f.events.borrow(), vec![Notification::Opened]);
    Ok(())
}

#[test]
fn show_below() -> Result<()> {
    let mut f = Fixture::new(Point::new(100, 10))?;
    let s = f.overlay.show(&mut f.surface, f.anchor, 0).solution().expect("placed");
    assert_eq!(s.side, Side::Below);
    assert_eq!(s.overlay.y, 10 + 20 + 20);
    assert_eq!(
        f.surface.style(f.overlay.pointer()).and_then(|s| s.direction),
        Some(Direction::Up)
    );
    Ok(())
}

#[test]
fn nofit_stays_closed() -> Result<()> {
    let mut f = Fixture::new(Point::new(100, 50))?;
    f.surface.set_size(f.overlay.root(), Expanse::new(760, 590))?;
    assert_eq!(f.overlay.show(&mut f.surface, f.anchor, 0), Placement::NoFit);
    assert_eq!(f.overlay.state(), State::Closed);
    assert_eq!(f.overlay.anchor(), None);
    assert_eq!(f.style().opacity, 0.0);
    assert!(f.events.borrow().is_empty());
    Ok(())
}

#[test]
fn unmeasurable_anchor_is_nofit() -> Result<()> {
    let mut f = Fixture::new(Point::new(100, 500))?;
    f.surface.remove(f.anchor)?;
    assert_eq!(f.overlay.show(&mut f.surface, f.anchor, 0), Placement::NoFit);
    assert!(!f.overlay.is_opened());
    assert_eq!(f.opens(), 0);
    Ok(())
}

#[test]
fn close_hides_after_delay() -> Result<()> {
    let mut f = Fixture::new(Point::new(100, 500))?;
    f.overlay.show(&mut f.surface, f.anchor, 0);
    f.overlay.close(&mut f.surface);
    assert!(!f.overlay.is_opened());
    assert_eq!(f.overlay.anchor(), None);
    assert_eq!(f.style().opacity, 0.0);
    assert_eq!(f.style().visibility, Visibility::Visible);
    assert_eq!(
        f.events.borrow().last(),
        Some(&Notification::Closed(CloseEvent {
            value: None,
            click: None
        }))
    );

    f.advance(199)?;
    assert_eq!(f.style().visibility, Visibility::Visible);
    f.advance(1)?;
    assert_eq!(f.style().visibility, Visibility::Hidden);
    assert!(!f.overlay.hide_pending());
    Ok(())
}

#[test]
fn show_cancels_pending_hide() -> Result<()> {
    let mut f = Fixture::new(Point::new(100, 500))?;
    f.overlay.show(&mut f.surface, f.anchor, 0);
    f.overlay.close(&mut f.surface);
    f.advance(100)?;
    f.overlay.show(&mut f.surface, f.anchor, 0);
    assert!(!f.overlay.hide_pending());
    f.advance(500)?;
    assert!(f.overlay.is_opened());
    assert_eq!(f.style().visibility, Visibility::Visible);
    Ok(())
}

#[test]
fn action_click_closes_with_label() -> Result<()> {
    let mut f = Fixture::new(Point::new(100, 500))?;
    f.overlay.show(&mut f.surface, f.anchor, 0);

    let miss = Click {
        target: f.anchor,
        pos: Point::new(110, 505),
    };
    assert_eq!(f.overlay.click(&mut f.surface, miss), Outcome::Ignore);
    assert!(f.overlay.is_opened());

    let click = Click {
        target: f.actions[1],
        pos: Point::new(170, 470),
    };
    assert_eq!(f.overlay.click(&mut f.surface, click), Outcome::Handle);
    assert!(!f.overlay.is_opened());
    assert_eq!(
        f.events.borrow().last(),
        Some(&Notification::Closed(CloseEvent {
            value: Some("Cancel".into()),
            click: Some(click),
        }))
    );
    Ok(())
}

#[test]
fn update_position_requires_open() -> Result<()> {
    let mut f = Fixture::new(Point::new(100, 500))?;
    let before = f.style();
    let pos = f.surface.offset(f.overlay.root());
    assert!(matches!(
        f.overlay.update_position(&mut f.surface),
        Err(Error::IllegalState(_))
    ));
    assert_eq!(f.style(), before);
    assert_eq!(f.surface.offset(f.overlay.root()), pos);

    f.overlay.show(&mut f.surface, f.anchor, 0);
    f.surface.set_offset(f.anchor, Point::new(200, 300))?;
    let s = f.overlay.update_position(&mut f.surface)?.solution().expect("placed");
    assert_eq!(s.overlay, Point::new(200, 200));

    f.overlay.close(&mut f.surface);
    assert!(matches!(
        f.overlay.update_position(&mut f.surface),
        Err(Error::IllegalState(_))
    ));
    Ok(())
}

#[test]
fn update_position_keeps_offset() -> Result<()> {
    let mut f = Fixture::new(Point::new(100, 500))?;
    f.overlay.show(&mut f.surface, f.anchor, 25);
    let s = f.overlay.update_position(&mut f.surface)?.solution().expect("placed");
    assert_eq!(s.overlay.x, 125);
    Ok(())
}

#[test]
fn movement_settles_into_one_reposition() -> Result<()> {
    let mut f = Fixture::new(Point::new(100, 500))?;
    f.overlay.show(&mut f.surface, f.anchor, 0);
    assert_eq!(f.opens(), 1);

    f.overlay.viewport_changed(&mut f.surface, Movement::Resize);
    assert_eq!(f.style().opacity, 0.0);
    f.advance(100)?;
    f.overlay.viewport_changed(&mut f.surface, Movement::Scroll);
    f.advance(50)?;
    f.overlay.viewport_changed(&mut f.surface, Movement::Scroll);
    f.surface.set_offset(f.anchor, Point::new(150, 450))?;

    f.advance(199)?;
    assert_eq!(f.opens(), 1);
    assert_eq!(f.style().opacity, 0.0);
    f.advance(1)?;
    assert_eq!(f.opens(), 2);
    assert_eq!(f.style().opacity, 1.0);
    assert_eq!(f.surface.offset(f.overlay.root()), Some(Point::new(150, 350)));
    assert!(!f.overlay.reposition_pending());

    f.advance(1000)?;
    assert_eq!(f.opens(), 2);
    Ok(())
}

#[test]
fn movement_while_closed_only_blanks() -> Result<()> {
    let mut f = Fixture::new(Point::new(100, 500))?;
    f.overlay.viewport_changed(&mut f.surface, Movement::Resize);
    assert_eq!(f.style().opacity, 0.0);
    assert!(!f.overlay.reposition_pending());
    assert_eq!(f.overlay.next_deadline(), None);
    Ok(())
}

#[test]
fn close_cancels_pending_reposition() -> Result<()> {
    let mut f = Fixture::new(Point::new(100, 500))?;
    f.overlay.show(&mut f.surface, f.anchor, 0);
    f.overlay.viewport_changed(&mut f.surface, Movement::Scroll);
    f.overlay.close(&mut f.surface);
    f.advance(400)?;
    assert_eq!(f.opens(), 1);
    assert!(!f.overlay.is_opened());
    Ok(())
}

#[test]
fn vanished_anchor_closes() -> Result<()> {
    let mut f = Fixture::new(Point::new(100, 500))?;
    f.overlay.show(&mut f.surface, f.anchor, 0);
    f.overlay.viewport_changed(&mut f.surface, Movement::Scroll);
    f.surface.remove(f.anchor)?;
    f.advance(200)?;
    assert!(!f.overlay.is_opened());
    assert!(matches!(
        f.events.borrow().last(),
        Some(Notification::Closed(CloseEvent { value: None, .. }))
    ));
    assert!(f.overlay.hide_pending());
    Ok(())
}

#[test]
fn reposition_without_room_closes_quietly() -> Result<()> {
    let mut f = Fixture::new(Point::new(100, 500))?;
    f.overlay.show(&mut f.surface, f.anchor, 0);
    f.overlay.viewport_changed(&mut f.surface, Movement::Resize);
    f.surface.set_size(f.overlay.root(), Expanse::new(760, 590))?;
    f.advance(200)?;

    // Same outcome as a show with no room: closed and blanked, with no close
    // notification and no hide scheduled.
    assert_eq!(f.overlay.state(), State::Closed);
    assert_eq!(f.overlay.anchor(), None);
    assert_eq!(*f.events.borrow(), vec![Notification::Opened]);
    assert!(!f.overlay.hide_pending());
    assert_eq!(f.overlay.next_deadline(), None);
    assert_eq!(f.style().opacity, 0.0);
    assert_eq!(f.style().visibility, Visibility::Visible);
    Ok(())
}

#[test]
fn out_of_range_offset_is_nofit() -> Result<()> {
    let mut f = Fixture::new(Point::new(100, 500))?;
    assert_eq!(
        f.overlay.show(&mut f.surface, f.anchor, i32::MIN),
        Placement::NoFit
    );
    assert_eq!(f.overlay.state(), State::Closed);
    assert_eq!(f.opens(), 0);

    // Large positive offsets are pulled back by the right-edge shift.
    let s = f.overlay.show(&mut f.surface, f.anchor, i32::MAX).solution().expect("placed");
    assert_eq!(s.overlay, Point::new(485, 400));
    assert!(f.overlay.is_opened());
    Ok(())
}

#[test]
fn listener_removal() -> Result<()> {
    let mut f = Fixture::new(Point::new(100, 500))?;
    let cb: Listener = Rc::new(|_: &Notification| {});
    let before = f.overlay.listener_count(EventKind::Opened);
    f.overlay.listen(EventKind::Opened, cb.clone());
    f.overlay.unlisten(EventKind::Opened, &cb)?;
    assert_eq!(f.overlay.listener_count(EventKind::Opened), before);
    assert_eq!(
        f.overlay.unlisten(EventKind::Opened, &cb),
        Err(Error::UnknownCallback)
    );
    assert!(matches!(
        f.overlay.listen_named("overlay:hovered", cb),
        Err(Error::UnknownEvent(_))
    ));
    Ok(())
}

#[test]
fn text_refreshes_pointer() -> Result<()> {
    let mut f = Fixture::new(Point::new(500, 100))?;
    f.surface.set_size(f.overlay.root(), Expanse::new(300, 500))?;
    f.surface.set_window(Expanse::new(900, 550));
    let s = f.overlay.show(&mut f.surface, f.anchor, 0).solution().expect("placed");
    assert_eq!(s.side, Side::Left);
    assert_eq!(f.surface.offset(f.overlay.pointer()), Some(Point::new(0, 245)));

    f.surface.set_size(f.overlay.root(), Expanse::new(300, 200))?;
    f.overlay.set_text(&mut f.surface, "Shorter now")?;
    assert_eq!(f.surface.offset(f.overlay.pointer()), Some(Point::new(0, 95)));
    Ok(())
}

/// Operations for the state machine property test.
#[derive(Debug, Clone)]
enum Op {
    Show(i32),
    Close,
    Click(usize),
    Move,
    Update,
    Advance(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-50i32..50).prop_map(Op::Show),
        Just(Op::Close),
        (0usize..2).prop_map(Op::Click),
        Just(Op::Move),
        Just(Op::Update),
        (0u64..400).prop_map(Op::Advance),
    ]
}

proptest! {
    #[test]
    fn state_invariants(ops in prop::collection::vec(op(), 1..60)) {
        let mut f = Fixture::new(Point::new(100, 500)).expect("fixture");
        for op in ops {
            match op {
                Op::Show(offset) => {
                    f.overlay.show(&mut f.surface, f.anchor, offset);
                    prop_assert!(!f.overlay.hide_pending());
                }
                Op::Close => f.overlay.close(&mut f.surface),
                Op::Click(i) => {
                    let click = Click { target: f.actions[i], pos: Point::zero() };
                    f.overlay.click(&mut f.surface, click);
                }
                Op::Move => f.overlay.viewport_changed(&mut f.surface, Movement::Scroll),
                Op::Update => {
                    let open = f.overlay.is_opened();
                    prop_assert_eq!(f.overlay.update_position(&mut f.surface).is_ok(), open);
                }
                Op::Advance(ms) => f.advance(ms).expect("tick"),
            }
            prop_assert_eq!(f.overlay.anchor().is_some(), f.overlay.is_opened());
            if f.overlay.is_opened() {
                prop_assert!(!f.overlay.hide_pending());
                prop_assert_eq!(f.style().visibility, Visibility::Visible);
            } else {
                prop_assert!(!f.overlay.reposition_pending());
            }
        }
    }
}
