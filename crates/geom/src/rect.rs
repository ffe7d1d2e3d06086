use super::{Expanse, Point};

/// A rectangle with a signed origin.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Rect {
    /// Top-left corner
    pub tl: Point,
    /// Width
    pub w: u32,
    /// Height
    pub h: u32,
}

impl Rect {
    /// Construct a rectangle from an origin and a size.
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self {
            tl: Point { x, y },
            w,
            h,
        }
    }

    /// The left edge.
    pub fn left(&self) -> i32 {
        self.tl.x
    }

    /// The top edge.
    pub fn top(&self) -> i32 {
        self.tl.y
    }

    /// The right edge. Exclusive.
    pub fn right(&self) -> i32 {
        self.tl.x.saturating_add_unsigned(self.w)
    }

    /// The bottom edge. Exclusive.
    pub fn bottom(&self) -> i32 {
        self.tl.y.saturating_add_unsigned(self.h)
    }

    /// The size of this rectangle without its location.
    pub fn expanse(&self) -> Expanse {
        Expanse::new(self.w, self.h)
    }
}
