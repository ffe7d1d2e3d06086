use super::{Point, Rect};

/// An `Expanse` is a rectangle that has a width and height but no location.
/// Element sizes and viewport extents are both expressed this way.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Expanse {
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl Expanse {
    /// Construct a new expanse.
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    /// Take the larger of two expanses, independently on each axis.
    pub fn max(&self, other: Self) -> Self {
        Self {
            w: self.w.max(other.w),
            h: self.h.max(other.h),
        }
    }

    /// Return a `Rect` with these dimensions, located at `tl`.
    pub fn at(&self, tl: Point) -> Rect {
        Rect {
            tl,
            w: self.w,
            h: self.h,
        }
    }
}

impl From<(u32, u32)> for Expanse {
    fn from(v: (u32, u32)) -> Self {
        Self { w: v.0, h: v.1 }
    }
}
