//! Unified geometry primitives and helpers.
//! Integer fields mirror Win32 RECT/POINT semantics (pixels, y grows down).

/// A point in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate, growing downward.
    pub y: i32,
}

/// A width/height pair in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Extent {
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
}

/// An axis-aligned rectangle: origin plus extent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
}

impl Rect {
    /// Build a rect from an origin and extent.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// The rect's extent.
    #[inline]
    #[must_use]
    pub const fn extent(self) -> Extent {
        Extent {
            w: self.w,
            h: self.h,
        }
    }

    /// The exclusive right edge.
    #[inline]
    #[must_use]
    pub const fn right(self) -> i32 {
        self.x + self.w
    }

    /// The exclusive bottom edge.
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> i32 {
        self.y + self.h
    }

    /// True when `p` lies inside the rect (right/bottom edges exclusive).
    #[inline]
    #[must_use]
    pub fn contains(self, p: Pos) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// A rect of extent `inner` centered within `self`.
    #[must_use]
    pub fn center(self, inner: Extent) -> Self {
        Self {
            x: self.x + (self.w - inner.w) / 2,
            y: self.y + (self.h - inner.h) / 2,
            w: inner.w,
            h: inner.h,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_excludes_far_edges() {
        let r = Rect::new(10, 10, 100, 50);
        assert!(r.contains(Pos { x: 10, y: 10 }));
        assert!(r.contains(Pos { x: 109, y: 59 }));
        assert!(!r.contains(Pos { x: 110, y: 30 }));
        assert!(!r.contains(Pos { x: 50, y: 60 }));
        assert!(!r.contains(Pos { x: 9, y: 30 }));
    }

    #[test]
    fn center_splits_margins() {
        let host = Rect::new(0, 0, 1920, 1080);
        let c = host.center(Extent { w: 800, h: 600 });
        assert_eq!(c, Rect::new(560, 240, 800, 600));
    }
}
