//! Integer offsets and axis-aligned rectangles in canvas coordinates

use std::fmt;
use std::ops::{Add, Neg, Sub};

/// Signed pixel offset, either relative between two slices or absolute on a canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Offset {
    /// Horizontal component, positive to the right
    pub x: i64,
    /// Vertical component, positive downwards
    pub y: i64,
}

impl Offset {
    /// The zero offset
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create an offset from its components
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean length, used to rank equally good alignments
    pub const fn magnitude_squared(self) -> i64 {
        self.x * self.x + self.y * self.y
    }

    /// Largest per-axis distance to another offset
    pub fn chebyshev_distance(self, other: Self) -> u64 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

impl Add for Offset {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Offset {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Offset {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Rectangle with a signed origin and unsigned size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Top-left corner
    pub origin: Offset,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Create a rectangle at `origin`
    pub const fn new(origin: Offset, width: u32, height: u32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Exclusive right edge
    pub const fn right(&self) -> i64 {
        self.origin.x + self.width as i64
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> i64 {
        self.origin.y + self.height as i64
    }

    /// Number of pixels covered
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Shared region of two rectangles, if they overlap by at least one pixel
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let left = self.origin.x.max(other.origin.x);
        let top = self.origin.y.max(other.origin.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        (right > left && bottom > top).then(|| {
            Self::new(
                Offset::new(left, top),
                (right - left) as u32,
                (bottom - top) as u32,
            )
        })
    }

    /// Test whether `other` lies entirely inside this rectangle
    pub const fn contains(&self, other: &Self) -> bool {
        other.origin.x >= self.origin.x
            && other.origin.y >= self.origin.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Smallest rectangle enclosing every rectangle in `rects`
    ///
    /// Returns `None` for an empty iterator.
    pub fn bounding_box<I>(rects: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        let mut iter = rects.into_iter();
        let first = iter.next()?;
        let (mut left, mut top, mut right, mut bottom) =
            (first.origin.x, first.origin.y, first.right(), first.bottom());

        for rect in iter {
            left = left.min(rect.origin.x);
            top = top.min(rect.origin.y);
            right = right.max(rect.right());
            bottom = bottom.max(rect.bottom());
        }

        Some(Self::new(
            Offset::new(left, top),
            (right - left) as u32,
            (bottom - top) as u32,
        ))
    }
}
