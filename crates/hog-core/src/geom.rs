use core::fmt;

/// Integer extent in pixels.
///
/// Host-side pairs arrive as `(height, width)`; use [`Size2::from_hw`] to
/// build from that ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Size2 {
    pub width: usize,
    pub height: usize,
}

impl Size2 {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub const fn from_hw(height: usize, width: usize) -> Self {
        Self { width, height }
    }

    pub fn area(self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Componentwise product, `None` on overflow.
    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        Some(Self {
            width: self.width.checked_mul(rhs.width)?,
            height: self.height.checked_mul(rhs.height)?,
        })
    }

    /// Componentwise difference, `None` if either component would underflow.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        Some(Self {
            width: self.width.checked_sub(rhs.width)?,
            height: self.height.checked_sub(rhs.height)?,
        })
    }

    /// True if both components are exact multiples of `rhs`.
    pub fn is_multiple_of(self, rhs: Self) -> bool {
        rhs.width != 0
            && rhs.height != 0
            && self.width.is_multiple_of(rhs.width)
            && self.height.is_multiple_of(rhs.height)
    }
}

impl fmt::Display for Size2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
