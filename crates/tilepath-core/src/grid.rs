//! A dense per-tile layer, [`Grid<T>`].
//!
//! Maps keep their terrain, road and occupancy layers in grids; the search
//! crate reads them through its collaborator traits and never writes them.

use crate::geom::{Point, Range};

/// A rectangular layer holding one `T` per tile, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid<T> {
    bounds: Range,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Create a grid covering `bounds`, every tile set to `value`.
    pub fn new(bounds: Range, value: T) -> Self {
        Self {
            bounds,
            cells: vec![value; bounds.len()],
        }
    }

    /// Set every tile to `value`.
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}

impl<T> Grid<T> {
    /// Create a grid covering `bounds` by calling `f` for every tile in
    /// row-major order.
    pub fn from_fn(bounds: Range, f: impl FnMut(Point) -> T) -> Self {
        Self {
            bounds,
            cells: bounds.iter().map(f).collect(),
        }
    }

    /// The tiles covered by this grid.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Whether `p` is covered by this grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    /// The value at `p`, or `None` off the grid.
    #[inline]
    pub fn at(&self, p: Point) -> Option<&T> {
        self.bounds.index_of(p).map(|i| &self.cells[i])
    }

    /// Mutable access to the value at `p`, or `None` off the grid.
    #[inline]
    pub fn at_mut(&mut self, p: Point) -> Option<&mut T> {
        self.bounds.index_of(p).map(|i| &mut self.cells[i])
    }

    /// Replace the value at `p`. Returns the old value, or `None` (and
    /// drops `value`) when `p` is off the grid.
    pub fn set(&mut self, p: Point, value: T) -> Option<T> {
        let slot = self.at_mut(p)?;
        Some(std::mem::replace(slot, value))
    }

    /// Iterate over `(point, value)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &T)> {
        self.bounds.iter().zip(self.cells.iter())
    }

    /// Points whose value satisfies `pred`, in row-major order.
    pub fn positions(&self, mut pred: impl FnMut(&T) -> bool) -> Vec<Point> {
        self.iter()
            .filter(|(_, v)| pred(v))
            .map(|(p, _)| p)
            .collect()
    }
}
