//! **tilepath-core**: geometry and grid types shared by the *tilepath*
//! crates.
//!
//! This crate provides tile coordinates ([`Point`]), rectangular map bounds
//! ([`Range`]), the eight step [`Direction`]s and a dense per-tile layer
//! ([`Grid`]).

pub mod geom;
pub mod grid;

pub use geom::{Direction, Point, Range, RangeIter};
pub use grid::Grid;
