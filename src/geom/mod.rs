//! Geometric primitives and the spatial algebra used by the analysis passes.

mod rect;

pub use rect::{Point, Rect};
