//! Grid representation.
//!
//! Provides the uniform 1D cell partition used by the finite-volume solver.

mod mesh1d;

pub use mesh1d::{BoundaryFace, Grid1D};
