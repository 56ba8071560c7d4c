//! Physical state types for the Euler equations.

mod euler_1d;

pub(crate) use euler_1d::check_cells;
pub use euler_1d::{EulerSolution, EulerState, Snapshot};
