//! Ready-made problem setups.
//!
//! - [`ForceFieldProblem`]: blast wave released toward a pressure gauge
//! - [`ShockTube`]: two-state Riemann problems with exact solutions

mod force_field;
mod shock_tube;

pub use force_field::{ForceFieldProblem, PROTECTED_VELOCITY_ZONE, Perturbation};
pub use shock_tube::ShockTube;
