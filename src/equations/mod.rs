//! Conservation law definitions.
//!
//! Provides the ideal-gas Euler system
//!
//! ∂q/∂t + ∂f(q)/∂x = 0,  q = (ρ, ρu, E)
//!
//! and the exact Riemann solution used as a reference for verification.

mod euler;
mod exact_riemann;

pub use euler::{Euler1D, Primitives};
pub use exact_riemann::ExactRiemannSolver;
