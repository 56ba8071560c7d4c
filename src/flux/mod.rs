//! Numerical flux functions.
//!
//! Provides approximate Riemann solvers for the finite-volume update:
//! - HLL with entropy fix (default)
//! - Rusanov / local Lax-Friedrichs
//!
//! # Riemann Solver Trait
//!
//! The [`RiemannSolver`] trait is the seam between the finite-volume solver
//! and the interface flux. Custom solvers plug in through it; the built-in
//! ones are available as concrete types, as the [`StandardRiemannSolver`]
//! enum for zero-cost dispatch, or boxed via [`create_riemann_solver`].

mod hll;
mod rusanov;
pub mod traits;

pub use hll::{DEFAULT_MIN_SPREAD, HllEntropyFix, einfeldt_speeds, hll_flux_euler};
pub use rusanov::{Rusanov, rusanov_flux_euler};

pub use traits::{
    BoxedRiemannSolver, FluxContext, InterfaceFlux, RiemannSolver, StandardRiemannSolver,
    create_riemann_solver,
};
