//! # euler-fv
//!
//! A finite-volume solver for the one-dimensional compressible Euler
//! equations of an ideal gas.
//!
//! This crate provides:
//! - Ideal-gas equation of state and the exact Riemann solution
//! - Approximate Riemann solvers (HLL with entropy fix, Rusanov)
//! - First-order Godunov and MUSCL-Hancock finite-volume steps with
//!   CFL-limited time steps and atomic rollback of rejected steps
//! - Extrapolating and reflective boundary conditions
//! - Point gauges sampled after every step
//! - A run controller producing output frames and gauge maxima
//! - Ready-made problems (blast wave toward a pressure gauge, shock tubes)

pub mod boundary;
pub mod equations;
pub mod error;
pub mod flux;
pub mod gauges;
pub mod mesh;
pub mod problems;
pub mod simulation;
pub mod solver;

// Re-export main types for convenience
pub use boundary::{BoundaryConditions, EulerBoundaryCondition, Extrapolation, Reflective};
pub use equations::{Euler1D, ExactRiemannSolver, Primitives};
pub use error::{EulerError, Result, Site};
pub use flux::{
    HllEntropyFix, InterfaceFlux, RiemannSolver, Rusanov, StandardRiemannSolver,
    create_riemann_solver, hll_flux_euler, rusanov_flux_euler,
};
pub use gauges::{Gauge, GaugeQuantity, GaugeRecorder, GaugeSample, pressure_gauge};
pub use mesh::Grid1D;
pub use problems::{ForceFieldProblem, ShockTube};
pub use simulation::{Controller, ControllerConfig, RunSummary};
pub use solver::{
    EulerSolution, EulerState, FiniteVolumeSolver, Reconstruction, SlopeLimiter, Snapshot,
    SolverConfig, StepReport,
};
