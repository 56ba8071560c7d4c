//! Run controller.
//!
//! This module ties together:
//! - The finite-volume solver (one CFL-limited step at a time)
//! - Gauges (sampled after every committed step)
//! - Output frames at uniformly spaced times
//! - Diagnostics and progress events
//!
//! # Example
//! ```
//! use euler_fv::boundary::BoundaryConditions;
//! use euler_fv::equations::{Euler1D, Primitives};
//! use euler_fv::flux::HllEntropyFix;
//! use euler_fv::gauges::{GaugeRecorder, pressure_gauge};
//! use euler_fv::mesh::Grid1D;
//! use euler_fv::simulation::{Controller, ControllerConfig};
//! use euler_fv::solver::{EulerSolution, FiniteVolumeSolver, SolverConfig};
//!
//! let grid = Grid1D::new(0.0, 1.0, 100).unwrap();
//! let q = EulerSolution::from_primitives(&grid, Euler1D::air(), |x| {
//!     if x < 0.5 { Primitives::new(1.0, 0.0, 1.0) } else { Primitives::new(0.125, 0.0, 0.1) }
//! }).unwrap();
//! let solver = FiniteVolumeSolver::new(
//!     HllEntropyFix::default(),
//!     BoundaryConditions::extrapolation(),
//!     SolverConfig::default(),
//! ).unwrap();
//! let gauges = GaugeRecorder::new(&grid, &[0.8], pressure_gauge()).unwrap();
//!
//! let mut controller = Controller::new(grid, q, solver, gauges, ControllerConfig::new(0.2)).unwrap();
//! let summary = controller.run().unwrap();
//! assert_eq!(summary.n_frames, 11);
//! assert!(summary.primary_gauge_max.unwrap() >= 0.1);
//! ```

mod runner;

pub use runner::{Controller, ControllerConfig, RunSummary};
