//! Point gauges recording derived quantities over time.
//!
//! A gauge is a fixed sampling point in the domain. After every committed step the
//! [`GaugeRecorder`] evaluates a user-supplied quantity function at each
//! gauge and appends a [`GaugeSample`] to its history. Gauge histories are
//! therefore sampled at the solver's internal step cadence, not at the
//! output frames.
//!
//! # Example
//!
//! ```
//! use euler_fv::equations::Euler1D;
//! use euler_fv::gauges::{GaugeRecorder, pressure_gauge};
//! use euler_fv::mesh::Grid1D;
//! use euler_fv::solver::{EulerSolution, EulerState};
//!
//! let grid = Grid1D::new(0.0, 10.0, 100).unwrap();
//! let eq = Euler1D::air();
//! let q = EulerSolution::uniform(100, EulerState::from_primitives(1.0, 0.0, 1.0, 1.4), eq).unwrap();
//!
//! let mut recorder = GaugeRecorder::new(&grid, &[9.0], pressure_gauge()).unwrap();
//! recorder.record(&q, &grid, 0.0).unwrap();
//! assert!((recorder.max_value(0, 0).unwrap() - 1.0).abs() < 1e-12);
//! ```

mod recorder;

pub use recorder::{
    Gauge, GaugeFn, GaugeInterpolation, GaugeQuantity, GaugeRecorder, GaugeSample,
    density_pressure_gauge, pressure_gauge, primitive_gauge,
};
