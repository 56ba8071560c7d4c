//! Finite-volume solver components.
//!
//! # Submodules
//!
//! - [`state`]: Conserved state types (EulerState, EulerSolution, Snapshot)
//! - [`fv`]: The explicit finite-volume stepper
//! - [`reconstruction`]: MUSCL-Hancock reconstruction and slope limiters
//! - [`diagnostics`]: Runtime diagnostics and progress tracking

pub mod diagnostics;
pub mod fv;
pub mod reconstruction;
pub mod state;

// Re-export state types
pub use state::{EulerSolution, EulerState, Snapshot};

// Re-export the stepper
pub use fv::{FiniteVolumeSolver, SolverConfig, SolverPhase, StepReport};

// Re-export reconstruction
pub use reconstruction::{FaceStates, Reconstruction, SlopeLimiter};

// Re-export diagnostics
pub use diagnostics::{DiagnosticsTracker, EulerDiagnostics, ProgressReporter};
