//! Runtime diagnostics and progress tracking.
//!
//! - [`EulerDiagnostics`]: Conservation and bound diagnostics
//! - [`DiagnosticsTracker`]: Initial-vs-current tracking
//! - [`ProgressReporter`]: Progress events through `tracing`

#[allow(clippy::module_inception)]
mod diagnostics;

pub use diagnostics::{DiagnosticsTracker, EulerDiagnostics, ProgressReporter, format_duration};
