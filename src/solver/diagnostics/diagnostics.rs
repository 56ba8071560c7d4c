//! Runtime diagnostics for 1D Euler simulations.
//!
//! Provides functions and types for computing and tracking:
//! - Conservation quantities (mass, momentum, energy)
//! - Courant number
//! - Solution bounds (density, pressure, velocity, Mach number)
//! - Progress reporting for long simulations
//!
//! # Example
//!
//! ```
//! use euler_fv::equations::Euler1D;
//! use euler_fv::mesh::Grid1D;
//! use euler_fv::solver::{DiagnosticsTracker, EulerDiagnostics, EulerSolution, EulerState};
//!
//! let grid = Grid1D::new(0.0, 1.0, 10).unwrap();
//! let eq = Euler1D::air();
//! let q = EulerSolution::uniform(10, EulerState::from_primitives(1.0, 0.0, 1.0, 1.4), eq).unwrap();
//!
//! let diag = EulerDiagnostics::compute(&q, &grid, 0.01);
//! assert!((diag.total_mass - 1.0).abs() < 1e-12);
//!
//! let mut tracker = DiagnosticsTracker::new(diag.clone());
//! tracker.update(0.01, diag);
//! assert!(tracker.mass_error() < 1e-14);
//! println!("{}", tracker.summary());
//! ```

use std::time::Instant;

use tracing::info;

use crate::mesh::Grid1D;
use crate::solver::EulerSolution;

/// Diagnostic quantities for the 1D Euler equations.
#[derive(Clone, Debug, PartialEq)]
pub struct EulerDiagnostics {
    /// Total mass (Σ ρ_i dx)
    pub total_mass: f64,
    /// Total momentum (Σ (ρu)_i dx)
    pub total_momentum: f64,
    /// Total energy (Σ E_i dx)
    pub total_energy: f64,
    /// Minimum cell density
    pub min_density: f64,
    /// Maximum cell density
    pub max_density: f64,
    /// Minimum cell pressure
    pub min_pressure: f64,
    /// Maximum cell pressure
    pub max_pressure: f64,
    /// Maximum |u|
    pub max_velocity: f64,
    /// Maximum Mach number |u|/c
    pub max_mach: f64,
    /// Courant number max(|u| + c) dt / dx
    pub courant: f64,
}

impl EulerDiagnostics {
    /// Compute all diagnostics from the current solution.
    ///
    /// # Arguments
    /// * `solution` - Current cell averages
    /// * `grid` - Uniform grid (supplies dx)
    /// * `dt` - Current time step (for the Courant number)
    pub fn compute(solution: &EulerSolution, grid: &Grid1D, dt: f64) -> Self {
        let eq = solution.equation();
        let dx = grid.dx();

        let mut total_mass = 0.0;
        let mut total_momentum = 0.0;
        let mut total_energy = 0.0;
        let mut min_density = f64::MAX;
        let mut max_density = f64::MIN;
        let mut min_pressure = f64::MAX;
        let mut max_pressure = f64::MIN;
        let mut max_velocity: f64 = 0.0;
        let mut max_mach: f64 = 0.0;
        let mut max_wave_speed: f64 = 0.0;

        for q in solution.cells() {
            total_mass += q.rho * dx;
            total_momentum += q.rho_u * dx;
            total_energy += q.energy * dx;

            let p = eq.pressure(q);
            min_density = min_density.min(q.rho);
            max_density = max_density.max(q.rho);
            min_pressure = min_pressure.min(p);
            max_pressure = max_pressure.max(p);

            let speed = q.velocity().abs();
            let c = eq.sound_speed(q);
            max_velocity = max_velocity.max(speed);
            if c > 0.0 {
                max_mach = max_mach.max(speed / c);
            }
            max_wave_speed = max_wave_speed.max(speed + c);
        }

        Self {
            total_mass,
            total_momentum,
            total_energy,
            min_density,
            max_density,
            min_pressure,
            max_pressure,
            max_velocity,
            max_mach,
            courant: max_wave_speed * dt / dx,
        }
    }

    /// Format diagnostics as a single-line summary.
    pub fn summary_line(&self) -> String {
        format!(
            "M={:.6e} P={:.4e} E={:.6e} rho=[{:.4},{:.4}] p=[{:.4},{:.4}] Ma={:.3} C={:.3}",
            self.total_mass,
            self.total_momentum,
            self.total_energy,
            self.min_density,
            self.max_density,
            self.min_pressure,
            self.max_pressure,
            self.max_mach,
            self.courant
        )
    }
}

/// Track diagnostics over time for monitoring conservation and stability.
#[derive(Clone, Debug)]
pub struct DiagnosticsTracker {
    initial: EulerDiagnostics,
    current: EulerDiagnostics,
    current_time: f64,
    n_updates: usize,
    max_courant_seen: f64,
    max_mach_seen: f64,
    max_pressure_seen: f64,
    min_density_seen: f64,
}

impl DiagnosticsTracker {
    /// Create a new tracker with initial diagnostics.
    pub fn new(initial: EulerDiagnostics) -> Self {
        Self {
            current: initial.clone(),
            current_time: 0.0,
            n_updates: 0,
            max_courant_seen: initial.courant,
            max_mach_seen: initial.max_mach,
            max_pressure_seen: initial.max_pressure,
            min_density_seen: initial.min_density,
            initial,
        }
    }

    /// Update tracker with new diagnostics.
    pub fn update(&mut self, time: f64, diag: EulerDiagnostics) {
        self.current_time = time;
        self.n_updates += 1;

        self.max_courant_seen = self.max_courant_seen.max(diag.courant);
        self.max_mach_seen = self.max_mach_seen.max(diag.max_mach);
        self.max_pressure_seen = self.max_pressure_seen.max(diag.max_pressure);
        self.min_density_seen = self.min_density_seen.min(diag.min_density);

        self.current = diag;
    }

    /// Relative mass conservation error.
    pub fn mass_error(&self) -> f64 {
        relative_change(self.initial.total_mass, self.current.total_mass).abs()
    }

    /// Momentum conservation error, relative when the initial momentum is nonzero.
    pub fn momentum_error(&self) -> f64 {
        let initial = self.initial.total_momentum;
        let current = self.current.total_momentum;

        if initial.abs() > 1e-14 {
            (current - initial).abs() / initial.abs()
        } else {
            (current - initial).abs()
        }
    }

    /// Relative energy change (signed).
    pub fn energy_change(&self) -> f64 {
        relative_change(self.initial.total_energy, self.current.total_energy)
    }

    /// Get current diagnostics.
    pub fn current(&self) -> &EulerDiagnostics {
        &self.current
    }

    /// Get initial diagnostics.
    pub fn initial(&self) -> &EulerDiagnostics {
        &self.initial
    }

    /// Number of updates recorded.
    pub fn n_updates(&self) -> usize {
        self.n_updates
    }

    /// Largest pressure seen in any update.
    pub fn max_pressure_seen(&self) -> f64 {
        self.max_pressure_seen
    }

    /// Check for blow-up indicators.
    pub fn is_stable(&self) -> bool {
        let diag = &self.current;

        if !diag.total_mass.is_finite() || !diag.total_energy.is_finite() {
            return false;
        }
        if diag.min_density <= 0.0 || diag.min_pressure <= 0.0 {
            return false;
        }
        // Explicit first-order update is unstable past Courant 1
        diag.courant <= 1.0 + 1e-12
    }

    /// Multi-line summary of the tracked run.
    pub fn summary(&self) -> String {
        format!(
            "=== Diagnostics Summary ===\n\
             Time: {:.4} ({} updates)\n\
             Conservation:\n  Mass error:     {:.2e}\n  Momentum error: {:.2e}\n  Energy change:  {:.2e}\n\
             Extrema during simulation:\n  Max Courant:  {:.4}\n  Max Mach:     {:.4}\n  Max pressure: {:.4}\n  Min density:  {:.4}\n\
             Current state:\n  {}",
            self.current_time,
            self.n_updates,
            self.mass_error(),
            self.momentum_error(),
            self.energy_change(),
            self.max_courant_seen,
            self.max_mach_seen,
            self.max_pressure_seen,
            self.min_density_seen,
            self.current.summary_line()
        )
    }
}

fn relative_change(initial: f64, current: f64) -> f64 {
    if initial.abs() > 1e-14 {
        (current - initial) / initial.abs()
    } else {
        0.0
    }
}

/// Progress reporter for long-running simulations.
///
/// Emits an `info` event every `report_interval_pct` percent of simulated time.
#[derive(Clone, Debug)]
pub struct ProgressReporter {
    start_instant: Instant,
    t_start: f64,
    t_final: f64,
    last_reported_pct: u32,
    report_interval_pct: u32,
    n_steps: usize,
}

impl ProgressReporter {
    /// Create a new progress reporter over `[t_start, t_final]`.
    pub fn new(t_start: f64, t_final: f64, report_interval_pct: u32) -> Self {
        Self {
            start_instant: Instant::now(),
            t_start,
            t_final,
            last_reported_pct: 0,
            report_interval_pct: report_interval_pct.max(1),
            n_steps: 0,
        }
    }

    /// Record a timestep.
    pub fn step(&mut self) {
        self.n_steps += 1;
    }

    /// Steps recorded so far.
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Wall-clock seconds since creation.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_instant.elapsed().as_secs_f64()
    }

    fn percent(&self, current_time: f64) -> f64 {
        let span = self.t_final - self.t_start;
        if span > 0.0 {
            ((current_time - self.t_start) / span * 100.0).clamp(0.0, 100.0)
        } else {
            100.0
        }
    }

    /// Report progress if the next threshold was crossed.
    ///
    /// Returns true if progress was reported.
    pub fn maybe_report(&mut self, current_time: f64) -> bool {
        let pct = self.percent(current_time) as u32;
        let threshold = self.last_reported_pct + self.report_interval_pct;

        if pct >= threshold {
            self.report(current_time);
            self.last_reported_pct = (pct / self.report_interval_pct) * self.report_interval_pct;
            true
        } else {
            false
        }
    }

    /// Force a progress report.
    pub fn report(&self, current_time: f64) {
        let elapsed = self.elapsed_secs();
        let pct = self.percent(current_time);

        let eta = if pct > 0.1 {
            format_duration(elapsed * 100.0 / pct - elapsed)
        } else {
            "calculating...".to_string()
        };
        let steps_per_sec = if elapsed > 0.0 {
            self.n_steps as f64 / elapsed
        } else {
            0.0
        };

        info!(
            t = current_time,
            elapsed = %format_duration(elapsed),
            eta = %eta,
            steps_per_sec = steps_per_sec.round(),
            "progress {:.1}%",
            pct
        );
    }
}

/// Format a duration in seconds as human-readable string.
pub fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor();
        let s = secs - mins * 60.0;
        format!("{:.0}m{:.0}s", mins, s)
    } else {
        let hours = (secs / 3600.0).floor();
        let mins = ((secs - hours * 3600.0) / 60.0).floor();
        format!("{:.0}h{:.0}m", hours, mins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::{Euler1D, Primitives};
    use crate::solver::EulerState;

    fn sod(grid: &Grid1D) -> EulerSolution {
        EulerSolution::from_primitives(grid, Euler1D::air(), |x| {
            if x < 0.5 {
                Primitives::new(1.0, 0.0, 1.0)
            } else {
                Primitives::new(0.125, 0.0, 0.1)
            }
        })
        .unwrap()
    }

    #[test]
    fn test_compute_sod() {
        let grid = Grid1D::new(0.0, 1.0, 100).unwrap();
        let q = sod(&grid);
        let diag = EulerDiagnostics::compute(&q, &grid, 0.001);

        assert!((diag.total_mass - 0.5625).abs() < 1e-12);
        assert!(diag.total_momentum.abs() < 1e-14);
        assert!((diag.min_density - 0.125).abs() < 1e-14);
        assert!((diag.max_pressure - 1.0).abs() < 1e-12);
        assert!((diag.min_pressure - 0.1).abs() < 1e-12);
        assert_eq!(diag.max_mach, 0.0);

        // Fastest cell is on the left: c = sqrt(1.4 * 1 / 1) ≈ 1.1832
        let expected_courant = 1.4_f64.sqrt() * 0.001 / 0.01;
        assert!((diag.courant - expected_courant).abs() < 1e-10);
    }

    #[test]
    fn test_tracker_errors() {
        let grid = Grid1D::new(0.0, 1.0, 10).unwrap();
        let q0 = EulerSolution::uniform(10, EulerState::new(1.0, 0.0, 2.5), Euler1D::air()).unwrap();
        let q1 = EulerSolution::uniform(10, EulerState::new(1.01, 0.1, 2.4), Euler1D::air()).unwrap();

        let mut tracker = DiagnosticsTracker::new(EulerDiagnostics::compute(&q0, &grid, 0.0));
        tracker.update(0.5, EulerDiagnostics::compute(&q1, &grid, 0.0));

        assert!((tracker.mass_error() - 0.01).abs() < 1e-12);
        assert!((tracker.momentum_error() - 0.1).abs() < 1e-12);
        assert!((tracker.energy_change() + 0.04).abs() < 1e-12);
        assert_eq!(tracker.n_updates(), 1);
        assert!(tracker.is_stable());
        assert!(tracker.summary().contains("Mass error"));
    }

    #[test]
    fn test_progress_thresholds() {
        let mut progress = ProgressReporter::new(0.0, 2.0, 25);
        assert!(!progress.maybe_report(0.2));
        assert!(progress.maybe_report(0.5));
        assert!(!progress.maybe_report(0.6));
        assert!(progress.maybe_report(2.0));
        progress.step();
        assert_eq!(progress.n_steps(), 1);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(5.0), "5.0s");
        assert_eq!(format_duration(125.0), "2m5s");
        assert_eq!(format_duration(7260.0), "2h1m");
    }
}
