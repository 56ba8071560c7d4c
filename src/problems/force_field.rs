//! Blast-wave "force field" setup.
//!
//! Gas at rest with unit density and pressure fills [0, 10]. A slab at
//! 1 < x < 2 holds an extra 1000 units of pressure and releases a blast
//! wave toward a pressure gauge at x = 9. Heating (extra pressure) or other
//! changes may be added anywhere to weaken the pulse before it reaches the
//! gauge, except that the velocity inside (3, 8) must stay untouched.

use serde::{Deserialize, Serialize};

use crate::boundary::BoundaryConditions;
use crate::equations::{Euler1D, Primitives};
use crate::error::{EulerError, Result};
use crate::flux::HllEntropyFix;
use crate::gauges::{GaugeQuantity, GaugeRecorder};
use crate::mesh::Grid1D;
use crate::simulation::{Controller, ControllerConfig, RunSummary};
use crate::solver::{EulerSolution, FiniteVolumeSolver, SolverConfig};

/// Interval in which the initial velocity may not be modified.
pub const PROTECTED_VELOCITY_ZONE: (f64, f64) = (3.0, 8.0);

/// Extra pressure (or velocity) applied on an open interval.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Perturbation {
    /// Left end (exclusive)
    pub lower: f64,
    /// Right end (exclusive)
    pub upper: f64,
    /// Added value
    pub amount: f64,
}

impl Perturbation {
    fn contains(&self, x: f64) -> bool {
        x > self.lower && x < self.upper
    }
}

/// Parameters of the blast-wave scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceFieldProblem {
    /// Left end of the domain
    pub x_min: f64,
    /// Right end of the domain
    pub x_max: f64,
    /// Number of cells
    pub n_cells: usize,
    /// Ratio of specific heats
    pub gamma: f64,
    /// Background density
    pub ambient_density: f64,
    /// Background pressure
    pub ambient_pressure: f64,
    /// Extra pressure inside the blast slab
    pub blast_pressure: f64,
    /// Blast slab (open interval)
    pub blast_region: (f64, f64),
    /// Gauge position
    pub gauge_location: f64,
    /// Quantity recorded at the gauge
    pub gauge_quantity: GaugeQuantity,
    /// Final time
    pub t_final: f64,
    /// Number of output frames after the initial one
    pub num_output_times: usize,
    /// Heating perturbations (extra pressure)
    pub heating: Vec<Perturbation>,
    /// Velocity perturbations, never inside the protected zone
    pub velocity: Vec<Perturbation>,
}

impl Default for ForceFieldProblem {
    fn default() -> Self {
        Self {
            x_min: 0.0,
            x_max: 10.0,
            n_cells: 800,
            gamma: 1.4,
            ambient_density: 1.0,
            ambient_pressure: 1.0,
            blast_pressure: 1000.0,
            blast_region: (1.0, 2.0),
            gauge_location: 9.0,
            gauge_quantity: GaugeQuantity::DensityPressure,
            t_final: 2.0,
            num_output_times: 10,
            heating: Vec::new(),
            velocity: Vec::new(),
        }
    }
}

impl ForceFieldProblem {
    /// The unmodified scenario.
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the resolution.
    pub fn with_cells(mut self, n_cells: usize) -> Self {
        self.n_cells = n_cells;
        self
    }

    /// Change the quantity recorded at the gauge.
    pub fn with_gauge_quantity(mut self, quantity: GaugeQuantity) -> Self {
        self.gauge_quantity = quantity;
        self
    }

    /// Change the final time.
    pub fn with_t_final(mut self, t_final: f64) -> Self {
        self.t_final = t_final;
        self
    }

    /// Change the number of output frames.
    pub fn with_num_output_times(mut self, n: usize) -> Self {
        self.num_output_times = n;
        self
    }

    /// Add `extra_pressure` on the open interval (a, b). Velocity is not touched.
    pub fn with_heating(mut self, a: f64, b: f64, extra_pressure: f64) -> Result<Self> {
        let perturbation = self.checked_interval(a, b, extra_pressure)?;
        self.heating.push(perturbation);
        Ok(self)
    }

    /// Add velocity `u` on the open interval (a, b).
    ///
    /// Refused if (a, b) overlaps the protected zone (3, 8).
    pub fn with_velocity(mut self, a: f64, b: f64, u: f64) -> Result<Self> {
        let perturbation = self.checked_interval(a, b, u)?;
        let (lo, hi) = PROTECTED_VELOCITY_ZONE;
        if a < hi && b > lo {
            return Err(EulerError::invalid_config(format!(
                "velocity may not change inside ({lo}, {hi}), requested ({a}, {b})"
            )));
        }
        self.velocity.push(perturbation);
        Ok(self)
    }

    fn checked_interval(&self, a: f64, b: f64, amount: f64) -> Result<Perturbation> {
        if !(a.is_finite() && b.is_finite() && a < b) {
            return Err(EulerError::invalid_config(format!(
                "perturbation interval ({a}, {b}) is empty or not finite"
            )));
        }
        if !amount.is_finite() {
            return Err(EulerError::invalid_config(format!(
                "perturbation amount must be finite, got {amount}"
            )));
        }
        Ok(Perturbation {
            lower: a,
            upper: b,
            amount,
        })
    }

    /// Initial primitive state at `x`.
    pub fn initial_primitives(&self, x: f64) -> Primitives {
        let (b_lo, b_hi) = self.blast_region;
        let mut p = self.ambient_pressure;
        if x > b_lo && x < b_hi {
            p += self.blast_pressure;
        }
        p += self
            .heating
            .iter()
            .filter(|h| h.contains(x))
            .map(|h| h.amount)
            .sum::<f64>();

        let u = self
            .velocity
            .iter()
            .filter(|v| v.contains(x))
            .map(|v| v.amount)
            .sum::<f64>();

        Primitives::new(self.ambient_density, u, p)
    }

    /// Grid of the scenario.
    pub fn grid(&self) -> Result<Grid1D> {
        Grid1D::new(self.x_min, self.x_max, self.n_cells)
    }

    /// Equation of state.
    pub fn equation(&self) -> Result<Euler1D> {
        Euler1D::new(self.gamma)
    }

    /// Initial conserved state on `grid`.
    pub fn initial_state(&self, grid: &Grid1D) -> Result<EulerSolution> {
        EulerSolution::from_primitives(grid, self.equation()?, |x| self.initial_primitives(x))
    }

    /// HLL solver with extrapolating ends.
    pub fn solver(&self, config: SolverConfig) -> Result<FiniteVolumeSolver> {
        FiniteVolumeSolver::new(
            HllEntropyFix::default(),
            BoundaryConditions::extrapolation(),
            config,
        )
    }

    /// Single gauge recording `gauge_quantity`.
    pub fn gauges(&self, grid: &Grid1D) -> Result<GaugeRecorder> {
        let name = format!("{}@{}", self.gauge_quantity.label(), self.gauge_location);
        GaugeRecorder::with_names(
            grid,
            [(name, self.gauge_location)],
            self.gauge_quantity.gauge_fn(),
        )
    }

    /// Controller settings for the scenario.
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig::new(self.t_final).with_num_output_times(self.num_output_times)
    }

    /// Assemble a ready-to-run controller.
    pub fn controller(&self, solver_config: SolverConfig) -> Result<Controller> {
        let grid = self.grid()?;
        let solution = self.initial_state(&grid)?;
        let solver = self.solver(solver_config)?;
        let gauges = self.gauges(&grid)?;
        Controller::new(grid, solution, solver, gauges, self.controller_config())
    }

    /// Build and run with default solver settings.
    pub fn run(&self) -> Result<RunSummary> {
        self.controller(SolverConfig::default())?.run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_pressure() {
        let problem = ForceFieldProblem::new();
        assert_eq!(problem.initial_primitives(0.5).p, 1.0);
        assert_eq!(problem.initial_primitives(1.5).p, 1001.0);
        assert_eq!(problem.initial_primitives(2.5).p, 1.0);
        assert_eq!(problem.initial_primitives(1.5).u, 0.0);
        assert_eq!(problem.initial_primitives(9.0).rho, 1.0);
    }

    #[test]
    fn test_heating() {
        let problem = ForceFieldProblem::new()
            .with_heating(4.0, 6.0, 50.0)
            .unwrap();

        assert_eq!(problem.initial_primitives(5.0).p, 51.0);
        assert_eq!(problem.initial_primitives(5.0).u, 0.0);
        assert_eq!(problem.initial_primitives(7.0).p, 1.0);
        assert!(ForceFieldProblem::new().with_heating(6.0, 4.0, 1.0).is_err());
    }

    #[test]
    fn test_velocity_protected_zone() {
        assert!(ForceFieldProblem::new().with_velocity(4.0, 5.0, 1.0).is_err());
        assert!(ForceFieldProblem::new().with_velocity(2.0, 3.5, 1.0).is_err());
        assert!(ForceFieldProblem::new().with_velocity(7.5, 9.0, -1.0).is_err());

        let problem = ForceFieldProblem::new().with_velocity(2.0, 3.0, -0.5).unwrap();
        assert_eq!(problem.initial_primitives(2.5).u, -0.5);
        assert!(
            ForceFieldProblem::new()
                .with_velocity(8.0, 9.0, 0.5)
                .is_ok()
        );
    }

    #[test]
    fn test_assembly() {
        let problem = ForceFieldProblem::new().with_cells(80);
        let grid = problem.grid().unwrap();
        let q = problem.initial_state(&grid).unwrap();
        let gauges = problem.gauges(&grid).unwrap();

        assert_eq!(q.n_cells(), 80);
        assert_eq!(gauges.gauges()[0].name(), "rho_p@9");
        assert_eq!(problem.controller_config().t_final, 2.0);
    }

    #[test]
    fn test_gauge_quantities_compared() {
        // Denser gas at the gauge makes the two readings differ by the density
        let problem = ForceFieldProblem {
            ambient_density: 2.0,
            ..ForceFieldProblem::new().with_cells(80)
        };
        let grid = problem.grid().unwrap();
        let q = problem.initial_state(&grid).unwrap();

        let mut weighted = problem.gauges(&grid).unwrap();
        let mut plain = problem
            .clone()
            .with_gauge_quantity(GaugeQuantity::Pressure)
            .gauges(&grid)
            .unwrap();
        weighted.record(&q, &grid, 0.0).unwrap();
        plain.record(&q, &grid, 0.0).unwrap();

        let p = plain.max_value(0, 0).unwrap();
        assert!((p - 1.0).abs() < 1e-12);
        assert!((weighted.max_value(0, 0).unwrap() - 2.0 * p).abs() < 1e-12);
        assert_eq!(plain.gauges()[0].name(), "pressure@9");
    }

    #[test]
    fn test_negative_heating_rejected_at_setup() {
        let problem = ForceFieldProblem::new()
            .with_cells(80)
            .with_heating(5.0, 6.0, -2.0)
            .unwrap();
        let grid = problem.grid().unwrap();
        let err = problem.initial_state(&grid).unwrap_err();
        assert!(err.is_non_physical());
    }
}
