//! Two-state Riemann problems with exact reference solutions.

use serde::{Deserialize, Serialize};

use crate::equations::{Euler1D, ExactRiemannSolver, Primitives};
use crate::error::Result;
use crate::mesh::Grid1D;
use crate::solver::EulerSolution;

/// Shock tube: constant left and right states separated at `x0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShockTube {
    /// State for x < x0
    pub left: Primitives,
    /// State for x >= x0
    pub right: Primitives,
    /// Diaphragm position
    pub x0: f64,
    /// Domain left end
    pub x_min: f64,
    /// Domain right end
    pub x_max: f64,
    /// Ratio of specific heats
    pub gamma: f64,
}

impl ShockTube {
    /// Sod's problem on [0, 1].
    pub fn sod() -> Self {
        Self {
            left: Primitives::new(1.0, 0.0, 1.0),
            right: Primitives::new(0.125, 0.0, 0.1),
            x0: 0.5,
            x_min: 0.0,
            x_max: 1.0,
            gamma: 1.4,
        }
    }

    /// Lax's problem on [0, 1].
    pub fn lax() -> Self {
        Self {
            left: Primitives::new(0.445, 0.698, 3.528),
            right: Primitives::new(0.5, 0.0, 0.571),
            ..Self::sod()
        }
    }

    /// Two symmetric rarefactions with a near-vacuum centre (Toro test 2).
    pub fn double_rarefaction() -> Self {
        Self {
            left: Primitives::new(1.0, -2.0, 0.4),
            right: Primitives::new(1.0, 2.0, 0.4),
            ..Self::sod()
        }
    }

    /// Uniform grid over the tube.
    pub fn grid(&self, n_cells: usize) -> Result<Grid1D> {
        Grid1D::new(self.x_min, self.x_max, n_cells)
    }

    /// Initial conserved state.
    pub fn initial_state(&self, grid: &Grid1D) -> Result<EulerSolution> {
        let equation = Euler1D::new(self.gamma)?;
        EulerSolution::from_primitives(grid, equation, |x| {
            if x < self.x0 { self.left } else { self.right }
        })
    }

    /// Exact solution of the tube.
    pub fn exact(&self) -> Result<ExactRiemannSolver> {
        ExactRiemannSolver::new(self.left, self.right, self.gamma)
    }

    /// Exact primitive state at every cell centre at time `t > 0`.
    pub fn exact_profile(&self, grid: &Grid1D, t: f64) -> Result<Vec<Primitives>> {
        let exact = self.exact()?;
        Ok(grid
            .centers()
            .into_iter()
            .map(|x| exact.sample_at(x, self.x0, t))
            .collect())
    }

    /// Discrete L1 density error Σ |ρ_i - ρ(x_i, t)| dx against the exact solution.
    pub fn l1_density_error(&self, solution: &EulerSolution, grid: &Grid1D) -> Result<f64> {
        let profile = self.exact_profile(grid, solution.time)?;
        Ok(solution
            .cells()
            .iter()
            .zip(&profile)
            .map(|(q, w)| (q.rho - w.rho).abs())
            .sum::<f64>()
            * grid.dx())
    }
}
