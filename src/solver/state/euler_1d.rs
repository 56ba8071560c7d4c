//! 1D Euler state types.
//!
//! Conserved variables per cell are (ρ, ρu, E):
//! - ρ = density
//! - ρu = momentum
//! - E = total energy per unit volume

use std::ops::{Add, Mul, Sub};

use crate::equations::{Euler1D, Primitives};
use crate::error::{EulerError, Result, Site};
use crate::mesh::Grid1D;

/// Conserved state of one cell: (ρ, ρu, E).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EulerState {
    /// Density ρ (must be positive)
    pub rho: f64,
    /// Momentum ρu
    pub rho_u: f64,
    /// Total energy E (must exceed the kinetic energy)
    pub energy: f64,
}

impl EulerState {
    /// Create a new state from conserved variables.
    pub fn new(rho: f64, rho_u: f64, energy: f64) -> Self {
        Self { rho, rho_u, energy }
    }

    /// Create a state from primitive variables (ρ, u, p).
    ///
    /// E = p / (γ - 1) + ρu²/2
    pub fn from_primitives(rho: f64, u: f64, p: f64, gamma: f64) -> Self {
        Self {
            rho,
            rho_u: rho * u,
            energy: p / (gamma - 1.0) + 0.5 * rho * u * u,
        }
    }

    /// Velocity u = ρu / ρ.
    pub fn velocity(&self) -> f64 {
        self.rho_u / self.rho
    }

    /// Kinetic energy per unit volume ρu²/2.
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.rho_u * self.rho_u / self.rho
    }

    /// Internal energy per unit volume E - ρu²/2.
    pub fn internal_energy(&self) -> f64 {
        self.energy - self.kinetic_energy()
    }

    /// Convert to array representation [ρ, ρu, E].
    pub fn to_array(&self) -> [f64; 3] {
        [self.rho, self.rho_u, self.energy]
    }

    /// Create from array representation [ρ, ρu, E].
    pub fn from_array(arr: [f64; 3]) -> Self {
        Self {
            rho: arr[0],
            rho_u: arr[1],
            energy: arr[2],
        }
    }

    /// Apply `f` component-wise to a pair of states.
    pub fn zip_with(self, other: Self, f: impl Fn(f64, f64) -> f64) -> Self {
        Self {
            rho: f(self.rho, other.rho),
            rho_u: f(self.rho_u, other.rho_u),
            energy: f(self.energy, other.energy),
        }
    }
}

impl Add for EulerState {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            rho: self.rho + other.rho,
            rho_u: self.rho_u + other.rho_u,
            energy: self.energy + other.energy,
        }
    }
}

impl Sub for EulerState {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            rho: self.rho - other.rho,
            rho_u: self.rho_u - other.rho_u,
            energy: self.energy - other.energy,
        }
    }
}

impl Mul<f64> for EulerState {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Self {
            rho: self.rho * scalar,
            rho_u: self.rho_u * scalar,
            energy: self.energy * scalar,
        }
    }
}

impl Mul<EulerState> for f64 {
    type Output = EulerState;

    fn mul(self, state: EulerState) -> EulerState {
        state * self
    }
}

/// Cell-wise conserved state over the whole grid, with the shared `gamma`
/// and the current simulation time.
#[derive(Clone, Debug, PartialEq)]
pub struct EulerSolution {
    cells: Vec<EulerState>,
    equation: Euler1D,
    /// Current simulation time.
    pub time: f64,
}

impl EulerSolution {
    /// Create a solution from explicit cell states at time 0.
    ///
    /// Every cell must have positive density and pressure.
    pub fn new(cells: Vec<EulerState>, equation: Euler1D) -> Result<Self> {
        if cells.is_empty() {
            return Err(EulerError::invalid_config("state needs at least one cell"));
        }
        let solution = Self {
            cells,
            equation,
            time: 0.0,
        };
        solution.check_physical()?;
        Ok(solution)
    }

    /// Initialise from primitive variables evaluated at each cell centre.
    pub fn from_primitives<F>(grid: &Grid1D, equation: Euler1D, f: F) -> Result<Self>
    where
        F: Fn(f64) -> Primitives,
    {
        let cells = grid
            .centers()
            .into_iter()
            .map(|x| equation.conserved(&f(x)))
            .collect();
        Self::new(cells, equation)
    }

    /// Uniform state on every cell.
    pub fn uniform(n_cells: usize, state: EulerState, equation: Euler1D) -> Result<Self> {
        Self::new(vec![state; n_cells], equation)
    }

    /// Number of cells.
    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    /// Equation of state shared by all cells.
    pub fn equation(&self) -> &Euler1D {
        &self.equation
    }

    /// Ratio of specific heats.
    pub fn gamma(&self) -> f64 {
        self.equation.gamma()
    }

    /// Read-only view of the cell states.
    pub fn cells(&self) -> &[EulerState] {
        &self.cells
    }

    /// State of cell `i`.
    pub fn get(&self, i: usize) -> EulerState {
        self.cells[i]
    }

    /// Replace all cells at once. Used by the solver to commit a step.
    pub(crate) fn replace_cells(&mut self, cells: &mut Vec<EulerState>) {
        debug_assert_eq!(cells.len(), self.cells.len());
        std::mem::swap(&mut self.cells, cells);
    }

    /// Density of every cell.
    pub fn density(&self) -> Vec<f64> {
        self.cells.iter().map(|q| q.rho).collect()
    }

    /// Momentum of every cell.
    pub fn momentum(&self) -> Vec<f64> {
        self.cells.iter().map(|q| q.rho_u).collect()
    }

    /// Total energy of every cell.
    pub fn energy(&self) -> Vec<f64> {
        self.cells.iter().map(|q| q.energy).collect()
    }

    /// Velocity of every cell.
    pub fn velocity(&self) -> Vec<f64> {
        self.cells.iter().map(|q| q.velocity()).collect()
    }

    /// Pressure of every cell.
    pub fn pressure(&self) -> Vec<f64> {
        self.cells.iter().map(|q| self.equation.pressure(q)).collect()
    }

    /// Integral of density over the domain: Σ ρ_i dx.
    pub fn total_mass(&self, dx: f64) -> f64 {
        self.cells.iter().map(|q| q.rho).sum::<f64>() * dx
    }

    /// Integral of momentum over the domain: Σ (ρu)_i dx.
    pub fn total_momentum(&self, dx: f64) -> f64 {
        self.cells.iter().map(|q| q.rho_u).sum::<f64>() * dx
    }

    /// Integral of total energy over the domain: Σ E_i dx.
    pub fn total_energy(&self, dx: f64) -> f64 {
        self.cells.iter().map(|q| q.energy).sum::<f64>() * dx
    }

    /// Check that every cell has positive density and pressure.
    pub fn check_physical(&self) -> Result<()> {
        check_cells(&self.cells, &self.equation)
    }

    /// Take an immutable, time-stamped copy of the current state.
    pub fn snapshot(&self, frame: usize) -> Snapshot {
        Snapshot {
            frame,
            time: self.time,
            cells: self.cells.clone(),
            gamma: self.gamma(),
        }
    }
}

/// Positivity check over a slice of cells, reporting the first offender.
pub(crate) fn check_cells(cells: &[EulerState], equation: &Euler1D) -> Result<()> {
    match cells.iter().position(|q| !equation.is_physical(q)) {
        None => Ok(()),
        Some(i) => Err(EulerError::NonPhysicalState {
            site: Site::Cell(i),
            density: cells[i].rho,
            pressure: equation.pressure(&cells[i]),
        }),
    }
}

/// Immutable, time-stamped copy of the conserved state.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// Output frame number (0 is the initial state).
    pub frame: usize,
    /// Simulation time of the copy.
    pub time: f64,
    /// Conserved state of every cell.
    pub cells: Vec<EulerState>,
    /// Ratio of specific heats.
    pub gamma: f64,
}

impl Snapshot {
    /// Density field.
    pub fn density(&self) -> Vec<f64> {
        self.cells.iter().map(|q| q.rho).collect()
    }

    /// Total energy field.
    pub fn energy(&self) -> Vec<f64> {
        self.cells.iter().map(|q| q.energy).collect()
    }

    /// Pressure field.
    pub fn pressure(&self) -> Vec<f64> {
        self.cells
            .iter()
            .map(|q| (self.gamma - 1.0) * q.internal_energy())
            .collect()
    }

    /// Velocity field.
    pub fn velocity(&self) -> Vec<f64> {
        self.cells.iter().map(|q| q.velocity()).collect()
    }
}
