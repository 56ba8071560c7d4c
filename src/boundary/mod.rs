//! Boundary conditions for the 1D Euler equations.
//!
//! Boundary conditions fill the "ghost" cells outside the domain before
//! interface fluxes are evaluated. Each end of the domain has its own
//! condition.
//!
//! | BC Type | Description |
//! |---------|-------------|
//! | `Extrapolation` | Zero-order extrapolation (outflow, zero gradient) |
//! | `Reflective` | Solid wall, momentum mirrored |

mod extrapolation;
mod reflective;

pub use extrapolation::Extrapolation;
pub use reflective::Reflective;

use crate::mesh::BoundaryFace;
use crate::solver::{EulerSolution, EulerState};

/// Context for boundary condition evaluation.
#[derive(Clone, Copy, Debug)]
pub struct BCContext {
    /// Which end of the domain
    pub face: BoundaryFace,
    /// Distance of the ghost cell from the boundary, 1 for the nearest
    pub layer: usize,
    /// Interior cell mirrored across the boundary for this layer
    pub mirror_state: EulerState,
    /// Interior cell adjacent to the boundary
    pub nearest_state: EulerState,
}

impl BCContext {
    /// Outward normal direction (-1 left, +1 right).
    pub fn normal(&self) -> f64 {
        self.face.normal()
    }
}

/// Trait for Euler boundary conditions.
///
/// Implementations compute the ghost state for one ghost layer.
pub trait EulerBoundaryCondition: Send + Sync {
    /// Compute the ghost state for the given context.
    fn ghost_state(&self, ctx: &BCContext) -> EulerState;

    /// Name of this boundary condition for logging.
    fn name(&self) -> &'static str;
}

/// Type alias for boxed boundary conditions (runtime polymorphism).
pub type BoxedBoundaryCondition = Box<dyn EulerBoundaryCondition>;

/// Boundary conditions at both ends of the domain.
pub struct BoundaryConditions {
    /// Condition at x_min
    pub lower: BoxedBoundaryCondition,
    /// Condition at x_max
    pub upper: BoxedBoundaryCondition,
}

impl BoundaryConditions {
    /// Create from independent lower and upper conditions.
    pub fn new(
        lower: impl EulerBoundaryCondition + 'static,
        upper: impl EulerBoundaryCondition + 'static,
    ) -> Self {
        Self {
            lower: Box::new(lower),
            upper: Box::new(upper),
        }
    }

    /// Zero-order extrapolation at both ends.
    pub fn extrapolation() -> Self {
        Self::new(Extrapolation, Extrapolation)
    }

    /// Solid walls at both ends.
    pub fn reflective() -> Self {
        Self::new(Reflective, Reflective)
    }

    /// Return the cells padded with `n_ghost` ghost cells on each side.
    ///
    /// Layout: `[ghost_{n}, .., ghost_1, interior.., ghost_1, .., ghost_{n}]`,
    /// so interior cell `i` sits at index `i + n_ghost`.
    pub fn fill_ghosts(&self, solution: &EulerSolution, n_ghost: usize) -> Vec<EulerState> {
        let mut padded = Vec::with_capacity(solution.n_cells() + 2 * n_ghost);
        self.fill_ghosts_into(solution, n_ghost, &mut padded);
        padded
    }

    /// Same as [`fill_ghosts`](Self::fill_ghosts), reusing `padded`.
    pub fn fill_ghosts_into(
        &self,
        solution: &EulerSolution,
        n_ghost: usize,
        padded: &mut Vec<EulerState>,
    ) {
        let cells = solution.cells();
        let n = cells.len();
        padded.clear();

        for layer in (1..=n_ghost).rev() {
            let ctx = BCContext {
                face: BoundaryFace::Left,
                layer,
                mirror_state: cells[(layer - 1).min(n - 1)],
                nearest_state: cells[0],
            };
            padded.push(self.lower.ghost_state(&ctx));
        }

        padded.extend_from_slice(cells);

        for layer in 1..=n_ghost {
            let ctx = BCContext {
                face: BoundaryFace::Right,
                layer,
                mirror_state: cells[n - 1 - (layer - 1).min(n - 1)],
                nearest_state: cells[n - 1],
            };
            padded.push(self.upper.ghost_state(&ctx));
        }
    }
}

impl Default for BoundaryConditions {
    fn default() -> Self {
        Self::extrapolation()
    }
}

impl std::fmt::Debug for BoundaryConditions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundaryConditions")
            .field("lower", &self.lower.name())
            .field("upper", &self.upper.name())
            .finish()
    }
}
