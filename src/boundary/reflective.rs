//! Reflective (wall) boundary condition for the Euler equations.
//!
//! A reflective boundary represents a solid wall where no mass passes.
//! Ghost layer k mirrors interior cell k across the wall:
//!
//! - ρ_ghost = ρ_interior
//! - (ρu)_ghost = -(ρu)_interior
//! - E_ghost = E_interior
//!
//! This gives zero mass and energy flux through the wall.

use super::{BCContext, EulerBoundaryCondition};
use crate::solver::EulerState;

/// Solid wall boundary condition.
#[derive(Clone, Copy, Debug, Default)]
pub struct Reflective;

impl EulerBoundaryCondition for Reflective {
    fn ghost_state(&self, ctx: &BCContext) -> EulerState {
        let q = ctx.mirror_state;
        EulerState::new(q.rho, -q.rho_u, q.energy)
    }

    fn name(&self) -> &'static str {
        "reflective"
    }
}
