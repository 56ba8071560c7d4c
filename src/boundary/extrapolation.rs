//! Zero-order extrapolation (outflow) boundary condition.
//!
//! Every ghost cell receives a copy of the nearest interior cell, giving a
//! zero-gradient condition. Waves leave the domain without artificial
//! reflection to first order.

use super::{BCContext, EulerBoundaryCondition};
use crate::solver::EulerState;

/// Zero-gradient extrapolation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Extrapolation;

impl EulerBoundaryCondition for Extrapolation {
    fn ghost_state(&self, ctx: &BCContext) -> EulerState {
        ctx.nearest_state
    }

    fn name(&self) -> &'static str {
        "extrapolation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::BoundaryFace;

    #[test]
    fn test_copies_nearest_cell() {
        let nearest = EulerState::new(1.0, -0.5, 3.0);
        let ctx = BCContext {
            face: BoundaryFace::Left,
            layer: 2,
            mirror_state: EulerState::new(9.0, 9.0, 9.0),
            nearest_state: nearest,
        };

        assert_eq!(Extrapolation.ghost_state(&ctx), nearest);
        assert_eq!(Extrapolation.name(), "extrapolation");
    }
}
