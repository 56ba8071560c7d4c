//! Trait-based Riemann solver abstraction.
//!
//! The finite-volume solver does not know which approximate Riemann solver
//! it uses: it receives one through the [`RiemannSolver`] trait, either as a
//! concrete type, the [`StandardRiemannSolver`] enum, or a boxed trait
//! object built by [`create_riemann_solver`].
//!
//! # Example
//! ```
//! use euler_fv::equations::Euler1D;
//! use euler_fv::flux::{FluxContext, HllEntropyFix, RiemannSolver};
//! use euler_fv::solver::EulerState;
//!
//! let eq = Euler1D::air();
//! let q_l = EulerState::from_primitives(1.0, 0.0, 1.0, eq.gamma());
//! let q_r = EulerState::from_primitives(0.125, 0.0, 0.1, eq.gamma());
//! let ctx = FluxContext::new(eq, 0);
//!
//! let result = HllEntropyFix::default().solve(&q_l, &q_r, &ctx).unwrap();
//! assert!(result.flux.rho > 0.0);
//! assert!(result.max_speed > 0.0);
//! ```

use serde::{Deserialize, Serialize};

use super::hll::HllEntropyFix;
use super::rusanov::Rusanov;
use crate::equations::Euler1D;
use crate::error::{EulerError, Result, Site};
use crate::solver::EulerState;

// =============================================================================
// Flux Context
// =============================================================================

/// Context provided to Riemann solvers.
#[derive(Clone, Copy, Debug)]
pub struct FluxContext {
    /// Equation of state (carries gamma).
    pub equation: Euler1D,
    /// Interface index: interface `i` separates cells `i - 1` and `i`.
    pub interface: usize,
}

impl FluxContext {
    /// Create a new flux context.
    #[inline]
    pub fn new(equation: Euler1D, interface: usize) -> Self {
        Self {
            equation,
            interface,
        }
    }

    /// Reject a side state with non-positive density or pressure.
    pub fn check_side(&self, q: &EulerState) -> Result<()> {
        if self.equation.is_physical(q) {
            Ok(())
        } else {
            Err(EulerError::NonPhysicalState {
                site: Site::Interface(self.interface),
                density: q.rho,
                pressure: self.equation.pressure(q),
            })
        }
    }
}

/// Numerical flux and wave-speed bound at one interface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InterfaceFlux {
    /// Numerical flux (mass, momentum, energy).
    pub flux: EulerState,
    /// Largest wave speed magnitude emitted from the interface.
    pub max_speed: f64,
}

impl InterfaceFlux {
    /// Create a new interface result.
    #[inline]
    pub fn new(flux: EulerState, max_speed: f64) -> Self {
        Self { flux, max_speed }
    }
}

// =============================================================================
// Riemann Solver Trait
// =============================================================================

/// Approximate Riemann solver for the 1D Euler equations.
///
/// # Implementation Notes
///
/// - Solvers should be consistent: identical states give the physical flux
///   and a zero wave-speed bound, since no wave is emitted
/// - Either side with non-positive density or pressure is an error
/// - The `solve` method should not allocate memory
pub trait RiemannSolver: Send + Sync {
    /// Compute the numerical flux between a left and right state.
    fn solve(&self, q_l: &EulerState, q_r: &EulerState, ctx: &FluxContext)
    -> Result<InterfaceFlux>;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;

    /// Whether this solver avoids entropy-violating expansion shocks.
    fn is_entropy_stable(&self) -> bool {
        false
    }
}

// =============================================================================
// Standard Solver Enum (Zero-Cost Dispatch)
// =============================================================================

/// Enum wrapper for the built-in Riemann solvers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandardRiemannSolver {
    /// HLL with entropy fix
    #[default]
    HllEntropyFix,
    /// Rusanov / local Lax-Friedrichs (simple, robust, diffusive)
    Rusanov,
}

impl RiemannSolver for StandardRiemannSolver {
    #[inline]
    fn solve(
        &self,
        q_l: &EulerState,
        q_r: &EulerState,
        ctx: &FluxContext,
    ) -> Result<InterfaceFlux> {
        match self {
            StandardRiemannSolver::HllEntropyFix => HllEntropyFix::default().solve(q_l, q_r, ctx),
            StandardRiemannSolver::Rusanov => Rusanov.solve(q_l, q_r, ctx),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            StandardRiemannSolver::HllEntropyFix => "hll_efix",
            StandardRiemannSolver::Rusanov => "rusanov",
        }
    }

    fn is_entropy_stable(&self) -> bool {
        true
    }
}

// =============================================================================
// Boxed Solver (Runtime Polymorphism)
// =============================================================================

/// Type alias for a boxed Riemann solver.
pub type BoxedRiemannSolver = Box<dyn RiemannSolver>;

/// Create a boxed solver from the enum, for configuration-driven selection.
pub fn create_riemann_solver(kind: StandardRiemannSolver) -> BoxedRiemannSolver {
    match kind {
        StandardRiemannSolver::HllEntropyFix => Box::new(HllEntropyFix::default()),
        StandardRiemannSolver::Rusanov => Box::new(Rusanov),
    }
}
