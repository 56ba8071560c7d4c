//! HLL (Harten-Lax-van Leer) approximate Riemann solver with entropy fix.
//!
//! The HLL solver replaces the three-wave Euler fan by two bounding waves
//! with speeds s_l <= s_r and one averaged intermediate state:
//!
//! F* = (s_r * F_l - s_l * F_r + s_l * s_r * (q_r - q_l)) / (s_r - s_l)
//!
//! falling back to the upwind flux F_l (s_l >= 0) or F_r (s_r <= 0) when
//! both waves travel the same way.
//!
//! Wave speeds use the Einfeldt estimates built from Roe averages, which
//! bound the physical signal speeds and keep the scheme positivity
//! preserving.
//!
//! Entropy fix: in the transonic case s_l < 0 < s_r the spread s_r - s_l
//! is floored at `min_spread`. A rarefaction fan straddling zero with an
//! almost degenerate spread is then blended smoothly instead of dividing by
//! a vanishing denominator, and no expansion shock is produced.
//!
//! Reference: Toro, "Riemann Solvers and Numerical Methods for Fluid Dynamics", ch. 10

use super::traits::{FluxContext, InterfaceFlux, RiemannSolver};
use crate::equations::Euler1D;
use crate::error::Result;
use crate::solver::EulerState;

/// Default floor on s_r - s_l.
pub const DEFAULT_MIN_SPREAD: f64 = 1e-10;

/// HLL numerical flux for the 1D Euler equations.
///
/// # Arguments
/// * `q_l` - Left state
/// * `q_r` - Right state
/// * `ctx` - Flux context (equation of state, interface index)
/// * `min_spread` - Floor applied to s_r - s_l in the transonic case
///
/// # Returns
/// Numerical flux and max(|s_l|, |s_r|)
pub fn hll_flux_euler(
    q_l: &EulerState,
    q_r: &EulerState,
    ctx: &FluxContext,
    min_spread: f64,
) -> Result<InterfaceFlux> {
    ctx.check_side(q_l)?;
    ctx.check_side(q_r)?;

    let eq = &ctx.equation;

    // Continuous data: exact physical flux, no wave
    if q_l == q_r {
        return Ok(InterfaceFlux::new(eq.flux(q_l), 0.0));
    }

    let (s_l, s_r) = einfeldt_speeds(q_l, q_r, eq);
    let max_speed = s_l.abs().max(s_r.abs());

    let flux = if s_l >= 0.0 {
        // All waves go right, use left flux
        eq.flux(q_l)
    } else if s_r <= 0.0 {
        // All waves go left, use right flux
        eq.flux(q_r)
    } else {
        // Transonic: blend with floored spread
        let f_l = eq.flux(q_l);
        let f_r = eq.flux(q_r);
        let inv_ds = 1.0 / (s_r - s_l).max(min_spread);

        (f_l * s_r - f_r * s_l + (*q_r - *q_l) * (s_l * s_r)) * inv_ds
    };

    Ok(InterfaceFlux::new(flux, max_speed))
}

/// Einfeldt wave speed estimates.
///
/// s_l = min(u_l - c_l, ū - c̄), s_r = max(u_r + c_r, ū + c̄)
/// where ū, c̄ come from Roe averages.
pub fn einfeldt_speeds(q_l: &EulerState, q_r: &EulerState, eq: &Euler1D) -> (f64, f64) {
    let u_l = q_l.velocity();
    let u_r = q_r.velocity();
    let c_l = eq.sound_speed(q_l);
    let c_r = eq.sound_speed(q_r);

    // Roe-averaged velocity and enthalpy
    let sqrt_rho_l = q_l.rho.sqrt();
    let sqrt_rho_r = q_r.rho.sqrt();
    let inv_sum = 1.0 / (sqrt_rho_l + sqrt_rho_r);

    let u_roe = (sqrt_rho_l * u_l + sqrt_rho_r * u_r) * inv_sum;
    let h_roe = (sqrt_rho_l * eq.enthalpy(q_l) + sqrt_rho_r * eq.enthalpy(q_r)) * inv_sum;
    let c_roe = ((eq.gamma() - 1.0) * (h_roe - 0.5 * u_roe * u_roe))
        .max(0.0)
        .sqrt();

    let s_l = (u_l - c_l).min(u_roe - c_roe);
    let s_r = (u_r + c_r).max(u_roe + c_roe);

    (s_l, s_r)
}

/// HLL Riemann solver with entropy fix.
#[derive(Clone, Copy, Debug)]
pub struct HllEntropyFix {
    /// Floor applied to the wave-speed spread in transonic fans.
    pub min_spread: f64,
}

impl HllEntropyFix {
    /// Create with a custom spread floor.
    pub fn with_min_spread(min_spread: f64) -> Self {
        Self { min_spread }
    }
}

impl Default for HllEntropyFix {
    fn default() -> Self {
        Self {
            min_spread: DEFAULT_MIN_SPREAD,
        }
    }
}

impl RiemannSolver for HllEntropyFix {
    #[inline]
    fn solve(
        &self,
        q_l: &EulerState,
        q_r: &EulerState,
        ctx: &FluxContext,
    ) -> Result<InterfaceFlux> {
        hll_flux_euler(q_l, q_r, ctx, self.min_spread)
    }

    fn name(&self) -> &'static str {
        "hll_efix"
    }

    fn is_entropy_stable(&self) -> bool {
        true
    }
}
