//! 1D compressible Euler equations for an ideal gas.
//!
//! ∂ρ/∂t + ∂(ρu)/∂x = 0                    (mass)
//! ∂(ρu)/∂t + ∂(ρu² + p)/∂x = 0            (momentum)
//! ∂E/∂t + ∂(u (E + p))/∂x = 0             (energy)
//!
//! closed by the ideal-gas law p = (γ - 1)(E - ρu²/2).

use serde::{Deserialize, Serialize};

use crate::error::{EulerError, Result};
use crate::solver::EulerState;

/// Primitive variables (ρ, u, p).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Primitives {
    /// Density
    pub rho: f64,
    /// Velocity
    pub u: f64,
    /// Pressure
    pub p: f64,
}

impl Primitives {
    /// Create a new primitive state.
    pub fn new(rho: f64, u: f64, p: f64) -> Self {
        Self { rho, u, p }
    }
}

/// Ideal-gas Euler system with constant ratio of specific heats.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Euler1D {
    gamma: f64,
}

impl Euler1D {
    /// Create the equation set, rejecting `gamma <= 1`.
    pub fn new(gamma: f64) -> Result<Self> {
        if !(gamma.is_finite() && gamma > 1.0) {
            return Err(EulerError::invalid_config(format!(
                "gamma must be finite and greater than 1, got {gamma}"
            )));
        }
        Ok(Self { gamma })
    }

    /// Diatomic gas, γ = 1.4.
    pub fn air() -> Self {
        Self { gamma: 1.4 }
    }

    /// Ratio of specific heats.
    #[inline]
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Pressure p = (γ - 1)(E - ρu²/2).
    #[inline]
    pub fn pressure(&self, q: &EulerState) -> f64 {
        (self.gamma - 1.0) * (q.energy - 0.5 * q.rho_u * q.rho_u / q.rho)
    }

    /// Sound speed c = sqrt(γ p / ρ). Only meaningful for physical states.
    #[inline]
    pub fn sound_speed(&self, q: &EulerState) -> f64 {
        (self.gamma * self.pressure(q) / q.rho).sqrt()
    }

    /// Specific total enthalpy H = (E + p) / ρ.
    #[inline]
    pub fn enthalpy(&self, q: &EulerState) -> f64 {
        (q.energy + self.pressure(q)) / q.rho
    }

    /// Convert conserved to primitive variables.
    pub fn primitives(&self, q: &EulerState) -> Primitives {
        Primitives {
            rho: q.rho,
            u: q.rho_u / q.rho,
            p: self.pressure(q),
        }
    }

    /// Convert primitive to conserved variables.
    pub fn conserved(&self, w: &Primitives) -> EulerState {
        EulerState::from_primitives(w.rho, w.u, w.p, self.gamma)
    }

    /// Physical flux f(q) = (ρu, ρu² + p, u(E + p)).
    pub fn flux(&self, q: &EulerState) -> EulerState {
        let u = q.rho_u / q.rho;
        let p = self.pressure(q);
        EulerState::new(q.rho_u, q.rho_u * u + p, u * (q.energy + p))
    }

    /// Maximum characteristic speed |u| + c.
    pub fn max_wave_speed(&self, q: &EulerState) -> f64 {
        (q.rho_u / q.rho).abs() + self.sound_speed(q)
    }

    /// Characteristic speeds u - c, u, u + c.
    pub fn eigenvalues(&self, q: &EulerState) -> [f64; 3] {
        let u = q.rho_u / q.rho;
        let c = self.sound_speed(q);
        [u - c, u, u + c]
    }

    /// Check that density and pressure are strictly positive and finite.
    pub fn is_physical(&self, q: &EulerState) -> bool {
        let p = self.pressure(q);
        q.rho.is_finite() && p.is_finite() && q.rho > 0.0 && p > 0.0
    }
}

impl Default for Euler1D {
    fn default() -> Self {
        Self::air()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    #[test]
    fn test_gamma_validation() {
        assert!(Euler1D::new(1.4).is_ok());
        assert!(Euler1D::new(1.0).is_err());
        assert!(Euler1D::new(0.5).is_err());
        assert!(Euler1D::new(f64::NAN).is_err());
    }

    #[test]
    fn test_pressure_at_rest() {
        let eq = Euler1D::air();
        // E = p / (γ - 1) for u = 0
        let q = EulerState::new(1.0, 0.0, 1001.0 / 0.4);
        assert!((eq.pressure(&q) - 1001.0).abs() < 1e-9);
    }

    #[test]
    fn test_primitive_round_trip() {
        let eq = Euler1D::air();
        let w = Primitives::new(0.125, -0.3, 0.1);
        let back = eq.primitives(&eq.conserved(&w));

        assert!((back.rho - w.rho).abs() < TOL);
        assert!((back.u - w.u).abs() < TOL);
        assert!((back.p - w.p).abs() < TOL);
    }

    #[test]
    fn test_flux_at_rest() {
        let eq = Euler1D::air();
        let q = eq.conserved(&Primitives::new(1.0, 0.0, 2.5));
        let f = eq.flux(&q);

        // No mass or energy flux, momentum flux equals pressure
        assert!(f.rho.abs() < TOL);
        assert!((f.rho_u - 2.5).abs() < TOL);
        assert!(f.energy.abs() < TOL);
    }

    #[test]
    fn test_sound_speed_and_eigenvalues() {
        let eq = Euler1D::air();
        let q = eq.conserved(&Primitives::new(1.4, 2.0, 1.0));
        // c = sqrt(1.4 * 1 / 1.4) = 1
        assert!((eq.sound_speed(&q) - 1.0).abs() < TOL);

        let [l1, l2, l3] = eq.eigenvalues(&q);
        assert!((l1 - 1.0).abs() < TOL);
        assert!((l2 - 2.0).abs() < TOL);
        assert!((l3 - 3.0).abs() < TOL);
        assert!((eq.max_wave_speed(&q) - 3.0).abs() < TOL);
    }

    #[test]
    fn test_is_physical() {
        let eq = Euler1D::air();
        assert!(eq.is_physical(&EulerState::new(1.0, 0.0, 2.5)));
        assert!(!eq.is_physical(&EulerState::new(-1.0, 0.0, 2.5)));
        // Kinetic energy exceeds total energy
        assert!(!eq.is_physical(&EulerState::new(1.0, 10.0, 1.0)));
    }
}
