//! Exact solution of the Riemann problem for the ideal-gas Euler equations.
//!
//! The star-region pressure p* solves
//!
//! f_L(p*) + f_R(p*) + (u_R - u_L) = 0
//!
//! where f_K is the shock (Rankine-Hugoniot) branch for p > p_K and the
//! rarefaction (isentropic) branch otherwise. The root is found by Newton
//! iteration from the primitive-variable (PVRS) guess; the self-similar
//! solution is then sampled at s = (x - x0) / t.
//!
//! Used as the reference solution for convergence studies.
//!
//! Reference: Toro, "Riemann Solvers and Numerical Methods for Fluid Dynamics", ch. 4

use super::euler::Primitives;
use crate::error::{EulerError, Result};

const PRESSURE_TOL: f64 = 1e-12;
const MAX_ITERATIONS: usize = 100;

/// Exact Riemann solution between two constant primitive states.
#[derive(Clone, Copy, Debug)]
pub struct ExactRiemannSolver {
    left: Primitives,
    right: Primitives,
    gamma: f64,
    c_l: f64,
    c_r: f64,
    p_star: f64,
    u_star: f64,
}

impl ExactRiemannSolver {
    /// Solve the Riemann problem for the given states.
    ///
    /// Fails if a state is non-physical or the data generate vacuum.
    pub fn new(left: Primitives, right: Primitives, gamma: f64) -> Result<Self> {
        for w in [&left, &right] {
            if !(w.rho > 0.0 && w.p > 0.0) {
                return Err(EulerError::invalid_config(format!(
                    "exact Riemann solver needs positive density and pressure, got {w:?}"
                )));
            }
        }

        let c_l = (gamma * left.p / left.rho).sqrt();
        let c_r = (gamma * right.p / right.rho).sqrt();

        // Pressure positivity condition
        if 2.0 / (gamma - 1.0) * (c_l + c_r) <= right.u - left.u {
            return Err(EulerError::invalid_config(
                "initial data generate vacuum".to_string(),
            ));
        }

        let mut solver = Self {
            left,
            right,
            gamma,
            c_l,
            c_r,
            p_star: 0.0,
            u_star: 0.0,
        };
        solver.solve_star_region();
        Ok(solver)
    }

    /// Star-region pressure.
    pub fn p_star(&self) -> f64 {
        self.p_star
    }

    /// Star-region (contact) velocity.
    pub fn u_star(&self) -> f64 {
        self.u_star
    }

    fn solve_star_region(&mut self) {
        let (l, r) = (self.left, self.right);
        let du = r.u - l.u;

        // PVRS initial guess
        let p_pv = 0.5 * (l.p + r.p) - 0.125 * du * (l.rho + r.rho) * (self.c_l + self.c_r);
        let mut p = p_pv.max(PRESSURE_TOL);

        for _ in 0..MAX_ITERATIONS {
            let (f_l, df_l) = self.pressure_function(p, &l, self.c_l);
            let (f_r, df_r) = self.pressure_function(p, &r, self.c_r);

            let mut p_new = p - (f_l + f_r + du) / (df_l + df_r);
            if p_new < 0.0 {
                p_new = PRESSURE_TOL;
            }

            let change = 2.0 * (p_new - p).abs() / (p_new + p);
            p = p_new;
            if change < PRESSURE_TOL {
                break;
            }
        }

        let (f_l, _) = self.pressure_function(p, &l, self.c_l);
        let (f_r, _) = self.pressure_function(p, &r, self.c_r);

        self.p_star = p;
        self.u_star = 0.5 * (l.u + r.u) + 0.5 * (f_r - f_l);
    }

    /// f_K(p) and its derivative.
    fn pressure_function(&self, p: f64, w: &Primitives, c: f64) -> (f64, f64) {
        let g = self.gamma;

        if p > w.p {
            // Shock
            let a = 2.0 / ((g + 1.0) * w.rho);
            let b = (g - 1.0) / (g + 1.0) * w.p;
            let q = (a / (p + b)).sqrt();
            let f = (p - w.p) * q;
            let df = q * (1.0 - 0.5 * (p - w.p) / (b + p));
            (f, df)
        } else {
            // Rarefaction
            let ratio = p / w.p;
            let f = 2.0 * c / (g - 1.0) * (ratio.powf((g - 1.0) / (2.0 * g)) - 1.0);
            let df = 1.0 / (w.rho * c) * ratio.powf(-(g + 1.0) / (2.0 * g));
            (f, df)
        }
    }

    /// Sample the self-similar solution at speed s = x / t.
    pub fn sample(&self, s: f64) -> Primitives {
        let g = self.gamma;
        let (l, r) = (self.left, self.right);
        let (p_star, u_star) = (self.p_star, self.u_star);
        let g6 = (g - 1.0) / (g + 1.0);

        if s <= u_star {
            let ratio = p_star / l.p;
            if p_star > l.p {
                let s_shock =
                    l.u - self.c_l * ((g + 1.0) / (2.0 * g) * ratio + (g - 1.0) / (2.0 * g)).sqrt();
                if s <= s_shock {
                    l
                } else {
                    let rho = l.rho * (ratio + g6) / (g6 * ratio + 1.0);
                    Primitives::new(rho, u_star, p_star)
                }
            } else {
                let s_head = l.u - self.c_l;
                if s <= s_head {
                    return l;
                }
                let c_star = self.c_l * ratio.powf((g - 1.0) / (2.0 * g));
                let s_tail = u_star - c_star;
                if s > s_tail {
                    Primitives::new(l.rho * ratio.powf(1.0 / g), u_star, p_star)
                } else {
                    let c = 2.0 / (g + 1.0) * (self.c_l + 0.5 * (g - 1.0) * (l.u - s));
                    let u = 2.0 / (g + 1.0) * (self.c_l + 0.5 * (g - 1.0) * l.u + s);
                    let rho = l.rho * (c / self.c_l).powf(2.0 / (g - 1.0));
                    let p = l.p * (c / self.c_l).powf(2.0 * g / (g - 1.0));
                    Primitives::new(rho, u, p)
                }
            }
        } else {
            let ratio = p_star / r.p;
            if p_star > r.p {
                let s_shock =
                    r.u + self.c_r * ((g + 1.0) / (2.0 * g) * ratio + (g - 1.0) / (2.0 * g)).sqrt();
                if s >= s_shock {
                    r
                } else {
                    let rho = r.rho * (ratio + g6) / (g6 * ratio + 1.0);
                    Primitives::new(rho, u_star, p_star)
                }
            } else {
                let s_head = r.u + self.c_r;
                if s >= s_head {
                    return r;
                }
                let c_star = self.c_r * ratio.powf((g - 1.0) / (2.0 * g));
                let s_tail = u_star + c_star;
                if s <= s_tail {
                    Primitives::new(r.rho * ratio.powf(1.0 / g), u_star, p_star)
                } else {
                    let c = 2.0 / (g + 1.0) * (self.c_r - 0.5 * (g - 1.0) * (r.u - s));
                    let u = 2.0 / (g + 1.0) * (-self.c_r + 0.5 * (g - 1.0) * r.u + s);
                    let rho = r.rho * (c / self.c_r).powf(2.0 / (g - 1.0));
                    let p = r.p * (c / self.c_r).powf(2.0 * g / (g - 1.0));
                    Primitives::new(rho, u, p)
                }
            }
        }
    }

    /// Sample at position `x` and time `t > 0` for a diaphragm at `x0`.
    pub fn sample_at(&self, x: f64, x0: f64, t: f64) -> Primitives {
        self.sample((x - x0) / t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAMMA: f64 = 1.4;

    #[test]
    fn test_sod_star_state() {
        // Toro test 1
        let left = Primitives::new(1.0, 0.0, 1.0);
        let right = Primitives::new(0.125, 0.0, 0.1);
        let exact = ExactRiemannSolver::new(left, right, GAMMA).unwrap();

        assert!((exact.p_star() - 0.30313).abs() < 1e-4, "p* = {}", exact.p_star());
        assert!((exact.u_star() - 0.92745).abs() < 1e-4, "u* = {}", exact.u_star());
    }

    #[test]
    fn test_sod_far_field_unchanged() {
        let left = Primitives::new(1.0, 0.0, 1.0);
        let right = Primitives::new(0.125, 0.0, 0.1);
        let exact = ExactRiemannSolver::new(left, right, GAMMA).unwrap();

        assert_eq!(exact.sample(-10.0), left);
        assert_eq!(exact.sample(10.0), right);
    }

    #[test]
    fn test_sod_contact_density_jump() {
        let left = Primitives::new(1.0, 0.0, 1.0);
        let right = Primitives::new(0.125, 0.0, 0.1);
        let exact = ExactRiemannSolver::new(left, right, GAMMA).unwrap();

        let u_star = exact.u_star();
        let rho_left_star = exact.sample(u_star - 1e-6).rho;
        let rho_right_star = exact.sample(u_star + 1e-6).rho;

        // Toro: rho*L = 0.42632, rho*R = 0.26557
        assert!((rho_left_star - 0.42632).abs() < 1e-4);
        assert!((rho_right_star - 0.26557).abs() < 1e-4);
    }

    #[test]
    fn test_identical_states() {
        let w = Primitives::new(1.0, 0.5, 2.0);
        let exact = ExactRiemannSolver::new(w, w, GAMMA).unwrap();

        assert!((exact.p_star() - 2.0).abs() < 1e-9);
        assert!((exact.u_star() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_rarefaction_fan_continuous() {
        // Toro test 2 (123 problem): two symmetric rarefactions
        let left = Primitives::new(1.0, -2.0, 0.4);
        let right = Primitives::new(1.0, 2.0, 0.4);
        let exact = ExactRiemannSolver::new(left, right, GAMMA).unwrap();

        assert!((exact.p_star() - 0.00189).abs() < 1e-4);
        assert!(exact.u_star().abs() < 1e-9);

        // Sampling through the fan stays positive and monotone in velocity
        let mut last_u = f64::NEG_INFINITY;
        for i in 0..50 {
            let s = -3.0 + 6.0 * i as f64 / 49.0;
            let w = exact.sample(s);
            assert!(w.rho > 0.0 && w.p > 0.0);
            assert!(w.u >= last_u - 1e-12);
            last_u = w.u;
        }
    }

    #[test]
    fn test_vacuum_rejected() {
        let left = Primitives::new(1.0, -20.0, 0.4);
        let right = Primitives::new(1.0, 20.0, 0.4);
        assert!(ExactRiemannSolver::new(left, right, GAMMA).is_err());
    }
}
