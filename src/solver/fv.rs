//! Godunov-type finite-volume solver with CFL-limited explicit steps.
//!
//! One call to [`FiniteVolumeSolver::advance`] performs:
//!
//! 1. Ghost filling through the configured [`BoundaryConditions`]
//! 2. One Riemann solve per interface (`n + 1` for `n` cells)
//! 3. Time step selection: `dt = cfl * dx / max_speed`, clamped to the limit
//! 4. Conservative update `q_i -= dt/dx * (F_{i+1/2} - F_{i-1/2})` into a scratch buffer
//! 5. Positivity check, then commit by swapping buffers
//!
//! A step is atomic: if a Riemann solve or the positivity check fails, the
//! caller's solution is left exactly as it was.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::reconstruction::{FaceStates, Reconstruction, muscl_hancock_faces};
use crate::boundary::BoundaryConditions;
use crate::equations::Euler1D;
use crate::error::{EulerError, Result};
use crate::flux::{BoxedRiemannSolver, FluxContext, RiemannSolver};
use crate::mesh::Grid1D;
use crate::solver::state::check_cells;
use crate::solver::{EulerSolution, EulerState};

// =============================================================================
// Configuration
// =============================================================================

/// Finite-volume solver configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Courant number, in (0, 1]
    pub cfl: f64,
    /// Step used when every interface wave speed is zero
    pub fallback_dt: f64,
    /// Interface state reconstruction
    pub reconstruction: Reconstruction,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            cfl: 0.9,
            fallback_dt: 0.1,
            reconstruction: Reconstruction::FirstOrder,
        }
    }
}

impl SolverConfig {
    /// Set CFL number.
    pub fn with_cfl(mut self, cfl: f64) -> Self {
        self.cfl = cfl;
        self
    }

    /// Set the degenerate-speed fallback step.
    pub fn with_fallback_dt(mut self, dt: f64) -> Self {
        self.fallback_dt = dt;
        self
    }

    /// Set reconstruction.
    pub fn with_reconstruction(mut self, reconstruction: Reconstruction) -> Self {
        self.reconstruction = reconstruction;
        self
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        validate_cfl(self.cfl)?;
        if !(self.fallback_dt > 0.0 && self.fallback_dt.is_finite()) {
            return Err(EulerError::invalid_config(format!(
                "fallback_dt must be positive and finite, got {}",
                self.fallback_dt
            )));
        }
        Ok(())
    }
}

fn validate_cfl(cfl: f64) -> Result<()> {
    if cfl > 0.0 && cfl <= 1.0 {
        Ok(())
    } else {
        Err(EulerError::invalid_config(format!(
            "CFL number must lie in (0, 1], got {cfl}"
        )))
    }
}

// =============================================================================
// Step bookkeeping
// =============================================================================

/// Stage of the current advance cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SolverPhase {
    /// Waiting for the next advance
    #[default]
    Idle,
    /// Evaluating interface fluxes
    ComputingFluxes,
    /// Choosing the time step
    SteppingCfl,
    /// Update committed, about to return to idle
    Updated,
}

/// Outcome of one committed step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    /// Step taken
    pub dt: f64,
    /// Largest interface wave speed
    pub max_wave_speed: f64,
    /// max_wave_speed * dt / dx
    pub courant: f64,
    /// True when every wave speed was zero and the fallback step was used
    pub degenerate: bool,
}

// =============================================================================
// Solver
// =============================================================================

/// Explicit finite-volume solver for the 1D Euler equations.
///
/// Holds the Riemann solver, the boundary conditions and reusable work
/// buffers. The conserved state itself is owned by the caller and only
/// borrowed mutably for the duration of a step.
pub struct FiniteVolumeSolver {
    riemann: BoxedRiemannSolver,
    boundaries: BoundaryConditions,
    config: SolverConfig,
    phase: SolverPhase,
    padded: Vec<EulerState>,
    faces: Vec<FaceStates>,
    fluxes: Vec<EulerState>,
    scratch: Vec<EulerState>,
}

impl FiniteVolumeSolver {
    /// Create a solver from a concrete Riemann solver.
    pub fn new(
        riemann: impl RiemannSolver + 'static,
        boundaries: BoundaryConditions,
        config: SolverConfig,
    ) -> Result<Self> {
        Self::from_boxed(Box::new(riemann), boundaries, config)
    }

    /// Create a solver from a boxed Riemann solver.
    pub fn from_boxed(
        riemann: BoxedRiemannSolver,
        boundaries: BoundaryConditions,
        config: SolverConfig,
    ) -> Result<Self> {
        config.validate()?;
        debug!(
            riemann = riemann.name(),
            lower = boundaries.lower.name(),
            upper = boundaries.upper.name(),
            reconstruction = config.reconstruction.name(),
            cfl = config.cfl,
            "finite-volume solver configured"
        );
        Ok(Self {
            riemann,
            boundaries,
            config,
            phase: SolverPhase::Idle,
            padded: Vec::new(),
            faces: Vec::new(),
            fluxes: Vec::new(),
            scratch: Vec::new(),
        })
    }

    /// Current stage of the advance cycle.
    pub fn phase(&self) -> SolverPhase {
        self.phase
    }

    /// Solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Boundary conditions.
    pub fn boundaries(&self) -> &BoundaryConditions {
        &self.boundaries
    }

    /// Name of the Riemann solver in use.
    pub fn riemann_name(&self) -> &'static str {
        self.riemann.name()
    }

    /// Interface fluxes of the most recent step attempt, `n + 1` entries.
    pub fn last_fluxes(&self) -> &[EulerState] {
        &self.fluxes
    }

    /// Advance `solution` by one CFL-limited step without passing `t_limit`.
    pub fn advance(
        &mut self,
        solution: &mut EulerSolution,
        grid: &Grid1D,
        t_limit: f64,
    ) -> Result<StepReport> {
        let cfl = self.config.cfl;
        self.advance_with_cfl(solution, grid, t_limit, cfl)
    }

    /// Same as [`advance`](Self::advance) with an explicit CFL number.
    ///
    /// On error the solution is unchanged.
    pub fn advance_with_cfl(
        &mut self,
        solution: &mut EulerSolution,
        grid: &Grid1D,
        t_limit: f64,
        cfl: f64,
    ) -> Result<StepReport> {
        validate_cfl(cfl)?;
        if solution.n_cells() != grid.n_cells() {
            return Err(EulerError::invalid_config(format!(
                "solution has {} cells but grid has {}",
                solution.n_cells(),
                grid.n_cells()
            )));
        }
        let remaining = t_limit - solution.time;
        if !(remaining > 0.0) {
            return Err(EulerError::invalid_config(format!(
                "step limit {t_limit} does not lie ahead of time {}",
                solution.time
            )));
        }

        let result = self.step(solution, grid, t_limit, remaining, cfl);
        self.phase = SolverPhase::Idle;
        result
    }

    fn step(
        &mut self,
        solution: &mut EulerSolution,
        grid: &Grid1D,
        t_limit: f64,
        remaining: f64,
        cfl: f64,
    ) -> Result<StepReport> {
        let equation = *solution.equation();
        let dx = grid.dx();
        let n = solution.n_cells();
        let reconstruction = self.config.reconstruction;

        self.boundaries
            .fill_ghosts_into(solution, reconstruction.n_ghost(), &mut self.padded);

        let (dt, max_wave_speed, degenerate) = match reconstruction {
            Reconstruction::FirstOrder => {
                self.phase = SolverPhase::ComputingFluxes;
                let padded = &self.padded;
                let max_speed = compute_interface_fluxes(
                    self.riemann.as_ref(),
                    &equation,
                    n + 1,
                    |i| (padded[i], padded[i + 1]),
                    &mut self.fluxes,
                )?;

                self.phase = SolverPhase::SteppingCfl;
                let (dt, degenerate) = self.select_dt(max_speed, dx, remaining, cfl);
                (dt, max_speed, degenerate)
            }
            Reconstruction::MusclHancock(limiter) => {
                // The predictor needs dt before any interface is solved
                self.phase = SolverPhase::SteppingCfl;
                let cell_speed = self
                    .padded
                    .iter()
                    .map(|q| equation.max_wave_speed(q))
                    .fold(0.0, f64::max);
                let (dt, degenerate) = self.select_dt(cell_speed, dx, remaining, cfl);

                self.phase = SolverPhase::ComputingFluxes;
                muscl_hancock_faces(&self.padded, limiter, &equation, dt / dx, &mut self.faces);
                let faces = &self.faces;
                let max_speed = compute_interface_fluxes(
                    self.riemann.as_ref(),
                    &equation,
                    n + 1,
                    |i| (faces[i].right, faces[i + 1].left),
                    &mut self.fluxes,
                )?;
                (dt, max_speed.max(cell_speed), degenerate)
            }
        };

        // Conservative update into scratch; the live state is untouched until commit
        let ratio = dt / dx;
        let interior = &self.padded[reconstruction.n_ghost()..reconstruction.n_ghost() + n];
        self.scratch.clear();
        self.scratch.extend(
            interior
                .iter()
                .zip(self.fluxes.windows(2))
                .map(|(q, f)| *q - (f[1] - f[0]) * ratio),
        );
        check_cells(&self.scratch, &equation)?;

        solution.replace_cells(&mut self.scratch);
        solution.time = if dt >= remaining {
            t_limit
        } else {
            solution.time + dt
        };
        self.phase = SolverPhase::Updated;

        let report = StepReport {
            dt,
            max_wave_speed,
            courant: max_wave_speed * dt / dx,
            degenerate,
        };
        trace!(
            t = solution.time,
            dt,
            courant = report.courant,
            "step committed"
        );
        Ok(report)
    }

    fn select_dt(&self, max_speed: f64, dx: f64, remaining: f64, cfl: f64) -> (f64, bool) {
        let degenerate = !(max_speed > 0.0);
        let dt = if degenerate {
            debug!(
                fallback_dt = self.config.fallback_dt,
                "all wave speeds are zero, using fallback step"
            );
            self.config.fallback_dt
        } else {
            cfl * dx / max_speed
        };
        (dt.min(remaining), degenerate)
    }
}

impl std::fmt::Debug for FiniteVolumeSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FiniteVolumeSolver")
            .field("riemann", &self.riemann.name())
            .field("boundaries", &self.boundaries)
            .field("config", &self.config)
            .field("phase", &self.phase)
            .finish()
    }
}

/// Solve `n_interfaces` Riemann problems, writing fluxes to `out`.
///
/// Returns the largest wave speed.
#[cfg(not(feature = "parallel"))]
fn compute_interface_fluxes<F>(
    riemann: &dyn RiemannSolver,
    equation: &Euler1D,
    n_interfaces: usize,
    states: F,
    out: &mut Vec<EulerState>,
) -> Result<f64>
where
    F: Fn(usize) -> (EulerState, EulerState),
{
    out.clear();
    let mut max_speed: f64 = 0.0;
    for i in 0..n_interfaces {
        let (q_l, q_r) = states(i);
        let result = riemann.solve(&q_l, &q_r, &FluxContext::new(*equation, i))?;
        max_speed = max_speed.max(result.max_speed);
        out.push(result.flux);
    }
    Ok(max_speed)
}

/// Parallel version: interfaces are independent, so they are solved with rayon.
#[cfg(feature = "parallel")]
fn compute_interface_fluxes<F>(
    riemann: &dyn RiemannSolver,
    equation: &Euler1D,
    n_interfaces: usize,
    states: F,
    out: &mut Vec<EulerState>,
) -> Result<f64>
where
    F: Fn(usize) -> (EulerState, EulerState) + Sync,
{
    let results: Vec<_> = (0..n_interfaces)
        .into_par_iter()
        .map(|i| {
            let (q_l, q_r) = states(i);
            riemann.solve(&q_l, &q_r, &FluxContext::new(*equation, i))
        })
        .collect::<Result<_>>()?;

    out.clear();
    out.extend(results.iter().map(|r| r.flux));
    Ok(results.iter().map(|r| r.max_speed).fold(0.0, f64::max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::Primitives;
    use crate::error::Site;
    use crate::flux::{HllEntropyFix, InterfaceFlux, Rusanov};
    use crate::solver::SlopeLimiter;

    const TOL: f64 = 1e-12;

    fn sod(n: usize) -> (Grid1D, EulerSolution) {
        let grid = Grid1D::new(0.0, 1.0, n).unwrap();
        let q = EulerSolution::from_primitives(&grid, Euler1D::air(), |x| {
            if x < 0.5 {
                Primitives::new(1.0, 0.0, 1.0)
            } else {
                Primitives::new(0.125, 0.0, 0.1)
            }
        })
        .unwrap();
        (grid, q)
    }

    fn hll_solver(config: SolverConfig) -> FiniteVolumeSolver {
        FiniteVolumeSolver::new(
            HllEntropyFix::default(),
            BoundaryConditions::extrapolation(),
            config,
        )
        .unwrap()
    }

    #[test]
    fn test_config_validation() {
        assert!(SolverConfig::default().validate().is_ok());
        assert!(SolverConfig::default().with_cfl(0.0).validate().is_err());
        assert!(SolverConfig::default().with_cfl(1.5).validate().is_err());
        assert!(SolverConfig::default().with_cfl(f64::NAN).validate().is_err());
        assert!(
            SolverConfig::default()
                .with_fallback_dt(-1.0)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_step_respects_cfl() {
        let (grid, mut q) = sod(100);
        let mut solver = hll_solver(SolverConfig::default());

        let report = solver.advance(&mut q, &grid, 1.0).unwrap();

        assert!(!report.degenerate);
        assert!((report.courant - 0.9).abs() < TOL);
        assert!((q.time - report.dt).abs() < TOL);
        assert_eq!(solver.phase(), SolverPhase::Idle);
        assert_eq!(solver.last_fluxes().len(), 101);
    }

    #[test]
    fn test_step_clamped_to_limit() {
        let (grid, mut q) = sod(100);
        let mut solver = hll_solver(SolverConfig::default());

        let report = solver.advance(&mut q, &grid, 1e-4).unwrap();

        assert!((report.dt - 1e-4).abs() < TOL);
        assert_eq!(q.time, 1e-4);
        assert!(report.courant < 0.9);
    }

    #[test]
    fn test_degenerate_uses_fallback() {
        let grid = Grid1D::new(0.0, 1.0, 10).unwrap();
        let state = EulerState::from_primitives(1.0, 0.3, 1.0, 1.4);
        let mut q = EulerSolution::uniform(10, state, Euler1D::air()).unwrap();
        let mut solver = hll_solver(SolverConfig::default().with_fallback_dt(0.05));

        let report = solver.advance(&mut q, &grid, 1.0).unwrap();
        assert!(report.degenerate);
        assert_eq!(report.dt, 0.05);

        let report = solver.advance(&mut q, &grid, 0.07).unwrap();
        assert!((report.dt - 0.02).abs() < TOL);
        assert_eq!(q.time, 0.07);

        for cell in q.cells() {
            assert!((cell.rho - state.rho).abs() < TOL);
            assert!((cell.rho_u - state.rho_u).abs() < TOL);
            assert!((cell.energy - state.energy).abs() < TOL);
        }
    }

    #[test]
    fn test_interior_conservation() {
        // Reflective walls: nothing crosses the boundary
        let (grid, mut q) = sod(64);
        let mut solver = FiniteVolumeSolver::new(
            Rusanov,
            BoundaryConditions::reflective(),
            SolverConfig::default(),
        )
        .unwrap();
        let dx = grid.dx();
        let mass0 = q.total_mass(dx);
        let energy0 = q.total_energy(dx);

        for _ in 0..20 {
            solver.advance(&mut q, &grid, 10.0).unwrap();
        }

        assert!((q.total_mass(dx) - mass0).abs() < 1e-12);
        assert!((q.total_energy(dx) - energy0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_limit_rejected() {
        let (grid, mut q) = sod(10);
        let mut solver = hll_solver(SolverConfig::default());
        let before = q.clone();

        assert!(solver.advance(&mut q, &grid, 0.0).is_err());
        assert_eq!(q, before);
    }

    #[test]
    fn test_grid_mismatch_rejected() {
        let (_, mut q) = sod(10);
        let other = Grid1D::new(0.0, 1.0, 11).unwrap();
        let mut solver = hll_solver(SolverConfig::default());

        let err = solver.advance(&mut q, &other, 1.0).unwrap_err();
        assert!(matches!(err, EulerError::InvalidConfig(_)));
    }

    /// Pushes a huge mass flux through one interface.
    struct MassPump {
        interface: usize,
    }

    impl RiemannSolver for MassPump {
        fn solve(
            &self,
            q_l: &EulerState,
            q_r: &EulerState,
            ctx: &FluxContext,
        ) -> Result<InterfaceFlux> {
            let mut result = HllEntropyFix::default().solve(q_l, q_r, ctx)?;
            if ctx.interface == self.interface {
                result.flux.rho += 1e6;
            }
            Ok(result)
        }

        fn name(&self) -> &'static str {
            "mass_pump"
        }
    }

    #[test]
    fn test_rollback_on_negative_density() {
        let (grid, mut q) = sod(20);
        let before = q.clone();
        let mut solver = FiniteVolumeSolver::new(
            MassPump { interface: 5 },
            BoundaryConditions::extrapolation(),
            SolverConfig::default(),
        )
        .unwrap();

        let err = solver.advance(&mut q, &grid, 1.0).unwrap_err();

        // Cell 4 loses the mass flowing out through interface 5
        assert!(matches!(
            err,
            EulerError::NonPhysicalState {
                site: Site::Cell(4),
                ..
            }
        ));
        assert_eq!(q, before);
        assert_eq!(solver.phase(), SolverPhase::Idle);
    }

    #[test]
    fn test_muscl_step() {
        let (grid, mut q) = sod(100);
        let config = SolverConfig::default()
            .with_reconstruction(Reconstruction::MusclHancock(SlopeLimiter::VanLeer))
            .with_cfl(0.5);
        let mut solver = hll_solver(config);
        let mass0 = q.total_mass(grid.dx());

        for _ in 0..10 {
            let report = solver.advance(&mut q, &grid, 1.0).unwrap();
            assert!(report.courant <= 1.0);
        }

        // Extrapolation ends, waves have not reached them yet
        assert!((q.total_mass(grid.dx()) - mass0).abs() < 1e-12);
        assert!(q.check_physical().is_ok());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_fluxes_match_serial() {
        let (grid, q) = sod(50);
        let padded = BoundaryConditions::extrapolation().fill_ghosts(&q, 1);
        let mut fluxes = Vec::new();

        let max_speed = compute_interface_fluxes(
            &HllEntropyFix::default(),
            q.equation(),
            grid.n_cells() + 1,
            |i| (padded[i], padded[i + 1]),
            &mut fluxes,
        )
        .unwrap();

        for (i, f) in fluxes.iter().enumerate() {
            let expected = HllEntropyFix::default()
                .solve(&padded[i], &padded[i + 1], &FluxContext::new(*q.equation(), i))
                .unwrap();
            assert_eq!(*f, expected.flux);
            assert!(expected.max_speed <= max_speed);
        }
    }
}
