//! Run controller implementation.
//!
//! Drives the finite-volume solver through a sequence of uniformly spaced
//! output times, records gauges after every committed step and captures a
//! snapshot at each output time.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{EulerError, Result};
use crate::gauges::GaugeRecorder;
use crate::mesh::Grid1D;
use crate::solver::{
    DiagnosticsTracker, EulerDiagnostics, EulerSolution, FiniteVolumeSolver, ProgressReporter,
    Snapshot, StepReport,
};

// =============================================================================
// Controller Configuration
// =============================================================================

/// Configuration for a controlled run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Final simulation time.
    pub t_final: f64,
    /// Number of output times after the initial frame.
    pub num_output_times: usize,
    /// Retain snapshots in memory (otherwise they only reach the frame callback).
    pub keep_copy: bool,
    /// Maximum number of steps between two output times.
    pub max_steps: usize,
    /// Retries of a rejected step, each with the CFL number halved.
    pub max_step_retries: usize,
    /// Gauge whose maximum is reported as the primary result.
    pub primary_gauge: usize,
    /// Progress event interval in percent of simulated time.
    pub progress_interval_pct: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            t_final: 1.0,
            num_output_times: 10,
            keep_copy: true,
            max_steps: 10_000,
            max_step_retries: 2,
            primary_gauge: 0,
            progress_interval_pct: 10,
        }
    }
}

impl ControllerConfig {
    /// Config running to `t_final` with default settings otherwise.
    pub fn new(t_final: f64) -> Self {
        Self {
            t_final,
            ..Self::default()
        }
    }

    /// Set the final time.
    pub fn with_t_final(mut self, t_final: f64) -> Self {
        self.t_final = t_final;
        self
    }

    /// Set the number of output times.
    pub fn with_num_output_times(mut self, n: usize) -> Self {
        self.num_output_times = n;
        self
    }

    /// Choose whether snapshots are retained.
    pub fn with_keep_copy(mut self, keep_copy: bool) -> Self {
        self.keep_copy = keep_copy;
        self
    }

    /// Set the per-interval step budget.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the number of retries for a rejected step.
    pub fn with_max_step_retries(mut self, retries: usize) -> Self {
        self.max_step_retries = retries;
        self
    }

    /// Set the primary gauge index.
    pub fn with_primary_gauge(mut self, index: usize) -> Self {
        self.primary_gauge = index;
        self
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.t_final.is_finite() {
            return Err(EulerError::invalid_config(format!(
                "t_final must be finite, got {}",
                self.t_final
            )));
        }
        if self.num_output_times == 0 {
            return Err(EulerError::invalid_config(
                "num_output_times must be at least 1",
            ));
        }
        if self.max_steps == 0 {
            return Err(EulerError::invalid_config("max_steps must be at least 1"));
        }
        Ok(())
    }

    /// Output times `t0 + k (t_final - t0) / N` for `k = 1..=N`, the last one exactly `t_final`.
    pub fn output_times(&self, t0: f64) -> Vec<f64> {
        let n = self.num_output_times;
        let span = self.t_final - t0;
        (1..=n)
            .map(|k| {
                if k == n {
                    self.t_final
                } else {
                    t0 + k as f64 * span / n as f64
                }
            })
            .collect()
    }
}

// =============================================================================
// Run Summary
// =============================================================================

/// Statistics of a completed run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// Final simulation time reached.
    pub final_time: f64,
    /// Total number of committed steps.
    pub n_steps: usize,
    /// Rejected step attempts that were retried.
    pub n_retries: usize,
    /// Frames produced, including the initial one.
    pub n_frames: usize,
    /// Smallest step taken.
    pub dt_min: f64,
    /// Largest step taken.
    pub dt_max: f64,
    /// Wall-clock time in seconds.
    pub wall_time: f64,
    /// Maximum of the first value recorded at the primary gauge.
    pub primary_gauge_max: Option<f64>,
    /// Maximum of the first value recorded at every gauge.
    pub gauge_maxima: Vec<Option<f64>>,
}

// =============================================================================
// Controller
// =============================================================================

/// Runs a simulation to a series of output times.
///
/// The controller owns the grid, the conserved state, the solver and the
/// gauges. The state is only ever replaced by committed steps, so after a
/// failed run it still holds the last valid state.
#[derive(Debug)]
pub struct Controller {
    grid: Grid1D,
    solution: EulerSolution,
    solver: FiniteVolumeSolver,
    gauges: GaugeRecorder,
    config: ControllerConfig,
    frames: Vec<Snapshot>,
    n_frames: usize,
    tracker: DiagnosticsTracker,
}

impl Controller {
    /// Assemble a controller. Fails on an inconsistent setup before any step runs.
    pub fn new(
        grid: Grid1D,
        solution: EulerSolution,
        solver: FiniteVolumeSolver,
        gauges: GaugeRecorder,
        config: ControllerConfig,
    ) -> Result<Self> {
        config.validate()?;
        if solution.n_cells() != grid.n_cells() {
            return Err(EulerError::invalid_config(format!(
                "solution has {} cells but grid has {}",
                solution.n_cells(),
                grid.n_cells()
            )));
        }
        if config.t_final <= solution.time {
            return Err(EulerError::invalid_config(format!(
                "t_final = {} must exceed the initial time {}",
                config.t_final, solution.time
            )));
        }
        if !gauges.is_empty() && config.primary_gauge >= gauges.len() {
            return Err(EulerError::invalid_config(format!(
                "primary gauge {} but only {} gauges configured",
                config.primary_gauge,
                gauges.len()
            )));
        }

        let tracker = DiagnosticsTracker::new(EulerDiagnostics::compute(&solution, &grid, 0.0));

        Ok(Self {
            grid,
            solution,
            solver,
            gauges,
            config,
            frames: Vec::new(),
            n_frames: 0,
            tracker,
        })
    }

    /// Grid.
    pub fn grid(&self) -> &Grid1D {
        &self.grid
    }

    /// Current (last committed) state.
    pub fn solution(&self) -> &EulerSolution {
        &self.solution
    }

    /// Current simulation time.
    pub fn time(&self) -> f64 {
        self.solution.time
    }

    /// The finite-volume solver.
    pub fn solver(&self) -> &FiniteVolumeSolver {
        &self.solver
    }

    /// Gauges and their histories.
    pub fn gauges(&self) -> &GaugeRecorder {
        &self.gauges
    }

    /// Run configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Retained snapshots (empty when `keep_copy` is false).
    pub fn frames(&self) -> &[Snapshot] {
        &self.frames
    }

    /// Conservation diagnostics, updated at every frame.
    pub fn diagnostics(&self) -> &DiagnosticsTracker {
        &self.tracker
    }

    /// Copy of the last committed state, for inspection after a failure.
    pub fn last_valid_snapshot(&self) -> Snapshot {
        self.solution.snapshot(self.n_frames)
    }

    /// Run to `t_final`.
    pub fn run(&mut self) -> Result<RunSummary> {
        self.run_with_callback(|_| {})
    }

    /// Run to `t_final`, passing every output frame to `on_frame`.
    ///
    /// Frame 0 is the initial state. A step rejected for a non-physical
    /// state is retried with half the CFL number up to `max_step_retries`
    /// times; after that the error is returned and the state stays at the
    /// last committed step.
    pub fn run_with_callback<F>(&mut self, mut on_frame: F) -> Result<RunSummary>
    where
        F: FnMut(&Snapshot),
    {
        let start_wall = Instant::now();
        let t0 = self.solution.time;
        let t_final = self.config.t_final;
        if t_final <= t0 {
            return Err(EulerError::invalid_config(format!(
                "t_final = {t_final} must exceed the current time {t0}"
            )));
        }

        info!(
            n_cells = self.grid.n_cells(),
            riemann = self.solver.riemann_name(),
            t0,
            t_final,
            outputs = self.config.num_output_times,
            gauges = self.gauges.len(),
            "starting run"
        );

        let mut progress =
            ProgressReporter::new(t0, t_final, self.config.progress_interval_pct);
        let mut n_steps = 0;
        let mut n_retries = 0;
        let mut dt_min = f64::INFINITY;
        let mut dt_max: f64 = 0.0;
        let mut last_dt = 0.0;

        self.gauges.record(&self.solution, &self.grid, t0)?;
        self.emit_frame(0, last_dt, &mut on_frame);

        for (k, t_out) in self.config.output_times(t0).into_iter().enumerate() {
            let mut interval_steps = 0;

            while self.solution.time < t_out {
                if interval_steps >= self.config.max_steps {
                    warn!(
                        max_steps = self.config.max_steps,
                        t = self.solution.time,
                        "step budget exhausted"
                    );
                    return Err(EulerError::MaxStepsExceeded {
                        max_steps: self.config.max_steps,
                        time: self.solution.time,
                    });
                }

                let (report, retries) = self.step_with_retries(t_out)?;
                n_steps += 1;
                n_retries += retries;
                interval_steps += 1;
                dt_min = dt_min.min(report.dt);
                dt_max = dt_max.max(report.dt);
                last_dt = report.dt;

                self.gauges
                    .record(&self.solution, &self.grid, self.solution.time)?;

                progress.step();
                progress.maybe_report(self.solution.time);
            }

            self.emit_frame(k + 1, last_dt, &mut on_frame);
        }

        let primary_gauge_max = self.gauges.max_value(self.config.primary_gauge, 0);
        let gauge_maxima = (0..self.gauges.len())
            .map(|i| self.gauges.max_value(i, 0))
            .collect();
        let wall_time = start_wall.elapsed().as_secs_f64();

        info!(
            n_steps,
            n_retries,
            wall_time,
            primary_gauge_max = ?primary_gauge_max,
            "run complete"
        );
        debug!("{}", self.tracker.summary());

        Ok(RunSummary {
            final_time: self.solution.time,
            n_steps,
            n_retries,
            n_frames: self.n_frames,
            dt_min,
            dt_max,
            wall_time,
            primary_gauge_max,
            gauge_maxima,
        })
    }

    /// One committed step, retrying non-physical rejections with a smaller CFL number.
    fn step_with_retries(&mut self, t_limit: f64) -> Result<(StepReport, usize)> {
        let mut cfl = self.solver.config().cfl;
        let mut retries = 0;

        loop {
            match self
                .solver
                .advance_with_cfl(&mut self.solution, &self.grid, t_limit, cfl)
            {
                Ok(report) => return Ok((report, retries)),
                Err(err) if err.is_non_physical() && retries < self.config.max_step_retries => {
                    retries += 1;
                    cfl *= 0.5;
                    warn!(
                        error = %err,
                        t = self.solution.time,
                        retry = retries,
                        cfl,
                        "step rejected, retrying"
                    );
                }
                Err(err) => {
                    warn!(
                        error = %err,
                        t = self.solution.time,
                        "aborting run, state kept at last committed step"
                    );
                    return Err(err);
                }
            }
        }
    }

    fn emit_frame<F>(&mut self, frame: usize, dt: f64, on_frame: &mut F)
    where
        F: FnMut(&Snapshot),
    {
        let snapshot = self.solution.snapshot(frame);
        on_frame(&snapshot);

        self.tracker.update(
            self.solution.time,
            EulerDiagnostics::compute(&self.solution, &self.grid, dt),
        );
        info!(
            frame,
            t = self.solution.time,
            mass_error = self.tracker.mass_error(),
            "output frame"
        );

        if self.config.keep_copy {
            self.frames.push(snapshot);
        }
        self.n_frames = frame + 1;
    }
}
