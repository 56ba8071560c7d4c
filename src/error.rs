//! Error types for setup and time stepping.

use std::fmt;

use thiserror::Error;

/// Where a non-physical state was detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Site {
    /// Interior cell index (0-based, ghost cells excluded).
    Cell(usize),
    /// Interface index: interface `i` separates cells `i - 1` and `i`.
    Interface(usize),
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Site::Cell(i) => write!(f, "cell {i}"),
            Site::Interface(i) => write!(f, "interface {i}"),
        }
    }
}

/// Errors produced by the Euler solver.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EulerError {
    /// Malformed grid parameters.
    #[error("Invalid domain: [{lower}, {upper}] with {n_cells} cells")]
    InvalidDomain {
        lower: f64,
        upper: f64,
        n_cells: usize,
    },

    /// Density or pressure became non-positive.
    #[error("Non-physical state at {site}: density = {density:.6e}, pressure = {pressure:.6e}")]
    NonPhysicalState {
        site: Site,
        density: f64,
        pressure: f64,
    },

    /// Gauge placed outside the grid.
    #[error("Gauge at x = {location} lies outside the domain [{lower}, {upper}]")]
    GaugeOutOfDomain {
        location: f64,
        lower: f64,
        upper: f64,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Step budget for an output interval exhausted.
    #[error("Maximum step limit ({max_steps}) reached at t = {time:.6}")]
    MaxStepsExceeded { max_steps: usize, time: f64 },
}

impl EulerError {
    /// Create an invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Whether this error is a recoverable physical violation of a single step.
    pub fn is_non_physical(&self) -> bool {
        matches!(self, Self::NonPhysicalState { .. })
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EulerError>;
