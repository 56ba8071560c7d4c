//! Uniform 1D finite-volume grid.
//!
//! The interval [x_min, x_max] is split into `n_cells` cells of equal width.
//! Cell `i` covers [x_min + i dx, x_min + (i + 1) dx] and its centre is
//! x_i = x_min + (i + 1/2) dx.

use crate::error::{EulerError, Result};

/// Boundary face identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryFace {
    /// Left boundary (x = x_min)
    Left,
    /// Right boundary (x = x_max)
    Right,
}

impl BoundaryFace {
    /// Outward normal direction (-1 on the left, +1 on the right).
    pub fn normal(self) -> f64 {
        match self {
            BoundaryFace::Left => -1.0,
            BoundaryFace::Right => 1.0,
        }
    }
}

/// Uniform cell partition of an interval. Immutable after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid1D {
    x_min: f64,
    x_max: f64,
    n_cells: usize,
    dx: f64,
}

impl Grid1D {
    /// Create a uniform grid of [x_min, x_max] with `n_cells` cells.
    ///
    /// Fails with [`EulerError::InvalidDomain`] if `x_max <= x_min`,
    /// `n_cells == 0`, or a bound is not finite.
    pub fn new(x_min: f64, x_max: f64, n_cells: usize) -> Result<Self> {
        if n_cells == 0 || !x_min.is_finite() || !x_max.is_finite() || x_max <= x_min {
            return Err(EulerError::InvalidDomain {
                lower: x_min,
                upper: x_max,
                n_cells,
            });
        }

        Ok(Self {
            x_min,
            x_max,
            n_cells,
            dx: (x_max - x_min) / n_cells as f64,
        })
    }

    /// Left endpoint of the domain.
    #[inline]
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    /// Right endpoint of the domain.
    #[inline]
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    /// Number of cells.
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.n_cells
    }

    /// Cell width.
    #[inline]
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Centre of cell `i`.
    #[inline]
    pub fn center(&self, i: usize) -> f64 {
        self.x_min + (i as f64 + 0.5) * self.dx
    }

    /// All cell centres.
    pub fn centers(&self) -> Vec<f64> {
        (0..self.n_cells).map(|i| self.center(i)).collect()
    }

    /// Position of interface `i` (interface 0 is x_min, interface n is x_max).
    #[inline]
    pub fn face(&self, i: usize) -> f64 {
        self.x_min + i as f64 * self.dx
    }

    /// Check whether `x` lies in the closed domain.
    pub fn contains(&self, x: f64) -> bool {
        x >= self.x_min && x <= self.x_max
    }

    /// Index of the cell containing `x`.
    ///
    /// Points on an interior face belong to the cell on the right; x_max
    /// belongs to the last cell. Returns `None` outside the domain.
    pub fn locate(&self, x: f64) -> Option<usize> {
        if !self.contains(x) {
            return None;
        }
        let i = ((x - self.x_min) / self.dx).floor() as usize;
        Some(i.min(self.n_cells - 1))
    }
}
