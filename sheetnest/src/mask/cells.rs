use std::fmt::Display;

use crate::error::{PackingError, Result};

/// Rectangle in mask cells, `(x, y)` being the top-left cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellRect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl CellRect {
    pub fn new(x: usize, y: usize, w: usize, h: usize) -> Self {
        CellRect { x, y, w, h }
    }

    /// Exclusive right edge
    pub fn x_max(&self) -> usize {
        self.x + self.w
    }

    /// Exclusive bottom edge
    pub fn y_max(&self) -> usize {
        self.y + self.h
    }

    pub fn area(&self) -> usize {
        self.w * self.h
    }

    /// All `(x, y)` cells covered by the rectangle, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.y..self.y_max()).flat_map(move |y| (self.x..self.x_max()).map(move |x| (x, y)))
    }
}

impl Display for CellRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}x{} @ ({}, {})]", self.w, self.h, self.x, self.y)
    }
}

/// Number of mask cells per physical unit, per axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellScale {
    pub x: f64,
    pub y: f64,
}

impl CellScale {
    pub fn new(x: f64, y: f64) -> Result<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        match valid(x) && valid(y) {
            true => Ok(CellScale { x, y }),
            false => Err(PackingError::InvalidScale(format!(
                "cells per unit must be positive and finite, got ({x}, {y})"
            ))),
        }
    }

    /// Scale for a mask of `cells` covering a physical area of `physical` size.
    pub fn from_extent(cells: (usize, usize), physical: (f64, f64)) -> Result<Self> {
        let (pw, ph) = physical;
        if !(pw.is_finite() && ph.is_finite() && pw > 0.0 && ph > 0.0) {
            return Err(PackingError::InvalidScale(format!(
                "physical extent must be positive and finite, got ({pw}, {ph})"
            )));
        }
        CellScale::new(cells.0 as f64 / pw, cells.1 as f64 / ph)
    }

    /// Length (size or step) along x in cells, at least one cell.
    pub fn len_x(&self, v: f64) -> usize {
        (v * self.x).round().max(1.0) as usize
    }

    /// Length (size or step) along y in cells, at least one cell.
    pub fn len_y(&self, v: f64) -> usize {
        (v * self.y).round().max(1.0) as usize
    }

    /// Gap along x in cells, may be zero.
    pub fn gap_x(&self, v: f64) -> usize {
        (v * self.x).round().max(0.0) as usize
    }

    /// Gap along y in cells, may be zero.
    pub fn gap_y(&self, v: f64) -> usize {
        (v * self.y).round().max(0.0) as usize
    }

    pub fn to_physical_x(&self, cells: usize) -> f64 {
        cells as f64 / self.x
    }

    pub fn to_physical_y(&self, cells: usize) -> f64 {
        cells as f64 / self.y
    }
}
