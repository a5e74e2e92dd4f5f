use ndarray::{Array2, s};

use crate::error::{PackingError, Result};
use crate::mask::CellRect;

/// Luminance above which a bitmap cell counts as usable material.
pub const USABLE_LUMINANCE: u8 = 200;

/// State of a cell during a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Occupancy {
    Free,
    /// Covered by a committed rectangle (or by an item that existed before the run)
    Placed,
    /// Spacing band around a committed rectangle
    Halo,
}

/// Dense grid of cells, indexed `[[y, x]]`.
/// `usable` is the pristine state and never changes during a run, `occupancy` tracks consumption.
#[derive(Clone, Debug)]
pub struct AvailabilityMask {
    usable: Array2<bool>,
    occupancy: Array2<Occupancy>,
    n_committed: usize,
}

impl AvailabilityMask {
    /// Builds a mask from luminance bytes in row-major order.
    pub fn from_luminance(width: usize, height: usize, cells: &[u8]) -> Result<Self> {
        check_len(width, height, cells.len())?;
        let usable = cells.iter().map(|&v| v > USABLE_LUMINANCE).collect();
        AvailabilityMask::from_vec(width, height, usable)
    }

    pub fn from_bools(width: usize, height: usize, cells: &[bool]) -> Result<Self> {
        check_len(width, height, cells.len())?;
        AvailabilityMask::from_vec(width, height, cells.to_vec())
    }

    fn from_vec(width: usize, height: usize, usable: Vec<bool>) -> Result<Self> {
        let actual = usable.len();
        let usable = Array2::from_shape_vec((height, width), usable).map_err(|_| {
            PackingError::MaskLengthMismatch {
                width,
                height,
                expected: width * height,
                actual,
            }
        })?;
        Ok(AvailabilityMask {
            usable,
            occupancy: Array2::from_elem((height, width), Occupancy::Free),
            n_committed: 0,
        })
    }

    /// Replaces the pristine state with a separate obstacle bitmap (luminance bytes, same layout).
    /// Cells that are unusable in the working mask but free of obstacles are treated as
    /// items that were already placed before the run.
    pub fn with_obstacle_luminance(mut self, obstacle_cells: &[u8]) -> Result<Self> {
        check_len(self.width(), self.height(), obstacle_cells.len())?;
        let width = self.width();
        for (i, &v) in obstacle_cells.iter().enumerate() {
            let idx = [i / width, i % width];
            let obstacle_free = v > USABLE_LUMINANCE;
            if obstacle_free && !self.usable[idx] {
                self.occupancy[idx] = Occupancy::Placed;
            }
            self.usable[idx] = obstacle_free;
        }
        Ok(self)
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.usable.ncols()
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.usable.nrows()
    }

    /// True if the cell is an inherent obstacle.
    pub fn is_obstacle(&self, x: usize, y: usize) -> bool {
        !self.usable[[y, x]]
    }

    pub fn occupancy(&self, x: usize, y: usize) -> Occupancy {
        self.occupancy[[y, x]]
    }

    /// Usable material that has not been consumed by a placement or its halo.
    pub fn is_available(&self, x: usize, y: usize) -> bool {
        self.usable[[y, x]] && self.occupancy[[y, x]] == Occupancy::Free
    }

    pub fn n_committed(&self) -> usize {
        self.n_committed
    }

    pub fn contains(&self, rect: &CellRect) -> bool {
        rect.w > 0 && rect.h > 0 && rect.x_max() <= self.width() && rect.y_max() <= self.height()
    }

    /// Fraction of the cells inside `rect` that are usable in the pristine state.
    pub fn coverage(&self, rect: &CellRect) -> f64 {
        if !self.contains(rect) {
            return 0.0;
        }
        let n_usable = self
            .usable
            .slice(s![rect.y..rect.y_max(), rect.x..rect.x_max()])
            .iter()
            .filter(|u| **u)
            .count();
        n_usable as f64 / rect.area() as f64
    }

    /// True if no cell inside `rect` is claimed by a placement or a halo.
    pub fn interior_is_free(&self, rect: &CellRect) -> bool {
        self.occupancy
            .slice(s![rect.y..rect.y_max(), rect.x..rect.x_max()])
            .iter()
            .all(|o| *o == Occupancy::Free)
    }

    pub(super) fn set_occupancy(&mut self, x: usize, y: usize, occupancy: Occupancy) {
        self.occupancy[[y, x]] = occupancy;
    }

    pub(super) fn claim_interior(&mut self, rect: &CellRect) {
        self.occupancy
            .slice_mut(s![rect.y..rect.y_max(), rect.x..rect.x_max()])
            .fill(Occupancy::Placed);
        self.n_committed += 1;
    }
}

fn check_len(width: usize, height: usize, actual: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(PackingError::InvalidSurface {
            width: width as f64,
            height: height as f64,
        });
    }
    let expected = width * height;
    match expected == actual {
        true => Ok(()),
        false => Err(PackingError::MaskLengthMismatch {
            width,
            height,
            expected,
            actual,
        }),
    }
}
