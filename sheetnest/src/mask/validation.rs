use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::mask::{AvailabilityMask, CellRect, Occupancy};
use crate::util::assertions;

/// Spacing magnitudes in cells.
/// Placed items must stay `neighbor` cells apart, inherent obstacles `obstacle` cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HaloSpec {
    pub neighbor_x: usize,
    pub neighbor_y: usize,
    pub obstacle_x: usize,
    pub obstacle_y: usize,
}

impl HaloSpec {
    /// True if placed items may abut each other.
    pub fn allows_abutment(&self) -> bool {
        self.neighbor_x == 0 && self.neighbor_y == 0
    }
}

/// Why a candidate rectangle cannot be committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    OutOfBounds,
    Overlap,
    Halo,
    Coverage,
}

impl Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Rejection::OutOfBounds => "out of bounds",
            Rejection::Overlap => "overlap",
            Rejection::Halo => "halo violation",
            Rejection::Coverage => "insufficient coverage",
        };
        write!(f, "{s}")
    }
}

/// A side band of cells next to a rectangle, `depth` counting from 1 at the rectangle's edge.
struct BandCell {
    x: usize,
    y: usize,
    depth: usize,
}

impl AvailabilityMask {
    /// Read-only admissibility check of `rect` against the current occupancy.
    pub fn validate(
        &self,
        rect: &CellRect,
        halo: &HaloSpec,
        coverage_threshold: f64,
    ) -> Result<(), Rejection> {
        if !self.contains(rect) {
            return Err(Rejection::OutOfBounds);
        }
        if !self.interior_is_free(rect) {
            return Err(Rejection::Overlap);
        }
        if self.coverage(rect) < coverage_threshold {
            return Err(Rejection::Coverage);
        }
        if !self.halo_is_clear(rect, halo) {
            return Err(Rejection::Halo);
        }
        Ok(())
    }

    /// Checks the four side bands of `rect`.
    /// A cell violates when it is an inherent obstacle within the obstacle gap,
    /// or belongs to a placed item within the neighbor gap.
    /// Cells beyond the mask border are not checked.
    /// Diagonal neighbours are exempt: only the side bands are inspected, so corners may touch.
    pub fn halo_is_clear(&self, rect: &CellRect, halo: &HaloSpec) -> bool {
        if !self.contains(rect) {
            return false;
        }
        let depth_x = usize::max(halo.neighbor_x, halo.obstacle_x);
        let depth_y = usize::max(halo.neighbor_y, halo.obstacle_y);

        let violates = |c: BandCell, neighbor_gap: usize, obstacle_gap: usize| {
            (self.is_obstacle(c.x, c.y) && c.depth <= obstacle_gap)
                || (self.occupancy(c.x, c.y) == Occupancy::Placed && c.depth <= neighbor_gap)
        };

        let x_clear = self
            .vertical_bands(rect, depth_x)
            .all(|c| !violates(c, halo.neighbor_x, halo.obstacle_x));

        x_clear
            && self
                .horizontal_bands(rect, depth_y)
                .all(|c| !violates(c, halo.neighbor_y, halo.obstacle_y))
    }

    /// Marks `rect` as placed and its neighbor-gap side bands as halo, all at once.
    /// Fails without touching any cell if the rectangle is out of bounds or already claimed.
    pub fn commit(&mut self, rect: &CellRect, halo: &HaloSpec) -> Result<(), Rejection> {
        if !self.contains(rect) {
            return Err(Rejection::OutOfBounds);
        }
        if !self.interior_is_free(rect) {
            return Err(Rejection::Overlap);
        }

        let band_cells = self
            .vertical_bands(rect, halo.neighbor_x)
            .chain(self.horizontal_bands(rect, halo.neighbor_y))
            .map(|c| (c.x, c.y))
            .collect::<Vec<_>>();

        self.claim_interior(rect);
        for (x, y) in band_cells {
            if self.occupancy(x, y) == Occupancy::Free {
                self.set_occupancy(x, y, Occupancy::Halo);
            }
        }

        debug_assert!(assertions::mask_commit_is_consistent(self, rect));
        Ok(())
    }

    /// Cells left and right of `rect`, up to `depth` columns away, clipped to the mask.
    fn vertical_bands(&self, rect: &CellRect, depth: usize) -> impl Iterator<Item = BandCell> {
        let (rect, width) = (*rect, self.width());
        (1..=depth).flat_map(move |d| {
            let left = rect.x.checked_sub(d);
            let right = Some(rect.x_max() - 1 + d).filter(|x| *x < width);
            [left, right]
                .into_iter()
                .flatten()
                .flat_map(move |x| (rect.y..rect.y_max()).map(move |y| BandCell { x, y, depth: d }))
        })
    }

    /// Cells above and below `rect`, up to `depth` rows away, clipped to the mask.
    fn horizontal_bands(&self, rect: &CellRect, depth: usize) -> impl Iterator<Item = BandCell> {
        let (rect, height) = (*rect, self.height());
        (1..=depth).flat_map(move |d| {
            let top = rect.y.checked_sub(d);
            let bottom = Some(rect.y_max() - 1 + d).filter(|y| *y < height);
            [top, bottom]
                .into_iter()
                .flatten()
                .flat_map(move |y| (rect.x..rect.x_max()).map(move |x| BandCell { x, y, depth: d }))
        })
    }
}
