use std::collections::VecDeque;

use itertools::Itertools;

use sheetnest::entities::{Layout, MaterialSurface};
use sheetnest::mask::{AvailabilityMask, HaloSpec};

/// Positions right of (same y) and below (same x) every committed region.
/// Falls back to the top-left corner inset by `spacing` when nothing is placed yet.
pub fn structural_candidates(layout: &Layout, spacing: f64) -> Vec<(f64, f64)> {
    match layout.is_empty() {
        true => vec![(spacing, spacing)],
        false => layout
            .regions()
            .flat_map(|(_, r)| [(r.rect.x_max, r.rect.y_min), (r.rect.x_min, r.rect.y_max)])
            .collect(),
    }
}

/// Uniform grid of positions, row-major, starting at the spacing inset.
/// Only positions where a footprint of size `footprint` stays on the surface are generated.
pub fn grid_candidates(
    surface: &MaterialSurface,
    footprint: (f64, f64),
    spacing: f64,
    step: f64,
) -> impl Iterator<Item = (f64, f64)> {
    let n_steps = |extent: f64, size: f64| {
        let room = extent - size - spacing;
        match room >= 0.0 {
            true => (room / step + 1e-9).floor() as usize + 1,
            false => 0,
        }
    };
    let nx = n_steps(surface.width(), footprint.0);
    let ny = n_steps(surface.height(), footprint.1);

    (0..ny).flat_map(move |j| {
        (0..nx).map(move |i| (spacing + i as f64 * step, spacing + j as f64 * step))
    })
}

/// Bounded memory of the most recent right (x) and bottom (y) edges, in cells.
#[derive(Clone, Debug)]
pub struct EdgeCache {
    xs: VecDeque<usize>,
    ys: VecDeque<usize>,
    capacity: usize,
}

impl EdgeCache {
    pub fn new(capacity: usize) -> Self {
        EdgeCache {
            xs: VecDeque::with_capacity(capacity),
            ys: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Registers the right and bottom edge of a committed rectangle.
    pub fn register(&mut self, x_edge: usize, y_edge: usize) {
        Self::push(&mut self.xs, x_edge, self.capacity);
        Self::push(&mut self.ys, y_edge, self.capacity);
    }

    fn push(edges: &mut VecDeque<usize>, edge: usize, capacity: usize) {
        if capacity == 0 || edges.contains(&edge) {
            return;
        }
        if edges.len() == capacity {
            edges.pop_front();
        }
        edges.push_back(edge);
    }

    pub fn x_edges(&self) -> impl Iterator<Item = usize> + '_ {
        self.xs.iter().copied()
    }

    /// Closest cached right edge to `x` within `tolerance` cells that satisfies `accept`.
    pub fn nearest_x(&self, x: usize, tolerance: usize, accept: impl Fn(usize) -> bool) -> Option<usize> {
        Self::nearest(&self.xs, x, tolerance, accept)
    }

    /// Closest cached bottom edge to `y` within `tolerance` cells that satisfies `accept`.
    pub fn nearest_y(&self, y: usize, tolerance: usize, accept: impl Fn(usize) -> bool) -> Option<usize> {
        Self::nearest(&self.ys, y, tolerance, accept)
    }

    fn nearest(
        edges: &VecDeque<usize>,
        target: usize,
        tolerance: usize,
        accept: impl Fn(usize) -> bool,
    ) -> Option<usize> {
        edges
            .iter()
            .copied()
            .filter(|e| e.abs_diff(target) <= tolerance && accept(*e))
            .min_by_key(|e| (e.abs_diff(target), *e))
    }
}

/// Pulls a mask anchor onto the nearest cached edges so neighbours end up flush.
/// Only applies when items may abut. Per axis the tolerance is `min(2 * step, size / 4)` cells
/// and the snapped anchor cell has to be available.
pub fn snap_anchor(
    mask: &AvailabilityMask,
    edges: &EdgeCache,
    halo: &HaloSpec,
    (x, y): (usize, usize),
    (w_cells, h_cells): (usize, usize),
    (step_x, step_y): (usize, usize),
) -> (usize, usize) {
    if !halo.allows_abutment() {
        return (x, y);
    }
    let (width, height) = (mask.width(), mask.height());

    let tol_x = usize::min(2 * step_x, w_cells / 4);
    let sx = edges
        .nearest_x(x, tol_x, |cx| cx < width && y < height && mask.is_available(cx, y))
        .unwrap_or(x);

    let tol_y = usize::min(2 * step_y, h_cells / 4);
    let sy = edges
        .nearest_y(y, tol_y, |cy| sx < width && cy < height && mask.is_available(sx, cy))
        .unwrap_or(y);
    (sx, sy)
}

/// Anchor columns for row `y` of the mask, in priority order:
/// 1. cached right edges that are still available in this row,
/// 2. left edges of free runs, sampled at half the step,
/// 3. a uniform grid at the full step.
///
/// Within a tier columns are ascending, a column only appears in its first tier.
pub fn mask_row_candidates(
    mask: &AvailabilityMask,
    edges: &EdgeCache,
    y: usize,
    step_x: usize,
) -> Vec<usize> {
    let width = mask.width();
    if y >= mask.height() {
        return vec![];
    }
    let available = |x: usize| x < width && mask.is_available(x, y);

    let edge_tier = edges.x_edges().filter(|x| available(*x)).sorted();

    let half_step = usize::max(1, step_x / 2);
    let run_tier = free_run_starts(width, half_step, &available);

    let grid_tier = (0..width).step_by(step_x.max(1)).filter(|x| available(*x));

    edge_tier
        .chain(run_tier)
        .chain(grid_tier)
        .unique()
        .collect()
}

/// Samples every `stride` cells; a sample opens a run when it is available and the previous
/// sample was not. The run start is then moved left onto the first available cell.
fn free_run_starts(width: usize, stride: usize, available: impl Fn(usize) -> bool) -> Vec<usize> {
    let mut starts = vec![];
    let mut prev_available = false;
    for x in (0..width).step_by(stride) {
        let avail = available(x);
        if avail && !prev_available {
            let lower = x.saturating_sub(stride - 1);
            let mut start = x;
            while start > lower && available(start - 1) {
                start -= 1;
            }
            starts.push(start);
        }
        prev_available = avail;
    }
    starts
}
