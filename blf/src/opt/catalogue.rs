use itertools::Itertools;
use log::debug;

use sheetnest::mask::CellScale;

use crate::config::{MaskFillConfig, Orientation};

/// One rectangle size the mask fill may suggest.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CatalogueSize {
    /// Physical width
    pub width: f64,
    /// Physical height
    pub height: f64,
    pub w_cells: usize,
    pub h_cells: usize,
}

impl CatalogueSize {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Every admissible rectangle size, largest physical area first.
#[derive(Clone, Debug)]
pub struct SizeCatalogue {
    sizes: Vec<CatalogueSize>,
}

impl SizeCatalogue {
    pub fn new(config: &MaskFillConfig, scale: &CellScale) -> Self {
        let widths = descending_range(config.max_width, config.min_width, config.step);
        let heights = descending_range(config.max_height, config.min_height, config.step);
        let min_w_cells = scale.len_x(config.min_width);
        let min_h_cells = scale.len_y(config.min_height);

        let pairs = widths
            .iter()
            .cartesian_product(heights.iter())
            .flat_map(|(&w, &h)| match config.orientation {
                Orientation::Landscape => vec![(w, h)],
                Orientation::Portrait => vec![(h, w)],
                Orientation::Both if w != h => vec![(w, h), (h, w)],
                Orientation::Both => vec![(w, h)],
            })
            .unique_by(|(w, h)| format!("{w:.3}x{h:.3}"));

        let mut sizes = pairs
            .map(|(width, height)| CatalogueSize {
                width,
                height,
                w_cells: scale.len_x(width),
                h_cells: scale.len_y(height),
            })
            .filter(|s| s.w_cells >= min_w_cells && s.h_cells >= min_h_cells)
            .collect_vec();

        //stable, equal areas keep their generation order
        sizes.sort_by(|a, b| b.area().total_cmp(&a.area()));

        debug!("[MASK] size catalogue contains {} sizes", sizes.len());
        SizeCatalogue { sizes }
    }

    pub fn sizes(&self) -> &[CatalogueSize] {
        &self.sizes
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

/// Values from `max` down to `min` in decrements of `step`, rounded to 4 decimals.
/// `min` is always the last value, duplicates are removed.
pub fn descending_range(max: f64, min: f64, step: f64) -> Vec<f64> {
    let round4 = |v: f64| (v * 10_000.0).round() / 10_000.0;
    let mut values = vec![];
    let mut v = max;
    while v > min && step > 0.0 {
        values.push(round4(v));
        v -= step;
    }
    values.push(round4(min));
    values.dedup();
    values
}
