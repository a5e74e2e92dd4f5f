use ordered_float::OrderedFloat;

/// Bottom-left score of a position: rows first, then columns.
/// `y` is weighted by the surface width so that any position on a lower row wins.
#[derive(PartialEq, PartialOrd, Copy, Clone, Debug, Eq, Ord)]
pub struct PositionScore(OrderedFloat<f64>);

impl PositionScore {
    pub fn new((x, y): (f64, f64), surface_width: f64) -> Self {
        let score = y * surface_width + x;
        debug_assert!(score.is_finite(), "non-finite position score: {score}");
        PositionScore(OrderedFloat(score))
    }
}

/// Score of a size at a mask anchor, larger is better.
#[derive(PartialEq, PartialOrd, Copy, Clone, Debug, Eq, Ord)]
pub struct SizeScore(usize);

impl SizeScore {
    pub fn new(w_cells: usize, h_cells: usize) -> Self {
        SizeScore(w_cells * h_cells)
    }
}
