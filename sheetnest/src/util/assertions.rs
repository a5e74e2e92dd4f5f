use itertools::Itertools;
use log::error;

use crate::entities::Layout;
use crate::mask::{AvailabilityMask, CellRect, Occupancy};

//Various checks to verify correctness of the state of the engine
//Used in debug_assert!() blocks

/// Every committed region lies within the surface and no two regions overlap.
pub fn layout_is_consistent(layout: &Layout) -> bool {
    let surface_bbox = layout.surface().bbox();
    for (_, region) in layout.regions() {
        if !surface_bbox.almost_contains(&region.rect) {
            error!("region {} exceeds surface {}", region.rect, surface_bbox);
            return false;
        }
    }
    let rects = layout.regions().map(|(_, r)| r.rect).collect_vec();
    for (r1, r2) in rects.iter().tuple_combinations() {
        if r1.overlaps(r2) {
            error!("regions {} and {} overlap", r1, r2);
            return false;
        }
    }
    layout.regions().count() == layout.placed_parts().len()
}

/// All cells inside a committed rectangle are marked as placed.
pub fn mask_commit_is_consistent(mask: &AvailabilityMask, rect: &CellRect) -> bool {
    rect.cells()
        .all(|(x, y)| mask.occupancy(x, y) == Occupancy::Placed)
}
