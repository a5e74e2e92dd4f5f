use slotmap::{SlotMap, new_key_type};

use crate::entities::{MaterialSurface, Part, PlacedPart};
use crate::geometry::Rect;
use crate::util::assertions;

new_key_type! {
    /// Key to identify committed regions in a [`Layout`]
    pub struct RegionKey;
}

/// Footprint of a committed part, spacing included.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OccupiedRegion {
    pub rect: Rect,
    /// Index of the part in the input list
    pub part_index: usize,
}

///Append-only configuration of parts on a [`MaterialSurface`] during a nesting run.
///Owned exclusively by the run that created it.
#[derive(Clone, Debug)]
pub struct Layout {
    surface: MaterialSurface,
    regions: SlotMap<RegionKey, OccupiedRegion>,
    placed_parts: Vec<PlacedPart>,
}

impl Layout {
    pub fn new(surface: MaterialSurface) -> Self {
        Layout {
            surface,
            regions: SlotMap::with_key(),
            placed_parts: vec![],
        }
    }

    pub fn surface(&self) -> &MaterialSurface {
        &self.surface
    }

    /// True if `rect` intersects the interior of any committed region.
    pub fn overlaps(&self, rect: &Rect) -> bool {
        self.regions.values().any(|r| r.rect.overlaps(rect))
    }

    pub fn fits_within_surface(&self, rect: &Rect) -> bool {
        self.surface.bbox().almost_contains(rect)
    }

    /// A footprint can be committed if it stays on the surface and is free of overlap.
    pub fn is_admissible(&self, rect: &Rect) -> bool {
        self.fits_within_surface(rect) && !self.overlaps(rect)
    }

    /// Commits `part` with the top-left corner of its footprint at `position`.
    pub fn place(&mut self, part: &Part, position: (f64, f64)) -> Option<RegionKey> {
        let (w, h) = part.footprint;
        let rect = Rect::from_origin(position.0, position.1, w, h)?;
        debug_assert!(self.is_admissible(&rect), "inadmissible footprint {rect}");

        let key = self.regions.insert(OccupiedRegion {
            rect,
            part_index: part.index,
        });
        self.placed_parts.push(PlacedPart::new(part, rect));

        debug_assert!(assertions::layout_is_consistent(self));
        Some(key)
    }

    pub fn regions(&self) -> impl Iterator<Item = (RegionKey, &OccupiedRegion)> {
        self.regions.iter()
    }

    /// Placed parts in commit order
    pub fn placed_parts(&self) -> &[PlacedPart] {
        &self.placed_parts
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Ratio of the summed base area of the placed parts to the surface area, clamped to [0, 1].
    pub fn utilization(&self) -> f64 {
        let used = self.placed_parts.iter().map(|p| p.base_area).sum::<f64>();
        (used / self.surface.area()).clamp(0.0, 1.0)
    }
}
