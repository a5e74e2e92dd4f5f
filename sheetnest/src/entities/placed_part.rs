use std::sync::Arc;

use serde::Serialize;

use crate::entities::Part;
use crate::geometry::{PlacementTransform, Rect};

/// Output record of a part committed to the surface.
#[derive(Clone, Debug, Serialize)]
pub struct PlacedPart {
    pub part_id: String,
    pub index: usize,
    /// Occupied footprint, spacing included
    pub footprint: Rect,
    /// Rotation in degrees
    pub rotation: f64,
    pub base_area: f64,
    /// Maps the part content from its local frame onto the surface
    pub transform: PlacementTransform,
    #[serde(skip)]
    pub fragment: Arc<str>,
}

impl PlacedPart {
    pub fn new(part: &Part, footprint: Rect) -> Self {
        let content_origin = (
            footprint.x_min + part.spacing,
            footprint.y_min + part.spacing,
        );
        PlacedPart {
            part_id: part.id.clone(),
            index: part.index,
            footprint,
            rotation: part.rotation,
            base_area: part.base_area,
            transform: PlacementTransform::about_center(
                content_origin,
                part.content_size,
                part.rotation,
            ),
            fragment: part.fragment.clone(),
        }
    }

    pub fn position(&self) -> (f64, f64) {
        (self.footprint.x_min, self.footprint.y_min)
    }
}
