use serde::{Deserialize, Serialize};

use crate::entities::{MaterialSurface, PartInput};
use crate::error::Result;
use crate::mask::AvailabilityMask;

/// Availability bitmap as produced by the host: luminance bytes in row-major order.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtMask {
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
    pub cells: Vec<u8>,
    /// Optional bitmap separating inherent obstacles from pre-existing items
    #[serde(default)]
    pub obstacle_cells: Option<Vec<u8>>,
}

impl ExtMask {
    pub fn to_mask(&self) -> Result<AvailabilityMask> {
        let mask = AvailabilityMask::from_luminance(self.width, self.height, &self.cells)?;
        match &self.obstacle_cells {
            Some(obstacles) => mask.with_obstacle_luminance(obstacles),
            None => Ok(mask),
        }
    }
}

/// Material sheet together with the parts to nest on it.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtNestingInstance {
    pub surface: MaterialSurface,
    pub parts: Vec<PartInput>,
    /// Vector fragment drawing the material itself
    #[serde(default)]
    pub material_fragment: Option<String>,
}
