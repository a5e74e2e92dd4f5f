use serde::{Deserialize, Serialize};

use sheetnest::error::Result;
use sheetnest::io::ext_repr::{ExtMask, ExtNestingInstance};
use sheetnest::mask::{AvailabilityMask, CellScale};

use crate::opt::mask_fill::MaskFillOutcome;
use crate::opt::nest::NestingOutcome;

/// A job file handed to the binary.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "snake_case")]
pub enum Job {
    Nest(ExtNestingInstance),
    MaskFill(ExtMaskFillJob),
}

/// Availability bitmap together with the physical extent it covers
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtMaskFillJob {
    #[serde(flatten)]
    pub mask: ExtMask,
    pub physical_width: f64,
    pub physical_height: f64,
}

impl ExtMaskFillJob {
    pub fn import(&self) -> Result<(AvailabilityMask, CellScale)> {
        let mask = self.mask.to_mask()?;
        let scale = CellScale::from_extent(
            (mask.width(), mask.height()),
            (self.physical_width, self.physical_height),
        )?;
        Ok((mask, scale))
    }
}

/// What the binary writes to stdout.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "snake_case")]
pub enum JobOutput {
    Nest(NestingOutcome),
    MaskFill(MaskFillOutcome),
}
