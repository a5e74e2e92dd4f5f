use serde::{Deserialize, Serialize};

use crate::error::{PackingError, Result};
use crate::geometry::Rect;
use crate::util::FPA;

/// The sheet of material onto which parts are nested.
/// Its top-left corner is the origin, `y` grows downwards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SurfaceExtent")]
pub struct MaterialSurface {
    width: f64,
    height: f64,
}

#[derive(Deserialize)]
struct SurfaceExtent {
    width: f64,
    height: f64,
}

impl TryFrom<SurfaceExtent> for MaterialSurface {
    type Error = PackingError;

    fn try_from(ext: SurfaceExtent) -> Result<Self> {
        MaterialSurface::new(ext.width, ext.height)
    }
}

impl MaterialSurface {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        match valid(width) && valid(height) {
            true => Ok(MaterialSurface { width, height }),
            false => Err(PackingError::InvalidSurface { width, height }),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn bbox(&self) -> Rect {
        Rect {
            x_min: 0.0,
            y_min: 0.0,
            x_max: self.width,
            y_max: self.height,
        }
    }

    /// True if a footprint of the given size could be placed somewhere on the surface.
    pub fn fits(&self, (w, h): (f64, f64)) -> bool {
        w.is_finite() && h.is_finite() && FPA(w) <= FPA(self.width) && FPA(h) <= FPA(self.height)
    }
}
