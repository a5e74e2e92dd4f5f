use std::fmt::Display;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::entities::MaterialSurface;

/// A part as handed over by the producer of the job: its bounding box and the vector content to embed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PartInput {
    pub id: String,
    pub width: f64,
    pub height: f64,
    /// Embeddable vector fragment, drawn with its bounding box at the local origin
    #[serde(default)]
    pub fragment: String,
}

/// Which orientations a part may take on the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationPolicy {
    /// Parts keep their input orientation
    #[default]
    None,
    /// Parts may be turned by a quarter turn
    RightAngle,
    /// Any orientation is allowed, bounding-box packing only ever uses 0° or 90°
    Free,
}

/// A part ready to be nested: orientation fixed and footprint inflated by the spacing.
#[derive(Clone, Debug)]
pub struct Part {
    pub id: String,
    /// Position of the part in the input list
    pub index: usize,
    /// Size of the content in its input orientation
    pub content_size: (f64, f64),
    /// Rotation in degrees, either 0 or 90
    pub rotation: f64,
    /// Size of the rotated content including the spacing on every side
    pub footprint: (f64, f64),
    pub spacing: f64,
    /// Area of the content, spacing excluded
    pub base_area: f64,
    pub fragment: Arc<str>,
}

impl Part {
    /// Selects an orientation and inflates the part.
    /// Returns the reason the part was dropped if no orientation fits the surface.
    pub fn prepare(
        index: usize,
        input: &PartInput,
        policy: RotationPolicy,
        spacing: f64,
        surface: &MaterialSurface,
    ) -> Result<Part, UnplacedPart> {
        let (w, h) = (input.width, input.height);
        let unplaced = |reason| UnplacedPart {
            part_id: input.id.clone(),
            index,
            reason,
        };
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(unplaced(UnplacedReason::ExceedsSurface));
        }

        let inflate = |(w, h): (f64, f64)| (w + 2.0 * spacing, h + 2.0 * spacing);
        let upright = inflate((w, h));
        let turned = inflate((h, w));

        let rotation = match policy {
            RotationPolicy::None => surface.fits(upright).then_some(0.0),
            RotationPolicy::RightAngle | RotationPolicy::Free => {
                //landscape first, the other quarter turn as fallback
                let (preferred, fallback) = match h > w {
                    true => ((90.0, turned), (0.0, upright)),
                    false => ((0.0, upright), (90.0, turned)),
                };
                [preferred, fallback]
                    .into_iter()
                    .find(|(_, fp)| surface.fits(*fp))
                    .map(|(r, _)| r)
            }
        };

        match rotation {
            Some(rotation) => Ok(Part {
                id: input.id.clone(),
                index,
                content_size: (w, h),
                rotation,
                footprint: if rotation == 0.0 { upright } else { turned },
                spacing,
                base_area: w * h,
                fragment: Arc::from(input.fragment.as_str()),
            }),
            None => Err(unplaced(UnplacedReason::ExceedsSurface)),
        }
    }

    pub fn is_rotated(&self) -> bool {
        self.rotation != 0.0
    }
}

/// A part that did not make it onto the surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnplacedPart {
    pub part_id: String,
    pub index: usize,
    pub reason: UnplacedReason,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnplacedReason {
    /// No orientation of the inflated part fits the surface
    ExceedsSurface,
    /// Every candidate position was rejected
    NoValidPosition,
    /// The run was stopped before the part was considered
    Cancelled,
}

impl Display for UnplacedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnplacedReason::ExceedsSurface => write!(f, "exceeds surface"),
            UnplacedReason::NoValidPosition => write!(f, "no valid position"),
            UnplacedReason::Cancelled => write!(f, "cancelled"),
        }
    }
}
