use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::util::FPA;

///Axis-aligned rectangle.
///Coordinates follow the document convention: `y` grows downwards from the top edge of the surface.
#[derive(Clone, Debug, PartialEq, Copy, Serialize, Deserialize)]
pub struct Rect {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Rect {
    /// Returns `None` if the rectangle would be degenerate or contain non-finite values.
    pub fn try_new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Option<Self> {
        let finite = [x_min, y_min, x_max, y_max].iter().all(|v| v.is_finite());
        match finite && x_min < x_max && y_min < y_max {
            true => Some(Rect {
                x_min,
                y_min,
                x_max,
                y_max,
            }),
            false => None,
        }
    }

    /// Rectangle with its top-left corner at `(x, y)`.
    pub fn from_origin(x: f64, y: f64, width: f64, height: f64) -> Option<Self> {
        Rect::try_new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// True if the interiors of both rectangles intersect.
    /// Rectangles that only share an edge or a corner do not overlap.
    #[inline(always)]
    pub fn overlaps(&self, other: &Rect) -> bool {
        f64::max(self.x_min, other.x_min) < f64::min(self.x_max, other.x_max)
            && f64::max(self.y_min, other.y_min) < f64::min(self.y_max, other.y_max)
    }

    /// True if `other` lies entirely within `self`, with a tolerance for floating point precision.
    #[inline(always)]
    pub fn almost_contains(&self, other: &Rect) -> bool {
        FPA(other.x_min) >= FPA(self.x_min)
            && FPA(other.y_min) >= FPA(self.y_min)
            && FPA(other.x_max) <= FPA(self.x_max)
            && FPA(other.y_max) <= FPA(self.y_max)
    }
}

impl Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[x: {:.3}, y: {:.3}, w: {:.3}, h: {:.3}]",
            self.x_min,
            self.y_min,
            self.width(),
            self.height()
        )
    }
}
