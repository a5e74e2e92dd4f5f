use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Copy, Serialize, Deserialize)]
/// Rigid transformation that maps a part's local content into its slot on the surface.
/// Decomposed into a rotation about `pivot` (local coordinates) followed by a translation.
pub struct PlacementTransform {
    /// The rotation in degrees, clockwise in document coordinates
    pub rotation: f64,
    /// Center of rotation, in the local coordinates of the part content
    pub pivot: (f64, f64),
    /// The translation in the x and y-axis
    pub translation: (f64, f64),
}

impl PlacementTransform {
    /// Transformation that rotates content of `content_size` about its own center and
    /// lands its rotated bounding box with the top-left corner at `origin`.
    pub fn about_center(origin: (f64, f64), content_size: (f64, f64), rotation: f64) -> Self {
        let (w, h) = content_size;
        let (rot_w, rot_h) = rotated_extent(content_size, rotation);
        Self {
            rotation,
            pivot: (w / 2.0, h / 2.0),
            translation: (origin.0 + (rot_w - w) / 2.0, origin.1 + (rot_h - h) / 2.0),
        }
    }

    pub fn is_rotated(&self) -> bool {
        self.rotation.rem_euclid(360.0) != 0.0
    }

    /// Maps a point from local content coordinates to surface coordinates.
    pub fn apply(&self, (x, y): (f64, f64)) -> (f64, f64) {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let (px, py) = self.pivot;
        let (dx, dy) = (x - px, y - py);
        let rx = px + dx * cos - dy * sin;
        let ry = py + dx * sin + dy * cos;
        (rx + self.translation.0, ry + self.translation.1)
    }
}

/// Width and height of the bounding box of a `w x h` rectangle rotated by `rotation` degrees.
pub fn rotated_extent((w, h): (f64, f64), rotation: f64) -> (f64, f64) {
    let r = rotation.rem_euclid(360.0);
    if r == 0.0 || r == 180.0 {
        return (w, h);
    }
    if r == 90.0 || r == 270.0 {
        return (h, w);
    }
    let (sin, cos) = rotation.to_radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    (w * cos + h * sin, w * sin + h * cos)
}

impl Display for PlacementTransform {
    /// Formats as an SVG `transform` attribute value.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        //https://developer.mozilla.org/en-US/docs/Web/SVG/Attribute/transform
        //operations are effectively applied from right to left
        let (tx, ty) = self.translation;
        match self.is_rotated() {
            false => write!(f, "translate({tx} {ty})"),
            true => {
                let (px, py) = self.pivot;
                write!(f, "translate({tx} {ty}) rotate({} {px} {py})", self.rotation)
            }
        }
    }
}
