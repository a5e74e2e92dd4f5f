use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle proposed by the mask fill, in physical units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RectangleSuggestion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}
