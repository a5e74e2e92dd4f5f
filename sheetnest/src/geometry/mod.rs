mod placement_transform;
mod rect;

#[doc(inline)]
pub use placement_transform::{PlacementTransform, rotated_extent};
#[doc(inline)]
pub use rect::Rect;
