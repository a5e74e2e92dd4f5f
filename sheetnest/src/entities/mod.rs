mod layout;
mod part;
mod placed_part;
mod suggestion;
mod surface;

#[doc(inline)]
pub use layout::{Layout, OccupiedRegion, RegionKey};
#[doc(inline)]
pub use part::{Part, PartInput, RotationPolicy, UnplacedPart, UnplacedReason};
#[doc(inline)]
pub use placed_part::PlacedPart;
#[doc(inline)]
pub use suggestion::RectangleSuggestion;
#[doc(inline)]
pub use surface::MaterialSurface;
