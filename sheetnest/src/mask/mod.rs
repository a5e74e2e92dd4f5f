//! Cell-level occupancy used by the mask-driven fill.
//!
//! An [`AvailabilityMask`] keeps the pristine usable/obstacle state of every cell next to the
//! mutable [`Occupancy`] of the run, so that validation can tell an inherent obstacle apart
//! from a cell that was consumed by a previous placement.

mod availability;
mod cells;
mod validation;

#[doc(inline)]
pub use availability::{AvailabilityMask, Occupancy, USABLE_LUMINANCE};
#[doc(inline)]
pub use cells::{CellRect, CellScale};
#[doc(inline)]
pub use validation::{HaloSpec, Rejection};
