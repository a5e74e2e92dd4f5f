//! Geometry, occupancy and validation engine for rectangular sheet nesting.
//!
//! Two kinds of occupancy are modelled:
//! * a [`Layout`](entities::Layout) of axis-aligned part footprints on a bounded [`MaterialSurface`](entities::MaterialSurface),
//! * an [`AvailabilityMask`](mask::AvailabilityMask): a per-cell usable/unusable bitmap with a pristine copy
//!   that separates inherent obstacles from cells consumed by placements.
//!
//! Placement heuristics live in the `blf` crate; this crate only answers
//! bounds, overlap, halo and coverage queries and composes the final documents.

/// Surfaces, parts and layouts for nesting mode
pub mod entities;

/// Configuration errors
pub mod error;

/// Rectangles and placement transforms
pub mod geometry;

/// Output documents and external representations
pub mod io;

/// Availability bitmaps for mask mode
pub mod mask;

/// Helper types and debug checks
pub mod util;
