/// Candidate positions for both drivers
pub mod candidates;
/// Size catalogue searched by the mask fill
pub mod catalogue;
pub mod mask_fill;
pub mod nest;
pub mod score;
pub mod state;
