use std::sync::LazyLock;
use std::time::Instant;

/// Frozen numeric configuration of the drivers
pub mod config;
pub mod io;
/// Candidate generation, scoring and the packing drivers
pub mod opt;
/// Progress snapshots, run hooks and the channel bridge
pub mod progress;

pub static EPOCH: LazyLock<Instant> = LazyLock::new(Instant::now);
