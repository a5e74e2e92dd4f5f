use std::time::Instant;

use log::{debug, info};
use serde::Serialize;
use thousands::Separable;

use sheetnest::entities::{
    Layout, MaterialSurface, Part, PartInput, PlacedPart, UnplacedPart, UnplacedReason,
};
use sheetnest::error::{PackingError, Result};
use sheetnest::geometry::Rect;
use sheetnest::io::svg::compose_nesting_document;

use crate::config::{NestingConfig, Quality};
use crate::opt::candidates::{grid_candidates, structural_candidates};
use crate::opt::score::PositionScore;
use crate::opt::state::{DriverState, RunStatus};
use crate::progress::{PackingHooks, PackingProgress};

/// Fraction of the smallest surface dimension used as grid step when neither a grid step nor a spacing is given
const DERIVED_GRID_FRACTION: f64 = 0.01;

/// Result of a nesting run.
#[derive(Clone, Debug, Serialize)]
pub struct NestingOutcome {
    /// Serialized vector document with the material and every placed part
    pub document: String,
    pub placed: Vec<PlacedPart>,
    pub unplaced: Vec<UnplacedPart>,
    /// Summed base area of the placed parts divided by the surface area
    pub utilization: f64,
    pub status: RunStatus,
}

impl NestingOutcome {
    pub fn n_placed(&self) -> usize {
        self.placed.len()
    }
}

enum Search {
    Found((f64, f64)),
    NotFound,
    Cancelled,
}

/// Bottom-Left-Fill nesting of part bounding boxes on a single material sheet.
/// Parts are placed one by one, largest base area first, each at the valid candidate
/// position with the lowest [`PositionScore`].
pub struct BLFNester {
    pub config: NestingConfig,
    pub layout: Layout,
    /// Parts that fit the surface, in placement order
    parts: Vec<Part>,
    unplaced: Vec<UnplacedPart>,
    hooks: PackingHooks<PlacedPart>,
    material_fragment: Option<String>,
    grid_step: f64,
    state: DriverState,
    n_inputs: usize,
    candidate_counter: usize,
}

impl BLFNester {
    pub fn new(
        surface: MaterialSurface,
        inputs: &[PartInput],
        config: NestingConfig,
        hooks: PackingHooks<PlacedPart>,
    ) -> Result<Self> {
        let config = config.validate()?;

        let mut parts = vec![];
        let mut unplaced = vec![];
        for (i, input) in inputs.iter().enumerate() {
            match Part::prepare(i, input, config.rotation, config.spacing, &surface) {
                Ok(part) => parts.push(part),
                Err(u) => {
                    debug!("[NEST] part {} dropped: {}", u.part_id, u.reason);
                    unplaced.push(u);
                }
            }
        }
        if parts.is_empty() {
            return Err(PackingError::NoFittableParts {
                n_parts: inputs.len(),
            });
        }

        //largest base area first, input order breaks ties
        parts.sort_by(|a, b| b.base_area.total_cmp(&a.base_area));

        let base_step = match (config.grid_step, config.spacing) {
            (Some(step), _) => step,
            (None, spacing) if spacing > 0.0 => spacing,
            (None, _) => f64::min(surface.width(), surface.height()) * DERIVED_GRID_FRACTION,
        };
        let grid_step = base_step * config.quality.grid_multiplier();

        info!(
            "[NEST] {} parts to nest on a {} x {} surface, {} dropped, grid step {:.3}",
            parts.len(),
            surface.width(),
            surface.height(),
            unplaced.len(),
            grid_step
        );

        Ok(Self {
            config,
            layout: Layout::new(surface),
            parts,
            unplaced,
            hooks,
            material_fragment: None,
            grid_step,
            state: DriverState::Idle,
            n_inputs: inputs.len(),
            candidate_counter: 0,
        })
    }

    /// Vector fragment drawn as the material in the output document
    pub fn with_material_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.material_fragment = Some(fragment.into());
        self
    }

    pub fn solve(mut self) -> NestingOutcome {
        let start = Instant::now();
        let parts = std::mem::take(&mut self.parts);
        let n_parts = parts.len();

        self.state.advance(DriverState::Scanning);
        self.report_progress(0, n_parts);

        let mut status = RunStatus::Finished;
        let mut processed = 0;
        for (i, part) in parts.iter().enumerate() {
            let search = match self.hooks.should_abort() {
                true => Search::Cancelled,
                false => self.search(part),
            };
            match search {
                Search::Found(position) => self.commit(part, position, n_parts),
                Search::NotFound => {
                    debug!("[NEST] no valid position for part {}", part.id);
                    self.unplaced.push(UnplacedPart {
                        part_id: part.id.clone(),
                        index: part.index,
                        reason: UnplacedReason::NoValidPosition,
                    });
                }
                Search::Cancelled => {
                    info!("[NEST] cancelled after {} placements", self.layout.placed_parts().len());
                    self.unplaced.extend(parts[i..].iter().map(|p| UnplacedPart {
                        part_id: p.id.clone(),
                        index: p.index,
                        reason: UnplacedReason::Cancelled,
                    }));
                    status = RunStatus::Cancelled;
                    break;
                }
            }
            processed = i + 1;
            self.report_progress(processed, n_parts);
        }
        self.report_progress(processed, n_parts);
        self.state.advance(DriverState::Done(status));

        let utilization = self.layout.utilization();
        info!(
            "[NEST] nesting {} in {:.3}ms ({} candidates tested)",
            status,
            start.elapsed().as_secs_f64() * 1000.0,
            self.candidate_counter.separate_with_commas()
        );
        info!(
            "[NEST] {}/{} parts placed with a utilization of {:.3}%",
            self.layout.placed_parts().len(),
            self.n_inputs,
            utilization * 100.0
        );

        let document = compose_nesting_document(
            self.layout.surface(),
            self.material_fragment.as_deref(),
            self.layout.placed_parts(),
        )
        .to_string();

        self.unplaced.sort_by_key(|u| u.index);
        NestingOutcome {
            document,
            placed: self.layout.placed_parts().to_vec(),
            unplaced: self.unplaced,
            utilization,
            status,
        }
    }

    /// Valid position for the part with the lowest score, searched according to the quality level.
    fn search(&mut self, part: &Part) -> Search {
        let (fw, fh) = part.footprint;
        let surface = *self.layout.surface();
        let spacing = self.config.spacing;
        let layout = &self.layout;
        let counter = &mut self.candidate_counter;

        let mut admissible = |pos: &(f64, f64)| {
            *counter += 1;
            Rect::from_origin(pos.0, pos.1, fw, fh).is_some_and(|r| layout.is_admissible(&r))
        };
        let score = |pos: &(f64, f64)| PositionScore::new(*pos, surface.width());

        let structural = structural_candidates(layout, spacing);
        let grid = grid_candidates(&surface, part.footprint, spacing, self.grid_step);

        let best = match self.config.quality {
            Quality::Best => structural
                .into_iter()
                .chain(grid)
                .filter(|p| admissible(p))
                .min_by_key(score),
            Quality::Fast | Quality::Balanced => {
                let structural_best = structural
                    .into_iter()
                    .filter(|p| admissible(p))
                    .min_by_key(score);
                match structural_best {
                    Some(pos) => Some(pos),
                    None if self.hooks.should_abort() => return Search::Cancelled,
                    //first valid grid point in row-major order
                    None => grid.into_iter().find(|p| admissible(p)),
                }
            }
        };

        match best {
            Some(pos) => Search::Found(pos),
            None => Search::NotFound,
        }
    }

    fn commit(&mut self, part: &Part, position: (f64, f64), n_parts: usize) {
        self.state.advance(DriverState::PlacementFound);
        self.state.advance(DriverState::Committing);
        let placed_part = self
            .layout
            .place(part, position)
            .and_then(|_| self.layout.placed_parts().last().cloned());
        if let Some(pp) = placed_part {
            info!(
                "[NEST] placing part {}/{} with id {} at [{}]",
                self.layout.placed_parts().len(),
                n_parts,
                pp.part_id,
                pp.footprint
            );
            self.hooks.report_placement(&pp);
        }
        self.state.advance(DriverState::Scanning);
    }

    fn report_progress(&mut self, processed: usize, total: usize) {
        let progress = PackingProgress {
            fraction: match total {
                0 => 1.0,
                _ => processed as f64 / total as f64,
            },
            steps_processed: processed,
            steps_total: total,
            placed: self.layout.placed_parts().len(),
            last_placement: self.layout.placed_parts().last().cloned(),
        };
        self.hooks.report_progress(&progress);
    }
}
