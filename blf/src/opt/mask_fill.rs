use std::time::Instant;

use log::{debug, info, warn};
use serde::Serialize;
use thousands::Separable;

use sheetnest::entities::RectangleSuggestion;
use sheetnest::error::Result;
use sheetnest::mask::{AvailabilityMask, CellRect, CellScale, HaloSpec};

use crate::config::MaskFillConfig;
use crate::opt::candidates::{EdgeCache, mask_row_candidates, snap_anchor};
use crate::opt::catalogue::SizeCatalogue;
use crate::opt::score::SizeScore;
use crate::opt::state::{DriverState, RunStatus};
use crate::progress::{PackingHooks, PackingProgress};

/// Result of a mask fill run.
#[derive(Clone, Debug, Serialize)]
pub struct MaskFillOutcome {
    /// Suggestions in commit order, physical units
    pub suggestions: Vec<RectangleSuggestion>,
    pub status: RunStatus,
    pub rows_processed: usize,
    pub total_rows: usize,
}

enum Search {
    Found(CellRect),
    Empty,
    Cancelled,
}

/// Greedy row-by-row fill of an [`AvailabilityMask`] with axis-aligned rectangles.
///
/// Rows are scanned top to bottom at the configured step. Within a row, anchors are
/// regenerated after every commit; at the first anchor where any catalogue size is admissible
/// the largest admissible size is committed.
pub struct MaskFiller {
    pub config: MaskFillConfig,
    mask: AvailabilityMask,
    scale: CellScale,
    catalogue: SizeCatalogue,
    halo: HaloSpec,
    step_x: usize,
    step_y: usize,
    edges: EdgeCache,
    hooks: PackingHooks<RectangleSuggestion>,
    suggestions: Vec<RectangleSuggestion>,
    state: DriverState,
    rows_processed: usize,
    candidate_counter: usize,
    validation_counter: usize,
}

impl MaskFiller {
    pub fn new(
        mask: AvailabilityMask,
        scale: CellScale,
        config: MaskFillConfig,
        hooks: PackingHooks<RectangleSuggestion>,
    ) -> Result<Self> {
        let config = config.validate()?;
        let catalogue = SizeCatalogue::new(&config, &scale);
        if catalogue.is_empty() {
            warn!("[MASK] size catalogue is empty, nothing will be suggested");
        }
        let halo = HaloSpec {
            neighbor_x: scale.gap_x(config.neighbor_gap),
            neighbor_y: scale.gap_y(config.neighbor_gap),
            obstacle_x: scale.gap_x(config.obstacle_gap),
            obstacle_y: scale.gap_y(config.obstacle_gap),
        };

        Ok(Self {
            mask,
            scale,
            catalogue,
            halo,
            step_x: scale.len_x(config.step),
            step_y: scale.len_y(config.step),
            edges: EdgeCache::new(config.edge_cache_size),
            hooks,
            suggestions: vec![],
            state: DriverState::Idle,
            rows_processed: 0,
            candidate_counter: 0,
            validation_counter: 0,
            config,
        })
    }

    pub fn mask(&self) -> &AvailabilityMask {
        &self.mask
    }

    pub fn halo(&self) -> &HaloSpec {
        &self.halo
    }

    /// Row count used for the progress fraction.
    /// The scan itself always covers the full mask height.
    pub fn total_rows(&self) -> usize {
        let height_cells = match self.config.effective_height {
            Some(h) => self.scale.len_y(h),
            None => self.mask.height(),
        };
        height_cells.div_ceil(self.step_y).max(1)
    }

    pub fn fill(&mut self) -> MaskFillOutcome {
        if let Some(status) = self.state.status() {
            warn!("[MASK] fill already {status}, returning the previous result");
            return self.outcome(status);
        }
        let start = Instant::now();
        let total_rows = self.total_rows();

        info!(
            "[MASK] filling {} x {} cells, {} rows of {} cells, {} catalogue sizes, halo {:?}",
            self.mask.width(),
            self.mask.height(),
            total_rows,
            self.step_y,
            self.catalogue.len(),
            self.halo
        );

        self.state.advance(DriverState::Scanning);
        self.report_progress(total_rows);
        let status = self.scan_rows(total_rows);
        self.state.advance(DriverState::Done(status));
        self.report_progress(total_rows);

        info!(
            "[MASK] fill {} in {:.3}ms: {} suggestions, {}/{} rows ({} anchors, {} validations)",
            status,
            start.elapsed().as_secs_f64() * 1000.0,
            self.suggestions.len(),
            self.rows_processed,
            total_rows,
            self.candidate_counter.separate_with_commas(),
            self.validation_counter.separate_with_commas()
        );
        self.outcome(status)
    }

    fn scan_rows(&mut self, total_rows: usize) -> RunStatus {
        let rows = (0..self.mask.height()).step_by(self.step_y);
        for (row, y) in rows.enumerate() {
            if self.suggestions.len() >= self.config.max_items {
                return RunStatus::Exhausted;
            }
            if self.hooks.should_abort() {
                return RunStatus::Cancelled;
            }
            loop {
                match self.search_row(y) {
                    Search::Found(rect) => {
                        if !self.commit(rect) {
                            break;
                        }
                        if self.suggestions.len() >= self.config.max_items {
                            return RunStatus::Exhausted;
                        }
                    }
                    Search::Empty => break,
                    Search::Cancelled => return RunStatus::Cancelled,
                }
            }
            self.rows_processed = row + 1;

            if self.rows_processed % self.config.progress_interval_rows == 0 {
                self.report_progress(total_rows);
            }
            if self.config.yield_after_rows > 0
                && self.rows_processed % self.config.yield_after_rows == 0
            {
                std::thread::yield_now();
            }
        }
        RunStatus::Finished
    }

    /// First anchor of the row at which some catalogue size is admissible.
    fn search_row(&mut self, y: usize) -> Search {
        if self.hooks.should_abort() {
            return Search::Cancelled;
        }
        let anchors = mask_row_candidates(&self.mask, &self.edges, y, self.step_x);
        for x in anchors {
            if self.hooks.should_abort() {
                return Search::Cancelled;
            }
            self.candidate_counter += 1;
            match self.largest_at_anchor(x, y) {
                Search::Empty => continue,
                found_or_cancelled => return found_or_cancelled,
            }
        }
        Search::Empty
    }

    /// Largest admissible catalogue size at an anchor.
    /// Every size is validated, a larger one may fail where a smaller one fits.
    fn largest_at_anchor(&mut self, x: usize, y: usize) -> Search {
        let mut best: Option<(SizeScore, CellRect)> = None;
        for size in self.catalogue.sizes() {
            if self.hooks.should_abort() {
                return Search::Cancelled;
            }
            let score = SizeScore::new(size.w_cells, size.h_cells);
            if best.is_some_and(|(best_score, _)| score <= best_score) {
                continue;
            }
            let (ax, ay) = snap_anchor(
                &self.mask,
                &self.edges,
                &self.halo,
                (x, y),
                (size.w_cells, size.h_cells),
                (self.step_x, self.step_y),
            );
            let rect = CellRect::new(ax, ay, size.w_cells, size.h_cells);
            self.validation_counter += 1;
            if self
                .mask
                .validate(&rect, &self.halo, self.config.coverage_threshold)
                .is_ok()
            {
                best = Some((score, rect));
            }
        }
        match best {
            Some((_, rect)) => Search::Found(rect),
            None => Search::Empty,
        }
    }

    fn commit(&mut self, rect: CellRect) -> bool {
        self.state.advance(DriverState::PlacementFound);
        self.state.advance(DriverState::Committing);

        let committed = match self.mask.commit(&rect, &self.halo) {
            Ok(()) => {
                self.edges.register(rect.x_max(), rect.y_max());
                let suggestion = RectangleSuggestion {
                    x: self.scale.to_physical_x(rect.x),
                    y: self.scale.to_physical_y(rect.y),
                    width: self.scale.to_physical_x(rect.w),
                    height: self.scale.to_physical_y(rect.h),
                };
                self.suggestions.push(suggestion);
                debug!(
                    "[MASK] suggestion {}/{} at {}",
                    self.suggestions.len(),
                    self.config.max_items,
                    rect
                );
                self.hooks.report_placement(&suggestion);
                true
            }
            Err(rejection) => {
                warn!("[MASK] commit of {rect} rejected: {rejection}");
                false
            }
        };

        self.state.advance(DriverState::Scanning);
        committed
    }

    fn report_progress(&mut self, total_rows: usize) {
        let progress = PackingProgress {
            fraction: (self.rows_processed as f64 / total_rows as f64).min(1.0),
            steps_processed: self.rows_processed.min(total_rows),
            steps_total: total_rows,
            placed: self.suggestions.len(),
            last_placement: self.suggestions.last().copied(),
        };
        self.hooks.report_progress(&progress);
    }

    fn outcome(&self, status: RunStatus) -> MaskFillOutcome {
        MaskFillOutcome {
            suggestions: self.suggestions.clone(),
            status,
            rows_processed: self.rows_processed,
            total_rows: self.total_rows(),
        }
    }
}
