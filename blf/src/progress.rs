use anyhow::anyhow;
use log::warn;
use serde::Serialize;
use tokio::sync::mpsc::Sender;

/// Transient snapshot of a running packing driver.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PackingProgress<P> {
    /// Fraction of the work done, in [0, 1]
    pub fraction: f64,
    pub steps_processed: usize,
    pub steps_total: usize,
    /// Number of placements committed so far
    pub placed: usize,
    pub last_placement: Option<P>,
}

/// Everything a driver publishes while it runs.
#[derive(Clone, Debug, PartialEq)]
pub enum PackingEvent<P> {
    Progress(PackingProgress<P>),
    Placed(P),
}

pub type AbortPredicate = Box<dyn Fn() -> bool + Send + Sync>;
pub type ProgressConsumer<P> = Box<dyn FnMut(&PackingProgress<P>) -> anyhow::Result<()> + Send>;
pub type PlacementConsumer<P> = Box<dyn FnMut(&P) -> anyhow::Result<()> + Send>;

/// Run plumbing that does not belong in the frozen configuration:
/// an advisory cancellation predicate and the progress/placement consumers.
///
/// Consumers are called synchronously, so the driver only resumes once they return.
/// A consumer returning an error is logged and otherwise ignored.
pub struct PackingHooks<P> {
    abort: Option<AbortPredicate>,
    on_progress: Option<ProgressConsumer<P>>,
    on_placement: Option<PlacementConsumer<P>>,
}

impl<P> Default for PackingHooks<P> {
    fn default() -> Self {
        Self {
            abort: None,
            on_progress: None,
            on_placement: None,
        }
    }
}

impl<P> PackingHooks<P> {
    pub fn with_abort(mut self, abort: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.abort = Some(Box::new(abort));
        self
    }

    pub fn with_progress(
        mut self,
        on_progress: impl FnMut(&PackingProgress<P>) -> anyhow::Result<()> + Send + 'static,
    ) -> Self {
        self.on_progress = Some(Box::new(on_progress));
        self
    }

    pub fn with_placement(
        mut self,
        on_placement: impl FnMut(&P) -> anyhow::Result<()> + Send + 'static,
    ) -> Self {
        self.on_placement = Some(Box::new(on_placement));
        self
    }

    /// True once the abort predicate has fired.
    pub fn should_abort(&self) -> bool {
        self.abort.as_ref().is_some_and(|abort| abort())
    }

    pub fn report_progress(&mut self, progress: &PackingProgress<P>) {
        if let Some(on_progress) = self.on_progress.as_mut() {
            if let Err(e) = on_progress(progress) {
                warn!("[HOOKS] progress consumer failed: {e:#}");
            }
        }
    }

    pub fn report_placement(&mut self, placement: &P) {
        if let Some(on_placement) = self.on_placement.as_mut() {
            if let Err(e) = on_placement(placement) {
                warn!("[HOOKS] placement consumer failed: {e:#}");
            }
        }
    }
}

impl<P: Clone + Send + 'static> PackingHooks<P> {
    /// Publishes every progress snapshot and placement on a bounded channel.
    /// Sending blocks while the channel is full, so this must be used from a blocking context.
    pub fn with_channel(self, tx: Sender<PackingEvent<P>>) -> Self {
        let progress_tx = tx.clone();
        self.with_progress(move |p| {
            progress_tx
                .blocking_send(PackingEvent::Progress(p.clone()))
                .map_err(|e| anyhow!("progress receiver dropped: {e}"))
        })
        .with_placement(move |p| {
            tx.blocking_send(PackingEvent::Placed(p.clone()))
                .map_err(|e| anyhow!("placement receiver dropped: {e}"))
        })
    }
}
