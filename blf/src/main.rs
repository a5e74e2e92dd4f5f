use anyhow::{Context, Result};
use blf::config::BLFConfig;
use blf::io::cli::Cli;
use blf::io::job::{ExtMaskFillJob, Job, JobOutput};
use blf::io::{self, read_json, write_json};
use blf::opt::mask_fill::{MaskFillOutcome, MaskFiller};
use blf::opt::nest::{BLFNester, NestingOutcome};
use blf::progress::{PackingEvent, PackingHooks};
use clap::Parser as ClapParser;
use log::{debug, info, warn};
use sheetnest::io::ext_repr::ExtNestingInstance;
use tokio::sync::mpsc;

/// Number of events that may queue up before the driver blocks
const EVENT_CHANNEL_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let config = match args.config_file {
        None => {
            warn!("[MAIN] No config file provided, use --config-file to provide a custom config");
            BLFConfig::default()
        }
        Some(config_file) => read_json(&config_file).context("incorrect config file format")?,
    };

    info!("[MAIN] Successfully parsed BLFConfig: {config:?}");

    let job: Job = read_json(&args.input_file)?;
    let output = match job {
        Job::Nest(instance) => JobOutput::Nest(main_nest(instance, config).await?),
        Job::MaskFill(mask_job) => JobOutput::MaskFill(main_mask_fill(mask_job, config).await?),
    };

    write_json(&output, std::io::stdout().lock())
}

async fn main_nest(instance: ExtNestingInstance, config: BLFConfig) -> Result<NestingOutcome> {
    let (tx, mut rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let hooks = PackingHooks::default().with_channel(tx);

    let mut nester = BLFNester::new(instance.surface, &instance.parts, config.nesting, hooks)?;
    if let Some(fragment) = instance.material_fragment {
        nester = nester.with_material_fragment(fragment);
    }
    let handle = tokio::task::spawn_blocking(move || nester.solve());

    while let Some(event) = rx.recv().await {
        match event {
            PackingEvent::Progress(p) => debug!(
                "[MAIN] nesting progress {:.1}%, {} placed",
                p.fraction * 100.0,
                p.placed
            ),
            PackingEvent::Placed(pp) => debug!("[MAIN] part {} placed", pp.part_id),
        }
    }

    handle.await.context("nesting task failed")
}

async fn main_mask_fill(job: ExtMaskFillJob, config: BLFConfig) -> Result<MaskFillOutcome> {
    let (mask, scale) = job.import()?;
    let (tx, mut rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let hooks = PackingHooks::default().with_channel(tx);

    let mut filler = MaskFiller::new(mask, scale, config.mask_fill, hooks)?;
    let handle = tokio::task::spawn_blocking(move || filler.fill());

    while let Some(event) = rx.recv().await {
        match event {
            PackingEvent::Progress(p) => info!(
                "[MAIN] mask fill progress {:.1}% (row {}/{}), {} suggestions",
                p.fraction * 100.0,
                p.steps_processed,
                p.steps_total,
                p.placed
            ),
            PackingEvent::Placed(s) => debug!(
                "[MAIN] suggestion {} x {} at ({}, {})",
                s.width, s.height, s.x, s.y
            ),
        }
    }

    handle.await.context("mask fill task failed")
}
