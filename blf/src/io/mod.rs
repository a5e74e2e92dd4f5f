use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};
use log::{LevelFilter, info};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::EPOCH;

pub mod cli;
pub mod job;

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("could not open {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).with_context(|| format!("could not parse {}", path.display()))
}

/// Writes `value` as pretty JSON to `writer`, followed by a newline.
pub fn write_json(value: &impl Serialize, mut writer: impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value).context("could not serialize result")?;
    writeln!(writer)?;
    Ok(())
}

/// Installs a logger on stderr, stdout is reserved for results.
pub fn init_logger(level_filter: LevelFilter) -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            let handle = std::thread::current();
            let thread_name = handle.name().unwrap_or("-");

            let duration = EPOCH.elapsed();
            let sec = duration.as_secs() % 60;
            let min = (duration.as_secs() / 60) % 60;
            let hours = (duration.as_secs() / 60) / 60;

            let prefix = format!(
                "[{}] [{:0>2}:{:0>2}:{:0>2}] <{}>",
                record.level(),
                hours,
                min,
                sec,
                thread_name,
            );

            out.finish(format_args!("{prefix:<27}{message}"))
        })
        .level(level_filter)
        .chain(std::io::stderr())
        .apply()?;
    info!("[MAIN] time: {}", jiff::Zoned::now());
    Ok(())
}
