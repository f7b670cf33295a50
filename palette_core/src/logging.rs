//! JSON-lines run records.
//!
//! Each call appends one self-contained JSON object to the given file,
//! creating parent directories as needed.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::data::DatasetSummary;
use crate::neural::{LossBreakdown, PaletteMetrics};

fn append_json_line<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    serde_json::to_writer(&mut file, value).map_err(io::Error::other)?;
    file.write_all(b"\n")
}

fn timestamp_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

#[derive(Debug, Serialize)]
pub struct DatasetLogEntry<'a> {
    pub stage: &'a str,
    pub timestamp_ms: u128,
    pub summary: &'a DatasetSummary,
}

/// Record a dataset summary for one pipeline stage ("generated", "augmented", ...).
pub fn log_dataset_summary<P: AsRef<Path>>(
    path: P,
    stage: &str,
    summary: &DatasetSummary,
) -> io::Result<()> {
    let entry = DatasetLogEntry {
        stage,
        timestamp_ms: timestamp_ms(),
        summary,
    };
    append_json_line(path, &entry)
}

#[derive(Debug, Serialize)]
pub struct TrainingLogEntry<'a> {
    pub epoch: usize,
    pub loss: &'a LossBreakdown,
    pub metrics: Option<&'a PaletteMetrics>,
    pub timestamp_ms: u128,
}

pub fn log_training_epoch<P: AsRef<Path>>(
    path: P,
    epoch: usize,
    loss: &LossBreakdown,
    metrics: Option<&PaletteMetrics>,
) -> io::Result<()> {
    let entry = TrainingLogEntry {
        epoch,
        loss,
        metrics,
        timestamp_ms: timestamp_ms(),
    };
    append_json_line(path, &entry)
}
