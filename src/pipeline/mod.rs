//! Conversion pipeline
//!
//! JSON files -> canonical records -> sorted CSV.

pub mod alt_names;
pub mod merger;
pub mod normalizer;
pub mod writer;

use std::path::Path;

use crate::error::Result;
use crate::nutrition::PortionBasis;

pub use alt_names::AltNameMap;
pub use merger::{read_document, DatasetMerger, EntryWarning, MergeReport};
pub use normalizer::normalize;
pub use writer::{csv_row, format_amount, sort_records, write_csv, Destination, COLUMNS};

/// Pipeline settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Amount of food each row describes
    pub basis: PortionBasis,
    /// Abort on an unrecognized file instead of skipping it
    pub strict: bool,
}

/// What a completed run produced
#[derive(Debug)]
pub struct RunSummary {
    pub records_written: usize,
    pub bytes_written: u64,
    pub report: MergeReport,
}

/// Convert `inputs` to CSV at `destination`.
///
/// Loads the alt-name overlay when a path is given, merges all inputs,
/// then sorts and writes. Per-entry problems are returned in the summary.
pub fn run<P: AsRef<Path>>(
    inputs: &[P],
    alt_names_path: Option<&Path>,
    destination: &Destination,
    config: PipelineConfig,
) -> Result<RunSummary> {
    let alt_names = match alt_names_path {
        Some(path) => AltNameMap::load(path)?,
        None => AltNameMap::default(),
    };

    let merger = DatasetMerger::new(&alt_names, config);
    let mut report = merger.merge(inputs)?;

    let bytes_written = destination.write(&mut report.records)?;
    let records_written = report.records.len();
    tracing::info!(
        "Wrote {} records ({} bytes) to {}",
        records_written,
        bytes_written,
        destination
    );

    if !report.warnings.is_empty() {
        tracing::warn!(
            "Skipped {} malformed food entries (known fdc ids: {:?})",
            report.warnings.len(),
            report.skipped_ids()
        );
    }

    Ok(RunSummary {
        records_written,
        bytes_written,
        report,
    })
}

