//! Dataset merging
//!
//! Reads FDC documents, normalizes every food entry and concatenates the
//! records in input order: files as given, entries in document order.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{EntryError, Error, Result};
use crate::fdc::{detect_layout, Section};
use crate::models::CanonicalRecord;
use crate::nutrition::NutrientLookup;
use super::alt_names::AltNameMap;
use super::normalizer::normalize;
use super::PipelineConfig;

/// A food entry that was skipped
#[derive(Debug, Clone, PartialEq)]
pub struct EntryWarning {
    pub file: PathBuf,
    /// Position of the entry within its section
    pub index: usize,
    pub error: EntryError,
}

impl std::fmt::Display for EntryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} entry #{}: {}", self.file.display(), self.index, self.error)
    }
}

/// Outcome of a merge run
#[derive(Debug, Default)]
pub struct MergeReport {
    /// Records in pre-sort order
    pub records: Vec<CanonicalRecord>,
    pub warnings: Vec<EntryWarning>,
    /// Files skipped because their schema was not recognized
    pub skipped_files: Vec<Error>,
}

impl MergeReport {
    /// FDC ids of skipped entries, where known
    pub fn skipped_ids(&self) -> Vec<i64> {
        self.warnings.iter().filter_map(|w| w.error.fdc_id()).collect()
    }
}

/// Merges one or more FDC documents into canonical records
pub struct DatasetMerger<'a> {
    alt_names: &'a AltNameMap,
    config: PipelineConfig,
}

impl<'a> DatasetMerger<'a> {
    pub fn new(alt_names: &'a AltNameMap, config: PipelineConfig) -> Self {
        Self { alt_names, config }
    }

    /// Read, parse and normalize every input file.
    ///
    /// Unreadable or unparseable files abort the run. A file with an
    /// unrecognized shape is skipped with a warning unless the config is
    /// strict, and the run fails if no file was recognized at all.
    pub fn merge<P: AsRef<Path>>(&self, paths: &[P]) -> Result<MergeReport> {
        let mut report = MergeReport::default();

        for path in paths {
            let path = path.as_ref();
            let doc = read_document(path)?;

            match self.merge_document(path, &doc, &mut report) {
                Ok(()) => {}
                Err(e @ Error::UnsupportedSchema { .. }) if !self.config.strict => {
                    tracing::warn!("Skipping file: {}", e);
                    report.skipped_files.push(e);
                }
                Err(e) => return Err(e),
            }
        }

        if !paths.is_empty() && report.skipped_files.len() == paths.len() {
            return Err(Error::NoSupportedInput(paths.len()));
        }

        Ok(report)
    }

    /// Normalize the entries of one parsed document into `report`.
    ///
    /// `path` is only used to label errors and warnings.
    pub fn merge_document(&self, path: &Path, doc: &Value, report: &mut MergeReport) -> Result<()> {
        let sections = detect_layout(doc).map_err(|reason| Error::UnsupportedSchema {
            path: path.to_path_buf(),
            reason,
        })?;

        for section in sections {
            self.merge_section(path, section, report);
        }
        Ok(())
    }

    fn merge_section(&self, path: &Path, section: Section<'_>, report: &mut MergeReport) {
        let lookup = NutrientLookup::new(section.variant, self.config.basis);
        let before = report.records.len();
        let mut skipped = 0;

        for (index, entry) in section.entries.iter().enumerate() {
            match normalize(entry, &lookup, self.alt_names) {
                Ok(record) => report.records.push(record),
                Err(error) => {
                    tracing::debug!("{} entry #{} skipped: {}", path.display(), index, error);
                    skipped += 1;
                    report.warnings.push(EntryWarning {
                        file: path.to_path_buf(),
                        index,
                        error,
                    });
                }
            }
        }

        tracing::info!(
            "{}: {} {} foods normalized, {} skipped",
            path.display(),
            report.records.len() - before,
            section.variant,
            skipped
        );
    }
}

/// Read and parse one JSON document
pub fn read_document(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&text).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}
