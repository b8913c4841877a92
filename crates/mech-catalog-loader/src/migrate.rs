//! In-place back-fill of the JSON corpus.
//!
//! Not transactional across files: an interrupted run leaves some files
//! migrated, and re-running converges because only absent keys are added.

use std::path::Path;

use anyhow::Result;
use mech_catalog_core::backfill_unit_document;
use serde::{Deserialize, Serialize};

use crate::corpus::{self, CorpusEntry};
use crate::report::{AnomalyKind, Stage, StageReport};
use crate::validate::{validate_samples, SampleResult};

const PROGRESS_EVERY: usize = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct MigrationSummary {
    pub processed: usize,
    pub updated: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationReport {
    pub corpus: String,
    pub before: Vec<SampleResult>,
    pub summary: MigrationSummary,
    pub after: Vec<SampleResult>,
    pub failures: StageReport,
}

/// Validates the samples, back-fills every unit file, then validates again.
///
/// # Errors
/// Returns an error when the corpus directory does not exist.
pub fn run_migration(root: &Path, samples: &[String]) -> Result<MigrationReport> {
    corpus::ensure_corpus_root(root)?;
    let before = validate_samples(root, samples);
    let (summary, failures) = migrate_corpus(root);
    let after = validate_samples(root, samples);
    Ok(MigrationReport { corpus: root.display().to_string(), before, summary, after, failures })
}

/// Back-fills every unit file under `root`, rewriting only changed files.
#[must_use]
pub fn migrate_corpus(root: &Path) -> (MigrationSummary, StageReport) {
    let mut summary = MigrationSummary::default();
    let mut report = StageReport::new(Stage::Migrate);

    for entry in corpus::unit_files(root) {
        summary.processed += 1;
        match entry {
            Ok(entry) => match migrate_file(&mut report, &entry) {
                Some(true) => summary.updated += 1,
                Some(false) => {}
                None => summary.failed += 1,
            },
            Err(err) => {
                summary.failed += 1;
                let location = err.path().map_or_else(String::new, |path| path.display().to_string());
                report.skip(AnomalyKind::UnreadableFile, location, err.to_string());
            }
        }
        if summary.processed % PROGRESS_EVERY == 0 {
            tracing::info!("Processed {} files, updated {}", summary.processed, summary.updated);
        }
    }
    report.loaded = summary.updated;

    tracing::info!(
        processed = summary.processed,
        updated = summary.updated,
        failed = summary.failed,
        "Migration finished"
    );
    (summary, report)
}

/// `Some(true)` when the file was rewritten, `None` when it failed.
fn migrate_file(report: &mut StageReport, entry: &CorpusEntry) -> Option<bool> {
    let mut doc = match corpus::read_json(&entry.path) {
        Ok(doc) => doc,
        Err(err) => {
            report.skip(err.kind(), &entry.relative_path, err.to_string());
            return None;
        }
    };
    let added = match backfill_unit_document(&mut doc, &entry.file_name) {
        Ok(added) => added,
        Err(err) => {
            report.skip(AnomalyKind::InvalidRecord, &entry.relative_path, err.to_string());
            return None;
        }
    };
    if added == 0 {
        return Some(false);
    }
    if let Err(err) = corpus::write_json(&entry.path, &doc) {
        report.skip(err.kind(), &entry.relative_path, err.to_string());
        return None;
    }
    tracing::debug!(added, "Updated {}", entry.relative_path);
    Some(true)
}
