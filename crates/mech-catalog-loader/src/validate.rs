//! Spot check of migrated documents.

use std::path::Path;

use mech_catalog_core::inspect_document;
use serde::{Deserialize, Serialize};

use crate::corpus;

/// Sample files checked when no explicit list is given.
pub const DEFAULT_SAMPLE_FILES: [&str; 3] = [
    "meks/3050U/Annihilator ANH-1A.json",
    "meks/3050U/Black Hawk (Nova) Prime.json",
    "meks/3050U/Daishi (Dire Wolf) Prime.json",
];

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SampleStatus {
    Pass,
    Fail { reasons: Vec<String> },
    Missing,
    Error { detail: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct SampleResult {
    pub file: String,
    #[serde(flatten)]
    pub status: SampleStatus,
}

#[must_use]
pub fn default_samples() -> Vec<String> {
    DEFAULT_SAMPLE_FILES.iter().map(ToString::to_string).collect()
}

/// Checks each sample for equipment tech bases and the OmniMech flag.
#[must_use]
pub fn validate_samples(root: &Path, samples: &[String]) -> Vec<SampleResult> {
    samples
        .iter()
        .map(|file| {
            let status = sample_status(&root.join(file));
            match &status {
                SampleStatus::Pass => tracing::info!("Sample ok: {file}"),
                SampleStatus::Fail { reasons } => {
                    tracing::warn!("Sample incomplete: {file}: {}", reasons.join("; "));
                }
                SampleStatus::Missing => tracing::warn!("Sample not found: {file}"),
                SampleStatus::Error { detail } => tracing::warn!("Sample unreadable: {file}: {detail}"),
            }
            SampleResult { file: file.clone(), status }
        })
        .collect()
}

fn sample_status(path: &Path) -> SampleStatus {
    if !path.exists() {
        return SampleStatus::Missing;
    }
    let doc = match corpus::read_json(path) {
        Ok(doc) => doc,
        Err(err) => return SampleStatus::Error { detail: err.to_string() },
    };
    match inspect_document(&doc) {
        Ok(findings) if findings.is_complete() => SampleStatus::Pass,
        Ok(findings) => SampleStatus::Fail { reasons: findings.problems() },
        Err(err) => SampleStatus::Error { detail: err.to_string() },
    }
}
