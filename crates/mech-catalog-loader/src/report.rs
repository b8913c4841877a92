//! Per-stage outcome reporting.
//!
//! Skipped files and coerced values are collected here instead of aborting
//! the run, and each one is logged once when it is recorded.

use mech_catalog_core::DataQualityIssue;
use serde::{Deserialize, Serialize};

/// Log target for data-quality anomalies.
pub const ANOMALY_TARGET: &str = "mech_catalog::anomaly";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    SchemaApply,
    LoadEquipment,
    LoadValidationOptions,
    LoadUnits,
    Migrate,
}

impl Stage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SchemaApply => "schema_apply",
            Self::LoadEquipment => "load_equipment",
            Self::LoadValidationOptions => "load_validation_options",
            Self::LoadUnits => "load_units",
            Self::Migrate => "migrate",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    MalformedJson,
    UnreadableFile,
    WriteFailed,
    InvalidRecord,
    MissingRequiredField,
    UnexpectedTechBase,
    UnrecognizedUnitTechBase,
    BatchFailed,
}

impl AnomalyKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MalformedJson => "malformed_json",
            Self::UnreadableFile => "unreadable_file",
            Self::WriteFailed => "write_failed",
            Self::InvalidRecord => "invalid_record",
            Self::MissingRequiredField => "missing_required_field",
            Self::UnexpectedTechBase => "unexpected_tech_base",
            Self::UnrecognizedUnitTechBase => "unrecognized_unit_tech_base",
            Self::BatchFailed => "batch_failed",
        }
    }

    /// Value was coerced and kept, as opposed to a record being dropped.
    #[must_use]
    pub fn is_data_quality(self) -> bool {
        matches!(self, Self::UnexpectedTechBase | Self::UnrecognizedUnitTechBase)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Anomaly {
    pub stage: Stage,
    /// File path or record identifier.
    pub location: String,
    pub kind: AnomalyKind,
    pub detail: String,
}

impl Anomaly {
    #[must_use]
    pub fn from_issue(stage: Stage, location: &str, issue: &DataQualityIssue) -> Self {
        let kind = match issue {
            DataQualityIssue::UnrecognizedUnitTechBase { .. } => AnomalyKind::UnrecognizedUnitTechBase,
            DataQualityIssue::UnexpectedEquipmentTechBase { .. } => AnomalyKind::UnexpectedTechBase,
        };
        Self { stage, location: location.to_string(), kind, detail: issue.describe() }
    }

    fn log(&self) {
        if self.kind.is_data_quality() {
            tracing::warn!(
                target: ANOMALY_TARGET,
                stage = self.stage.as_str(),
                kind = self.kind.as_str(),
                location = %self.location,
                "{}",
                self.detail
            );
        } else {
            tracing::warn!(
                stage = self.stage.as_str(),
                kind = self.kind.as_str(),
                "Skipping {}: {}",
                self.location,
                self.detail
            );
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct StageReport {
    pub stage: Stage,
    pub loaded: usize,
    pub skipped: usize,
    pub anomalies: Vec<Anomaly>,
}

impl StageReport {
    #[must_use]
    pub fn new(stage: Stage) -> Self {
        Self { stage, loaded: 0, skipped: 0, anomalies: Vec::new() }
    }

    /// Records and logs an anomaly that did not drop a record.
    pub fn note(&mut self, kind: AnomalyKind, location: impl Into<String>, detail: impl Into<String>) {
        let anomaly =
            Anomaly { stage: self.stage, location: location.into(), kind, detail: detail.into() };
        anomaly.log();
        self.anomalies.push(anomaly);
    }

    /// Records, logs, and counts one dropped record.
    pub fn skip(&mut self, kind: AnomalyKind, location: impl Into<String>, detail: impl Into<String>) {
        self.skipped += 1;
        self.note(kind, location, detail);
    }

    /// Records a failed write that dropped `records` rows at once.
    pub fn skip_batch(&mut self, records: usize, location: impl Into<String>, err: &anyhow::Error) {
        self.skipped += records;
        self.note(AnomalyKind::BatchFailed, location, format!("{err:#}"));
    }

    pub fn note_issues(&mut self, location: &str, issues: &[DataQualityIssue]) {
        for issue in issues {
            let anomaly = Anomaly::from_issue(self.stage, location, issue);
            anomaly.log();
            self.anomalies.push(anomaly);
        }
    }

    #[must_use]
    pub fn count(&self, kind: AnomalyKind) -> usize {
        self.anomalies.iter().filter(|anomaly| anomaly.kind == kind).count()
    }
}
