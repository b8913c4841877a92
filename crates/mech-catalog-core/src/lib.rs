//! Normalization and classification rules for the battle-unit corpus.
//!
//! Everything in this crate is pure: documents come in as `serde_json::Value`,
//! canonical records come out. File access and persistence live in the loader
//! and store crates.

pub mod backfill;
pub mod coerce;
pub mod equipment;
pub mod filename;
pub mod omnimech;
pub mod options;
mod patterns;
pub mod tech_base;
pub mod unit;

pub use backfill::{backfill_unit_document, inspect_document, is_equipment_omnipod, DocumentFindings};
pub use equipment::{normalize_equipment, resolve_equipment_tech_base, EquipmentRecord};
pub use omnimech::{decompose, decompose_with, is_omnimech_config, OmniMechInfo, OmniMechInput};
pub use options::verifier_settings;
pub use tech_base::{
    classify_catalog_equipment, classify_equipment, lookup_unit_tech_base, normalize_unit_tech_base,
    EquipmentTechBase, UnitTechBase,
};
pub use unit::{normalize_unit, UnitLocation, UnitRecord};

/// File holding the corpus-wide equipment catalog.
pub const EQUIPMENT_FILE: &str = "derivedEquipment.json";
/// File holding the unit verifier thresholds.
pub const VERIFIER_OPTIONS_FILE: &str = "UnitVerifierOptions.json";
/// Name under which the verifier thresholds are stored.
pub const DEFAULT_OPTIONS_NAME: &str = "DefaultSettings";

#[derive(Debug, Clone, thiserror::Error, Eq, PartialEq)]
pub enum CatalogError {
    #[error("document is not a JSON object")]
    NotAnObject,
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
}

/// A value that was accepted after coercion to a safe default.
///
/// These never reject a record; the loader reports them separately so the
/// fallback does not go unnoticed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DataQualityIssue {
    UnrecognizedUnitTechBase { raw: String },
    UnexpectedEquipmentTechBase { raw: String },
}

impl DataQualityIssue {
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::UnrecognizedUnitTechBase { raw } => {
                format!("unrecognized unit tech base `{raw}`; stored as Inner Sphere")
            }
            Self::UnexpectedEquipmentTechBase { raw } => {
                format!("unexpected equipment tech base `{raw}`; stored as IS")
            }
        }
    }
}

/// A normalized record together with the fallbacks applied while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub record: T,
    pub issues: Vec<DataQualityIssue>,
}

impl<T> Normalized<T> {
    #[must_use]
    pub fn clean(record: T) -> Self {
        Self { record, issues: Vec::new() }
    }
}
