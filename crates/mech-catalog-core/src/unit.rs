//! Canonical unit records built from raw corpus documents.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce::{self, Document};
use crate::filename;
use crate::omnimech::{self, OmniMechInput};
use crate::tech_base::{self, UnitTechBase};
use crate::{CatalogError, DataQualityIssue, Normalized};

/// Partition used for files placed directly under the corpus root.
pub const UNKNOWN_UNIT_TYPE: &str = "Unknown";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnitRecord {
    pub original_file_path: String,
    pub unit_type: String,
    pub chassis: String,
    pub model: String,
    pub mul_id: Option<String>,
    pub tech_base: UnitTechBase,
    pub era: String,
    pub mass_tons: Option<i64>,
    pub role: String,
    pub source_book: Option<String>,
    pub is_omnimech: bool,
    pub omnimech_base_chassis: Option<String>,
    pub omnimech_configuration: Option<String>,
    pub config: String,
    pub data: Value,
}

/// Where a document lives relative to the corpus root.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct UnitLocation<'a> {
    pub unit_type: &'a str,
    pub file_name: &'a str,
}

impl<'a> UnitLocation<'a> {
    /// Splits a `/`-separated path relative to the corpus root.
    #[must_use]
    pub fn parse(relative_path: &'a str) -> Self {
        let mut segments = relative_path.split('/').filter(|segment| !segment.is_empty());
        let first = segments.next().unwrap_or_default();
        match segments.next_back() {
            Some(file_name) => Self { unit_type: first, file_name },
            None => Self { unit_type: UNKNOWN_UNIT_TYPE, file_name: first },
        }
    }
}

/// Builds the canonical record for one unit document.
///
/// Only a non-object document or an empty path is rejected. Every field is
/// otherwise coerced; tech base fallbacks are returned as issues.
pub fn normalize_unit(doc: &Value, relative_path: &str) -> Result<Normalized<UnitRecord>, CatalogError> {
    let Value::Object(fields) = doc else {
        return Err(CatalogError::NotAnObject);
    };
    let original_file_path = relative_path.replace('\\', "/");
    let location = UnitLocation::parse(&original_file_path);
    if location.file_name.is_empty() {
        return Err(CatalogError::MissingField("original_file_path"));
    }

    let chassis = coerce::non_empty_string(fields, &["chassis", "name"])
        .unwrap_or_else(|| filename::chassis_from_file_name(location.file_name));
    let model = coerce::non_empty_string(fields, &["model"])
        .or_else(|| filename::model_from_file_name(location.file_name))
        .unwrap_or_default();

    let mut issues = Vec::new();
    let tech_base = resolve_tech_base(fields, &mut issues);

    let config = coerce::truthy_string(fields, &omnimech::CONFIG_KEYS);
    let clan_name = coerce::non_empty_string(fields, &["clanname", "clan_name"]);
    let omni = omnimech::decompose_with(&OmniMechInput {
        config: &config,
        chassis: &chassis,
        model: &model,
        clan_name: clan_name.as_deref(),
        flagged: coerce::flag(fields, "is_omnimech"),
        file_name: Some(location.file_name),
    });

    let record = UnitRecord {
        unit_type: location.unit_type.to_string(),
        mul_id: coerce::string_field(fields, &["mul_id"]),
        era: coerce::string_field(fields, &["era", "derived_era"]).unwrap_or_else(|| "Unknown".into()),
        mass_tons: coerce::coerce_tons(coerce::first_present(fields, &["mass", "tonnage"])),
        role: coerce::string_field(fields, &["role"]).unwrap_or_else(|| "Unknown".into()),
        source_book: coerce::string_field(fields, &["source", "source_book"]),
        is_omnimech: omni.is_omnimech,
        omnimech_base_chassis: omni.base_chassis,
        omnimech_configuration: omni.configuration,
        data: doc.clone(),
        original_file_path,
        chassis,
        model,
        tech_base,
        config,
    };
    Ok(Normalized { record, issues })
}

fn resolve_tech_base(fields: &Document, issues: &mut Vec<DataQualityIssue>) -> UnitTechBase {
    let raw = coerce::string_field(fields, &["techbase", "derived_tech_base"])
        .unwrap_or_else(|| "Unknown".into());
    tech_base::lookup_unit_tech_base(&raw).unwrap_or_else(|| {
        issues.push(DataQualityIssue::UnrecognizedUnitTechBase { raw });
        UnitTechBase::InnerSphere
    })
}
