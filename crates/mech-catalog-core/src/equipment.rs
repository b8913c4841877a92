//! Canonical equipment catalog entries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce;
use crate::tech_base::{self, EquipmentTechBase};
use crate::{CatalogError, DataQualityIssue, Normalized};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EquipmentRecord {
    pub internal_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub category: String,
    pub tech_base: EquipmentTechBase,
    pub data: Value,
}

/// Normalizes one entry of the equipment catalog array.
///
/// `internal_id` and `name` must be present and non-empty. A declared tech
/// base is kept when it is one of the canonical values; a blank or
/// `"Unknown"` one is inferred from the name.
pub fn normalize_equipment(item: &Value) -> Result<Normalized<EquipmentRecord>, CatalogError> {
    let Value::Object(fields) = item else {
        return Err(CatalogError::NotAnObject);
    };
    let internal_id = coerce::truthy_string(fields, &["internal_id"]);
    if internal_id.is_empty() {
        return Err(CatalogError::MissingField("internal_id"));
    }
    let name = coerce::truthy_string(fields, &["name"]);
    if name.is_empty() {
        return Err(CatalogError::MissingField("name"));
    }

    let declared = coerce::string_field(fields, &["tech_base"]).unwrap_or_default();
    let mut issues = Vec::new();
    let tech_base = resolve_equipment_tech_base(&declared, &name).unwrap_or_else(|raw| {
        issues.push(DataQualityIssue::UnexpectedEquipmentTechBase { raw });
        EquipmentTechBase::Is
    });

    let record = EquipmentRecord {
        item_type: coerce::string_field(fields, &["type"]).unwrap_or_else(|| "Unknown".into()),
        category: coerce::string_field(fields, &["category"]).unwrap_or_else(|| "Unknown".into()),
        data: item.clone(),
        internal_id,
        name,
        tech_base,
    };
    Ok(Normalized { record, issues })
}

/// Resolves an equipment tech base, returning the raw value when it is not
/// one of `IS`, `Clan`, `Mixed`.
pub fn resolve_equipment_tech_base(declared: &str, name: &str) -> Result<EquipmentTechBase, String> {
    if declared.is_empty() || declared == "Unknown" {
        return Ok(tech_base::classify_catalog_equipment(name));
    }
    EquipmentTechBase::parse(declared).ok_or_else(|| declared.to_string())
}
