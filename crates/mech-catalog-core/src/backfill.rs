//! In-place back-fill of fields newer consumers expect on unit documents.
//!
//! Only keys that are absent are ever written, so applying the back-fill to
//! its own output adds nothing.

use serde_json::Value;

use crate::coerce::{self, Document};
use crate::filename;
use crate::omnimech::{self, OmniMechInput};
use crate::tech_base;
use crate::CatalogError;

pub const EQUIPMENT_LIST_KEY: &str = "weapons_and_equipment";

/// Components that stay fixed on an OmniMech chassis.
const FIXED_EQUIPMENT_MARKERS: [&str; 7] =
    ["engine", "structure", "heat sink", "jump jet", "life support", "sensors", "cockpit"];

/// Whether an equipment item is pod-mounted.
#[must_use]
pub fn is_equipment_omnipod(item_name: &str, unit_is_omnimech: bool) -> bool {
    if !unit_is_omnimech {
        return false;
    }
    let name = item_name.to_lowercase();
    !FIXED_EQUIPMENT_MARKERS.iter().any(|marker| name.contains(marker))
}

/// Adds missing OmniMech and equipment fields to a unit document.
///
/// Returns how many fields were added; zero means the document is unchanged.
pub fn backfill_unit_document(doc: &mut Value, file_name: &str) -> Result<usize, CatalogError> {
    let fields = doc.as_object_mut().ok_or(CatalogError::NotAnObject)?;
    let mut added = backfill_omnimech(fields, file_name);

    let unit_is_omnimech = coerce::flag(fields, "is_omnimech");
    let unit_tech_base = coerce::string_field(fields, &["tech_base", "techbase"])
        .unwrap_or_else(|| "Inner Sphere".into());

    if let Some(Value::Array(items)) = fields.get_mut(EQUIPMENT_LIST_KEY) {
        for item in items.iter_mut().filter_map(Value::as_object_mut) {
            let item_name = coerce::string_field(item, &["item_name"]).unwrap_or_default();
            if !item.contains_key("tech_base") {
                let classified = tech_base::classify_equipment(&item_name, &unit_tech_base);
                item.insert("tech_base".into(), Value::from(classified.as_str()));
                added += 1;
            }
            if !item.contains_key("is_omnipod") {
                let omnipod = is_equipment_omnipod(&item_name, unit_is_omnimech);
                item.insert("is_omnipod".into(), Value::Bool(omnipod));
                added += 1;
            }
        }
    }
    Ok(added)
}

fn backfill_omnimech(fields: &mut Document, file_name: &str) -> usize {
    let config = coerce::truthy_string(fields, &omnimech::CONFIG_KEYS);
    let chassis = coerce::non_empty_string(fields, &["chassis", "name"])
        .unwrap_or_else(|| filename::chassis_from_file_name(file_name));
    let model = coerce::non_empty_string(fields, &["model"]).unwrap_or_default();
    let clan_name = coerce::non_empty_string(fields, &["clanname", "clan_name"]);

    let info = omnimech::decompose_with(&OmniMechInput {
        config: &config,
        chassis: &chassis,
        model: &model,
        clan_name: clan_name.as_deref(),
        flagged: coerce::flag(fields, "is_omnimech"),
        file_name: Some(file_name),
    });
    if !info.is_omnimech {
        return 0;
    }

    let mut added = usize::from(insert_absent(fields, "is_omnimech", Value::Bool(true)));
    if let Some(base) = info.base_chassis {
        added += usize::from(insert_absent(fields, "omnimech_base_chassis", Value::String(base)));
    }
    if let Some(configuration) = info.configuration {
        added +=
            usize::from(insert_absent(fields, "omnimech_configuration", Value::String(configuration)));
    }
    added
}

fn insert_absent(fields: &mut Document, key: &str, value: Value) -> bool {
    if fields.contains_key(key) {
        return false;
    }
    fields.insert(key.to_string(), value);
    true
}

/// What a migrated document is still missing.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct DocumentFindings {
    pub equipment_missing_tech_base: usize,
    pub omnimech_flag_missing: bool,
}

impl DocumentFindings {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.equipment_missing_tech_base == 0 && !self.omnimech_flag_missing
    }

    #[must_use]
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.equipment_missing_tech_base > 0 {
            problems.push(format!(
                "{} equipment item(s) missing tech_base",
                self.equipment_missing_tech_base
            ));
        }
        if self.omnimech_flag_missing {
            problems.push("OmniMech configuration without is_omnimech".to_string());
        }
        problems
    }
}

/// Checks a document for the fields the back-fill is expected to add.
pub fn inspect_document(doc: &Value) -> Result<DocumentFindings, CatalogError> {
    let fields = doc.as_object().ok_or(CatalogError::NotAnObject)?;
    let equipment_missing_tech_base = match fields.get(EQUIPMENT_LIST_KEY) {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| item.as_object().is_some_and(|item| !item.contains_key("tech_base")))
            .count(),
        _ => 0,
    };
    let config = coerce::truthy_string(fields, &omnimech::CONFIG_KEYS);
    Ok(DocumentFindings {
        equipment_missing_tech_base,
        omnimech_flag_missing: omnimech::is_omnimech_config(&config)
            && !fields.contains_key("is_omnimech"),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn daishi() -> Value {
        json!({
            "chassis": "Daishi",
            "clanname": "Dire Wolf",
            "model": "Prime",
            "config": "Biped Omnimech",
            "tech_base": "Clan",
            "weapons_and_equipment": [
                { "item_name": "ER Large Laser", "location": "Right Arm" },
                { "item_name": "Double Heat Sink", "location": "Left Torso" },
                { "item_name": "Gauss Rifle", "tech_base": "Clan", "is_omnipod": false },
            ],
        })
    }

    #[test]
    fn omnimech_fields_and_equipment_are_added() -> Result<(), CatalogError> {
        let mut doc = daishi();
        let added = backfill_unit_document(&mut doc, "Daishi (Dire Wolf) Prime.json")?;
        assert_eq!(added, 7);
        assert_eq!(doc["is_omnimech"], json!(true));
        assert_eq!(doc["omnimech_base_chassis"], json!("Dire Wolf"));
        assert_eq!(doc["omnimech_configuration"], json!("Prime"));

        let items = &doc[EQUIPMENT_LIST_KEY];
        assert_eq!(items[0]["tech_base"], json!("Clan"));
        assert_eq!(items[0]["is_omnipod"], json!(true));
        assert_eq!(items[1]["tech_base"], json!("Clan"));
        assert_eq!(items[1]["is_omnipod"], json!(false));
        assert_eq!(items[2]["is_omnipod"], json!(false));
        Ok(())
    }

    #[test]
    fn second_pass_adds_nothing() -> Result<(), CatalogError> {
        let mut doc = daishi();
        backfill_unit_document(&mut doc, "Daishi (Dire Wolf) Prime.json")?;
        let converged = doc.clone();
        assert_eq!(backfill_unit_document(&mut doc, "Daishi (Dire Wolf) Prime.json")?, 0);
        assert_eq!(doc, converged);
        Ok(())
    }

    #[test]
    fn existing_keys_are_never_overwritten() -> Result<(), CatalogError> {
        let mut doc = daishi();
        doc["omnimech_configuration"] = json!("Custom");
        backfill_unit_document(&mut doc, "Daishi.json")?;
        assert_eq!(doc["omnimech_configuration"], json!("Custom"));
        Ok(())
    }

    #[test]
    fn standard_mech_gets_only_equipment_fields() -> Result<(), CatalogError> {
        let mut doc = json!({
            "chassis": "Atlas",
            "model": "AS7-D",
            "config": "Biped",
            "weapons_and_equipment": [{ "item_name": "Medium Laser" }],
        });
        assert_eq!(backfill_unit_document(&mut doc, "Atlas AS7-D.json")?, 2);
        assert!(doc.get("is_omnimech").is_none());
        assert_eq!(doc[EQUIPMENT_LIST_KEY][0]["tech_base"], json!("IS"));
        assert_eq!(doc[EQUIPMENT_LIST_KEY][0]["is_omnipod"], json!(false));
        Ok(())
    }

    #[test]
    fn capitalized_config_wins_like_the_normalizer() -> Result<(), CatalogError> {
        let original = json!({
            "chassis": "Thor",
            "model": "A",
            "Config": "Biped Omnimech",
            "config": "Biped",
        });
        let unit = crate::normalize_unit(&original, "meks/Thor A.json")?.record;
        assert!(unit.is_omnimech);
        assert!(inspect_document(&original)?.omnimech_flag_missing);

        let mut doc = original.clone();
        backfill_unit_document(&mut doc, "Thor A.json")?;
        assert_eq!(doc["is_omnimech"], json!(unit.is_omnimech));
        assert_eq!(doc["omnimech_configuration"], json!(unit.omnimech_configuration));
        Ok(())
    }

    #[test]
    fn fixed_components_are_not_pods() {
        assert!(!is_equipment_omnipod("Fusion Engine", true));
        assert!(!is_equipment_omnipod("Endo Steel Structure", true));
        assert!(!is_equipment_omnipod("Jump Jet", true));
        assert!(is_equipment_omnipod("LRM 20", true));
        assert!(!is_equipment_omnipod("LRM 20", false));
    }

    #[test]
    fn inspection_reports_missing_fields() -> Result<(), CatalogError> {
        let mut doc = daishi();
        let before = inspect_document(&doc)?;
        assert!(!before.is_complete());
        assert_eq!(before.equipment_missing_tech_base, 2);
        assert!(before.omnimech_flag_missing);
        assert_eq!(before.problems().len(), 2);

        backfill_unit_document(&mut doc, "Daishi (Dire Wolf) Prime.json")?;
        let after = inspect_document(&doc)?;
        assert!(after.is_complete());
        assert!(after.problems().is_empty());
        Ok(())
    }

    #[test]
    fn non_object_documents_are_rejected() {
        assert_eq!(backfill_unit_document(&mut json!([]), "x.json"), Err(CatalogError::NotAnObject));
        assert_eq!(inspect_document(&json!(null)), Err(CatalogError::NotAnObject));
    }
}
