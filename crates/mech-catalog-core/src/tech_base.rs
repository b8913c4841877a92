//! Technology lineage classification for units and equipment.
//!
//! Unit documents carry a tech base string in one of many hand-written
//! spellings, so the unit-level field goes through a fixed lookup table.
//! Equipment names carry enough lexical signal to be classified by marker
//! substrings, with the owning unit's tech base as the fallback.

use serde::{Deserialize, Serialize};

/// Canonical tech base of a whole unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum UnitTechBase {
    #[serde(rename = "Inner Sphere")]
    InnerSphere,
    #[serde(rename = "Clan")]
    Clan,
    #[serde(rename = "Mixed (IS Chassis)")]
    MixedIsChassis,
    #[serde(rename = "Mixed (Clan Chassis)")]
    MixedClanChassis,
}

impl UnitTechBase {
    pub const ALL: [Self; 4] =
        [Self::InnerSphere, Self::Clan, Self::MixedIsChassis, Self::MixedClanChassis];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InnerSphere => "Inner Sphere",
            Self::Clan => "Clan",
            Self::MixedIsChassis => "Mixed (IS Chassis)",
            Self::MixedClanChassis => "Mixed (Clan Chassis)",
        }
    }

    /// Parses only the canonical spellings.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|candidate| candidate.as_str() == value)
    }
}

/// Canonical tech base of an equipment item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum EquipmentTechBase {
    #[serde(rename = "IS")]
    Is,
    #[serde(rename = "Clan")]
    Clan,
    #[serde(rename = "Mixed")]
    Mixed,
}

impl EquipmentTechBase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Is => "IS",
            Self::Clan => "Clan",
            Self::Mixed => "Mixed",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "IS" => Some(Self::Is),
            "Clan" => Some(Self::Clan),
            "Mixed" => Some(Self::Mixed),
            _ => None,
        }
    }
}

/// Raw unit tech base spellings observed in the corpus.
const UNIT_TECH_BASE_TABLE: [(&str, UnitTechBase); 8] = [
    ("Inner Sphere", UnitTechBase::InnerSphere),
    ("Clan", UnitTechBase::Clan),
    ("Mixed (IS Chassis)", UnitTechBase::MixedIsChassis),
    ("Mixed (Clan Chassis)", UnitTechBase::MixedClanChassis),
    ("Mixed", UnitTechBase::MixedIsChassis),
    ("IS", UnitTechBase::InnerSphere),
    ("C", UnitTechBase::Clan),
    ("Unknown", UnitTechBase::InnerSphere),
];

pub const IS_MARKERS: [&str; 18] = [
    "is",
    "inner sphere",
    "autocannon",
    "ac/",
    "ac1",
    "ac2",
    "ac5",
    "ac10",
    "ac20",
    "standard",
    "medium laser",
    "large laser",
    "small laser",
    "ppc",
    "lrm",
    "srm",
    "machine gun",
    "flamer",
];

pub const CLAN_MARKERS: [&str; 7] = ["cl", "clan", "er ", "ultra", "lb ", "streak", "gauss"];

pub const TECH_AGNOSTIC_MARKERS: [&str; 4] = ["heat sink", "double heat sink", "jump jet", "case"];

const CLAN_AMMO_MARKERS: [&str; 4] = ["er", "ultra", "lb", "streak"];

const CATALOG_IS_MARKERS: [&str; 6] =
    ["inner sphere", "autocannon", "standard", "lrm", "srm", "machine gun"];

const CATALOG_LATE_CLAN_MARKERS: [&str; 6] = ["gauss", "pulse", "lbx", "artemis", "narc", "tag"];

/// Table lookup for a raw unit tech base; `None` when the spelling is unknown.
#[must_use]
pub fn lookup_unit_tech_base(raw: &str) -> Option<UnitTechBase> {
    UNIT_TECH_BASE_TABLE.iter().find(|(spelling, _)| *spelling == raw).map(|(_, value)| *value)
}

/// Total mapping from any raw string to a canonical unit tech base.
///
/// Unrecognized spellings map to [`UnitTechBase::InnerSphere`]; callers that
/// need to report the fallback should use [`lookup_unit_tech_base`] first.
#[must_use]
pub fn normalize_unit_tech_base(raw: &str) -> UnitTechBase {
    lookup_unit_tech_base(raw).unwrap_or(UnitTechBase::InnerSphere)
}

/// Classifies one equipment item as IS or Clan.
///
/// Rules are checked in order and the first match wins:
/// 1. IS markers with no Clan marker present.
/// 2. Any Clan marker.
/// 3. Tech-agnostic items inherit the owning unit's tech base.
/// 4. Ammo is re-derived from Clan ammo markers.
/// 5. Everything else inherits the owning unit's tech base.
///
/// A Clan marker always wins over an IS marker in the same name.
#[must_use]
pub fn classify_equipment(item_name: &str, unit_tech_base: &str) -> EquipmentTechBase {
    let name = item_name.to_lowercase();
    let has_clan_marker = contains_any(&name, &CLAN_MARKERS);

    if contains_any(&name, &IS_MARKERS) && !has_clan_marker {
        return EquipmentTechBase::Is;
    }
    if has_clan_marker {
        return EquipmentTechBase::Clan;
    }
    if contains_any(&name, &TECH_AGNOSTIC_MARKERS) {
        return inherited(unit_tech_base);
    }
    if name.contains("ammo") {
        return if contains_any(&name, &CLAN_AMMO_MARKERS) {
            EquipmentTechBase::Clan
        } else {
            EquipmentTechBase::Is
        };
    }
    inherited(unit_tech_base)
}

/// Classifies an equipment catalog entry that declares no tech base.
///
/// Catalog entries have no owning unit, so there is nothing to inherit:
/// 1. Clan prefixes (`cl`, `c `), `clan`, `streak`, `ultra`, or `er ` on a
///    laser or PPC.
/// 2. An `is` prefix or an IS weapon family marker.
/// 3. Late-era systems (`gauss`, `pulse`, `artemis`, ...) count as Clan.
/// 4. Everything else is IS.
#[must_use]
pub fn classify_catalog_equipment(name: &str) -> EquipmentTechBase {
    let name = name.to_lowercase();
    let clan_energy_weapon = name.contains("er ") && (name.contains("laser") || name.contains("ppc"));
    if name.starts_with("cl")
        || name.starts_with("c ")
        || name.contains("clan")
        || name.contains("streak")
        || name.contains("ultra")
        || clan_energy_weapon
    {
        return EquipmentTechBase::Clan;
    }
    if name.starts_with("is") || contains_any(&name, &CATALOG_IS_MARKERS) {
        return EquipmentTechBase::Is;
    }
    if contains_any(&name, &CATALOG_LATE_CLAN_MARKERS) {
        return EquipmentTechBase::Clan;
    }
    EquipmentTechBase::Is
}

fn inherited(unit_tech_base: &str) -> EquipmentTechBase {
    if unit_tech_base == "Clan" || unit_tech_base.to_lowercase().contains("clan chassis") {
        EquipmentTechBase::Clan
    } else {
        EquipmentTechBase::Is
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn clan_er_large_laser_is_clan() {
        assert_eq!(classify_equipment("Clan ER Large Laser", "Inner Sphere"), EquipmentTechBase::Clan);
    }

    #[test]
    fn is_medium_laser_is_inner_sphere() {
        assert_eq!(classify_equipment("IS Medium Laser", "Clan"), EquipmentTechBase::Is);
    }

    #[test]
    fn streak_and_ultra_override_is_markers() {
        assert_eq!(classify_equipment("IS Streak SRM 6", "Inner Sphere"), EquipmentTechBase::Clan);
        assert_eq!(classify_equipment("Ultra AC/5", "Inner Sphere"), EquipmentTechBase::Clan);
        assert_eq!(classify_equipment("LB 10-X AC", "Inner Sphere"), EquipmentTechBase::Clan);
    }

    #[test]
    fn gauss_counts_as_clan_even_with_is_prefix() {
        assert_eq!(classify_equipment("IS Gauss Rifle", "Inner Sphere"), EquipmentTechBase::Clan);
    }

    #[test]
    fn tech_agnostic_items_follow_unit() {
        assert_eq!(classify_equipment("Heat Sink", "Clan"), EquipmentTechBase::Clan);
        assert_eq!(classify_equipment("Jump Jet", "Mixed (Clan Chassis)"), EquipmentTechBase::Clan);
        assert_eq!(classify_equipment("Jump Jet", "Mixed (IS Chassis)"), EquipmentTechBase::Is);
        assert_eq!(classify_equipment("CASE", "Inner Sphere"), EquipmentTechBase::Is);
    }

    #[test]
    fn ammo_uses_ammo_markers() {
        assert_eq!(classify_equipment("AMS Ammo", "Clan"), EquipmentTechBase::Is);
        assert_eq!(classify_equipment("Thunderbolt Ammo", "Inner Sphere"), EquipmentTechBase::Clan);
    }

    #[test]
    fn unknown_items_inherit_unit() {
        assert_eq!(classify_equipment("Targeting Computer", "Clan"), EquipmentTechBase::Clan);
        assert_eq!(classify_equipment("Targeting Computer", "Inner Sphere"), EquipmentTechBase::Is);
        assert_eq!(classify_equipment("", ""), EquipmentTechBase::Is);
    }

    #[test]
    fn catalog_entries_use_prefix_rules() {
        assert_eq!(classify_catalog_equipment("Clan ER Large Laser"), EquipmentTechBase::Clan);
        assert_eq!(classify_catalog_equipment("CLERPPC"), EquipmentTechBase::Clan);
        assert_eq!(classify_catalog_equipment("ER PPC"), EquipmentTechBase::Clan);
        assert_eq!(classify_catalog_equipment("IS Medium Laser"), EquipmentTechBase::Is);
        assert_eq!(classify_catalog_equipment("LRM 20"), EquipmentTechBase::Is);
        assert_eq!(classify_catalog_equipment("Widget"), EquipmentTechBase::Is);
    }

    #[test]
    fn catalog_late_systems_are_clan() {
        assert_eq!(classify_catalog_equipment("Artemis IV FCS"), EquipmentTechBase::Clan);
        assert_eq!(classify_catalog_equipment("Medium Pulse Laser"), EquipmentTechBase::Clan);
        assert_eq!(classify_catalog_equipment("TAG"), EquipmentTechBase::Clan);
        assert_eq!(classify_catalog_equipment("Narc Missile Beacon"), EquipmentTechBase::Clan);
        assert_eq!(classify_catalog_equipment("Gauss Rifle"), EquipmentTechBase::Clan);
    }

    #[test]
    fn catalog_is_prefix_beats_late_markers() {
        assert_eq!(classify_catalog_equipment("ISArtemisIV"), EquipmentTechBase::Is);
        assert_eq!(classify_catalog_equipment("SRM 6 Artemis"), EquipmentTechBase::Is);
    }

    #[test]
    fn unit_table_maps_known_spellings() {
        assert_eq!(normalize_unit_tech_base("IS"), UnitTechBase::InnerSphere);
        assert_eq!(normalize_unit_tech_base("C"), UnitTechBase::Clan);
        assert_eq!(normalize_unit_tech_base("Mixed"), UnitTechBase::MixedIsChassis);
        assert_eq!(normalize_unit_tech_base("Unknown"), UnitTechBase::InnerSphere);
        assert_eq!(
            normalize_unit_tech_base("Mixed (Clan Chassis)"),
            UnitTechBase::MixedClanChassis
        );
        assert_eq!(lookup_unit_tech_base("clan"), None);
        assert_eq!(normalize_unit_tech_base("clan"), UnitTechBase::InnerSphere);
    }

    #[test]
    fn canonical_spellings_round_trip_through_parse() {
        for value in UnitTechBase::ALL {
            assert_eq!(UnitTechBase::parse(value.as_str()), Some(value));
            assert_eq!(normalize_unit_tech_base(value.as_str()), value);
        }
    }

    fn marker(markers: &'static [&'static str]) -> impl Strategy<Value = &'static str> {
        proptest::sample::select(markers)
    }

    proptest! {
        #[test]
        fn clan_marker_beats_is_marker(
            is_marker in marker(&IS_MARKERS),
            clan_marker in marker(&CLAN_MARKERS),
            prefix in "[a-z ]{0,6}",
            clan_first in any::<bool>(),
            unit in prop_oneof![Just("Inner Sphere"), Just("Clan"), Just("")],
        ) {
            let name = if clan_first {
                format!("{prefix}{clan_marker} {is_marker}")
            } else {
                format!("{prefix}{is_marker} {clan_marker}")
            };
            prop_assert_eq!(classify_equipment(&name, unit), EquipmentTechBase::Clan);
        }

        #[test]
        fn tech_agnostic_names_inherit_unit_tech_base(
            agnostic in marker(&TECH_AGNOSTIC_MARKERS),
            unit in proptest::sample::select(UnitTechBase::ALL.to_vec()),
        ) {
            let expected = match unit {
                UnitTechBase::Clan | UnitTechBase::MixedClanChassis => EquipmentTechBase::Clan,
                UnitTechBase::InnerSphere | UnitTechBase::MixedIsChassis => EquipmentTechBase::Is,
            };
            prop_assert_eq!(classify_equipment(agnostic, unit.as_str()), expected);
            prop_assert_eq!(classify_equipment(&agnostic.to_uppercase(), unit.as_str()), expected);
        }

        #[test]
        fn unit_tech_base_normalization_is_total(raw in ".{0,24}") {
            let value = normalize_unit_tech_base(&raw);
            prop_assert!(UnitTechBase::ALL.contains(&value));
            if lookup_unit_tech_base(&raw).is_none() {
                prop_assert_eq!(value, UnitTechBase::InnerSphere);
            }
        }
    }
}
