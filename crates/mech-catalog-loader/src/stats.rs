use anyhow::Result;
use mech_catalog_store_sqlite::{SqliteStore, TableCounts, UnitSample};
use serde::{Deserialize, Serialize};

const SAMPLED_TYPES: usize = 5;
const SAMPLES_PER_TYPE: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnitTypeStats {
    pub unit_type: String,
    pub count: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub samples: Vec<UnitSample>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogStats {
    pub counts: TableCounts,
    pub unit_types: Vec<UnitTypeStats>,
}

/// Unit type breakdown, largest first, with a few samples for the top types.
///
/// # Errors
/// Returns an error when a store query fails.
pub fn collect_stats(store: &SqliteStore) -> Result<CatalogStats> {
    let mut unit_types = Vec::new();
    for (rank, entry) in store.unit_type_summary()?.into_iter().enumerate() {
        let samples = if rank < SAMPLED_TYPES {
            store.sample_units(&entry.unit_type, SAMPLES_PER_TYPE)?
        } else {
            Vec::new()
        };
        unit_types.push(UnitTypeStats { unit_type: entry.unit_type, count: entry.count, samples });
    }
    Ok(CatalogStats { counts: store.table_counts()?, unit_types })
}
