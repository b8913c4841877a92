//! Full reload of the catalog store from a corpus directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mech_catalog_core::{
    normalize_equipment, normalize_unit, verifier_settings, CatalogError, EquipmentRecord,
    UnitRecord, DEFAULT_OPTIONS_NAME, EQUIPMENT_FILE, VERIFIER_OPTIONS_FILE,
};
use mech_catalog_store_sqlite::{remove_database, SchemaStatus, SqliteStore, TableCounts};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::corpus::{self, CorpusEntry};
use crate::report::{AnomalyKind, Stage, StageReport};

pub const DEFAULT_BATCH_SIZE: usize = 500;

#[derive(Debug, Clone)]
pub struct PopulateOptions {
    pub corpus_root: PathBuf,
    pub database: PathBuf,
    pub batch_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulateReport {
    pub corpus: String,
    pub database: String,
    pub schema: SchemaStatus,
    pub stages: Vec<StageReport>,
    pub counts: TableCounts,
}

/// Wipes the database and reloads it from the corpus.
///
/// Runs schema application, equipment, validation options, then units.
/// A missing corpus, an unopenable store, or a schema failure ends the run
/// with an error; everything after that is reported per stage.
///
/// # Errors
/// Returns an error for the fatal conditions above.
pub fn populate(options: &PopulateOptions) -> Result<PopulateReport> {
    let root = options.corpus_root.as_path();
    corpus::ensure_corpus_root(root)?;

    if remove_database(&options.database)? {
        tracing::info!("Removed existing database {}", options.database.display());
    }
    let mut store = SqliteStore::open(&options.database)?;
    store.apply_schema().context("schema application failed")?;
    let schema = store.schema_status()?;
    tracing::info!(version = schema.current_version, "Schema applied");

    let stages = vec![
        load_equipment(&mut store, root),
        load_validation_options(&mut store, root),
        load_units(&mut store, root, options.batch_size),
    ];
    let counts = store.table_counts()?;
    tracing::info!(
        equipment = counts.equipment,
        validation_options = counts.unit_validation_options,
        units = counts.units,
        "Populate finished"
    );

    Ok(PopulateReport {
        corpus: root.display().to_string(),
        database: options.database.display().to_string(),
        schema,
        stages,
        counts,
    })
}

/// Loads the equipment catalog in one transaction.
pub fn load_equipment(store: &mut SqliteStore, root: &Path) -> StageReport {
    let mut report = StageReport::new(Stage::LoadEquipment);
    let path = root.join(EQUIPMENT_FILE);
    let Some(doc) = read_catalog_file(&mut report, &path) else {
        return report;
    };
    let Value::Array(items) = doc else {
        report.note(AnomalyKind::InvalidRecord, EQUIPMENT_FILE, "expected a JSON array");
        return report;
    };

    let mut records: Vec<EquipmentRecord> = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let location = equipment_location(item, index);
        match normalize_equipment(item) {
            Ok(normalized) => {
                report.note_issues(&location, &normalized.issues);
                records.push(normalized.record);
            }
            Err(err) => report.skip(error_kind(&err), location, err.to_string()),
        }
    }

    match store.upsert_equipment(&records) {
        Ok(loaded) => report.loaded = loaded,
        Err(err) => report.skip_batch(records.len(), EQUIPMENT_FILE, &err),
    }
    tracing::info!(loaded = report.loaded, skipped = report.skipped, "Equipment loaded");
    report
}

/// Loads the verifier settings as the single default options row.
pub fn load_validation_options(store: &mut SqliteStore, root: &Path) -> StageReport {
    let mut report = StageReport::new(Stage::LoadValidationOptions);
    let path = root.join(VERIFIER_OPTIONS_FILE);
    let Some(doc) = read_catalog_file(&mut report, &path) else {
        return report;
    };
    let settings = match verifier_settings(&doc) {
        Ok(settings) => settings,
        Err(err) => {
            report.skip(error_kind(&err), VERIFIER_OPTIONS_FILE, err.to_string());
            return report;
        }
    };

    match store.upsert_validation_options(DEFAULT_OPTIONS_NAME, settings) {
        Ok(()) => report.loaded = 1,
        Err(err) => report.skip_batch(1, VERIFIER_OPTIONS_FILE, &err),
    }
    tracing::info!(loaded = report.loaded, "Validation options loaded");
    report
}

/// Loads every unit file, committing every `batch_size` records.
///
/// A failed batch is rolled back and counted as skipped; later batches are
/// still attempted.
pub fn load_units(store: &mut SqliteStore, root: &Path, batch_size: usize) -> StageReport {
    let mut report = StageReport::new(Stage::LoadUnits);
    let batch_size = batch_size.max(1);
    let mut batch: Vec<UnitRecord> = Vec::with_capacity(batch_size);

    for entry in corpus::unit_files(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let location = err
                    .path()
                    .map_or_else(|| root.display().to_string(), |path| corpus::relative_path(root, path));
                report.skip(AnomalyKind::UnreadableFile, location, err.to_string());
                continue;
            }
        };
        if let Some(unit) = normalize_entry(&mut report, &entry) {
            batch.push(unit);
        }
        if batch.len() >= batch_size {
            flush_units(store, &mut report, &mut batch);
        }
    }
    flush_units(store, &mut report, &mut batch);

    tracing::info!(loaded = report.loaded, skipped = report.skipped, "Units loaded");
    report
}

fn normalize_entry(report: &mut StageReport, entry: &CorpusEntry) -> Option<UnitRecord> {
    tracing::debug!("Loading {}", entry.relative_path);
    let doc = match corpus::read_json(&entry.path) {
        Ok(doc) => doc,
        Err(err) => {
            report.skip(err.kind(), &entry.relative_path, err.to_string());
            return None;
        }
    };
    match normalize_unit(&doc, &entry.relative_path) {
        Ok(normalized) => {
            report.note_issues(&entry.relative_path, &normalized.issues);
            Some(normalized.record)
        }
        Err(err) => {
            report.skip(error_kind(&err), &entry.relative_path, err.to_string());
            None
        }
    }
}

fn flush_units(store: &mut SqliteStore, report: &mut StageReport, batch: &mut Vec<UnitRecord>) {
    let Some(last) = batch.last() else {
        return;
    };
    let location = format!("batch ending at {}", last.original_file_path);
    match store.upsert_units(batch) {
        Ok(loaded) => {
            report.loaded += loaded;
            tracing::debug!(loaded = report.loaded, "Committed unit batch");
        }
        Err(err) => report.skip_batch(batch.len(), location, &err),
    }
    batch.clear();
}

fn read_catalog_file(report: &mut StageReport, path: &Path) -> Option<Value> {
    let location = path.file_name().map_or_else(String::new, |name| name.to_string_lossy().into_owned());
    if !path.exists() {
        report.note(AnomalyKind::UnreadableFile, location, "file not found; stage skipped");
        return None;
    }
    match corpus::read_json(path) {
        Ok(doc) => Some(doc),
        Err(err) => {
            report.note(err.kind(), location, err.to_string());
            None
        }
    }
}

fn equipment_location(item: &Value, index: usize) -> String {
    match item.get("internal_id") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        _ => format!("{EQUIPMENT_FILE}[{index}]"),
    }
}

fn error_kind(err: &CatalogError) -> AnomalyKind {
    match err {
        CatalogError::MissingField(_) => AnomalyKind::MissingRequiredField,
        CatalogError::NotAnObject => AnomalyKind::InvalidRecord,
    }
}
