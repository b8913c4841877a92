use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use mech_catalog_core::{EquipmentRecord, EquipmentTechBase, UnitRecord, UnitTechBase};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

const LATEST_SCHEMA_VERSION: i64 = 1;

const CREATE_SCHEMA_MIGRATIONS_SQL: &str = r"
CREATE TABLE IF NOT EXISTS schema_migrations (
  version INTEGER PRIMARY KEY,
  applied_at TEXT NOT NULL
);
";

const MIGRATION_001_SQL: &str = r"
CREATE TABLE IF NOT EXISTS equipment (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  internal_id TEXT NOT NULL UNIQUE,
  name TEXT NOT NULL,
  type TEXT,
  category TEXT,
  tech_base TEXT NOT NULL CHECK (tech_base IN ('IS','Clan','Mixed')),
  data TEXT NOT NULL,
  created_at TEXT NOT NULL,
  updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS unit_validation_options (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL UNIQUE,
  data TEXT NOT NULL,
  created_at TEXT NOT NULL,
  updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS units (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  original_file_path TEXT NOT NULL UNIQUE,
  unit_type TEXT NOT NULL,
  chassis TEXT NOT NULL,
  model TEXT NOT NULL,
  mul_id TEXT,
  tech_base TEXT NOT NULL CHECK (tech_base IN ('Inner Sphere','Clan','Mixed (IS Chassis)','Mixed (Clan Chassis)')),
  era TEXT,
  mass_tons INTEGER,
  role TEXT,
  source_book TEXT,
  is_omnimech INTEGER NOT NULL DEFAULT 0 CHECK (is_omnimech IN (0,1)),
  omnimech_base_chassis TEXT,
  omnimech_configuration TEXT,
  config TEXT NOT NULL DEFAULT '',
  data TEXT NOT NULL,
  created_at TEXT NOT NULL,
  updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_equipment_tech_base ON equipment(tech_base);
CREATE INDEX IF NOT EXISTS idx_units_unit_type ON units(unit_type);
CREATE INDEX IF NOT EXISTS idx_units_chassis ON units(chassis);
CREATE INDEX IF NOT EXISTS idx_units_omnimech_base ON units(omnimech_base_chassis);
";

const UPSERT_EQUIPMENT_SQL: &str = r"
INSERT INTO equipment(
  internal_id, name, type, category, tech_base, data, created_at, updated_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
ON CONFLICT(internal_id) DO UPDATE SET
  name = excluded.name,
  type = excluded.type,
  category = excluded.category,
  tech_base = excluded.tech_base,
  data = excluded.data,
  updated_at = excluded.updated_at
";

const UPSERT_VALIDATION_OPTIONS_SQL: &str = r"
INSERT INTO unit_validation_options(name, data, created_at, updated_at)
VALUES (?1, ?2, ?3, ?3)
ON CONFLICT(name) DO UPDATE SET
  data = excluded.data,
  updated_at = excluded.updated_at
";

const UPSERT_UNIT_SQL: &str = r"
INSERT INTO units(
  original_file_path, unit_type, chassis, model, mul_id, tech_base, era, mass_tons,
  role, source_book, is_omnimech, omnimech_base_chassis, omnimech_configuration,
  config, data, created_at, updated_at
) VALUES (
  ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8,
  ?9, ?10, ?11, ?12, ?13,
  ?14, ?15, ?16, ?16
)
ON CONFLICT(original_file_path) DO UPDATE SET
  unit_type = excluded.unit_type,
  chassis = excluded.chassis,
  model = excluded.model,
  mul_id = excluded.mul_id,
  tech_base = excluded.tech_base,
  era = excluded.era,
  mass_tons = excluded.mass_tons,
  role = excluded.role,
  source_book = excluded.source_book,
  is_omnimech = excluded.is_omnimech,
  omnimech_base_chassis = excluded.omnimech_base_chassis,
  omnimech_configuration = excluded.omnimech_configuration,
  config = excluded.config,
  data = excluded.data,
  updated_at = excluded.updated_at
";

const SELECT_UNIT_SQL: &str = r"
SELECT
  original_file_path, unit_type, chassis, model, mul_id, tech_base, era, mass_tons,
  role, source_book, is_omnimech, omnimech_base_chassis, omnimech_configuration,
  config, data, created_at, updated_at
FROM units
WHERE original_file_path = ?1
";

const SELECT_EQUIPMENT_SQL: &str = r"
SELECT internal_id, name, type, category, tech_base, data, created_at, updated_at
FROM equipment
WHERE internal_id = ?1
";

pub struct SqliteStore {
    conn: Connection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchemaStatus {
    pub current_version: i64,
    pub target_version: i64,
    pub pending_versions: Vec<i64>,
}

/// Row counts for the three catalog tables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TableCounts {
    pub equipment: u64,
    pub unit_validation_options: u64,
    pub units: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnitTypeCount {
    pub unit_type: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnitSample {
    pub chassis: String,
    pub model: String,
    pub mass_tons: Option<i64>,
}

/// A persisted row together with its bookkeeping timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stored<T> {
    pub record: T,
    pub created_at: String,
    pub updated_at: String,
}

impl SqliteStore {
    /// Open a SQLite-backed catalog store and configure runtime pragmas.
    ///
    /// # Errors
    /// Returns an error when the database cannot be opened or pragmas cannot be applied.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open sqlite database at {}", path.display()))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to configure sqlite pragmas")?;

        Ok(Self { conn })
    }

    /// Report current and target schema versions plus pending migrations.
    ///
    /// # Errors
    /// Returns an error when schema metadata cannot be read or initialized.
    pub fn schema_status(&self) -> Result<SchemaStatus> {
        self.conn
            .execute_batch(CREATE_SCHEMA_MIGRATIONS_SQL)
            .context("failed to apply schema_migrations table")?;
        let current_version = current_schema_version(&self.conn)?;
        let pending_versions = if current_version < LATEST_SCHEMA_VERSION {
            ((current_version + 1)..=LATEST_SCHEMA_VERSION).collect::<Vec<_>>()
        } else {
            Vec::new()
        };

        Ok(SchemaStatus { current_version, target_version: LATEST_SCHEMA_VERSION, pending_versions })
    }

    /// Create the catalog tables if absent. Safe to call repeatedly.
    ///
    /// # Errors
    /// Returns an error when any schema statement fails or the database
    /// reports a newer schema than this build understands.
    pub fn apply_schema(&mut self) -> Result<()> {
        self.conn
            .execute_batch(CREATE_SCHEMA_MIGRATIONS_SQL)
            .context("failed to apply schema_migrations table")?;

        let version = current_schema_version(&self.conn)?;
        if version > LATEST_SCHEMA_VERSION {
            return Err(anyhow!(
                "unsupported schema version {version}; expected {LATEST_SCHEMA_VERSION}"
            ));
        }
        if version < 1 {
            let tx = self.conn.transaction().context("failed to start schema transaction")?;
            tx.execute_batch(MIGRATION_001_SQL).context("failed to apply migration v1")?;
            record_schema_version(&tx, 1)?;
            tx.commit().context("failed to commit migration v1")?;
        }
        Ok(())
    }

    /// Upsert equipment rows keyed by `internal_id` in one transaction.
    ///
    /// # Errors
    /// Returns an error when any row fails; nothing from the call is kept.
    pub fn upsert_equipment(&mut self, records: &[EquipmentRecord]) -> Result<usize> {
        let now = now_rfc3339()?;
        let tx = self.conn.transaction().context("failed to start equipment transaction")?;
        {
            let mut stmt =
                tx.prepare(UPSERT_EQUIPMENT_SQL).context("failed to prepare equipment upsert")?;
            for record in records {
                let data = serde_json::to_string(&record.data)
                    .context("failed to serialize equipment data")?;
                stmt.execute(params![
                    record.internal_id,
                    record.name,
                    record.item_type,
                    record.category,
                    record.tech_base.as_str(),
                    data,
                    now,
                ])
                .with_context(|| format!("failed to upsert equipment {}", record.internal_id))?;
            }
        }
        tx.commit().context("failed to commit equipment transaction")?;
        Ok(records.len())
    }

    /// Replace the named validation options blob.
    ///
    /// # Errors
    /// Returns an error when serialization or the write fails.
    pub fn upsert_validation_options(&mut self, name: &str, data: &Value) -> Result<()> {
        let now = now_rfc3339()?;
        let data = serde_json::to_string(data).context("failed to serialize validation options")?;
        let tx = self.conn.transaction().context("failed to start options transaction")?;
        tx.execute(UPSERT_VALIDATION_OPTIONS_SQL, params![name, data, now])
            .with_context(|| format!("failed to upsert validation options {name}"))?;
        tx.commit().context("failed to commit options transaction")?;
        Ok(())
    }

    /// Upsert one batch of units keyed by `original_file_path`.
    ///
    /// The batch is a single transaction: on error every row of the batch is
    /// rolled back and earlier batches are unaffected.
    ///
    /// # Errors
    /// Returns an error when any row of the batch fails.
    pub fn upsert_units(&mut self, records: &[UnitRecord]) -> Result<usize> {
        let now = now_rfc3339()?;
        let tx = self.conn.transaction().context("failed to start unit batch transaction")?;
        {
            let mut stmt = tx.prepare(UPSERT_UNIT_SQL).context("failed to prepare unit upsert")?;
            for record in records {
                let data =
                    serde_json::to_string(&record.data).context("failed to serialize unit data")?;
                stmt.execute(params![
                    record.original_file_path,
                    record.unit_type,
                    record.chassis,
                    record.model,
                    record.mul_id,
                    record.tech_base.as_str(),
                    record.era,
                    record.mass_tons,
                    record.role,
                    record.source_book,
                    bool_to_sql(record.is_omnimech),
                    record.omnimech_base_chassis,
                    record.omnimech_configuration,
                    record.config,
                    data,
                    now,
                ])
                .with_context(|| format!("failed to upsert unit {}", record.original_file_path))?;
            }
        }
        tx.commit().context("failed to commit unit batch")?;
        Ok(records.len())
    }

    /// # Errors
    /// Returns an error when a count query fails.
    pub fn table_counts(&self) -> Result<TableCounts> {
        Ok(TableCounts {
            equipment: count_rows(&self.conn, "equipment")?,
            unit_validation_options: count_rows(&self.conn, "unit_validation_options")?,
            units: count_rows(&self.conn, "units")?,
        })
    }

    /// # Errors
    /// Returns an error when the row cannot be read or decoded.
    pub fn get_unit(&self, original_file_path: &str) -> Result<Option<Stored<UnitRecord>>> {
        self.conn
            .query_row(SELECT_UNIT_SQL, params![original_file_path], |row| Ok(decode_unit_row(row)))
            .optional()
            .with_context(|| format!("failed to read unit {original_file_path}"))?
            .transpose()
    }

    /// # Errors
    /// Returns an error when the row cannot be read or decoded.
    pub fn get_equipment(&self, internal_id: &str) -> Result<Option<Stored<EquipmentRecord>>> {
        self.conn
            .query_row(SELECT_EQUIPMENT_SQL, params![internal_id], |row| {
                Ok(decode_equipment_row(row))
            })
            .optional()
            .with_context(|| format!("failed to read equipment {internal_id}"))?
            .transpose()
    }

    /// # Errors
    /// Returns an error when the row cannot be read or its JSON is invalid.
    pub fn get_validation_options(&self, name: &str) -> Result<Option<Value>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM unit_validation_options WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("failed to read validation options {name}"))?;
        raw.map(|text| serde_json::from_str(&text).context("stored validation options are not JSON"))
            .transpose()
    }

    /// Distinct unit types with their row counts, largest first.
    ///
    /// # Errors
    /// Returns an error when the aggregate query fails.
    pub fn unit_type_summary(&self) -> Result<Vec<UnitTypeCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT unit_type, COUNT(*) AS total
             FROM units
             GROUP BY unit_type
             ORDER BY total DESC, unit_type ASC",
        )?;
        let mut rows = stmt.query([])?;
        let mut summary = Vec::new();
        while let Some(row) = rows.next()? {
            summary.push(UnitTypeCount { unit_type: row.get(0)?, count: to_count(row.get(1)?)? });
        }
        Ok(summary)
    }

    /// # Errors
    /// Returns an error when the query fails.
    pub fn sample_units(&self, unit_type: &str, limit: usize) -> Result<Vec<UnitSample>> {
        let limit = i64::try_from(limit).context("sample limit out of range")?;
        let mut stmt = self.conn.prepare(
            "SELECT chassis, model, mass_tons
             FROM units
             WHERE unit_type = ?1
             ORDER BY original_file_path ASC
             LIMIT ?2",
        )?;
        let samples = stmt
            .query_map(params![unit_type, limit], |row| {
                Ok(UnitSample { chassis: row.get(0)?, model: row.get(1)?, mass_tons: row.get(2)? })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .with_context(|| format!("failed to sample units of type {unit_type}"))?;
        Ok(samples)
    }
}

/// Delete a database file and its WAL side files. Returns whether the main
/// file existed.
///
/// # Errors
/// Returns an error when an existing file cannot be removed.
pub fn remove_database(path: &Path) -> Result<bool> {
    let existed = path.exists();
    for candidate in [path.to_path_buf(), side_file(path, "-wal"), side_file(path, "-shm")] {
        if candidate.exists() {
            fs::remove_file(&candidate)
                .with_context(|| format!("failed to remove {}", candidate.display()))?;
        }
    }
    Ok(existed)
}

fn side_file(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

fn decode_unit_row(row: &Row<'_>) -> Result<Stored<UnitRecord>> {
    let tech_base_raw: String = row.get(5)?;
    let tech_base = UnitTechBase::parse(&tech_base_raw)
        .ok_or_else(|| anyhow!("unknown unit tech_base: {tech_base_raw}"))?;
    let is_omnimech: i64 = row.get(10)?;
    let data_raw: String = row.get(14)?;

    Ok(Stored {
        record: UnitRecord {
            original_file_path: row.get(0)?,
            unit_type: row.get(1)?,
            chassis: row.get(2)?,
            model: row.get(3)?,
            mul_id: row.get(4)?,
            tech_base,
            era: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
            mass_tons: row.get(7)?,
            role: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
            source_book: row.get(9)?,
            is_omnimech: is_omnimech != 0,
            omnimech_base_chassis: row.get(11)?,
            omnimech_configuration: row.get(12)?,
            config: row.get(13)?,
            data: serde_json::from_str(&data_raw).context("stored unit data is not JSON")?,
        },
        created_at: row.get(15)?,
        updated_at: row.get(16)?,
    })
}

fn decode_equipment_row(row: &Row<'_>) -> Result<Stored<EquipmentRecord>> {
    let tech_base_raw: String = row.get(4)?;
    let tech_base = EquipmentTechBase::parse(&tech_base_raw)
        .ok_or_else(|| anyhow!("unknown equipment tech_base: {tech_base_raw}"))?;
    let data_raw: String = row.get(5)?;

    Ok(Stored {
        record: EquipmentRecord {
            internal_id: row.get(0)?,
            name: row.get(1)?,
            item_type: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            category: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            tech_base,
            data: serde_json::from_str(&data_raw).context("stored equipment data is not JSON")?,
        },
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn count_rows(conn: &Connection, table: &str) -> Result<u64> {
    let total: i64 = conn
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .with_context(|| format!("failed to count rows in {table}"))?;
    to_count(total)
}

fn to_count(raw: i64) -> Result<u64> {
    u64::try_from(raw).context("negative row count")
}

fn current_schema_version(conn: &Connection) -> Result<i64> {
    let version = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_migrations", [], |row| {
            row.get::<_, i64>(0)
        })
        .context("failed to read current schema version")?;
    Ok(version)
}

fn record_schema_version(conn: &Connection, version: i64) -> Result<()> {
    let now = now_rfc3339()?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_migrations(version, applied_at) VALUES (?1, ?2)",
        params![version, now],
    )
    .with_context(|| format!("failed to record migration version {version}"))?;
    Ok(())
}

fn bool_to_sql(value: bool) -> i64 {
    i64::from(value)
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .context("failed to format RFC3339 timestamp")
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use mech_catalog_core::{normalize_equipment, normalize_unit};
    use serde_json::json;

    use super::*;

    fn open_memory_store() -> Result<SqliteStore> {
        let mut store = SqliteStore::open(Path::new(":memory:"))?;
        store.apply_schema()?;
        Ok(store)
    }

    fn mk_unit(path: &str, doc: &Value) -> Result<UnitRecord> {
        Ok(normalize_unit(doc, path)?.record)
    }

    fn mk_equipment(doc: &Value) -> Result<EquipmentRecord> {
        Ok(normalize_equipment(doc)?.record)
    }

    #[test]
    fn schema_apply_is_idempotent_and_versioned() -> Result<()> {
        let mut store = SqliteStore::open(Path::new(":memory:"))?;
        let before = store.schema_status()?;
        assert_eq!(before.current_version, 0);
        assert_eq!(before.pending_versions, vec![1]);

        store.apply_schema()?;
        store.apply_schema()?;

        let after = store.schema_status()?;
        assert_eq!(after.current_version, 1);
        assert_eq!(after.target_version, 1);
        assert!(after.pending_versions.is_empty());
        Ok(())
    }

    #[test]
    fn newer_schema_version_is_rejected() -> Result<()> {
        let mut store = open_memory_store()?;
        record_schema_version(&store.conn, 7)?;
        let err = store.apply_schema().err().map(|err| err.to_string()).unwrap_or_default();
        assert!(err.contains("unsupported schema version 7"), "unexpected error: {err}");
        Ok(())
    }

    #[test]
    fn unit_upsert_round_trips_all_fields() -> Result<()> {
        let mut store = open_memory_store()?;
        let doc = json!({
            "chassis": "Black Hawk",
            "clanname": "Nova",
            "model": "Prime",
            "config": "Biped Omnimech",
            "techbase": "Clan",
            "mass": "50.0",
            "mul_id": 312,
        });
        let unit = mk_unit("meks/3050U/Black Hawk (Nova) Prime.json", &doc)?;
        store.upsert_units(std::slice::from_ref(&unit))?;

        let stored = store
            .get_unit("meks/3050U/Black Hawk (Nova) Prime.json")?
            .ok_or_else(|| anyhow!("unit row missing"))?;
        assert_eq!(stored.record, unit);
        assert_eq!(stored.record.mass_tons, Some(50));
        assert_eq!(stored.record.mul_id.as_deref(), Some("312"));
        assert!(stored.record.is_omnimech);
        assert_eq!(stored.created_at, stored.updated_at);
        Ok(())
    }

    #[test]
    fn reloading_units_overwrites_instead_of_duplicating() -> Result<()> {
        let mut store = open_memory_store()?;
        let first = vec![
            mk_unit("meks/Atlas AS7-D.json", &json!({ "chassis": "Atlas", "mass": 100 }))?,
            mk_unit("vehicles/Demolisher.json", &json!({ "chassis": "Demolisher" }))?,
        ];
        store.upsert_units(&first)?;
        let created = store
            .get_unit("meks/Atlas AS7-D.json")?
            .ok_or_else(|| anyhow!("unit row missing"))?
            .created_at;

        thread::sleep(Duration::from_millis(5));
        let second = vec![
            mk_unit("meks/Atlas AS7-D.json", &json!({ "chassis": "Atlas", "mass": 95 }))?,
            mk_unit("vehicles/Demolisher.json", &json!({ "chassis": "Demolisher" }))?,
        ];
        store.upsert_units(&second)?;

        assert_eq!(store.table_counts()?.units, 2);
        let atlas =
            store.get_unit("meks/Atlas AS7-D.json")?.ok_or_else(|| anyhow!("unit row missing"))?;
        assert_eq!(atlas.record.mass_tons, Some(95));
        assert_eq!(atlas.created_at, created);
        let rfc3339 = &time::format_description::well_known::Rfc3339;
        let created_at = OffsetDateTime::parse(&atlas.created_at, rfc3339)?;
        let updated_at = OffsetDateTime::parse(&atlas.updated_at, rfc3339)?;
        assert!(updated_at > created_at);
        Ok(())
    }

    #[test]
    fn failed_unit_batch_rolls_back_only_itself() -> Result<()> {
        let mut store = open_memory_store()?;
        store.conn.execute_batch(
            "CREATE TRIGGER reject_cursed BEFORE INSERT ON units
             WHEN NEW.chassis = 'Cursed'
             BEGIN SELECT RAISE(ABORT, 'cursed unit'); END;",
        )?;

        store.upsert_units(&[mk_unit("meks/Atlas.json", &json!({ "chassis": "Atlas" }))?])?;
        let bad_batch = vec![
            mk_unit("meks/Locust.json", &json!({ "chassis": "Locust" }))?,
            mk_unit("meks/Cursed.json", &json!({ "chassis": "Cursed" }))?,
        ];
        assert!(store.upsert_units(&bad_batch).is_err());
        store.upsert_units(&[mk_unit("meks/Marauder.json", &json!({ "chassis": "Marauder" }))?])?;

        assert_eq!(store.table_counts()?.units, 2);
        assert!(store.get_unit("meks/Locust.json")?.is_none());
        Ok(())
    }

    #[test]
    fn equipment_upsert_is_keyed_by_internal_id() -> Result<()> {
        let mut store = open_memory_store()?;
        let laser = mk_equipment(&json!({ "internal_id": "CLERLargeLaser", "name": "Clan ER Large Laser" }))?;
        store.upsert_equipment(&[laser.clone(), laser])?;
        let renamed = mk_equipment(&json!({
            "internal_id": "CLERLargeLaser",
            "name": "ER Large Laser (Clan)",
            "type": "Weapon",
        }))?;
        store.upsert_equipment(&[renamed])?;

        assert_eq!(store.table_counts()?.equipment, 1);
        let stored = store
            .get_equipment("CLERLargeLaser")?
            .ok_or_else(|| anyhow!("equipment row missing"))?;
        assert_eq!(stored.record.name, "ER Large Laser (Clan)");
        assert_eq!(stored.record.item_type, "Weapon");
        assert_eq!(stored.record.tech_base, EquipmentTechBase::Clan);
        Ok(())
    }

    #[test]
    fn validation_options_are_a_singleton() -> Result<()> {
        let mut store = open_memory_store()?;
        store.upsert_validation_options("DefaultSettings", &json!({ "mech": { "a": 1 } }))?;
        store.upsert_validation_options("DefaultSettings", &json!({ "mech": { "a": 2 } }))?;

        assert_eq!(store.table_counts()?.unit_validation_options, 1);
        assert_eq!(
            store.get_validation_options("DefaultSettings")?,
            Some(json!({ "mech": { "a": 2 } }))
        );
        assert_eq!(store.get_validation_options("Other")?, None);
        Ok(())
    }

    #[test]
    fn unit_type_summary_orders_by_count() -> Result<()> {
        let mut store = open_memory_store()?;
        let units = vec![
            mk_unit("meks/b.json", &json!({ "chassis": "Bushwacker", "mass": 55 }))?,
            mk_unit("meks/a.json", &json!({ "chassis": "Atlas", "model": "AS7-D", "mass": 100 }))?,
            mk_unit("vehicles/c.json", &json!({ "chassis": "Condor" }))?,
        ];
        store.upsert_units(&units)?;

        let summary = store.unit_type_summary()?;
        assert_eq!(
            summary,
            vec![
                UnitTypeCount { unit_type: "meks".into(), count: 2 },
                UnitTypeCount { unit_type: "vehicles".into(), count: 1 },
            ]
        );

        let samples = store.sample_units("meks", 1)?;
        assert_eq!(
            samples,
            vec![UnitSample { chassis: "Atlas".into(), model: "AS7-D".into(), mass_tons: Some(100) }]
        );
        Ok(())
    }

    #[test]
    fn remove_database_deletes_file_and_side_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("catalog.sqlite");
        {
            let mut store = SqliteStore::open(&path)?;
            store.apply_schema()?;
        }
        assert!(remove_database(&path)?);
        assert!(!path.exists());
        assert!(!side_file(&path, "-wal").exists());
        assert!(!remove_database(&path)?);
        Ok(())
    }
}
