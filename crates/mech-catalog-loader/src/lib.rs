//! Corpus access, the populate pipeline, and the in-place migrator.

pub mod corpus;
pub mod migrate;
pub mod populate;
pub mod report;
pub mod stats;
pub mod validate;

pub use corpus::{ensure_corpus_root, unit_files, CorpusEntry, DocumentError};
pub use migrate::{migrate_corpus, run_migration, MigrationReport, MigrationSummary};
pub use populate::{populate, PopulateOptions, PopulateReport, DEFAULT_BATCH_SIZE};
pub use report::{Anomaly, AnomalyKind, Stage, StageReport, ANOMALY_TARGET};
pub use stats::{collect_stats, CatalogStats, UnitTypeStats};
pub use validate::{default_samples, validate_samples, SampleResult, SampleStatus, DEFAULT_SAMPLE_FILES};
