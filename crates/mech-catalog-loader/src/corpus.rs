//! Directory walk and JSON access over the unit corpus.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use mech_catalog_core::{EQUIPMENT_FILE, VERIFIER_OPTIONS_FILE};
use serde_json::Value;
use walkdir::WalkDir;

use crate::report::AnomalyKind;

/// One unit file found under the corpus root.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CorpusEntry {
    pub path: PathBuf,
    /// `/`-separated path relative to the corpus root.
    pub relative_path: String,
    pub file_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to read file: {0}")]
    Unreadable(#[from] io::Error),
    #[error("invalid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("failed to write file: {0}")]
    Unwritable(io::Error),
}

impl DocumentError {
    #[must_use]
    pub fn kind(&self) -> AnomalyKind {
        match self {
            Self::Unreadable(_) => AnomalyKind::UnreadableFile,
            Self::Malformed(_) => AnomalyKind::MalformedJson,
            Self::Unwritable(_) => AnomalyKind::WriteFailed,
        }
    }
}

/// Fails unless `root` is an existing directory.
///
/// # Errors
/// Returns an error naming the missing corpus directory.
pub fn ensure_corpus_root(root: &Path) -> Result<()> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(anyhow!("corpus directory not found: {}", root.display()))
    }
}

/// Whether a file name is one of the two corpus-wide catalog files.
#[must_use]
pub fn is_corpus_wide_file(file_name: &str) -> bool {
    file_name == EQUIPMENT_FILE || file_name == VERIFIER_OPTIONS_FILE
}

/// Walks `root` for unit files in file-name order.
///
/// Entries the walk cannot read are yielded as errors so the caller can
/// report them and carry on.
pub fn unit_files(root: &Path) -> impl Iterator<Item = Result<CorpusEntry, walkdir::Error>> + '_ {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => return Some(Err(err)),
            };
            if !entry.file_type().is_file() {
                return None;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if !file_name.ends_with(".json") || is_corpus_wide_file(&file_name) {
                return None;
            }
            let relative_path = relative_path(root, entry.path());
            Some(Ok(CorpusEntry { path: entry.into_path(), relative_path, file_name }))
        })
}

/// `path` relative to `root`, joined with `/`.
#[must_use]
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Reads and parses one JSON file.
///
/// # Errors
/// Distinguishes an unreadable file from malformed JSON.
pub fn read_json(path: &Path) -> Result<Value, DocumentError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Writes a document as two-space indented JSON, preserving key order.
///
/// # Errors
/// Returns an error when serialization or the write fails.
pub fn write_json(path: &Path, doc: &Value) -> Result<(), DocumentError> {
    let text = serde_json::to_string_pretty(doc)?;
    fs::write(path, text).map_err(DocumentError::Unwritable)
}
