use super::files::{atomic_write, export_file_name};
use crate::domain::{Document, ExportDocument, PartialDocument};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why an import was rejected. The current data is left untouched in every case.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("could not read import file: {0}")]
    Io(#[from] std::io::Error),
    #[error("import file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("import file must contain a JSON object")]
    NotAnObject,
    #[error("import file has no recognised fields")]
    NoKnownFields,
}

/// Serialize the document with an `exportDate` stamp
pub fn export_document(document: &Document, now: DateTime<Utc>) -> Result<String> {
    let export = ExportDocument {
        document,
        export_date: now,
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

/// Write an export file.
///
/// `target` may be a directory (the dated default name is used) or a file path.
pub fn export_to(document: &Document, target: &Path, now: DateTime<Utc>) -> Result<PathBuf> {
    let path = if target.is_dir() {
        target.join(export_file_name(now.date_naive()))
    } else {
        target.to_path_buf()
    };

    let json = export_document(document, now)?;
    atomic_write(&path, &json)
        .with_context(|| format!("Failed to write export: {}", path.display()))?;

    tracing::info!(path = %path.display(), "exported data");
    Ok(path)
}

/// Parse import text into a partial document
pub fn parse_import(text: &str) -> Result<PartialDocument, ImportError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if !value.is_object() {
        return Err(ImportError::NotAnObject);
    }

    let partial: PartialDocument = serde_json::from_value(value)?;
    if partial.is_empty() {
        return Err(ImportError::NoKnownFields);
    }
    Ok(partial)
}

/// Merge import text over the current document
pub fn import_into(current: Document, text: &str) -> Result<Document, ImportError> {
    let partial = parse_import(text)?;
    Ok(partial.apply_to(current))
}

/// Read an import file and merge it over the current document
pub fn import_file(current: Document, path: &Path) -> Result<Document, ImportError> {
    let text = std::fs::read_to_string(path)?;
    import_into(current, &text)
}
