use super::files::{atomic_write, read_file};
use crate::domain::Document;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// The single JSON file holding all persisted data
#[derive(Debug, Clone)]
pub struct DocumentStore {
    path: PathBuf,
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the stored document.
    ///
    /// Returns None when there is no file yet, or when it cannot be read or
    /// parsed; the latter is logged and treated as "no prior data".
    pub fn load(&self) -> Option<Document> {
        match load_document(&self.path) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %format!("{e:#}"), "ignoring unreadable data file");
                None
            }
        }
    }

    /// Overwrite the stored document
    pub fn save(&self, document: &Document) -> Result<()> {
        save_document(&self.path, document)
    }
}

/// Read and parse a document file; Ok(None) if it doesn't exist
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Option<Document>> {
    let path = path.as_ref();
    let Some(content) = read_file(path)? else {
        return Ok(None);
    };
    let document: Document = serde_json::from_str(&content)
        .with_context(|| format!("Malformed data file: {}", path.display()))?;
    Ok(Some(document))
}

/// Serialize and atomically write a document
pub fn save_document<P: AsRef<Path>>(path: P, document: &Document) -> Result<()> {
    let json = serde_json::to_string_pretty(document)?;
    atomic_write(path, &json)?;
    Ok(())
}
