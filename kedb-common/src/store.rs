//! Output directory holding generated documents
//!
//! The filesystem is the only persistence: a document exists when
//! `KEDB####.docx` exists in the output directory.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::numbering::{self, KedbNumber};
use crate::{Error, Result};

/// A document found in the output directory
#[derive(Debug, Clone, Serialize)]
pub struct StoredDocument {
    pub kedb_number: KedbNumber,
    pub file_name: String,
    pub size_bytes: u64,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Generated document storage rooted at one directory
#[derive(Debug, Clone)]
pub struct DocumentStore {
    dir: PathBuf,
}

impl DocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the output directory if missing
    pub fn ensure_exists(&self) -> Result<()> {
        if !self.dir.exists() {
            info!("Creating output directory: {}", self.dir.display());
        }
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Path a document with `number` is stored under
    pub fn path_for(&self, number: KedbNumber) -> PathBuf {
        self.dir.join(number.file_name())
    }

    /// Next free identifier
    pub fn next_number(&self) -> Result<KedbNumber> {
        numbering::next_number(&self.dir)
    }

    /// Write a new document, never replacing an existing one
    pub fn save(&self, number: KedbNumber, bytes: &[u8]) -> Result<PathBuf> {
        self.ensure_exists()?;
        let path = self.path_for(number);

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(Error::Conflict(format!("{} already exists", number.file_name())));
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(bytes)?;
        file.sync_all()?;

        info!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    /// Contents of a previously generated document
    pub fn read(&self, number: KedbNumber) -> Result<Vec<u8>> {
        let path = self.path_for(number);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(Error::NotFound(number.file_name()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// All generated documents, ordered by number
    ///
    /// Only exact `KEDB####.docx` names are listed. A missing directory
    /// yields an empty list.
    pub fn list(&self) -> Result<Vec<StoredDocument>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut documents = Vec::new();
        for entry in entries {
            let entry = entry?;
            let file_name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(_) => continue,
            };
            let kedb_number = match numbering::parse_file_name(&file_name) {
                Some(n) if n.file_name() == file_name => n,
                _ => continue,
            };

            let metadata = match entry.metadata() {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                Err(e) => {
                    warn!("Skipping {}: {}", file_name, e);
                    continue;
                }
            };

            documents.push(StoredDocument {
                kedb_number,
                file_name,
                size_bytes: metadata.len(),
                modified_at: metadata.modified().ok().map(DateTime::<Utc>::from),
            });
        }

        documents.sort_by_key(|d| d.kedb_number);
        Ok(documents)
    }
}
