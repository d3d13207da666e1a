//! Section document stores.
//!
//! A store is scoped to one config directory and addresses documents by
//! section name. [`JsonFileStore`] keeps section `S` in `<dir>/S.json` and
//! reads drop-in fragments from `<dir>/S.d/*.json` underneath it.

use crate::error::{StoreError, StoreResult};
use crate::merge::recursive_update;
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A section document: string keys to arbitrary JSON values.
pub type Document = Map<String, Value>;

/// Read/write access to the section documents of one config directory.
pub trait DocumentStore {
    /// The directory this store reads and writes.
    fn config_dir(&self) -> &Path;

    /// Whether the backing directory exists.
    fn exists(&self) -> bool {
        self.config_dir().is_dir()
    }

    /// Read a section. A missing section is an empty document.
    fn get(&self, section: &str) -> StoreResult<Document>;

    /// Merge `document` into the persisted section and return the result.
    fn update(&self, section: &str, document: Document) -> StoreResult<Document>;

    /// Replace the persisted section with `document`.
    fn set(&self, section: &str, document: &Document) -> StoreResult<()>;
}

/// JSON-file-backed section store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    config_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Path of the main file for `section`.
    pub fn file_name(&self, section: &str) -> PathBuf {
        self.config_dir.join(format!("{section}.json"))
    }

    /// Path of the drop-in directory for `section`.
    pub fn fragment_dir(&self, section: &str) -> PathBuf {
        self.config_dir.join(format!("{section}.d"))
    }

    /// Read one JSON file; `None` if it does not exist.
    fn read_file(path: &Path) -> StoreResult<Option<Document>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::from_io(path, e)),
        };
        // An empty file reads the same as a missing one.
        if content.trim().is_empty() {
            return Ok(Some(Document::new()));
        }
        let value: Value = serde_json::from_str(&content).map_err(|source| StoreError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        match value {
            Value::Object(map) => Ok(Some(map)),
            _ => Err(StoreError::NotAnObject {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Fragment files for `section`, sorted by file name.
    fn fragment_files(&self, section: &str) -> StoreResult<Vec<PathBuf>> {
        let dir = self.fragment_dir(section);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::from_io(&dir, e)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StoreError::from_io(&dir, e))?.path();
            if path.extension().is_some_and(|ext| ext == "json") && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn ensure_config_dir(&self) -> StoreResult<()> {
        if !self.config_dir.is_dir() {
            debug!(dir = %self.config_dir.display(), "Creating config directory");
            fs::create_dir_all(&self.config_dir)
                .map_err(|e| StoreError::from_io(&self.config_dir, e))?;
        }
        Ok(())
    }
}

impl DocumentStore for JsonFileStore {
    fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    fn get(&self, section: &str) -> StoreResult<Document> {
        let mut data = Document::new();
        for fragment in self.fragment_files(section)? {
            if let Some(doc) = Self::read_file(&fragment)? {
                recursive_update(&mut data, doc);
            }
        }
        if let Some(doc) = Self::read_file(&self.file_name(section))? {
            recursive_update(&mut data, doc);
        }
        Ok(data)
    }

    fn update(&self, section: &str, document: Document) -> StoreResult<Document> {
        let path = self.file_name(section);
        let existing = Self::read_file(&path)?;
        let existed = existing.is_some();
        let mut data = existing.unwrap_or_default();
        recursive_update(&mut data, document);

        if data.is_empty() && !existed {
            return Ok(data);
        }
        self.set(section, &data)?;
        Ok(data)
    }

    fn set(&self, section: &str, document: &Document) -> StoreResult<()> {
        let path = self.file_name(section);

        if document.is_empty() {
            return match fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(StoreError::from_io(&path, e)),
            };
        }

        self.ensure_config_dir()?;
        let mut json = serde_json::to_string_pretty(document).map_err(|source| {
            StoreError::Malformed {
                path: path.clone(),
                source,
            }
        })?;
        json.push('\n');
        fs::write(&path, json).map_err(|e| StoreError::from_io(&path, e))?;
        debug!(section = %section, path = %path.display(), "Wrote section");
        Ok(())
    }
}
