//! Document store clients.
//!
//! A store is opened once at startup, handed by reference to whatever needs
//! records, and closed explicitly when the program is done with it.
//!
//! [`FileStore`] keeps each collection as a directory of JSON documents:
//! `*.json` files hold one document (or an array of documents) and `*.jsonl`
//! files hold one document per line.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use gallery_core::error::{GalleryError, Result};
use gallery_core::models::Record;

// ── DocumentStore ─────────────────────────────────────────────────────────────

/// Source of records grouped into named collections.
pub trait DocumentStore {
    /// Every record in collection `name`, in storage order.
    ///
    /// A document that is not a JSON object fails the call. [`FileStore`]
    /// reports it as [`GalleryError::MalformedDocument`], naming the file and
    /// line.
    fn fetch_collection(&self, name: &str) -> Result<Vec<Record>>;

    /// Release the client. The store cannot be used afterwards.
    fn close(self) -> Result<()>
    where
        Self: Sized;
}

// ── FileStore ─────────────────────────────────────────────────────────────────

/// Directory-backed document store.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open the store rooted at `root`, which must be an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(GalleryError::StorePathNotFound(root));
        }
        info!("Opened document store at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding collection `name`.
    pub fn collection_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Names of all collections (sub-directories of the root), sorted.
    pub fn list_collections(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.root).map_err(|source| GalleryError::FileRead {
            path: self.root.clone(),
            source,
        })?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .collect();
        names.sort();
        Ok(names)
    }
}

impl DocumentStore for FileStore {
    fn fetch_collection(&self, name: &str) -> Result<Vec<Record>> {
        let dir = self.collection_path(name);
        if !dir.is_dir() {
            return Err(GalleryError::CollectionNotFound(name.to_string()));
        }

        let files = find_document_files(&dir);
        let mut records = Vec::new();
        for file in &files {
            let is_jsonl = file.extension().map(|ext| ext == "jsonl").unwrap_or(false);
            let documents = if is_jsonl {
                read_jsonl_file(file)?
            } else {
                read_json_file(file)?
            };
            for (line, value) in documents {
                records.push(document_record(file, line, value)?);
            }
        }

        debug!(
            "Loaded {} records from {} files in collection \"{}\"",
            records.len(),
            files.len(),
            name
        );
        Ok(records)
    }

    fn close(self) -> Result<()> {
        info!("Closed document store at {}", self.root.display());
        Ok(())
    }
}

// ── MemoryStore ───────────────────────────────────────────────────────────────

/// In-memory store, for embedding and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    collections: HashMap<String, Vec<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`MemoryStore::insert`].
    pub fn with_collection(mut self, name: impl Into<String>, records: Vec<Record>) -> Self {
        self.insert(name, records);
        self
    }

    /// Replace collection `name` with `records`.
    pub fn insert(&mut self, name: impl Into<String>, records: Vec<Record>) {
        self.collections.insert(name.into(), records);
    }
}

impl DocumentStore for MemoryStore {
    fn fetch_collection(&self, name: &str) -> Result<Vec<Record>> {
        self.collections
            .get(name)
            .cloned()
            .ok_or_else(|| GalleryError::CollectionNotFound(name.to_string()))
    }

    fn close(self) -> Result<()> {
        debug!("Closed in-memory store ({} collections)", self.collections.len());
        Ok(())
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// All `.json` / `.jsonl` files under `dir`, recursively, sorted by path.
fn find_document_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "json" || ext == "jsonl")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Wrap a parsed document, reporting a non-object by file and line.
fn document_record(path: &Path, line: usize, value: Value) -> Result<Record> {
    Record::from_value(line, value).map_err(|e| match e {
        GalleryError::MalformedRecord { found, .. } => GalleryError::MalformedDocument {
            path: path.to_path_buf(),
            line,
            found,
        },
        other => other,
    })
}

/// Read a `.json` file: a single document, or an array of documents, each
/// paired with its 1-based position.
///
/// A file that is not valid JSON is skipped with a warning.
fn read_json_file(path: &Path) -> Result<Vec<(usize, Value)>> {
    let content = std::fs::read_to_string(path).map_err(|source| GalleryError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Array(items)) => Ok(items
            .into_iter()
            .enumerate()
            .map(|(i, value)| (i + 1, value))
            .collect()),
        Ok(value) => Ok(vec![(1, value)]),
        Err(e) => {
            warn!("Skipping unparsable document {}: {}", path.display(), e);
            Ok(Vec::new())
        }
    }
}

/// Read a `.jsonl` file, one document per non-blank line, each paired with
/// its 1-based line number.
///
/// Lines that are not valid JSON are skipped with a warning.
fn read_jsonl_file(path: &Path) -> Result<Vec<(usize, Value)>> {
    let file = std::fs::File::open(path).map_err(|source| GalleryError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let reader = std::io::BufReader::new(file);
    let mut values = Vec::new();

    for (line_no, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|source| GalleryError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str(trimmed) {
            Ok(value) => values.push((line_no + 1, value)),
            Err(e) => {
                warn!(
                    "Skipping unparsable line {} in {}: {}",
                    line_no + 1,
                    path.display(),
                    e
                );
            }
        }
    }

    Ok(values)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
