//! Rule file storage with XDG path support.
//!
//! Rules are stored as JSON at `~/.local/share/rulectl/rules.json` by default.
//!
//! Both synchronous and asynchronous I/O methods are provided:
//! - `save()`, `load_all()` - Synchronous methods using `std::fs`
//! - `save_async()`, `load_all_async()` - Asynchronous methods using `tokio::fs`

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rule_engine_rs::expr::canonical::{self, CanonicalNode};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::{RuleDocument, RuleRecord, DOCUMENT_VERSION};

/// Default store filename.
const STORE_FILENAME: &str = "rules.json";

/// Application qualifier (for XDG paths).
const QUALIFIER: &str = "";

/// Application organization (for XDG paths).
const ORGANIZATION: &str = "";

/// Application name (for XDG paths).
const APPLICATION: &str = "rulectl";

/// Errors that can occur during rule storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to determine XDG data directory.
    #[error("failed to determine data directory: no valid home directory found")]
    NoDataDir,

    /// I/O error during file read.
    #[error("failed to read rule store '{path}': {source}")]
    Read {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during file write.
    #[error("failed to write rule store '{path}': {source}")]
    Write {
        /// The path that failed to write.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during directory creation.
    #[error("failed to create data directory '{path}': {source}")]
    CreateDir {
        /// The directory path that failed to create.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during file delete.
    #[error("failed to delete rule store '{path}': {source}")]
    Delete {
        /// The path that failed to delete.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file was written by a newer version of the store.
    #[error("rule store '{path}' has unsupported version {version} (expected {})", DOCUMENT_VERSION)]
    UnsupportedVersion {
        /// The store path.
        path: PathBuf,
        /// The version found in the file.
        version: u32,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for rule store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistent storage for serialized rules.
///
/// Every `save` reads the current document, appends one record and writes the
/// document back atomically (temp file + rename), so a crash mid-write leaves the
/// previous contents intact. Writes from several processes are not coordinated.
///
/// # Example
///
/// ```no_run
/// use rule_engine_rs::prelude::*;
/// use rule_store_rs::RuleStore;
///
/// let engine = RuleEngine::default();
/// let store = RuleStore::new()?;
///
/// let text = "age > 30 AND department = 'Sales'";
/// let rule = engine.parse(text).unwrap();
/// let record = store.save(text, engine.serialize(&rule))?;
///
/// for stored in store.load_all()? {
///     println!("{} {}", stored.id, stored.rule_text);
/// }
/// # let _ = record;
/// # Ok::<(), rule_store_rs::StoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RuleStore {
    /// Path to the store file.
    path: PathBuf,
}

impl RuleStore {
    /// Creates a new `RuleStore` with the default XDG data path.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoDataDir` if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        let path = Self::default_path()?;
        Ok(Self { path })
    }

    /// Creates a new `RuleStore` with a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the default XDG data path for the store file.
    ///
    /// On Unix: `~/.local/share/rulectl/rules.json`
    /// On macOS: `~/Library/Application Support/rulectl/rules.json`
    /// On Windows: `C:\Users\<User>\AppData\Roaming\rulectl\data\rules.json`
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoDataDir` if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let project_dirs =
            ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or(StoreError::NoDataDir)?;

        Ok(project_dirs.data_dir().join(STORE_FILENAME))
    }

    /// Returns the path to the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the store file exists on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Saves an unnamed rule and returns the stored record.
    ///
    /// # Errors
    ///
    /// - Returns `StoreError::Read`, `StoreError::Json` or
    ///   `StoreError::UnsupportedVersion` if the existing file cannot be loaded.
    /// - Returns `StoreError::CreateDir` or `StoreError::Write` if the file cannot be written.
    pub fn save(&self, rule_text: &str, ast: CanonicalNode) -> Result<RuleRecord> {
        self.append(RuleRecord::new(None, rule_text, ast))
    }

    /// Saves a rule under a name and returns the stored record.
    ///
    /// Names are labels, not keys: saving the same name twice keeps both records.
    ///
    /// # Errors
    ///
    /// Same as [`save()`](Self::save).
    pub fn save_named(&self, name: &str, rule_text: &str, ast: CanonicalNode) -> Result<RuleRecord> {
        self.append(RuleRecord::new(Some(name.to_string()), rule_text, ast))
    }

    /// Loads every stored rule, oldest first.
    ///
    /// A missing store file is an empty store.
    ///
    /// # Errors
    ///
    /// - Returns `StoreError::Read` for I/O errors other than "file not found".
    /// - Returns `StoreError::Json` if the file contains invalid JSON.
    /// - Returns `StoreError::UnsupportedVersion` for a document from a newer version.
    pub fn load_all(&self) -> Result<Vec<RuleRecord>> {
        Ok(self.read_document()?.rules)
    }

    /// Finds a stored rule by id.
    ///
    /// # Errors
    ///
    /// Same as [`load_all()`](Self::load_all).
    pub fn find(&self, id: &Uuid) -> Result<Option<RuleRecord>> {
        Ok(self.load_all()?.into_iter().find(|record| &record.id == id))
    }

    /// Deletes the store file, removing every rule.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Delete` if the file cannot be deleted.
    /// Does not return an error if the file doesn't exist.
    pub fn clear(&self) -> Result<()> {
        debug!(path = %self.path.display(), "clearing rule store");
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Delete {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn append(&self, record: RuleRecord) -> Result<RuleRecord> {
        let mut document = self.read_document()?;
        document.rules.push(record.clone());
        self.write_document(&document)?;
        debug!(id = %record.id, total = document.rules.len(), "saved rule");
        Ok(record)
    }

    fn read_document(&self) -> Result<RuleDocument> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "rule store not found, starting empty");
                return Ok(RuleDocument::default());
            }
            Err(e) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        self.decode(&contents)
    }

    /// Writes the document atomically: temp file, then rename.
    fn write_document(&self, document: &RuleDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(document)?;

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, &json).map_err(|e| StoreError::Write {
            path: temp_path.clone(),
            source: e,
        })?;
        fs::rename(&temp_path, &self.path).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            source: e,
        })?;

        Ok(())
    }

    /// Parses and version-checks a store document. Deeply combined rules nest
    /// past serde_json's default depth, so this reads without a recursion limit.
    fn decode(&self, contents: &str) -> Result<RuleDocument> {
        let document: RuleDocument = canonical::from_json_text(contents)?;
        if document.version > DOCUMENT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                path: self.path.clone(),
                version: document.version,
            });
        }
        debug!(path = %self.path.display(), rules = document.rules.len(), "loaded rule store");
        Ok(document)
    }

    // =========================================================================
    // Async I/O Methods
    // =========================================================================

    /// Saves an unnamed rule asynchronously.
    ///
    /// This is the async equivalent of [`save()`](Self::save).
    ///
    /// # Errors
    ///
    /// Same as [`save()`](Self::save).
    pub async fn save_async(&self, rule_text: &str, ast: CanonicalNode) -> Result<RuleRecord> {
        self.append_async(RuleRecord::new(None, rule_text, ast)).await
    }

    /// Saves a named rule asynchronously.
    ///
    /// This is the async equivalent of [`save_named()`](Self::save_named).
    ///
    /// # Errors
    ///
    /// Same as [`save()`](Self::save).
    pub async fn save_named_async(
        &self,
        name: &str,
        rule_text: &str,
        ast: CanonicalNode,
    ) -> Result<RuleRecord> {
        self.append_async(RuleRecord::new(Some(name.to_string()), rule_text, ast))
            .await
    }

    /// Loads every stored rule asynchronously.
    ///
    /// This is the async equivalent of [`load_all()`](Self::load_all).
    ///
    /// # Errors
    ///
    /// Same as [`load_all()`](Self::load_all).
    pub async fn load_all_async(&self) -> Result<Vec<RuleRecord>> {
        Ok(self.read_document_async().await?.rules)
    }

    /// Finds a stored rule by id asynchronously.
    ///
    /// # Errors
    ///
    /// Same as [`load_all()`](Self::load_all).
    pub async fn find_async(&self, id: &Uuid) -> Result<Option<RuleRecord>> {
        Ok(self
            .load_all_async()
            .await?
            .into_iter()
            .find(|record| &record.id == id))
    }

    /// Deletes the store file asynchronously.
    ///
    /// This is the async equivalent of [`clear()`](Self::clear).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Delete` if the file cannot be deleted.
    pub async fn clear_async(&self) -> Result<()> {
        debug!(path = %self.path.display(), "clearing rule store");
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Delete {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    async fn append_async(&self, record: RuleRecord) -> Result<RuleRecord> {
        let mut document = self.read_document_async().await?;
        document.rules.push(record.clone());
        self.write_document_async(&document).await?;
        debug!(id = %record.id, total = document.rules.len(), "saved rule");
        Ok(record)
    }

    async fn read_document_async(&self) -> Result<RuleDocument> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "rule store not found, starting empty");
                return Ok(RuleDocument::default());
            }
            Err(e) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        self.decode(&contents)
    }

    async fn write_document_async(&self, document: &RuleDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let json = serde_json::to_string_pretty(document)?;

        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &json)
            .await
            .map_err(|e| StoreError::Write {
                path: temp_path.clone(),
                source: e,
            })?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| StoreError::Write {
                path: self.path.clone(),
                source: e,
            })?;

        Ok(())
    }
}
