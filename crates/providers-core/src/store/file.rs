// # File Provider Store
//
// File-based implementation of ProviderStore with crash recovery.
//
// ## Purpose
//
// Provides persistent storage of provider records across restarts, including
// soft-deleted rows which are kept for history.
//
// ## Crash Recovery
//
// - Atomic writes: Uses write-then-rename for atomicity
// - Corruption detection: Validates JSON on load
// - Automatic backup: Keeps .backup of last known good state
// - Recovery: Falls back to backup if corruption detected
//
// ## File Format
//
// ```json
// {
//   "version": "1.0",
//   "next_id": 3,
//   "providers": [
//     {
//       "id": 1,
//       "first_name": "Ana Maria",
//       "last_name": "Lopez",
//       "email": "ana@example.com",
//       "phone": "5551234",
//       "is_deleted": false,
//       "created_by": 7,
//       "created_at": "2025-01-09T12:00:00Z",
//       "updated_by": 7,
//       "updated_at": "2025-01-09T12:00:00Z"
//     }
//   ]
// }
// ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use super::ProviderTable;
use crate::Error;
use crate::config::StoreConfig;
use crate::model::{Provider, ProviderId};
use crate::traits::provider_store::{ProviderStore, ProviderStoreFactory};

/// Store file format version
/// Used for future migration if format changes
const STORE_FILE_VERSION: &str = "1.0";

/// File-based provider store with crash recovery
///
/// Every mutation is staged on a copy of the table and written to disk before
/// the call returns. The copy replaces the in-memory table only once the write
/// succeeds, so a failed call leaves no trace. The write lock is held across
/// the disk write.
///
/// # Example
///
/// ```rust,no_run
/// use providers_core::store::FileProviderStore;
/// use providers_core::ProviderStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileProviderStore::new("/var/lib/providers/providers.json").await?;
///
///     for provider in store.list_active().await? {
///         println!("{} {}", provider.first_name, provider.last_name);
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FileProviderStore {
    path: PathBuf,
    table: Arc<RwLock<ProviderTable>>,
}

/// Serializable store file format
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct StoreFileFormat {
    version: String,
    next_id: ProviderId,
    providers: Vec<Provider>,
}

impl FileProviderStore {
    /// Create or load a file provider store
    ///
    /// This will:
    /// 1. Create parent directories if needed
    /// 2. Try to load the existing store file
    /// 3. If it is corrupted, try to load from backup
    /// 4. If both fail, start with an empty table
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::config(format!(
                    "Failed to create store directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let table = Self::load_with_recovery(&path).await?;

        Ok(Self {
            path,
            table: Arc::new(RwLock::new(table)),
        })
    }

    /// Path of the main store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fetch a row by id whether or not it is soft-deleted
    pub async fn get_any(&self, id: ProviderId) -> Option<Provider> {
        self.table.read().await.get_any(id).cloned()
    }

    /// Load the table with automatic recovery
    ///
    /// Recovery strategy:
    /// 1. A missing file is an empty table
    /// 2. If the main file does not parse, try the backup
    /// 3. If the backup also fails, start with an empty table
    ///
    /// Read errors other than "not found" are returned as-is.
    async fn load_with_recovery(path: &Path) -> Result<ProviderTable, Error> {
        let Some(content) = Self::read_file(path).await? else {
            tracing::debug!("Store file does not exist: {}", path.display());
            return Ok(ProviderTable::new());
        };

        let err = match Self::parse(&content, path) {
            Ok(table) => {
                tracing::debug!("Loaded store from file: {} providers", table.len());
                return Ok(table);
            }
            Err(err) => err,
        };

        tracing::warn!(
            "Store file appears corrupted: {}. Attempting recovery from backup.",
            err
        );

        let backup_path = Self::backup_path(path);
        let backup = match Self::read_file(&backup_path).await {
            Ok(Some(content)) => content,
            Ok(None) => {
                tracing::warn!("No backup file found. Starting with empty store.");
                return Ok(ProviderTable::new());
            }
            Err(e) => {
                tracing::error!("Failed to read backup: {}. Starting with empty store.", e);
                return Ok(ProviderTable::new());
            }
        };

        match Self::parse(&backup, &backup_path) {
            Ok(table) => {
                tracing::info!("Recovered store from backup: {} providers", table.len());

                if let Err(e) = fs::copy(&backup_path, path).await {
                    tracing::error!("Failed to restore store file from backup: {}", e);
                }

                Ok(table)
            }
            Err(e) => {
                tracing::error!("Backup also corrupted: {}. Starting with empty store.", e);
                Ok(ProviderTable::new())
            }
        }
    }

    async fn read_file(path: &Path) -> Result<Option<String>, Error> {
        match fs::read_to_string(path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::store(format!(
                "Failed to read store file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn parse(content: &str, path: &Path) -> Result<ProviderTable, Error> {
        let file: StoreFileFormat = serde_json::from_str(content).map_err(|e| {
            Error::store(format!(
                "Failed to parse store file {}: {}",
                path.display(),
                e
            ))
        })?;

        if file.version != STORE_FILE_VERSION {
            tracing::warn!(
                "Store file version mismatch: expected {}, got {}. \
                Attempting to load anyway.",
                STORE_FILE_VERSION,
                file.version
            );
        }

        Ok(ProviderTable::from_rows(file.next_id, file.providers))
    }

    /// Write the table to disk atomically
    ///
    /// Callers hold the write lock while the write is in progress.
    async fn write_table(&self, table: &ProviderTable) -> Result<(), Error> {
        let file = StoreFileFormat {
            version: STORE_FILE_VERSION.to_string(),
            next_id: table.next_id(),
            providers: table.rows().cloned().collect(),
        };

        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| Error::store(format!("Failed to serialize store: {}", e)))?;

        // Write to temporary file first
        let temp_path = self.temp_path();
        {
            let mut out = fs::File::create(&temp_path).await.map_err(|e| {
                Error::store(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            out.write_all(json.as_bytes()).await.map_err(|e| {
                Error::store(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            out.flush().await.map_err(|e| {
                Error::store(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        // Keep the current file as the last known good state
        if fs::try_exists(&self.path).await.unwrap_or(false) {
            let backup_path = Self::backup_path(&self.path);
            if let Err(e) = fs::copy(&self.path, &backup_path).await {
                tracing::warn!("Failed to create backup: {}", e);
            }
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::store(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("Store written to file: {}", self.path.display());
        Ok(())
    }

    /// Apply a mutation and persist it
    ///
    /// The in-memory table is only replaced after the disk write succeeds.
    async fn mutate<T>(
        &self,
        op: impl FnOnce(&mut ProviderTable) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let mut guard = self.table.write().await;
        let mut staged = (*guard).clone();
        let value = op(&mut staged)?;
        self.write_table(&staged).await?;
        *guard = staged;
        Ok(value)
    }

    /// Get path to temporary file for atomic writes
    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }

    /// Get path to backup file
    fn backup_path(path: &Path) -> PathBuf {
        let mut backup = path.to_path_buf();
        backup.set_extension("backup");
        backup
    }
}

#[async_trait]
impl ProviderStore for FileProviderStore {
    async fn create(&self, provider: Provider) -> Result<Provider, Error> {
        self.mutate(|table| table.insert(provider)).await
    }

    async fn get_active_by_id(&self, id: ProviderId) -> Result<Option<Provider>, Error> {
        let guard = self.table.read().await;
        Ok(guard.get_active(id).cloned())
    }

    async fn list_active(&self) -> Result<Vec<Provider>, Error> {
        let guard = self.table.read().await;
        Ok(guard.list_active())
    }

    async fn update(&self, provider: &Provider) -> Result<(), Error> {
        self.mutate(|table| table.update(provider)).await
    }

    async fn soft_delete(&self, provider: &Provider) -> Result<(), Error> {
        self.mutate(|table| table.soft_delete(provider)).await
    }
}

/// Factory registered under `"file"`
#[derive(Debug, Default)]
pub struct FileProviderStoreFactory;

#[async_trait]
impl ProviderStoreFactory for FileProviderStoreFactory {
    async fn create(&self, config: &serde_json::Value) -> Result<Box<dyn ProviderStore>, Error> {
        match serde_json::from_value::<StoreConfig>(config.clone())? {
            StoreConfig::File { path } => Ok(Box::new(FileProviderStore::new(path).await?)),
            other => Err(Error::config(format!(
                "File store factory cannot build a '{}' store",
                other.type_name()
            ))),
        }
    }
}
