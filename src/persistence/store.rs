use super::files::{self, atomic_write, read_file};
use crate::domain::AppDocument;
use chrono::NaiveDate;
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Things that happened to the stored document outside a plain load/save
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// The data file changed on disk
    ExternalChange,
    /// `data.json` was unusable and this backup was loaded instead
    RecoveredFromBackup(PathBuf),
    /// The wall clock jumped, most likely after a suspend
    SystemWake,
}

/// Where the document lives
pub trait DocumentStore {
    fn load(&self) -> Result<AppDocument, StoreError>;
    fn save(&self, doc: &AppDocument) -> Result<(), StoreError>;

    /// Events raised by earlier loads, oldest first
    fn drain_events(&self) -> Vec<StoreEvent> {
        Vec::new()
    }
}

/// The document as pretty JSON in `<dir>/data.json`, with dated backups
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    backup_retention: usize,
    events: RefCell<Vec<StoreEvent>>,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>, backup_retention: usize) -> Self {
        Self {
            dir: dir.into(),
            backup_retention,
            events: RefCell::new(Vec::new()),
        }
    }

    pub fn data_path(&self) -> PathBuf {
        files::data_file(&self.dir)
    }

    fn read_document(path: &Path) -> Result<Option<AppDocument>, StoreError> {
        let Some(content) = read_file(path).map_err(|e| StoreError::io(path, e))? else {
            return Ok(None);
        };
        AppDocument::from_json(&content)
            .map(Some)
            .map_err(|source| StoreError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Newest backup that parses, if any
    fn recover_from_backup(&self) -> Option<(PathBuf, AppDocument)> {
        let backups = match files::list_backups(&self.dir) {
            Ok(backups) => backups,
            Err(e) => {
                tracing::warn!(error = %e, "could not list backups");
                return None;
            }
        };

        backups.into_iter().find_map(|path| match Self::read_document(&path) {
            Ok(Some(doc)) => Some((path, doc)),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unusable backup");
                None
            }
        })
    }

    /// Copy data.json to today's backup name unless that backup exists,
    /// then prune. Returns the backup path when one was written.
    pub fn create_daily_backup(&self, today: NaiveDate) -> Result<Option<PathBuf>, StoreError> {
        let data_path = self.data_path();
        if !data_path.exists() {
            return Ok(None);
        }

        let backup_path = files::backup_file(&self.dir, today);
        if backup_path.exists() {
            return Ok(None);
        }

        let backups_dir = files::backups_dir(&self.dir);
        fs::create_dir_all(&backups_dir).map_err(|e| StoreError::io(&backups_dir, e))?;
        fs::copy(&data_path, &backup_path).map_err(|e| StoreError::io(&backup_path, e))?;
        tracing::info!(path = %backup_path.display(), "created daily backup");

        self.prune_backups()?;
        Ok(Some(backup_path))
    }

    /// Keep only the newest `backup_retention` backups
    pub fn prune_backups(&self) -> Result<usize, StoreError> {
        let backups_dir = files::backups_dir(&self.dir);
        let backups = files::list_backups(&self.dir).map_err(|e| StoreError::io(&backups_dir, e))?;

        let mut removed = 0;
        for old in backups.iter().skip(self.backup_retention) {
            fs::remove_file(old).map_err(|e| StoreError::io(old, e))?;
            tracing::info!(path = %old.display(), "removed old backup");
            removed += 1;
        }
        Ok(removed)
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> Result<AppDocument, StoreError> {
        let path = self.data_path();
        let failure = match Self::read_document(&path) {
            Ok(Some(doc)) => {
                tracing::info!(path = %path.display(), tasks = doc.daily_tasks.len(), "loaded document");
                return Ok(doc);
            }
            Ok(None) => {
                tracing::info!(path = %path.display(), "no data file yet, starting empty");
                return Ok(AppDocument::default());
            }
            Err(e) => e,
        };

        tracing::warn!(error = %failure, "data file unusable, trying backups");
        match self.recover_from_backup() {
            Some((backup, doc)) => {
                tracing::info!(path = %backup.display(), "recovered document from backup");
                self.events.borrow_mut().push(StoreEvent::RecoveredFromBackup(backup));
                Ok(doc)
            }
            None => {
                tracing::warn!("no usable backup found, starting fresh");
                Ok(AppDocument::default())
            }
        }
    }

    fn save(&self, doc: &AppDocument) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;

        let path = self.data_path();
        let content = doc.to_json().map_err(|source| StoreError::Parse {
            path: path.clone(),
            source,
        })?;
        atomic_write(&path, &content).map_err(|e| StoreError::io(&path, e))?;
        tracing::debug!(path = %path.display(), "saved document");
        Ok(())
    }

    fn drain_events(&self) -> Vec<StoreEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}
