//! JSON file storage for the ledger.
//!
//! Single source of truth for all worker records. The whole document is
//! read at the start of every command and rewritten in full after every
//! mutation; nothing is cached between commands.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::Ledger;
use crate::telemetry::metrics;

/// Storage backend. Owns the ledger file path and the mutation lock.
#[derive(Debug)]
pub struct LedgerStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl LedgerStore {
    /// Use the ledger file at `path`. The file is created on first save.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted ledger, or an empty one if no file exists yet.
    pub fn load(&self) -> Result<Ledger> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Ledger::new()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&raw).map_err(|source| Error::StorageCorrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the persisted ledger.
    ///
    /// Writes a sibling temp file and renames it over the target, so readers
    /// see either the old document or the new one. An existing file's
    /// permissions carry over to the replacement.
    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut body = serde_json::to_vec_pretty(ledger)?;
        body.push(b'\n');

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&body)?;
        // The temp file starts out 0600; keep whatever mode the ledger had.
        match std::fs::metadata(&self.path) {
            Ok(existing) => tmp.as_file().set_permissions(existing.permissions())?,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        metrics::ledger_writes().add(1, &[]);
        debug!(path = %self.path.display(), workers = ledger.len(), "ledger saved");
        Ok(())
    }

    /// Run one load-mutate-save cycle under the store's mutation lock.
    ///
    /// The ledger is saved only if the closure returns Ok; on Err the file
    /// is left untouched.
    pub fn update<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Ledger) -> Result<T>,
    {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut ledger = self.load()?;
        let result = f(&mut ledger)?;
        self.save(&ledger)?;
        Ok(result)
    }
}
