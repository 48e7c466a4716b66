//! Database Module
//!
//! Shared handle over one database directory's revisions.
//!
//! ## Responsibilities
//! - Recover the newest revision on open, or create a new database
//! - Serialize staging and commits (single writer)
//! - Hand readers the committed snapshot without blocking on commits
//! - Reopen to pick up revisions committed by another process

use std::fs;
use std::path::Path;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::config::Config;
use crate::error::{Result, RevError};
use crate::table::{BlockNumber, Revision, Table};
use crate::version::{Snapshot, VersionManager};

/// Thread-safe handle to a database directory
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
///
/// - **Writes** (set_root/commit/discard): serialized by the `writer` mutex,
///   so a second commit can never start while one is in flight
/// - **Reads** (snapshot): take a read lock on `published` just long enough
///   to clone an `Arc`; a commit holds the write lock only to swap it
///
/// Mutual exclusion between processes is the caller's job (e.g. a lock file
/// taken before opening for writing).
pub struct Database {
    /// Database configuration
    config: Config,

    /// Committed + staged state, owned by the single writer
    writer: Mutex<VersionManager>,

    /// Last committed snapshot, shared with readers
    published: RwLock<Arc<Snapshot>>,
}

impl Database {
    /// Open the newest revision in `config.data_dir`
    ///
    /// A directory with no revision files opens as an empty database at
    /// revision 0 with a nil UUID. Use [`Database::create`] to give it an
    /// identity.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let mut manager = VersionManager::with_config(&config);
        manager.open_most_recent(&config.data_dir)?;

        Ok(Self::from_manager(config, manager))
    }

    /// Create a new database in `config.data_dir`
    ///
    /// Creates the directory if needed and commits revision 0. Fails with a
    /// logic error if the directory already holds a revision.
    pub fn create(config: Config) -> Result<Self> {
        config.validate()?;

        fs::create_dir_all(&config.data_dir).map_err(|source| RevError::Opening {
            path: config.data_dir.clone(),
            source,
        })?;

        if let Some(existing) = crate::scanner::find_latest(&config.data_dir)? {
            return Err(RevError::Logic(format!(
                "{} already holds revision {:08x}",
                config.data_dir.display(),
                existing.revision
            )));
        }

        let mut manager = VersionManager::with_config(&config);
        manager.create(&config.data_dir)?;

        Ok(Self::from_manager(config, manager))
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    fn from_manager(config: Config, manager: VersionManager) -> Self {
        let published = RwLock::new(Arc::new(manager.snapshot()));
        Self {
            config,
            writer: Mutex::new(manager),
            published,
        }
    }

    // =========================================================================
    // Readers
    // =========================================================================

    /// The committed state readers should use
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&*self.published.read())
    }

    /// Committed revision
    pub fn revision(&self) -> Revision {
        self.published.read().revision
    }

    /// Committed root of a table
    pub fn root(&self, table: Table) -> Option<BlockNumber> {
        self.published.read().root(table)
    }

    /// Re-read the directory and publish the newest revision found
    ///
    /// Staged changes are dropped. Returns the snapshot now published.
    pub fn reopen(&self) -> Result<Arc<Snapshot>> {
        let mut manager = self.writer.lock();
        manager.open_most_recent(&self.config.data_dir)?;

        tracing::debug!("Reopened at revision {:08x}", manager.revision());
        Ok(self.publish(&manager))
    }

    // =========================================================================
    // Writer
    // =========================================================================

    /// Stage a new root for `table`
    pub fn set_root(&self, table: Table, root: Option<BlockNumber>) {
        self.writer.lock().set_root(table, root);
    }

    /// Drop staged changes
    pub fn discard(&self) {
        self.writer.lock().discard_staged();
    }

    /// Commit staged roots as `new_revision` and publish the result
    pub fn commit(&self, new_revision: Revision) -> Result<Arc<Snapshot>> {
        let mut manager = self.writer.lock();
        manager.commit(&self.config.data_dir, new_revision)?;
        Ok(self.publish(&manager))
    }

    /// Commit staged roots as the revision after the current one
    pub fn commit_next(&self) -> Result<Arc<Snapshot>> {
        let mut manager = self.writer.lock();
        let next = manager.revision().checked_add(1).ok_or_else(|| {
            RevError::Logic("revision number space exhausted".to_string())
        })?;
        manager.commit(&self.config.data_dir, next)?;
        Ok(self.publish(&manager))
    }

    fn publish(&self, manager: &VersionManager) -> Arc<Snapshot> {
        let snapshot = Arc::new(manager.snapshot());
        *self.published.write() = Arc::clone(&snapshot);
        snapshot
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
