//! Version Manager
//!
//! Holds the committed revision and roots plus a staged set of roots that
//! table code mutates between commits.

use std::fs;
use std::path::Path;

use uuid::Uuid;

use crate::config::{Config, RecoveryPolicy};
use crate::error::{Result, RevError};
use crate::format::RevisionRecord;
use crate::scanner::{self, RevisionFile};
use crate::table::{BlockNumber, Revision, Roots, Table};

use super::commit::write_revision_file;
use super::Snapshot;

/// Committed and staged revision state for one database directory
///
/// ## Ownership:
/// - `committed`: roots as of `revision`, only replaced by a successful commit
/// - `staged`: an independent copy, changed freely between commits
///
/// Single writer: mutating methods take `&mut self`. Wrap the manager in
/// [`crate::Database`] to share it between threads.
#[derive(Debug, Clone)]
pub struct VersionManager {
    /// Last committed revision
    revision: Revision,

    /// Database identity, nil until opened or created
    uuid: Uuid,

    /// Roots as of `revision`
    committed: Roots,

    /// Roots the next commit will write
    staged: Roots,

    recovery_policy: RecoveryPolicy,
    sync_directory: bool,
}

impl Default for VersionManager {
    fn default() -> Self {
        Self::with_config(&Config::default())
    }
}

impl VersionManager {
    /// Empty state: revision 0, nil UUID, all tables empty
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty state using the recovery and durability options from `config`
    pub fn with_config(config: &Config) -> Self {
        Self {
            revision: 0,
            uuid: Uuid::nil(),
            committed: Roots::empty(),
            staged: Roots::empty(),
            recovery_policy: config.recovery_policy,
            sync_directory: config.sync_directory,
        }
    }

    // =========================================================================
    // Recovery
    // =========================================================================

    /// Load the newest revision in `dir`
    ///
    /// With no revision files the state is reset to an empty database at
    /// revision 0. A newest file that fails to decode is an error under
    /// `RecoveryPolicy::Strict`; older revisions are not consulted.
    pub fn open_most_recent(&mut self, dir: &Path) -> Result<()> {
        match self.recovery_policy {
            RecoveryPolicy::Strict => match scanner::find_latest(dir)? {
                Some(file) => self.open_file(&file),
                None => {
                    self.reset_empty();
                    Ok(())
                }
            },
            RecoveryPolicy::FallBackToOlder => self.open_newest_readable(dir),
        }
    }

    /// Walk revisions newest first, skipping ones with bad contents
    fn open_newest_readable(&mut self, dir: &Path) -> Result<()> {
        let revisions = scanner::list_revisions(dir)?;
        if revisions.is_empty() {
            self.reset_empty();
            return Ok(());
        }

        let mut first_error = None;
        for file in revisions.iter().rev() {
            match self.open_file(file) {
                Ok(()) => {
                    if let Some(e) = &first_error {
                        tracing::warn!(
                            "Recovered older revision {:08x} after: {}",
                            file.revision,
                            e
                        );
                    }
                    return Ok(());
                }
                Err(e) if e.is_format_error() => {
                    tracing::warn!("Skipping unreadable revision file: {}", e);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
                Err(e) => return Err(e),
            }
        }

        // Non-empty list, every entry failed with a format error
        Err(first_error.unwrap_or_else(|| RevError::corrupt("no readable revision")))
    }

    fn open_file(&mut self, file: &RevisionFile) -> Result<()> {
        let record = read_record(&file.path)?;

        self.revision = file.revision;
        self.uuid = record.uuid;
        self.committed = record.roots;
        self.staged = record.roots;

        tracing::info!(
            "Opened revision {:08x} of database {}",
            self.revision,
            self.uuid
        );
        Ok(())
    }

    fn reset_empty(&mut self) {
        self.revision = 0;
        self.uuid = Uuid::nil();
        self.committed = Roots::empty();
        self.staged = Roots::empty();
    }

    // =========================================================================
    // Commit
    // =========================================================================

    /// Start a brand-new database in `dir`
    ///
    /// Generates a fresh identity and commits all-empty roots at the current
    /// revision. `dir` must not already hold revision files; that is not
    /// checked here.
    pub fn create(&mut self, dir: &Path) -> Result<()> {
        let uuid = Uuid::new_v4();

        tracing::info!("Creating database {} in {}", uuid, dir.display());
        self.commit_record(dir, self.revision, uuid, Roots::empty())?;
        self.staged = Roots::empty();
        Ok(())
    }

    /// Durably write the staged roots as `new_revision`
    ///
    /// On error the committed state is unchanged and no existing revision
    /// file has been touched. The staged roots are kept so the caller can
    /// retry or `discard_staged`.
    pub fn commit(&mut self, dir: &Path, new_revision: Revision) -> Result<()> {
        self.commit_record(dir, new_revision, self.uuid, self.staged)
    }

    /// Write `uuid` and `roots` as `new_revision` and adopt them only once
    /// the file is in place
    fn commit_record(
        &mut self,
        dir: &Path,
        new_revision: Revision,
        uuid: Uuid,
        roots: Roots,
    ) -> Result<()> {
        if new_revision < self.revision {
            return Err(RevError::Logic(format!(
                "New revision {} < old revision {}",
                new_revision, self.revision
            )));
        }

        let data = RevisionRecord::new(uuid, roots).encode()?;

        tracing::debug!(
            "Committing revision {:08x} ({} bytes) in {}",
            new_revision,
            data.len(),
            dir.display()
        );

        write_revision_file(dir, new_revision, &data, self.sync_directory)?;

        self.revision = new_revision;
        self.uuid = uuid;
        self.committed = roots;

        tracing::info!("Committed revision {:08x}", new_revision);
        Ok(())
    }

    // =========================================================================
    // Staged Roots
    // =========================================================================

    /// Set the root a table will have after the next commit
    pub fn set_root(&mut self, table: Table, root: Option<BlockNumber>) {
        self.staged.set(table, root);
    }

    /// Root a table will have after the next commit
    pub fn staged_root(&self, table: Table) -> Option<BlockNumber> {
        self.staged.get(table)
    }

    pub fn staged_roots(&self) -> &Roots {
        &self.staged
    }

    /// Drop uncommitted changes
    pub fn discard_staged(&mut self) {
        self.staged = self.committed;
    }

    // =========================================================================
    // Committed State
    // =========================================================================

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Committed root of a table
    pub fn root(&self, table: Table) -> Option<BlockNumber> {
        self.committed.get(table)
    }

    pub fn committed_roots(&self) -> &Roots {
        &self.committed
    }

    /// Copy of the committed state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            revision: self.revision,
            uuid: self.uuid,
            roots: self.committed,
        }
    }
}

/// Read and decode one revision file
pub fn read_record(path: &Path) -> Result<RevisionRecord> {
    let data = fs::read(path).map_err(|source| RevError::Opening {
        path: path.to_path_buf(),
        source,
    })?;
    RevisionRecord::decode(&data).map_err(|e| e.with_path(path))
}
