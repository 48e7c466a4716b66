//! Version Module
//!
//! Commit and recovery of table roots.
//!
//! ## Responsibilities
//! - Recover the newest revision from a directory on open
//! - Bootstrap a new database identity
//! - Commit staged roots with temp file → fsync → rename
//!
//! ## Commit States
//! ```text
//! STAGED ──► WRITING_TEMP ──► SYNCING ──► RENAMING ──► COMMITTED
//!    │            │              │            │
//!    └────────────┴──────────────┴────────────┴──► FAILED
//!                    (temp file removed, committed state unchanged)
//! ```
//! Once the rename has completed the commit cannot fail.

mod commit;
mod manager;

use uuid::Uuid;

use crate::table::{BlockNumber, Revision, Roots, Table};

pub use manager::{read_record, VersionManager};

/// Committed state of a database as of one revision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub revision: Revision,
    pub uuid: Uuid,
    pub roots: Roots,
}

impl Snapshot {
    pub fn root(&self, table: Table) -> Option<BlockNumber> {
        self.roots.get(table)
    }
}
