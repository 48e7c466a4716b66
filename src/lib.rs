//! # revstore
//!
//! Crash-safe revision files for a multi-table B-tree index:
//! - One small file per committed revision naming every table's root block
//! - Atomic commit via temp file → fsync → rename
//! - Recovery of the newest revision by directory scan
//! - Single-writer/multi-reader handle for the committed snapshot
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Table implementations                      │
//! │        (read committed roots, stage new roots)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Database / VersionManager                   │
//! │          (open_most_recent, create, commit)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Scanner   │          │   Format    │
//!   │ (file names)│          │  (codec)    │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod table;
pub mod format;
pub mod scanner;
pub mod version;
pub mod database;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CommitStage, Result, RevError};
pub use config::{Config, RecoveryPolicy};
pub use database::Database;
pub use table::{BlockNumber, Revision, Roots, Table, TABLE_COUNT};
pub use version::{Snapshot, VersionManager};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of revstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
