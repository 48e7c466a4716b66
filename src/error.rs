//! Error types for revstore
//!
//! One enum covers every failure the revision layer can report. The variants
//! map one-to-one onto the failure kinds callers need to tell apart:
//! opening, corruption, format version, logic, and durability.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::format::FormatVersion;

/// Result type alias using RevError
pub type Result<T> = std::result::Result<T, RevError>;

/// Unified error type for revstore operations
#[derive(Debug, Error)]
pub enum RevError {
    // -------------------------------------------------------------------------
    // Opening Errors
    // -------------------------------------------------------------------------
    /// A directory could not be listed or a revision file could not be opened
    #[error("Couldn't open {}: {source}", .path.display())]
    Opening {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // -------------------------------------------------------------------------
    // Format Errors
    // -------------------------------------------------------------------------
    /// Bad magic, unreadable roots, or junk after the last root
    #[error("{}Revision file corrupt: {reason}", display_prefix(.path))]
    Corrupt {
        path: Option<PathBuf>,
        reason: String,
    },

    /// The file was written by a build with a different on-disk layout
    #[error(
        "{}Database is format version {found} but I only understand {expected}",
        display_prefix(.path)
    )]
    VersionMismatch {
        path: Option<PathBuf>,
        found: FormatVersion,
        expected: FormatVersion,
    },

    // -------------------------------------------------------------------------
    // Caller Errors
    // -------------------------------------------------------------------------
    /// Programming error upstream, e.g. a commit that goes backwards
    #[error("Logic error: {0}")]
    Logic(String),

    // -------------------------------------------------------------------------
    // Durability Errors
    // -------------------------------------------------------------------------
    /// A commit step failed; the previous revision is still authoritative
    #[error("Commit failed while trying to {stage} {}: {source}", .path.display())]
    Durability {
        stage: CommitStage,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// The step of the commit protocol that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStage {
    /// Creating or truncating the temporary file
    Open,
    /// Writing the encoded record
    Write,
    /// Flushing the temporary file to stable storage
    Sync,
    /// Renaming the temporary file to its revision name
    Rename,
}

impl fmt::Display for CommitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            CommitStage::Open => "open",
            CommitStage::Write => "write",
            CommitStage::Sync => "sync",
            CommitStage::Rename => "rename",
        };
        f.write_str(verb)
    }
}

impl RevError {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        RevError::Corrupt {
            path: None,
            reason: reason.into(),
        }
    }

    /// Attach the offending file path to a format error
    pub(crate) fn with_path(self, file: impl Into<PathBuf>) -> Self {
        match self {
            RevError::Corrupt { path: None, reason } => RevError::Corrupt {
                path: Some(file.into()),
                reason,
            },
            RevError::VersionMismatch {
                path: None,
                found,
                expected,
            } => RevError::VersionMismatch {
                path: Some(file.into()),
                found,
                expected,
            },
            other => other,
        }
    }

    /// True for magic mismatch, bad roots or trailing junk
    pub fn is_corrupt(&self) -> bool {
        matches!(self, RevError::Corrupt { .. })
    }

    pub fn is_version_mismatch(&self) -> bool {
        matches!(self, RevError::VersionMismatch { .. })
    }

    pub fn is_durability_failure(&self) -> bool {
        matches!(self, RevError::Durability { .. })
    }

    /// Errors describing the contents of a file rather than access to it
    pub fn is_format_error(&self) -> bool {
        self.is_corrupt() || self.is_version_mismatch()
    }
}

fn display_prefix(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!("{}: ", p.display()),
        None => String::new(),
    }
}
