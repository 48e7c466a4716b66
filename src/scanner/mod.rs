//! Snapshot Directory Scanner
//!
//! Finds revision files by name alone. There is no index of which revision
//! is newest: the set of file names in the directory is the index.
//!
//! ## Responsibilities
//! - List a database directory
//! - Accept only names of the form `v` + 8 lowercase hex digits
//! - Pick the greatest revision without opening any file
//!
//! Content validation is left to the caller, which decodes the chosen file.

mod name;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, RevError};
use crate::table::Revision;

pub use name::{
    parse_revision_file_name, revision_file_name, REVISION_DIGITS, REVISION_PREFIX,
    TEMP_FILE_NAME,
};

/// A file in the database directory whose name looks like a revision file
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RevisionFile {
    pub revision: Revision,
    pub path: PathBuf,
}

impl RevisionFile {
    pub fn new(dir: &Path, revision: Revision) -> Self {
        Self {
            revision,
            path: dir.join(revision_file_name(revision)),
        }
    }
}

/// Find the newest revision file in `dir`
///
/// Returns `Ok(None)` when there is no candidate, which callers treat as a
/// new, empty database.
pub fn find_latest(dir: &Path) -> Result<Option<RevisionFile>> {
    let mut newest: Option<Revision> = None;
    for revision in candidates(dir)? {
        if newest.map_or(true, |n| revision > n) {
            newest = Some(revision);
        }
    }

    let latest = newest.map(|rev| RevisionFile::new(dir, rev));
    match &latest {
        Some(file) => tracing::debug!("Newest revision file in {}: {}", dir.display(), file.path.display()),
        None => tracing::debug!("No revision files in {}", dir.display()),
    }
    Ok(latest)
}

/// All revision files in `dir`, oldest first
pub fn list_revisions(dir: &Path) -> Result<Vec<RevisionFile>> {
    let mut revisions = candidates(dir)?;
    revisions.sort_unstable();
    Ok(revisions
        .into_iter()
        .map(|rev| RevisionFile::new(dir, rev))
        .collect())
}

/// Revisions of every well-named entry in `dir`, in directory order
fn candidates(dir: &Path) -> Result<Vec<Revision>> {
    let opening = |source| RevError::Opening {
        path: dir.to_path_buf(),
        source,
    };

    let mut revisions = Vec::new();
    for entry in fs::read_dir(dir).map_err(opening)? {
        let entry = entry.map_err(opening)?;
        let name = entry.file_name();

        // Non UTF-8 names can't match the pattern
        let Some(name) = name.to_str() else {
            continue;
        };

        if let Some(rev) = parse_revision_file_name(name) {
            revisions.push(rev);
        }
    }
    Ok(revisions)
}
