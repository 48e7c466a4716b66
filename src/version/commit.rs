//! Durable revision file writes
//!
//! A new revision becomes visible only through a rename. The bytes go to a
//! temporary file first and are flushed to stable storage before the rename,
//! so a crash at any point leaves either the old newest revision or the new
//! one, never a partial file under a revision name.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{CommitStage, Result, RevError};
use crate::scanner::{revision_file_name, TEMP_FILE_NAME};
use crate::table::Revision;

/// Temporary file that is removed on drop unless it was renamed into place
struct TempFile {
    path: PathBuf,
    armed: bool,
}

impl TempFile {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    /// The file now lives under its final name; nothing to clean up
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(
                "Failed to remove temporary revision file {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

/// Write `data` as the revision file for `revision` in `dir`
///
/// Steps:
/// 1. Create or truncate `v.tmp`
/// 2. Write the record
/// 3. fsync (durability barrier)
/// 4. Close
/// 5. Rename to the revision name
/// 6. Optionally fsync the directory so the rename itself is durable
///
/// A failure in steps 1-5 removes the temporary file and leaves every
/// existing revision file untouched. Once the rename has happened the commit
/// has happened, so a failed directory sync is only logged.
pub(crate) fn write_revision_file(
    dir: &Path,
    revision: Revision,
    data: &[u8],
    sync_directory: bool,
) -> Result<PathBuf> {
    let tmp_path = dir.join(TEMP_FILE_NAME);
    let final_path = dir.join(revision_file_name(revision));

    let fail = |stage: CommitStage, path: &Path| {
        let path = path.to_path_buf();
        move |source| RevError::Durability { stage, path, source }
    };

    // Step 1: nothing to clean up if this fails
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&tmp_path)
        .map_err(fail(CommitStage::Open, &tmp_path))?;
    let mut guard = TempFile::new(tmp_path.clone());

    // Step 2
    file.write_all(data)
        .map_err(fail(CommitStage::Write, &tmp_path))?;

    // Step 3
    file.sync_all()
        .map_err(fail(CommitStage::Sync, &tmp_path))?;

    // Step 4: sync_all has already surfaced any deferred write error
    drop(file);

    // Step 5
    fs::rename(&tmp_path, &final_path)
        .map_err(fail(CommitStage::Rename, &tmp_path))?;
    guard.disarm();

    tracing::debug!(
        "Renamed {} to {}",
        tmp_path.display(),
        final_path.display()
    );

    // Step 6
    if sync_directory {
        if let Err(e) = sync_dir(dir) {
            tracing::warn!(
                "Revision {:08x} committed but syncing {} failed: {}",
                revision,
                dir.display(),
                e
            );
        }
    }

    Ok(final_path)
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}
