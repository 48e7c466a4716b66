//! Revision file names
//!
//! `v` followed by exactly eight lowercase hex digits. The fixed width makes
//! byte-wise name order the same as numeric revision order.

use crate::table::Revision;

/// Leading character of every revision file name
pub const REVISION_PREFIX: char = 'v';

/// Hex digits after the prefix
pub const REVISION_DIGITS: usize = 8;

/// Name of the file a commit writes before renaming it into place.
/// Never matches the revision file pattern.
pub const TEMP_FILE_NAME: &str = "v.tmp";

/// File name for `revision`: 26 → "v0000001a"
pub fn revision_file_name(revision: Revision) -> String {
    format!("{}{:08x}", REVISION_PREFIX, revision)
}

/// Parse a revision file name back to its revision
///
/// Returns `None` for anything that is not exactly the prefix plus eight
/// lowercase hex digits.
pub fn parse_revision_file_name(name: &str) -> Option<Revision> {
    let digits = name.strip_prefix(REVISION_PREFIX)?;
    if digits.len() != REVISION_DIGITS || !digits.bytes().all(is_lower_hex) {
        return None;
    }
    Revision::from_str_radix(digits, 16).ok()
}

fn is_lower_hex(b: u8) -> bool {
    b.is_ascii_digit() || (b'a'..=b'f').contains(&b)
}
