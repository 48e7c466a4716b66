//! Revision Format Module
//!
//! Binary layout of a revision file: the record that names, for one
//! revision, the root block of every table.
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ Header (32 bytes)                                        │
//! │   Magic (14) │ Format version: u16 BE (2) │ UUID (16)    │
//! ├──────────────────────────────────────────────────────────┤
//! │ Roots (variable)                                         │
//! │   [varint root 0][varint root 1] ... [varint root k]     │
//! │   k = last non-empty slot; empty slots before k are      │
//! │   stored as EMPTY_ROOT, trailing empty slots are omitted │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod record;
mod varint;
mod version;

pub use record::RevisionRecord;
pub use varint::{put_uvarint, read_uvarint, uvarint_len, MAX_VARINT_LEN};
pub use version::FormatVersion;

// =============================================================================
// Shared Constants
// =============================================================================

/// Magic bytes identifying a revstore revision file
pub const MAGIC: &[u8; MAGIC_LEN] = b"\x0f\x0dRevstore Rev";

pub const MAGIC_LEN: usize = 14;

/// Layout understood by this build
pub const FORMAT_VERSION: FormatVersion = FormatVersion::from_date(2024, 3, 11);

pub const UUID_LEN: usize = 16;

/// Header size: Magic (14) + Version (2) + UUID (16) = 32 bytes
pub const HEADER_SIZE: usize = MAGIC_LEN + 2 + UUID_LEN;
