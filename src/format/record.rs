//! Revision record encoding
//!
//! Maps one snapshot record to and from bytes. Pure: no I/O, no shared state.

use bytes::{BufMut, Bytes, BytesMut};
use uuid::Uuid;

use crate::error::{Result, RevError};
use crate::table::{BlockNumber, Roots, EMPTY_ROOT, TABLE_COUNT};

use super::varint::{put_uvarint, read_uvarint, uvarint_len};
use super::{FormatVersion, FORMAT_VERSION, HEADER_SIZE, MAGIC, MAGIC_LEN, UUID_LEN};

/// The contents of one revision file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevisionRecord {
    /// Identity of the database lineage
    pub uuid: Uuid,
    /// Root block of each table as of this revision
    pub roots: Roots,
}

impl RevisionRecord {
    pub fn new(uuid: Uuid, roots: Roots) -> Self {
        Self { uuid, roots }
    }

    /// Encode to the on-disk layout
    ///
    /// Trailing empty slots are left out; empty slots before the last
    /// non-empty one are written as `EMPTY_ROOT`. A root equal to
    /// `EMPTY_ROOT` can't be stored and is a logic error.
    pub fn encode(&self) -> Result<Bytes> {
        if let Some((table, _)) = self
            .roots
            .iter()
            .find(|(_, root)| root.map(u64::from) == Some(EMPTY_ROOT))
        {
            return Err(RevError::Logic(format!(
                "{} root {} is reserved for empty tables",
                table, EMPTY_ROOT
            )));
        }

        let stored = &self.roots.slots()[..self.roots.stored_len()];
        let roots_len: usize = stored.iter().map(|r| uvarint_len(slot_value(*r))).sum();

        let mut buf = BytesMut::with_capacity(HEADER_SIZE + roots_len);
        buf.put_slice(MAGIC);
        buf.put_slice(&FORMAT_VERSION.to_be_bytes());
        buf.put_slice(self.uuid.as_bytes());
        for root in stored {
            put_uvarint(&mut buf, slot_value(*root));
        }
        Ok(buf.freeze())
    }

    /// Decode a revision file's contents
    ///
    /// Fewer stored roots than `TABLE_COUNT` is an older, shorter record and
    /// the missing tables are empty. Anything after the last slot is junk.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(RevError::corrupt(format!(
                "file is {} bytes, shorter than the {} byte header",
                data.len(),
                HEADER_SIZE
            )));
        }

        if &data[..MAGIC_LEN] != MAGIC {
            return Err(RevError::corrupt("magic incorrect"));
        }

        let found = FormatVersion::from_be_bytes([data[MAGIC_LEN], data[MAGIC_LEN + 1]]);
        if found != FORMAT_VERSION {
            return Err(RevError::VersionMismatch {
                path: None,
                found,
                expected: FORMAT_VERSION,
            });
        }

        let uuid_start = MAGIC_LEN + 2;
        let mut uuid_bytes = [0u8; UUID_LEN];
        uuid_bytes.copy_from_slice(&data[uuid_start..uuid_start + UUID_LEN]);
        let uuid = Uuid::from_bytes(uuid_bytes);

        let mut rest = &data[HEADER_SIZE..];
        let mut slots = [None; TABLE_COUNT];
        for slot in slots.iter_mut() {
            if rest.is_empty() {
                break;
            }
            let (value, used) = read_uvarint(rest)
                .ok_or_else(|| RevError::corrupt("bad table roots"))?;
            *slot = root_from_value(value)?;
            rest = &rest[used..];
        }

        if !rest.is_empty() {
            return Err(RevError::corrupt(format!(
                "{} bytes of junk at end",
                rest.len()
            )));
        }

        Ok(Self {
            uuid,
            roots: Roots::from_slots(slots),
        })
    }
}

fn slot_value(root: Option<BlockNumber>) -> u64 {
    root.map_or(EMPTY_ROOT, u64::from)
}

fn root_from_value(value: u64) -> Result<Option<BlockNumber>> {
    if value == EMPTY_ROOT {
        return Ok(None);
    }
    BlockNumber::try_from(value)
        .map(Some)
        .map_err(|_| RevError::corrupt(format!("table root {} out of range", value)))
}
