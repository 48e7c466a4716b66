//! Table slots and root pointers
//!
//! The revision layer knows nothing about what lives inside a table. It only
//! stores, per table slot, the block number of that table's root as of a
//! revision, or nothing if the table has never been written.

use std::fmt;
use std::ops::{Index, IndexMut};

/// Revision number of a committed snapshot
pub type Revision = u32;

/// Address of a B-tree block
pub type BlockNumber = u32;

/// On-disk value for an empty slot. Never a valid block number.
pub const EMPTY_ROOT: u64 = BlockNumber::MAX as u64;

/// Number of table slots this build knows about
pub const TABLE_COUNT: usize = 7;

/// The tables of an index database, in on-disk slot order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    PostList = 0,
    Record = 1,
    TermList = 2,
    Position = 3,
    Value = 4,
    Spelling = 5,
    Synonym = 6,
}

impl Table {
    /// All tables in slot order
    pub const ALL: [Table; TABLE_COUNT] = [
        Table::PostList,
        Table::Record,
        Table::TermList,
        Table::Position,
        Table::Value,
        Table::Spelling,
        Table::Synonym,
    ];

    /// Slot index of this table
    pub fn slot(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Table::PostList => "postlist",
            Table::Record => "record",
            Table::TermList => "termlist",
            Table::Position => "position",
            Table::Value => "value",
            Table::Spelling => "spelling",
            Table::Synonym => "synonym",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Root pointer for every table slot
///
/// `None` means the table is empty. This is a plain value: the committed and
/// staged sets held by the version manager are two independent copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Roots {
    slots: [Option<BlockNumber>; TABLE_COUNT],
}

impl Roots {
    /// All tables empty
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_slots(slots: [Option<BlockNumber>; TABLE_COUNT]) -> Self {
        Self { slots }
    }

    pub fn get(&self, table: Table) -> Option<BlockNumber> {
        self.slots[table.slot()]
    }

    pub fn set(&mut self, table: Table, root: Option<BlockNumber>) {
        self.slots[table.slot()] = root;
    }

    pub fn slots(&self) -> &[Option<BlockNumber>; TABLE_COUNT] {
        &self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Number of leading slots that must be written: everything up to and
    /// including the last non-empty slot
    pub fn stored_len(&self) -> usize {
        self.slots
            .iter()
            .rposition(Option::is_some)
            .map_or(0, |last| last + 1)
    }

    /// Iterate `(table, root)` pairs in slot order
    pub fn iter(&self) -> impl Iterator<Item = (Table, Option<BlockNumber>)> + '_ {
        Table::ALL.iter().map(move |&t| (t, self.get(t)))
    }
}

impl Index<Table> for Roots {
    type Output = Option<BlockNumber>;

    fn index(&self, table: Table) -> &Self::Output {
        &self.slots[table.slot()]
    }
}

impl IndexMut<Table> for Roots {
    fn index_mut(&mut self, table: Table) -> &mut Self::Output {
        &mut self.slots[table.slot()]
    }
}
