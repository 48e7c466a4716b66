//! Format version tags
//!
//! A format version is the date the on-disk layout last changed, packed into
//! 16 bits as days since 2010-01-01 on a 31-day-month, 12-month-year
//! calendar. Dates up to 2186 fit. The packing keeps versions ordered and
//! lets error messages print them as `YYYYMMDD`.

use std::fmt;

const BASE_YEAR: u16 = 2010;

/// Identifies exactly one physical layout of the revision file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormatVersion(u16);

impl FormatVersion {
    /// Pack a calendar date. `month` and `day` are 1-based.
    pub const fn from_date(year: u16, month: u16, day: u16) -> Self {
        FormatVersion(((year - BASE_YEAR) * 12 + (month - 1)) * 31 + (day - 1))
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    pub fn year(self) -> u16 {
        self.0 / 31 / 12 + BASE_YEAR
    }

    pub fn month(self) -> u16 {
        self.0 / 31 % 12 + 1
    }

    pub fn day(self) -> u16 {
        self.0 % 31 + 1
    }

    pub fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    pub fn from_be_bytes(bytes: [u8; 2]) -> Self {
        FormatVersion(u16::from_be_bytes(bytes))
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year(), self.month(), self.day())
    }
}
