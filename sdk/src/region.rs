//! Byte ranges of a watched account captured on every update

use crate::SdkError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// `len` bytes of the watched account starting at `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRegion {
    pub offset: u32,
    pub len: u32,
}

impl DataRegion {
    pub fn new(offset: u32, len: u32) -> Self {
        Self { offset, len }
    }

    pub fn as_pair(&self) -> (u32, u32) {
        (self.offset, self.len)
    }

    /// Pairs in the form the program instruction expects.
    pub fn to_pairs(regions: &[DataRegion]) -> Vec<(u32, u32)> {
        regions.iter().map(DataRegion::as_pair).collect()
    }
}

impl From<(u32, u32)> for DataRegion {
    fn from((offset, len): (u32, u32)) -> Self {
        Self { offset, len }
    }
}

impl fmt::Display for DataRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.offset, self.len)
    }
}

impl FromStr for DataRegion {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SdkError::InvalidDataRegion(s.to_string());
        let (offset, len) = s.split_once(':').ok_or_else(invalid)?;
        let offset = offset.trim().parse().map_err(|_| invalid())?;
        let len: u32 = len.trim().parse().map_err(|_| invalid())?;
        if len == 0 {
            return Err(invalid());
        }
        Ok(Self { offset, len })
    }
}
