//! Exclusion ranges and their validation
//!
//! An exclusion range is a half-open byte interval `[offset, offset + size)`
//! skipped during comparison. Ranges come from the job description or from
//! the format sniffer and are validated as one set against the file size.

use std::fmt;

use serde::Deserialize;

use crate::error::{RangeError, RangeResult};
use crate::job::deserialize_int;

/// Byte interval excluded from comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct ExclusionRange {
    /// First excluded byte
    #[serde(deserialize_with = "deserialize_int")]
    pub offset: i64,
    /// Number of excluded bytes
    #[serde(deserialize_with = "deserialize_int")]
    pub size: i64,
}

impl ExclusionRange {
    pub const fn new(offset: i64, size: i64) -> Self {
        Self { offset, size }
    }

    /// One past the last excluded byte, with negative fields read as zero
    pub fn end(&self) -> u64 {
        (self.offset.max(0) as u64).saturating_add(self.size.max(0) as u64)
    }

    /// Check the constraints that apply to a single range
    pub(crate) fn check(&self, total_size: u64) -> RangeResult<()> {
        if self.offset < 0 {
            return Err(RangeError::InvalidRange {
                offset: self.offset,
                size: self.size,
                reason: "negative offset",
            });
        }

        if self.size <= 0 {
            return Err(RangeError::InvalidRange {
                offset: self.offset,
                size: self.size,
                reason: "non-positive size",
            });
        }

        if self.end() > total_size {
            return Err(RangeError::OutOfBounds {
                offset: self.offset,
                size: self.size,
                total_size,
            });
        }

        Ok(())
    }
}

impl fmt::Display for ExclusionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:#x}; {}]", self.offset, self.size)
    }
}

/// Sort `ranges` by offset and check them against `total_size`.
///
/// Each range must have a non-negative offset, a positive size and lie within
/// `[0, total_size)`. No two ranges may share an offset or intersect. On
/// success the slice is left sorted, which the comparator's scan relies on.
/// On failure the slice is sorted but must not be used.
pub fn validate(ranges: &mut [ExclusionRange], total_size: u64) -> RangeResult<()> {
    if ranges.is_empty() {
        return Ok(());
    }

    ranges.sort_by_key(|range| range.offset);

    let mut previous: Option<&ExclusionRange> = None;

    for current in ranges.iter() {
        current.check(total_size)?;

        if let Some(previous) = previous {
            if current.offset == previous.offset {
                return Err(RangeError::DuplicateOffset {
                    offset: current.offset,
                });
            }

            if current.offset > previous.offset && (current.offset as u64) < previous.end() {
                return Err(RangeError::OverlappingRanges {
                    previous: *previous,
                    current: *current,
                });
            }
        }

        previous = Some(current);
    }

    Ok(())
}

/// Total number of bytes covered by a validated range set
pub fn covered_bytes(ranges: &[ExclusionRange]) -> u64 {
    ranges.iter().map(|range| range.size.max(0) as u64).sum()
}
