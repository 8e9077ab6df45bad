//! Detection of volatile header fields
//!
//! Locates the PE/COFF `TimeDateStamp` written by the linker so that it is
//! excluded automatically. This is a fixed-offset header walk, not a parser:
//! anything that does not look like a PE image yields no ranges.

use crate::range::ExclusionRange;

/// Location of the 32-bit offset of the PE signature in the DOS header
pub const PE_OFFSET_FIELD: usize = 0x3C;

/// PE signature, "PE\0\0"
pub const PE_SIGNATURE: [u8; 4] = *b"PE\0\0";

/// Size of the COFF file header that follows the signature
pub const COFF_HEADER_SIZE: usize = 20;

/// Offset of TimeDateStamp within the COFF header (after Machine and NumberOfSections)
pub const COFF_TIMESTAMP_OFFSET: usize = 4;

/// Size of the TimeDateStamp field
pub const TIMESTAMP_SIZE: usize = 4;

/// What a detected range contains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolatileKind {
    /// PE/COFF header TimeDateStamp
    CoffTimestamp,
}

/// Automatically detected exclusion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolatileRange {
    pub kind: VolatileKind,
    pub range: ExclusionRange,
}

fn read_u32_le(buffer: &[u8], offset: usize) -> Option<u32> {
    let bytes = buffer.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Find format-specific volatile fields in `buffer`.
///
/// Never fails: a buffer too short for the headers or without the PE
/// signature returns an empty vector.
pub fn detect_volatile_ranges(buffer: &[u8]) -> Vec<VolatileRange> {
    let pe_offset = match read_u32_le(buffer, PE_OFFSET_FIELD) {
        Some(value) => value as usize,
        None => return Vec::new(),
    };

    let coff_offset = match pe_offset.checked_add(PE_SIGNATURE.len()) {
        Some(offset) => offset,
        None => return Vec::new(),
    };

    match coff_offset.checked_add(COFF_HEADER_SIZE) {
        Some(end) if end <= buffer.len() => {}
        _ => return Vec::new(),
    }

    if buffer[pe_offset..coff_offset] != PE_SIGNATURE {
        return Vec::new();
    }

    let timestamp_offset = coff_offset + COFF_TIMESTAMP_OFFSET;
    log::debug!(
        "PE signature at {:#x}, COFF timestamp at {:#x}",
        pe_offset,
        timestamp_offset
    );

    vec![VolatileRange {
        kind: VolatileKind::CoffTimestamp,
        range: ExclusionRange::new(timestamp_offset as i64, TIMESTAMP_SIZE as i64),
    }]
}

/// Plain exclusion ranges of the detected fields
pub fn ranges(detected: &[VolatileRange]) -> Vec<ExclusionRange> {
    detected.iter().map(|volatile| volatile.range).collect()
}

/// Raw value of a detected timestamp field
pub fn timestamp_value(buffer: &[u8], volatile: &VolatileRange) -> Option<u32> {
    match volatile.kind {
        VolatileKind::CoffTimestamp => read_u32_le(buffer, volatile.range.offset as usize),
    }
}

/// Render a COFF timestamp (seconds since the Unix epoch) as a UTC date
#[cfg(feature = "diagnostics")]
pub fn format_timestamp(value: u32) -> String {
    match chrono::DateTime::from_timestamp(i64::from(value), 0) {
        Some(date) => date.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("{:#010x}", value),
    }
}

/// Render a COFF timestamp as its raw hex value
#[cfg(not(feature = "diagnostics"))]
pub fn format_timestamp(value: u32) -> String {
    format!("{:#010x}", value)
}
