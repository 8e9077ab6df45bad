//! Exclusion-aware byte comparison of two files
//!
//! The comparator checks structural preconditions first (distinct paths,
//! equal sizes, a valid exclusion set) and only then scans the bytes that
//! lie between exclusions. The first differing byte fails the comparison.

use std::env;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::config::CompareConfig;
use crate::error::{CompareError, CompareResult};
use crate::range::{self, ExclusionRange};
use crate::runner::normalize_path;
use crate::sniffer::{self, VolatileRange};

/// Successful comparison of one file pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// Common size of both files in bytes
    pub size: u64,
    /// Effective exclusion set, sorted by offset
    pub exclusions: Vec<ExclusionRange>,
    /// Ranges added by the format sniffer
    pub detected: Vec<VolatileRange>,
    /// Bytes compared for equality
    pub compared_bytes: u64,
    /// Bytes skipped
    pub excluded_bytes: u64,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> CompareError + '_ {
    move |source| CompareError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Resolve symlinks when the file exists, otherwise normalise the absolute
/// path lexically so a missing file can still be matched against itself
fn resolve(path: &Path) -> CompareResult<PathBuf> {
    if let Ok(resolved) = fs::canonicalize(path) {
        return Ok(resolved);
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir().map_err(io_error(path))?.join(path)
    };

    Ok(normalize_path(&absolute))
}

/// Buffer capacity for a file of `size` bytes
pub(crate) fn capacity(path: &Path, size: u64) -> CompareResult<usize> {
    usize::try_from(size).map_err(|_| CompareError::Io {
        path: path.to_path_buf(),
        source: io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} bytes do not fit in memory", size),
        ),
    })
}

fn load_file(path: &Path, size: u64) -> CompareResult<Vec<u8>> {
    let file = File::open(path).map_err(io_error(path))?;
    let mut data = Vec::with_capacity(capacity(path, size)?);
    file.take(size)
        .read_to_end(&mut data)
        .map_err(io_error(path))?;

    // the file shrank between measuring and reading
    if data.len() as u64 != size {
        return Err(CompareError::SizeMismatch {
            size_1: size,
            size_2: data.len() as u64,
        });
    }

    Ok(data)
}

/// Compare two files, skipping `exclusions` and any detected volatile fields.
///
/// Fails with `IdenticalPaths` when both paths resolve to the same file, even
/// a missing one, and with `SizeMismatch` when the lengths differ, before
/// either file is read.
pub fn compare(
    path_1: &Path,
    path_2: &Path,
    exclusions: &[ExclusionRange],
    config: &CompareConfig,
) -> CompareResult<Comparison> {
    let resolved_1 = resolve(path_1)?;
    let resolved_2 = resolve(path_2)?;

    if resolved_1 == resolved_2 {
        return Err(CompareError::IdenticalPaths { path: resolved_1 });
    }

    let size_1 = fs::metadata(&resolved_1).map_err(io_error(&resolved_1))?.len();
    let size_2 = fs::metadata(&resolved_2).map_err(io_error(&resolved_2))?.len();

    if size_1 != size_2 {
        return Err(CompareError::SizeMismatch { size_1, size_2 });
    }

    let data_1 = load_file(&resolved_1, size_1)?;
    let data_2 = load_file(&resolved_2, size_1)?;

    compare_buffers(&data_1, &data_2, exclusions, config)
}

/// Compare two in-memory buffers of equal length.
///
/// The sniffer runs on `data_1`; its ranges are merged ahead of the caller's
/// exclusions and the union is validated before any byte is compared.
pub fn compare_buffers(
    data_1: &[u8],
    data_2: &[u8],
    exclusions: &[ExclusionRange],
    config: &CompareConfig,
) -> CompareResult<Comparison> {
    if data_1.len() != data_2.len() {
        return Err(CompareError::SizeMismatch {
            size_1: data_1.len() as u64,
            size_2: data_2.len() as u64,
        });
    }

    let size = data_1.len() as u64;

    let found = sniffer::detect_volatile_ranges(data_1);
    let detected = if config.detect_volatile_ranges {
        found
    } else {
        if !found.is_empty() {
            log::warn!("PE header found but automatic exclusions are disabled");
        }
        Vec::new()
    };

    for volatile in &detected {
        let value_1 = sniffer::timestamp_value(data_1, volatile);
        let value_2 = sniffer::timestamp_value(data_2, volatile);
        if let (Some(value_1), Some(value_2)) = (value_1, value_2) {
            log::debug!(
                "{:?} at {}: {} vs {}",
                volatile.kind,
                volatile.range,
                sniffer::format_timestamp(value_1),
                sniffer::format_timestamp(value_2)
            );
        }
    }

    let mut merged = sniffer::ranges(&detected);
    merged.extend_from_slice(exclusions);
    range::validate(&mut merged, size)?;
    log::debug!("{} exclusion(s) over {} bytes", merged.len(), size);

    scan(data_1, data_2, &merged)?;

    let excluded_bytes = range::covered_bytes(&merged);

    Ok(Comparison {
        size,
        compared_bytes: size - excluded_bytes,
        excluded_bytes,
        exclusions: merged,
        detected,
    })
}

/// Offset of the first differing byte of two equal-length slices
fn first_mismatch(slice_1: &[u8], slice_2: &[u8]) -> Option<usize> {
    slice_1
        .iter()
        .zip(slice_2)
        .position(|(byte_1, byte_2)| byte_1 != byte_2)
}

/// Compare the gaps between sorted exclusions.
///
/// Each gap runs from the cursor to the next exclusion's offset; after the
/// last exclusion a final gap runs to the end of the data. Ranges with a
/// negative offset, a non-positive size or past the end of the data are
/// rejected before any byte is compared.
pub fn scan(data_1: &[u8], data_2: &[u8], exclusions: &[ExclusionRange]) -> CompareResult<()> {
    let end = data_1.len().min(data_2.len());
    for exclusion in exclusions {
        exclusion.check(end as u64)?;
    }

    let gap_ends = exclusions
        .iter()
        .map(|exclusion| (exclusion.offset as usize, exclusion.end() as usize))
        .chain(std::iter::once((end, end)));

    let mut cursor = 0usize;

    for (gap_end, resume) in gap_ends {
        if gap_end > cursor {
            log::trace!("comparing [{:#x}, {:#x})", cursor, gap_end);
            if let Some(index) = first_mismatch(&data_1[cursor..gap_end], &data_2[cursor..gap_end]) {
                return Err(CompareError::ContentMismatch {
                    offset: (cursor + index) as u64,
                });
            }
        }
        cursor = resume;
    }

    Ok(())
}
