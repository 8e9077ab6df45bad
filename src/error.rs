//! Error types for the comparison engine
//!
//! This module defines all error types used throughout the crate,
//! one enum per concern, wrapped by the top-level [`Error`].

use std::path::PathBuf;
use thiserror::Error;

use crate::range::ExclusionRange;

/// Main error type for exe-compare
#[derive(Debug, Error)]
pub enum Error {
    /// Exclusion range validation errors
    #[error("Exclusion error: {0}")]
    Range(#[from] RangeError),

    /// File pair comparison errors
    #[error("Comparison error: {0}")]
    Compare(#[from] CompareError),

    /// Job description and batch errors
    #[error("Job error: {0}")]
    Job(#[from] JobError),
}

/// Exclusion range validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    /// Negative offset or non-positive size
    #[error("Invalid exclusion range (offset {offset}, size {size}): {reason}")]
    InvalidRange {
        offset: i64,
        size: i64,
        reason: &'static str,
    },

    /// Range extends past the end of the compared data
    #[error("Exclusion range out of file bounds: offset {offset} + size {size} exceeds {total_size} bytes")]
    OutOfBounds {
        offset: i64,
        size: i64,
        total_size: u64,
    },

    /// Two ranges start at the same offset
    #[error("Duplicate exclusion offset {offset:#X} ({offset})")]
    DuplicateOffset { offset: i64 },

    /// Two ranges intersect
    #[error("Exclusions overlap: {previous} and {current}")]
    OverlappingRanges {
        previous: ExclusionRange,
        current: ExclusionRange,
    },
}

/// File pair comparison errors
#[derive(Debug, Error)]
pub enum CompareError {
    /// Both sides resolve to the same file
    #[error("Same paths: \"{}\"", path.display())]
    IdenticalPaths { path: PathBuf },

    /// Files differ in length
    #[error("Size mismatch: {size_1} vs {size_2} bytes")]
    SizeMismatch { size_1: u64, size_2: u64 },

    /// First differing byte outside every exclusion
    #[error("Data block mismatch at {offset:#x} ({offset})")]
    ContentMismatch { offset: u64 },

    /// Effective exclusion set is invalid
    #[error(transparent)]
    Range(#[from] RangeError),

    /// Reading a file failed
    #[error("I/O error on \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Job description and batch driver errors
#[derive(Debug, Error)]
pub enum JobError {
    /// Script could not be read
    #[error("Cannot read script \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Script is not a valid job description
    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),

    /// Numeric field is neither an integer nor an integer literal
    #[error("Invalid integer literal: {value:?}")]
    InvalidNumber { value: String },

    /// The script lists no files
    #[error("Empty file list")]
    EmptyJobList,

    /// The same file name appears twice
    #[error("Duplicate file name: \"{name}\"")]
    DuplicateName { name: String },

    /// A file pair failed to compare
    #[error("File \"{name}\": {source}")]
    Compare {
        name: String,
        #[source]
        source: CompareError,
    },
}

/// Specialized result types for different modules
pub type RangeResult<T> = std::result::Result<T, RangeError>;
pub type CompareResult<T> = std::result::Result<T, CompareError>;
pub type JobResult<T> = std::result::Result<T, JobError>;
pub type Result<T> = std::result::Result<T, Error>;
