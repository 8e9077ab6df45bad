//! # exe-compare
//!
//! Verifies that two builds of a program are byte-identical except within
//! declared exclusion ranges and the PE/COFF build timestamp, which is
//! detected automatically.
//!
//! ```no_run
//! use exe_compare::{compare, CompareConfig, ExclusionRange};
//! use std::path::Path;
//!
//! let exclusions = [ExclusionRange::new(0x120, 16)];
//! let comparison = compare(
//!     Path::new("build-a/game.exe"),
//!     Path::new("build-b/game.exe"),
//!     &exclusions,
//!     &CompareConfig::default(),
//! )?;
//! println!("{} bytes compared", comparison.compared_bytes);
//! # Ok::<(), exe_compare::CompareError>(())
//! ```

pub mod comparator;
pub mod config;
pub mod error;
pub mod job;
pub mod range;
pub mod runner;
pub mod sniffer;

#[cfg(test)]
mod tests;

pub use comparator::{compare, compare_buffers, Comparison};
pub use config::CompareConfig;
pub use error::{CompareError, Error, JobError, RangeError, Result};
pub use job::{FileEntry, JobScript};
pub use range::{validate, ExclusionRange};
pub use runner::{run, run_script, RunSummary};
pub use sniffer::{detect_volatile_ranges, VolatileKind, VolatileRange};
