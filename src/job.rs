//! Job description loading
//!
//! A job script names two base directories and the files to compare between
//! them. Offsets and sizes may be written as JSON integers or as strings
//! holding an integer literal such as `"0x3C"`; both are normalised to `i64`
//! while the script is parsed.
//!
//! ```json
//! {
//!     "dir_1": "build-a",
//!     "dir_2": "build-b",
//!     "files": [
//!         { "name": "game.exe", "exclusions": [{ "offset": "0x120", "size": 16 }] }
//!     ]
//! }
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

use crate::error::{JobError, JobResult};
use crate::range::ExclusionRange;

/// Whole job description
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobScript {
    /// Base directory of the first file set
    pub dir_1: PathBuf,
    /// Base directory of the second file set
    pub dir_2: PathBuf,
    /// File pairs, compared in order
    pub files: Vec<FileEntry>,
}

/// One file present under both base directories
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileEntry {
    /// Path relative to each base directory
    pub name: String,
    /// Caller-declared ranges to skip
    #[serde(default)]
    pub exclusions: Vec<ExclusionRange>,
}

impl JobScript {
    /// Parse a job description from JSON text
    pub fn from_json(text: &str) -> JobResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a job description file
    pub fn load(path: &Path) -> JobResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| JobError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}

fn split_prefix(digits: &str) -> (u32, &str) {
    let bytes = digits.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'0' {
        match bytes[1] {
            b'x' | b'X' => return (16, &digits[2..]),
            b'o' | b'O' => return (8, &digits[2..]),
            b'b' | b'B' => return (2, &digits[2..]),
            _ => {}
        }
    }
    (10, digits)
}

/// Parse an integer literal with an optional sign and base prefix.
///
/// Accepts `0x`, `0o` and `0b` prefixes in either case and single
/// underscores between digits (a prefix may be followed by one). Decimal
/// literals may not have leading zeros unless every digit is zero.
pub fn parse_int_literal(text: &str) -> JobResult<i64> {
    let invalid = || JobError::InvalidNumber {
        value: text.to_string(),
    };

    let trimmed = text.trim();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, body) = split_prefix(unsigned);
    let body = if radix != 10 {
        body.strip_prefix('_').unwrap_or(body)
    } else {
        body
    };

    if body.is_empty() || body.starts_with('_') || body.ends_with('_') || body.contains("__") {
        return Err(invalid());
    }

    let digits: String = body.chars().filter(|&c| c != '_').collect();

    if radix == 10 && digits.len() > 1 && digits.starts_with('0') && digits.bytes().any(|b| b != b'0') {
        return Err(invalid());
    }

    // from_str_radix would accept a second sign inside the digits
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(invalid());
    }

    let magnitude = i128::from_str_radix(&digits, radix).map_err(|_| invalid())?;
    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).map_err(|_| invalid())
}

struct IntVisitor;

impl<'de> Visitor<'de> for IntVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer or a string holding an integer literal")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
        Ok(value)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
        i64::try_from(value).map_err(|_| E::custom(format!("integer {} is too large", value)))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<i64, E> {
        parse_int_literal(value).map_err(E::custom)
    }
}

/// Deserialize an integer given natively or as an integer literal string
pub fn deserialize_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(IntVisitor)
}
