//! Batch driver for job scripts
//!
//! Runs every file pair of a [`JobScript`] in order and stops at the first
//! failure. Progress is written to a caller-supplied sink so the binary can
//! print to stdout while tests capture it.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use crate::comparator::{self, Comparison};
use crate::config::CompareConfig;
use crate::error::{JobError, JobResult};
use crate::job::JobScript;

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Normalised first base directory
    pub dir_1: PathBuf,
    /// Normalised second base directory
    pub dir_2: PathBuf,
    /// Comparison of each file, in script order
    pub files: Vec<(String, Comparison)>,
}

/// Lexically normalise a path: drop `.` components, fold `..` into the
/// preceding normal component and collapse repeated separators.
///
/// Symlinks are not resolved. An empty result becomes `.`.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                // ".." directly under the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }

    parts.iter().collect()
}

/// Reject empty file lists and repeated names before anything is compared
fn check_entries(script: &JobScript) -> JobResult<()> {
    if script.files.is_empty() {
        return Err(JobError::EmptyJobList);
    }

    let mut seen = HashSet::new();
    for entry in &script.files {
        if !seen.insert(entry.name.as_str()) {
            return Err(JobError::DuplicateName {
                name: entry.name.clone(),
            });
        }
    }

    Ok(())
}

fn report(out: &mut dyn Write, line: std::fmt::Arguments) {
    // console output is best effort; a closed stdout must not mask the verdict
    if let Err(err) = writeln!(out, "{}", line) {
        log::warn!("Failed to write progress: {}", err);
    }
}

/// Run every comparison in `script`, aborting on the first failure
pub fn run(script: &JobScript, config: &CompareConfig, out: &mut dyn Write) -> JobResult<RunSummary> {
    let dir_1 = normalize_path(&script.dir_1);
    report(out, format_args!("Dir 1: \"{}\"", dir_1.display()));

    let dir_2 = normalize_path(&script.dir_2);
    report(out, format_args!("Dir 2: \"{}\"", dir_2.display()));

    report(out, format_args!(""));

    check_entries(script)?;

    let mut files = Vec::with_capacity(script.files.len());

    for entry in &script.files {
        report(out, format_args!("File: \"{}\"", entry.name));

        let path_1 = dir_1.join(&entry.name);
        let path_2 = dir_2.join(&entry.name);

        let comparison = comparator::compare(&path_1, &path_2, &entry.exclusions, config)
            .map_err(|source| JobError::Compare {
                name: entry.name.clone(),
                source,
            })?;

        log::info!(
            "{}: {} bytes equal, {} excluded in {} range(s)",
            entry.name,
            comparison.compared_bytes,
            comparison.excluded_bytes,
            comparison.exclusions.len()
        );

        if config.verbose {
            report(
                out,
                format_args!(
                    "    {} bytes, {} compared, {} excluded ({} detected)",
                    comparison.size,
                    comparison.compared_bytes,
                    comparison.excluded_bytes,
                    comparison.detected.len()
                ),
            );
        }

        files.push((entry.name.clone(), comparison));
    }

    report(out, format_args!(""));
    report(out, format_args!("Succeeded."));

    Ok(RunSummary { dir_1, dir_2, files })
}

/// Load the script at `path` and run it
pub fn run_script(path: &Path, config: &CompareConfig, out: &mut dyn Write) -> JobResult<RunSummary> {
    let script = JobScript::load(path)?;
    run(&script, config, out)
}
