//! Executable comparison command line tool
//!
//! Reads a JSON job script naming two directories and the files to compare
//! between them, then checks each pair byte for byte outside the declared
//! exclusions and the automatically detected PE/COFF timestamp.

use clap::error::ErrorKind;
use clap::Parser;
use exe_compare::{run_script, CompareConfig};
use std::io;
use std::path::PathBuf;
use std::process;

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "exe-compare")]
#[command(about = "Compares executable files for equality outside excluded ranges", long_about = None)]
#[command(version)]
struct Args {
    /// JSON job script
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,

    /// Print per-file statistics and debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Do not exclude the PE/COFF timestamp automatically
    #[arg(long)]
    no_auto_exclusions: bool,
}

fn print_usage() {
    println!("Usage: exe-compare <script.json>");
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                // a failed write means stdout is closed, so there is no reader for the help
                let _ = err.print();
                return;
            }
            _ => {
                // a wrong argument count is not a failure, just like -h
                print_usage();
                return;
            }
        },
    };

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Error // Only show errors by default
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    let config = CompareConfig::new()
        .detect_volatile_ranges(!args.no_auto_exclusions)
        .verbose(args.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Err(err) = run_script(&args.script, &config, &mut out) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}
