//! Run options for the comparator and the job runner

/// Options shared by every comparison of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareConfig {
    /// Exclude format-specific volatile fields found by the sniffer
    pub detect_volatile_ranges: bool,
    /// Print per-file statistics after each comparison
    pub verbose: bool,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            detect_volatile_ranges: true,
            verbose: false,
        }
    }
}

impl CompareConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable automatic exclusions
    pub fn detect_volatile_ranges(mut self, enabled: bool) -> Self {
        self.detect_volatile_ranges = enabled;
        self
    }

    /// Enable or disable per-file statistics
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
