//! Training progress logging with verbosity levels.
//!
//! Output goes to stderr so stdout stays clean for machine-readable
//! results.

// =============================================================================
// Verbosity
// =============================================================================

/// How much training progress to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// No output.
    Silent,
    /// Phase summaries and final metrics.
    #[default]
    Info,
    /// Everything, including per-phase details.
    Debug,
}

// =============================================================================
// TrainingLogger
// =============================================================================

/// Structured logging for a training run.
#[derive(Debug, Clone)]
pub struct TrainingLogger {
    verbosity: Verbosity,
}

impl TrainingLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Announce the start of a training run.
    pub fn start_training(&self, num_trees: usize, rows: usize) {
        if self.verbosity >= Verbosity::Info {
            eprintln!("[train] fitting {num_trees} trees on {rows} rows");
        }
    }

    /// Report the train/validation split.
    pub fn log_split(&self, train_rows: usize, valid_rows: usize) {
        if self.verbosity >= Verbosity::Debug {
            eprintln!("[train] split: {train_rows} train rows, {valid_rows} validation rows");
        }
    }

    /// Report named metric values.
    pub fn log_metrics(&self, metrics: &[(String, f64)]) {
        if self.verbosity >= Verbosity::Info {
            let formatted: Vec<String> = metrics
                .iter()
                .map(|(name, value)| format!("{name}: {value:.3}"))
                .collect();
            eprintln!("[train] {}", formatted.join(", "));
        }
    }

    /// Announce the end of a training run.
    pub fn finish_training(&self) {
        if self.verbosity >= Verbosity::Info {
            eprintln!("[train] done");
        }
    }

    /// Free-form detail line, only at debug verbosity.
    pub fn debug(&self, message: &str) {
        if self.verbosity >= Verbosity::Debug {
            eprintln!("[train] {message}");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
