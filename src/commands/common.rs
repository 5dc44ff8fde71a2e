//! Shared argument structs, flattened into each subcommand.

use std::path::PathBuf;

use clap::Args;

use pairec_lib::bam_io::is_stdin_path;
use pairec_lib::validation::validate_file_exists;

/// Input and output BAM paths.
#[derive(Debug, Clone, Args)]
pub struct BamIoOptions {
    /// Input BAM file, grouped by read name
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Output BAM file of synthetic pairs
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
}

impl BamIoOptions {
    /// Checks that the input file exists; stdin paths are exempt.
    ///
    /// # Errors
    ///
    /// Returns an error when the input file is absent.
    pub fn validate(&self) -> anyhow::Result<()> {
        if is_stdin_path(&self.input) {
            return Ok(());
        }
        validate_file_exists(&self.input, "Input BAM")?;
        Ok(())
    }
}

/// BGZF codec concurrency options.
///
/// The thread count is an I/O hint only: it parallelizes BGZF
/// compression/decompression and never changes record order or engine
/// behavior.
#[derive(Debug, Clone, Default, Args)]
pub struct ThreadingOptions {
    /// Number of threads for BGZF compression and decompression.
    ///
    /// If not specified, I/O is single-threaded.
    #[arg(long = "threads")]
    pub threads: Option<usize>,
}

impl ThreadingOptions {
    /// Creates threading options with N threads.
    #[must_use]
    pub fn new(threads: usize) -> Self {
        Self { threads: Some(threads) }
    }

    /// Creates single-threaded options.
    #[must_use]
    pub fn none() -> Self {
        Self { threads: None }
    }

    /// Returns the number of I/O threads (1 when unspecified).
    #[must_use]
    pub fn num_threads(&self) -> usize {
        self.threads.unwrap_or(1).max(1)
    }

    /// Returns a log message describing the threading configuration.
    #[must_use]
    pub fn log_message(&self) -> String {
        match self.num_threads() {
            1 => "Single-threaded I/O".to_string(),
            n => format!("Using {n} BGZF threads"),
        }
    }
}

/// Output compression settings.
#[derive(Debug, Clone, Default, Args)]
pub struct CompressionOptions {
    /// BGZF compression level for the output BAM (1 fastest, 12 smallest)
    #[arg(long, default_value_t = 1)]
    pub compression_level: u32,
}
