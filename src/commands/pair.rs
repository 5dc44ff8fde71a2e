//! Convert multi-way alignments into synthetic paired-end records.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use noodles::sam::alignment::io::Write as _;

use pairec_lib::bam_io::{create_bam_reader, create_bam_writer, finalize_bam_writer};
use pairec_lib::filter::{FilterDecision, FilterThresholds};
use pairec_lib::header::add_pg_record;
use pairec_lib::logging::{OperationTimer, format_count, format_percent};
use pairec_lib::pairing::PairGrouper;
use pairec_lib::progress::ProgressTracker;
use pairec_lib::validation::validate_percent_identity;

use crate::commands::command::Command;
use crate::commands::common::{BamIoOptions, CompressionOptions, ThreadingOptions};
use crate::version::VERSION;

/// Convert multi-way alignments into synthetic paired-end BAM records.
///
/// Reads a name-grouped BAM of single-end alignments, drops records that
/// fail mapping-quality, percent-identity, or aligned-length thresholds,
/// then emits every pairwise combination of the survivors within each read
/// name as paired-end records. Each pair is renamed `{name}_read{n}` and
/// cross-linked through the mate reference and position fields so
/// pair-aware downstream tools (e.g. scaffolders expecting bwa-style
/// pairs) can consume the output directly.
///
/// Input must be grouped by read name (name-sorted or collated); records
/// must be mapped and carry the NM tag. When `--min-mapq` is 0, emitted
/// records with MAPQ 0 are lifted to MAPQ 1 so downstream tools do not
/// discard them as unplaced.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Pair {
    #[command(flatten)]
    pub io: BamIoOptions,

    /// Minimum mapping quality for a record to be kept
    #[arg(short = 'q', long = "min-mapq", default_value_t = 1)]
    pub min_mapq: u8,

    /// Minimum percent identity, computed as (1 - NM / aligned_length) * 100
    #[arg(short = 'p', long = "min-percent-identity", default_value_t = 90.0)]
    pub min_percent_identity: f64,

    /// Minimum aligned query length in bases
    #[arg(short = 'l', long = "min-alignment-length", default_value_t = 150)]
    pub min_alignment_length: usize,

    #[command(flatten)]
    pub threading: ThreadingOptions,

    #[command(flatten)]
    pub compression: CompressionOptions,
}

/// Per-reason rejection counters for the run summary.
#[derive(Debug, Default)]
struct FilterStats {
    low_mapq: u64,
    low_identity: u64,
    short_alignment: u64,
    passed: u64,
}

impl FilterStats {
    fn record(&mut self, decision: FilterDecision) {
        match decision {
            FilterDecision::Pass => self.passed += 1,
            FilterDecision::LowMappingQuality => self.low_mapq += 1,
            FilterDecision::LowIdentity => self.low_identity += 1,
            FilterDecision::ShortAlignment => self.short_alignment += 1,
        }
    }

    fn total(&self) -> u64 {
        self.passed + self.low_mapq + self.low_identity + self.short_alignment
    }

    fn log_summary(&self) {
        let total = self.total().max(1);
        #[allow(clippy::cast_precision_loss)]
        let pct = |n: u64| format_percent(n as f64 / total as f64, 2);
        info!("Rejected {} records on mapping quality ({})", format_count(self.low_mapq), pct(self.low_mapq));
        info!("Rejected {} records on percent identity ({})", format_count(self.low_identity), pct(self.low_identity));
        info!("Rejected {} records on alignment length ({})", format_count(self.short_alignment), pct(self.short_alignment));
        info!("Kept {} records for pairing ({})", format_count(self.passed), pct(self.passed));
    }
}

impl Command for Pair {
    fn execute(&self, command_line: &str) -> Result<()> {
        self.io.validate()?;
        validate_percent_identity(self.min_percent_identity, "min-percent-identity")?;

        let threads = self.threading.num_threads();
        info!("{}", self.threading.log_message());

        let timer = OperationTimer::new("Pairing");

        let (mut reader, header) = create_bam_reader(&self.io.input, threads)?;
        let output_header = add_pg_record(header.clone(), VERSION.as_str(), command_line)
            .context("Failed to add @PG record to output header")?;
        let mut writer = create_bam_writer(
            &self.io.output,
            &output_header,
            threads,
            self.compression.compression_level,
        )?;

        let thresholds = FilterThresholds {
            min_mapq: self.min_mapq,
            min_percent_identity: self.min_percent_identity,
            min_alignment_length: self.min_alignment_length,
        };
        // MAPQ rescue only applies when MAPQ 0 records are allowed through
        let mut grouper = PairGrouper::new(self.min_mapq == 0);

        let mut progress = ProgressTracker::new("Processed records");
        let mut stats = FilterStats::default();
        let mut unmapped_skipped: u64 = 0;
        let mut records_written: u64 = 0;
        let mut emitted = Vec::new();

        for result in reader.record_bufs(&header) {
            let record = result.context("Failed to read BAM record")?;
            progress.inc(1);

            // Source-level exclusion; the filter treats unmapped as fatal
            if record.flags().is_unmapped() {
                unmapped_skipped += 1;
                continue;
            }

            let decision = thresholds.evaluate(&record)?;
            stats.record(decision);
            if !decision.is_pass() {
                continue;
            }

            grouper.push(record, &mut emitted)?;
            for paired in emitted.drain(..) {
                writer.write_alignment_record(&output_header, &paired)?;
                records_written += 1;
            }
        }

        grouper.finish(&mut emitted);
        for paired in emitted.drain(..) {
            writer.write_alignment_record(&output_header, &paired)?;
            records_written += 1;
        }

        finalize_bam_writer(writer)?;

        progress.log_final();
        if unmapped_skipped > 0 {
            info!("Skipped {} unmapped records", format_count(unmapped_skipped));
        }
        stats.log_summary();
        info!("Completed {} read groups", format_count(grouper.groups_seen()));
        info!(
            "Emitted {} pairs ({} records)",
            format_count(grouper.pairs_emitted()),
            format_count(records_written)
        );
        timer.log_completion(progress.count());

        Ok(())
    }
}
