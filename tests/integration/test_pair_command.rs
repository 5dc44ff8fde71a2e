//! Integration tests for the pair command.

use std::path::Path;
use std::process::Command;

use noodles::sam::alignment::record_buf::RecordBuf;
use pairec_lib::sam::builder::RecordBuilder;
use tempfile::TempDir;

use crate::helpers::bam_generator::{
    create_minimal_header, passing_alignment, read_bam_header, read_bam_records, write_bam,
};

fn run_pair(input: &Path, output: &Path, extra_args: &[&str]) -> std::process::ExitStatus {
    Command::new(env!("CARGO_BIN_EXE_pairec"))
        .args(["pair", "-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()])
        .args(extra_args)
        .status()
        .expect("Failed to run pair command")
}

fn record_names(records: &[RecordBuf]) -> Vec<String> {
    records
        .iter()
        .map(|r| String::from_utf8(r.name().expect("named record").to_vec()).unwrap())
        .collect()
}

/// A three-alignment group yields all C(3, 2) pairs with indexed names.
#[test]
fn test_pair_three_way_group() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_bam = temp_dir.path().join("input.bam");
    let output_bam = temp_dir.path().join("output.bam");

    let header = create_minimal_header(&[("chr1", 100_000), ("chr2", 100_000)]);
    let records = vec![
        passing_alignment("r1", 0, 100),
        passing_alignment("r1", 1, 5_000),
        passing_alignment("r1", 0, 20_000),
    ];
    write_bam(&input_bam, &header, &records);

    let status = run_pair(&input_bam, &output_bam, &[]);
    assert!(status.success(), "pair command failed");

    let output = read_bam_records(&output_bam);
    assert_eq!(output.len(), 6);
    assert_eq!(
        record_names(&output),
        vec!["r1_read0", "r1_read0", "r1_read1", "r1_read1", "r1_read2", "r1_read2"]
    );

    // First pair: forward/forward becomes flags 65 and 129
    assert_eq!(output[0].flags().bits(), 65);
    assert_eq!(output[1].flags().bits(), 129);

    // Mates cross-link to each other's reference and position
    assert_eq!(output[0].mate_reference_sequence_id(), Some(1));
    assert_eq!(output[0].mate_alignment_start().map(usize::from), Some(5_000));
    assert_eq!(output[1].mate_reference_sequence_id(), Some(0));
    assert_eq!(output[1].mate_alignment_start().map(usize::from), Some(100));
}

/// Groups with fewer than two surviving alignments produce no output.
#[test]
fn test_pair_singleton_groups_emit_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_bam = temp_dir.path().join("input.bam");
    let output_bam = temp_dir.path().join("output.bam");

    let header = create_minimal_header(&[("chr1", 100_000)]);
    let records = vec![passing_alignment("r1", 0, 100), passing_alignment("r2", 0, 500)];
    write_bam(&input_bam, &header, &records);

    let status = run_pair(&input_bam, &output_bam, &[]);
    assert!(status.success());
    assert!(read_bam_records(&output_bam).is_empty());
}

/// Low-MAPQ alignments are dropped before grouping.
#[test]
fn test_pair_mapq_filter() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_bam = temp_dir.path().join("input.bam");
    let output_bam = temp_dir.path().join("output.bam");

    let header = create_minimal_header(&[("chr1", 100_000)]);
    let low_mapq = RecordBuilder::new()
        .name("r1")
        .cigar("200M")
        .reference_sequence_id(0)
        .alignment_start(5_000)
        .mapping_quality(5)
        .tag("NM", 0)
        .build();
    let records =
        vec![passing_alignment("r1", 0, 100), low_mapq, passing_alignment("r1", 0, 9_000)];
    write_bam(&input_bam, &header, &records);

    let status = run_pair(&input_bam, &output_bam, &["--min-mapq", "10"]);
    assert!(status.success());

    // Only the two surviving alignments pair up
    let output = read_bam_records(&output_bam);
    assert_eq!(output.len(), 2);
    assert_eq!(record_names(&output), vec!["r1_read0", "r1_read0"]);
}

/// Low-identity alignments are dropped before grouping.
#[test]
fn test_pair_identity_filter() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_bam = temp_dir.path().join("input.bam");
    let output_bam = temp_dir.path().join("output.bam");

    let header = create_minimal_header(&[("chr1", 100_000)]);
    // NM=30 over 200 aligned bases is 85% identity
    let noisy = RecordBuilder::new()
        .name("r1")
        .cigar("200M")
        .reference_sequence_id(0)
        .alignment_start(5_000)
        .mapping_quality(60)
        .tag("NM", 30)
        .build();
    let records =
        vec![passing_alignment("r1", 0, 100), noisy, passing_alignment("r1", 0, 9_000)];
    write_bam(&input_bam, &header, &records);

    let status = run_pair(&input_bam, &output_bam, &[]);
    assert!(status.success());
    assert_eq!(read_bam_records(&output_bam).len(), 2);
}

/// Short alignments are dropped before grouping.
#[test]
fn test_pair_length_filter() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_bam = temp_dir.path().join("input.bam");
    let output_bam = temp_dir.path().join("output.bam");

    let header = create_minimal_header(&[("chr1", 100_000)]);
    let short = RecordBuilder::new()
        .name("r1")
        .cigar("100M")
        .reference_sequence_id(0)
        .alignment_start(5_000)
        .mapping_quality(60)
        .tag("NM", 0)
        .build();
    let records =
        vec![passing_alignment("r1", 0, 100), short, passing_alignment("r1", 0, 9_000)];
    write_bam(&input_bam, &header, &records);

    let status = run_pair(&input_bam, &output_bam, &["--min-alignment-length", "150"]);
    assert!(status.success());
    assert_eq!(read_bam_records(&output_bam).len(), 2);
}

/// With `--min-mapq 0`, MAPQ 0 records survive and are rescued to MAPQ 1.
#[test]
fn test_pair_mapq_rescue() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_bam = temp_dir.path().join("input.bam");
    let output_bam = temp_dir.path().join("output.bam");

    let header = create_minimal_header(&[("chr1", 100_000)]);
    let zero_mapq = |name: &str, start: usize| {
        RecordBuilder::new()
            .name(name)
            .cigar("200M")
            .reference_sequence_id(0)
            .alignment_start(start)
            .mapping_quality(0)
            .tag("NM", 0)
            .build()
    };
    write_bam(&input_bam, &header, &[zero_mapq("r1", 100), zero_mapq("r1", 5_000)]);

    let status = run_pair(&input_bam, &output_bam, &["--min-mapq", "0"]);
    assert!(status.success());

    let output = read_bam_records(&output_bam);
    assert_eq!(output.len(), 2);
    for record in &output {
        assert_eq!(record.mapping_quality().map(|q| q.get()), Some(1));
    }
}

/// Empty input yields a valid, empty output BAM.
#[test]
fn test_pair_empty_input() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_bam = temp_dir.path().join("input.bam");
    let output_bam = temp_dir.path().join("output.bam");

    let header = create_minimal_header(&[("chr1", 100_000)]);
    write_bam(&input_bam, &header, &[]);

    let status = run_pair(&input_bam, &output_bam, &[]);
    assert!(status.success());
    assert!(output_bam.exists());
    assert!(read_bam_records(&output_bam).is_empty());
}

/// The output header carries the input references plus a pairec @PG record.
#[test]
fn test_pair_output_header_provenance() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_bam = temp_dir.path().join("input.bam");
    let output_bam = temp_dir.path().join("output.bam");

    let header = create_minimal_header(&[("chr1", 100_000), ("chr2", 50_000)]);
    write_bam(&input_bam, &header, &[passing_alignment("r1", 0, 100)]);

    let status = run_pair(&input_bam, &output_bam, &[]);
    assert!(status.success());

    let output_header = read_bam_header(&output_bam);
    assert_eq!(output_header.reference_sequences().len(), 2);
    assert!(output_header.programs().as_ref().contains_key("pairec".as_bytes()));
}

/// Unmapped records are excluded at the source and never pair.
#[test]
fn test_pair_unmapped_records_skipped() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_bam = temp_dir.path().join("input.bam");
    let output_bam = temp_dir.path().join("output.bam");

    let header = create_minimal_header(&[("chr1", 100_000)]);
    let unmapped = RecordBuilder::new().name("r1").unmapped(true).build();
    let records =
        vec![passing_alignment("r1", 0, 100), unmapped, passing_alignment("r1", 0, 9_000)];
    write_bam(&input_bam, &header, &records);

    let status = run_pair(&input_bam, &output_bam, &[]);
    assert!(status.success());

    // Only the two mapped alignments pair up
    let output = read_bam_records(&output_bam);
    assert_eq!(output.len(), 2);
    assert_eq!(record_names(&output), vec!["r1_read0", "r1_read0"]);
}

/// A record missing the NM tag aborts the run with a non-zero exit.
#[test]
fn test_pair_missing_nm_tag_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_bam = temp_dir.path().join("input.bam");
    let output_bam = temp_dir.path().join("output.bam");

    let header = create_minimal_header(&[("chr1", 100_000)]);
    let no_nm = RecordBuilder::new()
        .name("r1")
        .cigar("200M")
        .reference_sequence_id(0)
        .alignment_start(100)
        .mapping_quality(60)
        .build();
    write_bam(&input_bam, &header, &[no_nm]);

    let status = run_pair(&input_bam, &output_bam, &[]);
    assert!(!status.success(), "pair command should fail on missing NM tag");
}

/// A missing input file fails cleanly.
#[test]
fn test_pair_missing_input_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_bam = temp_dir.path().join("absent.bam");
    let output_bam = temp_dir.path().join("output.bam");

    let status = run_pair(&input_bam, &output_bam, &[]);
    assert!(!status.success());
}

/// Multi-threaded I/O produces the same records as single-threaded.
#[test]
fn test_pair_multithreaded_io_matches() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_bam = temp_dir.path().join("input.bam");
    let out_single = temp_dir.path().join("single.bam");
    let out_multi = temp_dir.path().join("multi.bam");

    let header = create_minimal_header(&[("chr1", 100_000)]);
    let records: Vec<RecordBuf> = (0..20)
        .flat_map(|g| {
            (0..3).map(move |i| (g, i)).collect::<Vec<_>>()
        })
        .map(|(g, i)| passing_alignment(&format!("r{g}"), 0, 100 + g * 1_000 + i * 10))
        .collect();
    write_bam(&input_bam, &header, &records);

    assert!(run_pair(&input_bam, &out_single, &[]).success());
    assert!(run_pair(&input_bam, &out_multi, &["--threads", "4"]).success());

    let single = read_bam_records(&out_single);
    let multi = read_bam_records(&out_multi);
    assert_eq!(single.len(), 20 * 3 * 2);
    assert_eq!(record_names(&single), record_names(&multi));
}
