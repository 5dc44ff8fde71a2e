//! Grouping of alignments by read name and synthesis of paired-end records.
//!
//! Records arriving from a name-sorted (or name-grouped) stream are buffered
//! until the read name changes, then every unordered pair of alignments in
//! the finished group is emitted as two synthetic paired-end records. A
//! group with fewer than two surviving alignments emits nothing.
//!
//! Pair synthesis uses additive flag arithmetic: the first mate's flag
//! becomes `a.flag + 65 + 2 * b.flag` and the second's
//! `b.flag + 129 + 2 * a.flag`.
//! With plain forward/reverse input flags this is equivalent to setting the
//! PAIRED, READ1/READ2, and MATE_REVERSE bits, but richer input flags carry
//! their mate's remaining bits shifted into unrelated positions. The
//! arithmetic is kept bit-for-bit for output compatibility.

use bstr::BString;
use noodles::sam::alignment::record::{Flags, MappingQuality};
use noodles::sam::alignment::record_buf::RecordBuf;

use crate::errors::{PairecError, Result};

/// Flag addend for the first mate: PAIRED (1) + READ1 (64).
const FIRST_MATE_ADDEND: u16 = 65;

/// Flag addend for the second mate: PAIRED (1) + READ2 (128).
const SECOND_MATE_ADDEND: u16 = 129;

/// Buffers consecutive same-name records and emits synthetic pairs.
#[derive(Debug, Default)]
pub struct PairGrouper {
    /// When set, emitted records with MAPQ 0 are lifted to MAPQ 1 so that
    /// downstream tools treating 0 as "unplaced" keep them.
    rescue_zero_mapq: bool,
    current_name: Option<BString>,
    group: Vec<RecordBuf>,
    groups_seen: u64,
    pairs_emitted: u64,
}

impl PairGrouper {
    /// Creates a grouper, optionally rescuing zero-MAPQ output records.
    #[must_use]
    pub fn new(rescue_zero_mapq: bool) -> Self {
        Self { rescue_zero_mapq, ..Self::default() }
    }

    /// Adds one surviving record, appending any pairs completed by a name
    /// change to `output`.
    ///
    /// # Errors
    ///
    /// Returns [`PairecError::UnnamedRecord`] when the record has no read
    /// name; grouping is keyed on names and cannot proceed without one.
    pub fn push(&mut self, record: RecordBuf, output: &mut Vec<RecordBuf>) -> Result<()> {
        let name: BString =
            record.name().ok_or(PairecError::UnnamedRecord)?.into();

        if self.current_name.as_ref() != Some(&name) {
            self.emit_group(output);
            self.current_name = Some(name);
        }

        self.group.push(record);
        Ok(())
    }

    /// Flushes the final group after the input stream is exhausted.
    pub fn finish(&mut self, output: &mut Vec<RecordBuf>) {
        self.emit_group(output);
        self.current_name = None;
    }

    /// Number of read-name groups completed so far.
    #[must_use]
    pub fn groups_seen(&self) -> u64 {
        self.groups_seen
    }

    /// Number of pairs emitted so far (each pair is two records).
    #[must_use]
    pub fn pairs_emitted(&self) -> u64 {
        self.pairs_emitted
    }

    /// Emits all C(k, 2) pairs for the buffered group, then clears it.
    fn emit_group(&mut self, output: &mut Vec<RecordBuf>) {
        if self.group.is_empty() {
            return;
        }
        self.groups_seen += 1;

        let mut pair_index = 0;
        for i in 0..self.group.len() {
            for j in (i + 1)..self.group.len() {
                let (first, second) =
                    self.make_pair(&self.group[i], &self.group[j], pair_index);
                output.push(first);
                output.push(second);
                pair_index += 1;
                self.pairs_emitted += 1;
            }
        }

        self.group.clear();
    }

    /// Builds the two synthetic mates for one alignment pair.
    fn make_pair(&self, a: &RecordBuf, b: &RecordBuf, pair_index: usize) -> (RecordBuf, RecordBuf) {
        let mut first = a.clone();
        let mut second = b.clone();

        let pair_name = paired_read_name(a, pair_index);
        *first.name_mut() = Some(pair_name.clone());
        *second.name_mut() = Some(pair_name);

        let a_bits = a.flags().bits();
        let b_bits = b.flags().bits();
        *first.flags_mut() = Flags::from_bits_retain(
            a_bits.wrapping_add(FIRST_MATE_ADDEND).wrapping_add(b_bits.wrapping_mul(2)),
        );
        *second.flags_mut() = Flags::from_bits_retain(
            b_bits.wrapping_add(SECOND_MATE_ADDEND).wrapping_add(a_bits.wrapping_mul(2)),
        );

        *first.mate_reference_sequence_id_mut() = b.reference_sequence_id();
        *first.mate_alignment_start_mut() = b.alignment_start();
        *second.mate_reference_sequence_id_mut() = a.reference_sequence_id();
        *second.mate_alignment_start_mut() = a.alignment_start();

        if self.rescue_zero_mapq {
            rescue_mapping_quality(&mut first);
            rescue_mapping_quality(&mut second);
        }

        (first, second)
    }
}

/// Name for the `pair_index`-th pair of a group: `{name}_read{n}`.
fn paired_read_name(record: &RecordBuf, pair_index: usize) -> BString {
    let mut name: Vec<u8> = record.name().map(|n| n.to_vec()).unwrap_or_default();
    name.extend_from_slice(b"_read");
    name.extend_from_slice(pair_index.to_string().as_bytes());
    name.into()
}

/// Lifts MAPQ 0 to MAPQ 1; other values are left untouched.
fn rescue_mapping_quality(record: &mut RecordBuf) {
    if record.mapping_quality().map(|mapq| mapq.get()) == Some(0) {
        *record.mapping_quality_mut() = MappingQuality::new(1);
    }
}
