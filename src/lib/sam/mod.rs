//! SAM/BAM record utilities.
//!
//! Helpers for the handful of record fields the pairing engine inspects:
//! read names, the `NM` edit-distance tag, and the aligned query length
//! derived from the CIGAR. The [`builder`] submodule provides a fluent
//! record builder for tests.

pub mod builder;

use noodles::sam::alignment::record::cigar::op::Kind;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record_buf::RecordBuf;
use noodles::sam::alignment::record_buf::data::field::Value;

use crate::errors::{PairecError, Result};

/// The `NM` (edit distance) auxiliary tag.
pub const NM_TAG: Tag = Tag::new(b'N', b'M');

/// Returns the record's name as a lossily decoded string, or `<unknown>`.
#[must_use]
pub fn name_lossy(record: &RecordBuf) -> String {
    record.name().map_or_else(
        || "<unknown>".to_string(),
        |n| String::from_utf8_lossy(n.as_ref()).to_string(),
    )
}

/// Extracts the `NM` tag (edit distance) from a record.
///
/// # Errors
///
/// Returns [`PairecError::MissingTag`] when the tag is absent or carries a
/// non-integer value; percent identity cannot be computed without it.
pub fn edit_distance(record: &RecordBuf) -> Result<u64> {
    let value = record.data().get(&NM_TAG).ok_or_else(|| PairecError::MissingTag {
        read: name_lossy(record),
        tag: "NM".to_string(),
    })?;

    let nm = match value {
        Value::Int8(v) => i64::from(*v),
        Value::UInt8(v) => i64::from(*v),
        Value::Int16(v) => i64::from(*v),
        Value::UInt16(v) => i64::from(*v),
        Value::Int32(v) => i64::from(*v),
        Value::UInt32(v) => i64::from(*v),
        _ => {
            return Err(PairecError::MissingTag {
                read: name_lossy(record),
                tag: "NM".to_string(),
            });
        }
    };

    // Negative NM is nonsense; surface it as a missing/bad tag
    u64::try_from(nm)
        .map_err(|_| PairecError::MissingTag { read: name_lossy(record), tag: "NM".to_string() })
}

/// Number of query bases consumed by the alignment.
///
/// Sums the CIGAR operations that consume query bases and are part of the
/// alignment proper (match, insertion, sequence match/mismatch); soft and
/// hard clips are excluded.
#[must_use]
pub fn aligned_query_length(record: &RecordBuf) -> usize {
    record
        .cigar()
        .as_ref()
        .iter()
        .filter(|op| {
            matches!(
                op.kind(),
                Kind::Match | Kind::Insertion | Kind::SequenceMatch | Kind::SequenceMismatch
            )
        })
        .map(|op| op.len())
        .sum()
}
